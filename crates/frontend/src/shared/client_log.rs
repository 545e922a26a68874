//! Отправка клиентских событий в серверный журнал (`POST /api/logs`)

use crate::shared::api_utils::api_url;
use contracts::shared::logger::CreateLogRequest;
use gloo_net::http::Request;

/// Записать событие в консоль браузера и отправить на сервер в фоне
///
/// Ошибка отправки только пишется в консоль: журнал не должен ломать UI.
pub fn report(category: &'static str, message: impl Into<String>) {
    let message = message.into();
    log::warn!("[{}] {}", category, message);

    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = send(CreateLogRequest::client(category, message)).await {
            log::error!("No se pudo enviar el log al servidor: {}", e);
        }
    });
}

async fn send(entry: CreateLogRequest) -> Result<(), String> {
    let response = Request::post(&api_url("/api/logs"))
        .json(&entry)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }
    Ok(())
}
