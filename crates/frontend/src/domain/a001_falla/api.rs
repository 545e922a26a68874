use crate::shared::api_utils::{api_url, query_string};
use async_trait::async_trait;
use contracts::domain::a001_falla::ValidarFallaResponse;
use gloo_net::http::Request;

/// Источник ответов проверки на дубликаты
#[async_trait(?Send)]
pub trait ValidationClient {
    async fn validar(
        &self,
        equipo_tipo: &str,
        equipo_id: &str,
    ) -> Result<ValidarFallaResponse, String>;
}

/// Клиент `GET /api/fallas/validar`
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpValidationClient;

#[async_trait(?Send)]
impl ValidationClient for HttpValidationClient {
    async fn validar(
        &self,
        equipo_tipo: &str,
        equipo_id: &str,
    ) -> Result<ValidarFallaResponse, String> {
        let url = format!(
            "{}?{}",
            api_url("/api/fallas/validar"),
            query_string(&[("equipo_tipo", equipo_tipo), ("equipo_id", equipo_id)])
        );

        let response = Request::get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;

        if !response.ok() {
            return Err(format!("HTTP error: {}", response.status()));
        }

        response
            .json::<ValidarFallaResponse>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))
    }
}

/// URL, на который форма отправляется обычным POST
pub fn create_action_url() -> String {
    api_url("/api/fallas")
}
