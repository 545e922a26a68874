use crate::shared::api_utils::api_url;
use contracts::domain::a002_equipo::EquipmentCatalog;
use gloo_net::http::Request;
use wasm_bindgen::JsValue;

/// Имя глобальной переменной, в которую страница встраивает каталог
const EMBEDDED_CATALOG_KEY: &str = "equiposData";

/// Каталог, встроенный в страницу (`window.equiposData`), если он есть
pub fn embedded_catalog() -> Option<EquipmentCatalog> {
    let window = web_sys::window()?;
    let value = js_sys::Reflect::get(&window, &JsValue::from_str(EMBEDDED_CATALOG_KEY)).ok()?;
    if value.is_undefined() || value.is_null() {
        return None;
    }
    match serde_wasm_bindgen::from_value::<EquipmentCatalog>(value) {
        Ok(catalog) => Some(catalog),
        Err(e) => {
            log::warn!("window.{} tiene un formato inválido: {}", EMBEDDED_CATALOG_KEY, e);
            None
        }
    }
}

/// Получить каталог с сервера
pub async fn fetch_catalog() -> Result<EquipmentCatalog, String> {
    let response = Request::get(&api_url("/api/equipos/catalogo"))
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP error: {}", response.status()));
    }

    response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Встроенный каталог, иначе запрос к серверу (пустой встроенный не считается)
pub async fn load_catalog() -> Result<EquipmentCatalog, String> {
    if let Some(catalog) = embedded_catalog().filter(|c| !c.is_empty()) {
        log::debug!("Usando catálogo embebido ({} tipos)", catalog.0.len());
        return Ok(catalog);
    }
    fetch_catalog().await
}
