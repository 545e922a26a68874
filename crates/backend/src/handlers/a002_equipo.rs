use axum::{http::StatusCode, Json};
use contracts::domain::a002_equipo::EquipmentCatalog;
use serde_json::json;

use crate::domain::a002_equipo;

/// GET /api/equipos/catalogo
pub async fn get_catalog() -> Result<Json<EquipmentCatalog>, StatusCode> {
    match a002_equipo::service::get_catalog().await {
        Ok(catalog) => Ok(Json(catalog)),
        Err(e) => {
            tracing::error!("Failed to load equipment catalog: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/equipos/testdata
pub async fn insert_test_data() -> Result<Json<serde_json::Value>, StatusCode> {
    match a002_equipo::service::insert_test_data().await {
        Ok(inserted) => Ok(Json(json!({ "inserted": inserted }))),
        Err(e) => {
            tracing::error!("Failed to insert test equipment: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
