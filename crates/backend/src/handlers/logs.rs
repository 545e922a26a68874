use axum::{http::StatusCode, Json};
use contracts::shared::logger::{CreateLogRequest, LogEntry};

use crate::shared::logger::repository;

/// GET /api/logs
pub async fn list_all() -> Result<Json<Vec<LogEntry>>, StatusCode> {
    repository::list_recent().await.map(Json).map_err(|e| {
        tracing::error!("Failed to list logs: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// POST /api/logs
///
/// Клиент присылает свои события (например, сбой проверки дубликатов).
pub async fn create(Json(req): Json<CreateLogRequest>) -> StatusCode {
    if req.source == "client" {
        tracing::warn!(target: "client", category = %req.category, "{}", req.message);
    }
    match repository::append(&req.source, &req.category, &req.message).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::error!("Failed to store log entry: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// DELETE /api/logs
pub async fn clear_all() -> StatusCode {
    match repository::clear().await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
