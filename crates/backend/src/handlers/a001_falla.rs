use axum::{
    extract::{Path, Query},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use contracts::domain::a001_falla::{CambioEstadoDto, Falla, FallaDto, ValidarFallaQuery};
use serde::Deserialize;
use serde_json::json;

use crate::domain::a001_falla::{self, FallaError};

fn error_status(err: &FallaError) -> StatusCode {
    match err {
        FallaError::Duplicate { .. } => StatusCode::CONFLICT,
        FallaError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        FallaError::NotFound(_) => StatusCode::NOT_FOUND,
        FallaError::InvalidTransition(_) => StatusCode::CONFLICT,
        FallaError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: FallaError) -> Response {
    let status = error_status(&err);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("{}", err);
    }
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

/// GET /api/fallas/validar?equipo_tipo=..&equipo_id=..
pub async fn validar(Query(query): Query<ValidarFallaQuery>) -> Response {
    let (tipo, id) = match a001_falla::service::parse_validation_query(&query) {
        Ok(parsed) => parsed,
        Err(FallaError::InvalidInput(msg)) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
        }
        Err(e) => return error_response(e),
    };

    match a001_falla::service::validar_falla_duplicada(&tipo, id).await {
        Ok(resp) => Json(resp).into_response(),
        Err(e) => error_response(FallaError::Storage(e)),
    }
}

/// Клиент явно ждёт JSON, а не HTML-страницу
fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|accept| accept.contains("application/json") && !accept.contains("text/html"))
        .unwrap_or(false)
}

/// Возврат на форму с сообщением в `?error=`
fn form_error_location(mensaje: &str) -> String {
    format!("/?error={}", urlencoding::encode(mensaje))
}

/// POST /api/fallas (обычный submit HTML-формы)
///
/// Браузер при отказе возвращается на форму с сообщением, JSON-клиент
/// получает код ошибки.
pub async fn create(headers: HeaderMap, Form(dto): Form<FallaDto>) -> Response {
    match a001_falla::service::create(dto).await {
        Ok(id) => {
            tracing::info!("Falla {} created", id);
            Redirect::to("/").into_response()
        }
        Err(e @ (FallaError::Duplicate { .. } | FallaError::InvalidInput(_)))
            if !wants_json(&headers) =>
        {
            tracing::warn!("Falla form rejected: {}", e);
            Redirect::to(&form_error_location(&e.to_string())).into_response()
        }
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub equipo_tipo: Option<String>,
    pub equipo_id: Option<i64>,
}

/// GET /api/fallas
pub async fn list_all(Query(query): Query<ListQuery>) -> Result<Json<Vec<Falla>>, StatusCode> {
    let result = match (query.equipo_tipo.as_deref(), query.equipo_id) {
        (Some(tipo), Some(id)) => a001_falla::service::list_for_equipo(tipo, id).await,
        _ => a001_falla::service::list_all().await,
    };
    result.map(Json).map_err(|e| {
        tracing::error!("Failed to list fallas: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// GET /api/fallas/:id
pub async fn get_by_id(Path(id): Path<i64>) -> Result<Json<Falla>, StatusCode> {
    match a001_falla::service::get_by_id(id).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/fallas/:id/estado
pub async fn change_estado(Path(id): Path<i64>, Json(cambio): Json<CambioEstadoDto>) -> Response {
    match a001_falla::service::change_estado(id, cambio).await {
        Ok(falla) => Json(falla).into_response(),
        Err(e) => error_response(e),
    }
}
