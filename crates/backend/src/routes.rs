use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // A001 Falla
        // ========================================
        .route(
            "/api/fallas",
            get(handlers::a001_falla::list_all).post(handlers::a001_falla::create),
        )
        .route("/api/fallas/validar", get(handlers::a001_falla::validar))
        .route("/api/fallas/:id", get(handlers::a001_falla::get_by_id))
        .route(
            "/api/fallas/:id/estado",
            post(handlers::a001_falla::change_estado),
        )
        // ========================================
        // A002 Equipo
        // ========================================
        .route(
            "/api/equipos/catalogo",
            get(handlers::a002_equipo::get_catalog),
        )
        .route(
            "/api/equipos/testdata",
            post(handlers::a002_equipo::insert_test_data),
        )
        // ========================================
        // UTILITIES
        // ========================================
        .route(
            "/api/logs",
            get(handlers::logs::list_all)
                .post(handlers::logs::create)
                .delete(handlers::logs::clear_all),
        )
}
