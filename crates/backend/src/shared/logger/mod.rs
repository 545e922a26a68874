pub mod repository;

use repository::append_detached;

/// Категории серверных событий
pub mod category {
    pub const STARTUP: &str = "startup";
    pub const FALLA: &str = "falla";
    pub const EQUIPO: &str = "equipo";
}

/// Логирование события на сервере
///
/// Запись уходит и в tracing, и в таблицу `system_log`.
///
/// # Примеры
/// ```ignore
/// logger::log(category::STARTUP, "Сервер запущен");
/// logger::log(category::FALLA, "Falla 12 creada para bomba/12");
/// ```
pub fn log(category: &str, message: &str) {
    tracing::info!(target: "system_log", category, "{}", message);
    append_detached("server", category, message);
}
