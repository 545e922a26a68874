use thiserror::Error;

/// Ошибки операций над falla
#[derive(Debug, Error)]
pub enum FallaError {
    /// Для оборудования уже есть открытая falla
    #[error("{mensaje}")]
    Duplicate { mensaje: String },

    #[error("Datos inválidos: {0}")]
    InvalidInput(String),

    #[error("Falla no encontrada: {0}")]
    NotFound(i64),

    #[error("{0}")]
    InvalidTransition(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
