pub mod aggregate;
pub mod validation;

pub use aggregate::{CambioEstadoDto, Falla, FallaDto, FallaEstado, FallaId, Prioridad};
pub use validation::{FallaExistente, ValidarFallaQuery, ValidarFallaResponse};
