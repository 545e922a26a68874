pub mod aggregate;
pub mod catalog;

pub use aggregate::{Equipo, EquipoId};
pub use catalog::{EquipmentCatalog, EquipoOption, EquipoRecord};
