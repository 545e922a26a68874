use serde::{Deserialize, Serialize};

crate::int_aggregate_id!(
    /// Идентификатор единицы оборудования
    EquipoId
);

/// Единица оборудования (камера, шкаф, коммутатор, ИБП, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipo {
    pub id: EquipoId,
    pub tipo: String,
    pub codigo: String,
    pub nombre: Option<String>,
    pub activo: bool,
}

impl Equipo {
    pub fn validate(&self) -> Result<(), String> {
        if self.tipo.trim().is_empty() {
            return Err("El tipo de equipo no puede estar vacío".into());
        }
        if self.codigo.trim().is_empty() {
            return Err("El código no puede estar vacío".into());
        }
        Ok(())
    }
}
