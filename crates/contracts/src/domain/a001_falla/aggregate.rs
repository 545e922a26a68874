use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// ID Type
// ============================================================================

crate::int_aggregate_id!(
    /// Уникальный идентификатор falla (автоинкремент БД)
    FallaId
);

// ============================================================================
// Estado
// ============================================================================

/// Состояние жизненного цикла falla
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FallaEstado {
    Pendiente,
    Asignada,
    #[serde(rename = "En Proceso")]
    EnProceso,
    Reparada,
    Cerrada,
    Cancelada,
}

impl FallaEstado {
    /// Состояния, при которых falla считается открытой и блокирует новый отчёт
    pub const ACTIVOS: [FallaEstado; 3] = [
        FallaEstado::Pendiente,
        FallaEstado::Asignada,
        FallaEstado::EnProceso,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FallaEstado::Pendiente => "Pendiente",
            FallaEstado::Asignada => "Asignada",
            FallaEstado::EnProceso => "En Proceso",
            FallaEstado::Reparada => "Reparada",
            FallaEstado::Cerrada => "Cerrada",
            FallaEstado::Cancelada => "Cancelada",
        }
    }

    pub fn is_active(&self) -> bool {
        Self::ACTIVOS.contains(self)
    }

    /// Допустимые переходы:
    /// Pendiente → Asignada → En Proceso → Reparada → Cerrada,
    /// Cancelada доступна из любого открытого состояния.
    pub fn can_transition_to(&self, next: FallaEstado) -> bool {
        use FallaEstado::*;
        match (self, next) {
            (Pendiente, Asignada) => true,
            (Asignada, EnProceso) => true,
            (EnProceso, Reparada) => true,
            (Reparada, Cerrada) => true,
            (from, Cancelada) => from.is_active(),
            _ => false,
        }
    }

    /// Переход закрывает falla (проставляется fecha_cierre)
    pub fn is_terminal(&self) -> bool {
        matches!(self, FallaEstado::Cerrada | FallaEstado::Cancelada)
    }
}

impl fmt::Display for FallaEstado {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FallaEstado {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Pendiente" => Ok(FallaEstado::Pendiente),
            "Asignada" => Ok(FallaEstado::Asignada),
            "En Proceso" => Ok(FallaEstado::EnProceso),
            "Reparada" => Ok(FallaEstado::Reparada),
            "Cerrada" => Ok(FallaEstado::Cerrada),
            "Cancelada" => Ok(FallaEstado::Cancelada),
            other => Err(format!("Estado desconocido: {}", other)),
        }
    }
}

/// Приоритет falla
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prioridad {
    Baja,
    Media,
    Alta,
    Critica,
}

impl Prioridad {
    pub fn as_str(&self) -> &'static str {
        match self {
            Prioridad::Baja => "Baja",
            Prioridad::Media => "Media",
            Prioridad::Alta => "Alta",
            Prioridad::Critica => "Critica",
        }
    }

    pub fn all() -> [Prioridad; 4] {
        [
            Prioridad::Baja,
            Prioridad::Media,
            Prioridad::Alta,
            Prioridad::Critica,
        ]
    }
}

impl FromStr for Prioridad {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Baja" => Ok(Prioridad::Baja),
            "Media" => Ok(Prioridad::Media),
            "Alta" => Ok(Prioridad::Alta),
            "Critica" | "Crítica" => Ok(Prioridad::Critica),
            other => Err(format!("Prioridad desconocida: {}", other)),
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Falla: зарегистрированная неисправность оборудования
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Falla {
    pub id: FallaId,
    pub equipo_tipo: String,
    pub equipo_id: i64,
    pub tipo_falla_id: Option<i64>,
    pub descripcion: Option<String>,
    pub prioridad: Option<Prioridad>,
    pub fecha_reporte: DateTime<Utc>,
    pub estado: FallaEstado,
    pub fecha_cierre: Option<DateTime<Utc>>,
    pub solucion_aplicada: Option<String>,
    pub observaciones: Option<String>,
}

impl Falla {
    /// Новая falla в состоянии Pendiente (id назначит БД)
    pub fn new_for_insert(dto: &FallaDto, equipo_id: i64) -> Self {
        Self {
            id: FallaId(0),
            equipo_tipo: dto.equipo_tipo.trim().to_string(),
            equipo_id,
            tipo_falla_id: dto.tipo_falla_id,
            descripcion: dto.descripcion.clone().filter(|d| !d.trim().is_empty()),
            prioridad: dto.prioridad,
            fecha_reporte: Utc::now(),
            estado: FallaEstado::Pendiente,
            fecha_cierre: None,
            solucion_aplicada: None,
            observaciones: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.estado.is_active()
    }

    /// Применить смену состояния
    pub fn change_estado(&mut self, cambio: &CambioEstadoDto) -> Result<(), String> {
        if !self.estado.can_transition_to(cambio.estado) {
            return Err(format!(
                "Transición no permitida: {} → {}",
                self.estado, cambio.estado
            ));
        }
        self.estado = cambio.estado;
        if cambio.estado.is_terminal() {
            self.fecha_cierre = Some(Utc::now());
        }
        if cambio.solucion_aplicada.is_some() {
            self.solucion_aplicada = cambio.solucion_aplicada.clone();
        }
        if cambio.observaciones.is_some() {
            self.observaciones = cambio.observaciones.clone();
        }
        Ok(())
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// Данные формы "Nueva falla" (application/x-www-form-urlencoded)
///
/// `equipo_id` приходит строкой из `<select>`, разбор делает backend.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FallaDto {
    #[serde(default)]
    pub equipo_tipo: String,
    #[serde(default)]
    pub equipo_id: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub tipo_falla_id: Option<i64>,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub prioridad: Option<Prioridad>,
}

impl FallaDto {
    /// Проверка формы, возвращает разобранный equipo_id
    pub fn validate(&self) -> Result<i64, String> {
        if self.equipo_tipo.trim().is_empty() || self.equipo_id.trim().is_empty() {
            return Err("Debe seleccionar el tipo de equipo y el equipo específico".into());
        }
        self.equipo_id
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("Identificador de equipo inválido: {}", self.equipo_id))
    }
}

/// Запрос на смену состояния falla
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CambioEstadoDto {
    pub estado: FallaEstado,
    #[serde(default)]
    pub solucion_aplicada: Option<String>,
    #[serde(default)]
    pub observaciones: Option<String>,
}

/// HTML-формы отправляют пустую строку для невыбранного `<select>`
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}
