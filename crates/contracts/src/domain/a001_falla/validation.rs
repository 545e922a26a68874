use super::aggregate::Falla;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Query-параметры `GET /api/fallas/validar`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidarFallaQuery {
    #[serde(default)]
    pub equipo_tipo: Option<String>,
    #[serde(default)]
    pub equipo_id: Option<String>,
}

/// Ссылка на уже открытую falla, из-за которой новый отчёт запрещён
///
/// Для клиента ссылка непрозрачна: сервер отдаёт `{id, estado, fecha_reporte}`,
/// но принимается любое JSON-значение, а идентификатор извлекается по возможности.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FallaExistente(pub Value);

impl FallaExistente {
    /// Идентификатор для сообщений: число, строка или поле `id` объекта
    pub fn display_id(&self) -> Option<String> {
        let raw = match &self.0 {
            Value::Object(map) => map.get("id")?,
            other => other,
        };
        match raw {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }
}

impl From<&Falla> for FallaExistente {
    fn from(f: &Falla) -> Self {
        Self(json!({
            "id": f.id,
            "estado": f.estado,
            "fecha_reporte": f.fecha_reporte.to_rfc3339(),
        }))
    }
}

/// Ответ проверки на дубликаты
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidarFallaResponse {
    pub permitir: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub mensaje: String,
    #[serde(default)]
    pub falla_existente: Option<FallaExistente>,
}

impl ValidarFallaResponse {
    pub fn permitido() -> Self {
        Self {
            permitir: true,
            mensaje: "OK".to_string(),
            falla_existente: None,
        }
    }

    /// Открытая falla найдена: отчёт запрещён
    pub fn duplicado(falla: &Falla) -> Self {
        Self {
            permitir: false,
            mensaje: mensaje_duplicado(falla),
            falla_existente: Some(FallaExistente::from(falla)),
        }
    }
}

/// `"mensaje": null` читается как пустая строка
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Текст предупреждения о существующей falla
pub fn mensaje_duplicado(falla: &Falla) -> String {
    format!(
        "Ya existe una falla {} para este equipo (ID: {}, reportada el {}). \
         Debe cerrar o cancelar la falla anterior antes de reportar una nueva.",
        falla.estado,
        falla.id,
        falla.fecha_reporte.format("%d/%m/%Y")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_falla::{FallaEstado, FallaId};
    use chrono::TimeZone;

    #[test]
    fn test_minimal_allowed_response() {
        let resp: ValidarFallaResponse =
            serde_json::from_str(r#"{"permitir":true,"mensaje":""}"#).unwrap();
        assert!(resp.permitir);
        assert!(resp.falla_existente.is_none());
    }

    #[test]
    fn test_conflict_reference_only_id() {
        let resp: ValidarFallaResponse = serde_json::from_str(
            r#"{"permitir":false,"mensaje":"Ya existe una falla activa","falla_existente":{"id":99}}"#,
        )
        .unwrap();
        assert!(!resp.permitir);
        assert_eq!(resp.mensaje, "Ya existe una falla activa");
        assert_eq!(
            resp.falla_existente.and_then(|f| f.display_id()),
            Some("99".to_string())
        );
    }

    #[test]
    fn test_conflict_reference_any_shape() {
        for (raw, id) in [
            (r#"99"#, Some("99")),
            (r#"{"id":"99"}"#, Some("99")),
            (r#"{"id":99,"estado":"Abierta"}"#, Some("99")),
            (r#""F-0099""#, Some("F-0099")),
            (r#"{"estado":"Pendiente"}"#, None),
            (r#"[1,2]"#, None),
        ] {
            let json = format!(
                r#"{{"permitir":false,"mensaje":"Ya existe","falla_existente":{}}}"#,
                raw
            );
            let resp: ValidarFallaResponse = serde_json::from_str(&json).unwrap();
            assert!(!resp.permitir);
            let existente = resp.falla_existente.expect("reference kept");
            assert_eq!(existente.display_id().as_deref(), id, "shape {}", raw);
        }
    }

    #[test]
    fn test_null_fields_are_absent() {
        let resp: ValidarFallaResponse = serde_json::from_str(
            r#"{"permitir":false,"mensaje":null,"falla_existente":null}"#,
        )
        .unwrap();
        assert!(!resp.permitir);
        assert_eq!(resp.mensaje, "");
        assert!(resp.falla_existente.is_none());
    }

    #[test]
    fn test_mensaje_duplicado_format() {
        let falla = Falla {
            id: FallaId(7),
            equipo_tipo: "camara".into(),
            equipo_id: 3,
            tipo_falla_id: None,
            descripcion: None,
            prioridad: None,
            fecha_reporte: chrono::Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap(),
            estado: FallaEstado::EnProceso,
            fecha_cierre: None,
            solucion_aplicada: None,
            observaciones: None,
        };
        let resp = ValidarFallaResponse::duplicado(&falla);
        assert!(!resp.permitir);
        assert!(resp
            .mensaje
            .starts_with("Ya existe una falla En Proceso para este equipo (ID: 7, reportada el 05/03/2024)."));
        let existente = resp.falla_existente.unwrap();
        assert_eq!(existente.display_id().as_deref(), Some("7"));
        assert_eq!(existente.0["estado"], "En Proceso");
    }
}
