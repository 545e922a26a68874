use super::error::FallaError;
use super::repository;
use crate::shared::logger::{self, category};
use contracts::domain::a001_falla::{
    CambioEstadoDto, Falla, FallaDto, FallaId, ValidarFallaQuery, ValidarFallaResponse,
};
use tokio::sync::Mutex;

/// Проверка дубликата и вставка должны идти без чередования,
/// иначе два одновременных отчёта по одному оборудованию пройдут оба.
static CREATE_LOCK: Mutex<()> = Mutex::const_new(());

/// Разбор query-параметров проверки: оба обязательны, id числовой
pub fn parse_validation_query(query: &ValidarFallaQuery) -> Result<(String, i64), FallaError> {
    let tipo = query
        .equipo_tipo
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let id = query
        .equipo_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    match (tipo, id) {
        (Some(tipo), Some(id)) => {
            let id = id.parse::<i64>().map_err(|_| {
                FallaError::InvalidInput(format!("equipo_id no numérico: {}", id))
            })?;
            Ok((tipo.to_string(), id))
        }
        _ => Err(FallaError::InvalidInput("Parámetros faltantes".into())),
    }
}

/// Ответ проверки по найденной (или не найденной) открытой falla
pub fn build_validation_response(falla_activa: Option<&Falla>) -> ValidarFallaResponse {
    match falla_activa {
        Some(falla) => ValidarFallaResponse::duplicado(falla),
        None => ValidarFallaResponse::permitido(),
    }
}

/// Можно ли зарегистрировать новую falla для оборудования
pub async fn validar_falla_duplicada(
    equipo_tipo: &str,
    equipo_id: i64,
) -> anyhow::Result<ValidarFallaResponse> {
    let activa = repository::find_active_for_equipo(equipo_tipo, equipo_id).await?;
    Ok(build_validation_response(activa.as_ref()))
}

/// Регистрация новой falla с повторной серверной проверкой на дубликат
pub async fn create(dto: FallaDto) -> Result<FallaId, FallaError> {
    let equipo_id = dto.validate().map_err(FallaError::InvalidInput)?;
    let aggregate = Falla::new_for_insert(&dto, equipo_id);

    let _guard = CREATE_LOCK.lock().await;

    let validacion = validar_falla_duplicada(&aggregate.equipo_tipo, equipo_id).await?;
    if !validacion.permitir {
        tracing::warn!(
            "Rejected duplicate falla for {}/{} (existing {})",
            aggregate.equipo_tipo,
            equipo_id,
            validacion
                .falla_existente
                .as_ref()
                .and_then(|f| f.display_id())
                .unwrap_or_default()
        );
        return Err(FallaError::Duplicate {
            mensaje: validacion.mensaje,
        });
    }

    let id = repository::insert(&aggregate).await?;
    logger::log(
        category::FALLA,
        &format!(
            "Falla {} reportada para {}/{}",
            id, aggregate.equipo_tipo, equipo_id
        ),
    );
    Ok(id)
}

/// Смена состояния по жизненному циклу
pub async fn change_estado(id: i64, cambio: CambioEstadoDto) -> Result<Falla, FallaError> {
    let mut falla = repository::get_by_id(id)
        .await?
        .ok_or(FallaError::NotFound(id))?;

    let anterior = falla.estado;
    falla
        .change_estado(&cambio)
        .map_err(FallaError::InvalidTransition)?;
    repository::update_estado(&falla).await?;

    logger::log(
        category::FALLA,
        &format!("Falla {}: {} → {}", id, anterior, falla.estado),
    );
    Ok(falla)
}

pub async fn get_by_id(id: i64) -> anyhow::Result<Option<Falla>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<Falla>> {
    repository::list_all().await
}

pub async fn list_for_equipo(equipo_tipo: &str, equipo_id: i64) -> anyhow::Result<Vec<Falla>> {
    repository::list_for_equipo(equipo_tipo, equipo_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use contracts::domain::a001_falla::FallaEstado;

    fn query(tipo: Option<&str>, id: Option<&str>) -> ValidarFallaQuery {
        ValidarFallaQuery {
            equipo_tipo: tipo.map(Into::into),
            equipo_id: id.map(Into::into),
        }
    }

    #[test]
    fn test_parse_validation_query() {
        let (tipo, id) = parse_validation_query(&query(Some("bomba"), Some("12"))).unwrap();
        assert_eq!(tipo, "bomba");
        assert_eq!(id, 12);
    }

    #[test]
    fn test_parse_validation_query_missing_params() {
        for q in [
            query(None, Some("12")),
            query(Some("bomba"), None),
            query(Some(""), Some("12")),
            query(Some("bomba"), Some("  ")),
        ] {
            match parse_validation_query(&q) {
                Err(FallaError::InvalidInput(msg)) => assert_eq!(msg, "Parámetros faltantes"),
                other => panic!("unexpected: {:?}", other),
            }
        }
    }

    #[test]
    fn test_parse_validation_query_non_numeric_id() {
        assert!(matches!(
            parse_validation_query(&query(Some("bomba"), Some("doce"))),
            Err(FallaError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_build_validation_response() {
        let allowed = build_validation_response(None);
        assert!(allowed.permitir);
        assert_eq!(allowed.mensaje, "OK");
        assert!(allowed.falla_existente.is_none());

        let falla = Falla {
            id: FallaId(99),
            equipo_tipo: "bomba".into(),
            equipo_id: 12,
            tipo_falla_id: None,
            descripcion: Some("No arranca".into()),
            prioridad: None,
            fecha_reporte: Utc.with_ymd_and_hms(2025, 1, 20, 8, 30, 0).unwrap(),
            estado: FallaEstado::Pendiente,
            fecha_cierre: None,
            solucion_aplicada: None,
            observaciones: None,
        };
        let blocked = build_validation_response(Some(&falla));
        assert!(!blocked.permitir);
        assert!(blocked.mensaje.contains("(ID: 99, reportada el 20/01/2025)"));
        assert_eq!(
            blocked.falla_existente.and_then(|f| f.display_id()),
            Some("99".to_string())
        );
    }

    fn form(tipo: &str, id: &str) -> FallaDto {
        FallaDto {
            equipo_tipo: tipo.into(),
            equipo_id: id.into(),
            ..Default::default()
        }
    }

    fn cambio(estado: FallaEstado) -> CambioEstadoDto {
        CambioEstadoDto {
            estado,
            solucion_aplicada: None,
            observaciones: None,
        }
    }

    /// Весь цикл на настоящей SQLite: соединение глобальное, поэтому один тест
    #[tokio::test]
    async fn test_duplicate_lifecycle_on_sqlite() {
        let db_file = std::env::temp_dir().join(format!(
            "fallas_service_test_{}.db",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&db_file);
        crate::shared::data::db::initialize_database(&db_file)
            .await
            .unwrap();

        // Первый отчёт проходит, повторный отклоняется
        let first = create(form("bomba", "12")).await.unwrap();
        match create(form("bomba", " 12 ")).await {
            Err(FallaError::Duplicate { mensaje }) => {
                assert!(mensaje.contains(&format!("(ID: {},", first)));
                assert!(mensaje.starts_with("Ya existe una falla Pendiente"));
            }
            other => panic!("expected duplicate, got {:?}", other),
        }
        // Другое оборудование не блокируется
        create(form("bomba", "13")).await.unwrap();

        let validacion = validar_falla_duplicada("bomba", 12).await.unwrap();
        assert!(!validacion.permitir);
        assert_eq!(
            validacion.falla_existente.and_then(|f| f.display_id()),
            Some(first.to_string())
        );

        // Недопустимый переход не меняет состояние
        assert!(matches!(
            change_estado(first.value(), cambio(FallaEstado::Cerrada)).await,
            Err(FallaError::InvalidTransition(_))
        ));
        assert!(matches!(
            change_estado(9999, cambio(FallaEstado::Asignada)).await,
            Err(FallaError::NotFound(9999))
        ));

        // Отменённая falla больше не блокирует новый отчёт
        let cancelada = change_estado(first.value(), cambio(FallaEstado::Cancelada))
            .await
            .unwrap();
        assert_eq!(cancelada.estado, FallaEstado::Cancelada);
        assert!(cancelada.fecha_cierre.is_some());
        assert!(validar_falla_duplicada("bomba", 12).await.unwrap().permitir);

        let second = create(form("bomba", "12")).await.unwrap();
        assert_ne!(second, first);
        assert_eq!(list_for_equipo("bomba", 12).await.unwrap().len(), 2);

        // Поиск открытой falla: только активные состояния, самая свежая
        let mut older = Falla::new_for_insert(&form("camara", "3"), 3);
        older.fecha_reporte = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
        older.estado = FallaEstado::Pendiente;
        let older_id = repository::insert(&older).await.unwrap();

        let mut newer = older.clone();
        newer.fecha_reporte = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        newer.estado = FallaEstado::Asignada;
        let newer_id = repository::insert(&newer).await.unwrap();

        let mut reparada = older.clone();
        reparada.fecha_reporte = Utc.with_ymd_and_hms(2024, 9, 1, 9, 0, 0).unwrap();
        reparada.estado = FallaEstado::Reparada;
        repository::insert(&reparada).await.unwrap();

        let activa = repository::find_active_for_equipo("camara", 3)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(activa.id, newer_id);
        assert_ne!(activa.id, older_id);
        assert!(repository::find_active_for_equipo("camara", 4)
            .await
            .unwrap()
            .is_none());

        let _ = std::fs::remove_file(&db_file);
    }
}
