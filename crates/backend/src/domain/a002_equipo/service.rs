use super::repository;
use crate::shared::logger::{self, category};
use contracts::domain::a002_equipo::{EquipmentCatalog, Equipo, EquipoId};

/// Каталог активного оборудования для селектора формы
pub async fn get_catalog() -> anyhow::Result<EquipmentCatalog> {
    let equipos = repository::list_active().await?;
    Ok(EquipmentCatalog::from_equipos(equipos))
}

/// Вставка тестовых данных (пропускает уже существующие коды)
pub async fn insert_test_data() -> anyhow::Result<usize> {
    let data: [(&str, &str, Option<&str>); 7] = [
        ("bomba", "BOM-012", Some("Bomba pozo norte")),
        ("bomba", "BOM-013", None),
        ("camara", "CAM-001", Some("Acceso principal")),
        ("camara", "CAM-002", Some("Estacionamiento")),
        ("gabinete", "GAB-001", Some("Gabinete central")),
        ("switch", "SW-001", Some("Core")),
        ("ups", "UPS-001", None),
    ];

    let mut inserted = 0;
    for (tipo, codigo, nombre) in data {
        if repository::get_by_tipo_and_codigo(tipo, codigo)
            .await?
            .is_some()
        {
            continue;
        }
        let equipo = Equipo {
            id: EquipoId(0),
            tipo: tipo.to_string(),
            codigo: codigo.to_string(),
            nombre: nombre.map(str::to_string),
            activo: true,
        };
        equipo
            .validate()
            .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
        repository::insert(&equipo).await?;
        inserted += 1;
    }

    logger::log(
        category::EQUIPO,
        &format!("Datos de prueba: {} equipos insertados", inserted),
    );
    Ok(inserted)
}
