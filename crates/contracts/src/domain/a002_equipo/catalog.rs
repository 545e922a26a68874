use super::aggregate::{Equipo, EquipoId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Запись каталога для селектора оборудования
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipoRecord {
    pub id: EquipoId,
    pub codigo: String,
    #[serde(default)]
    pub nombre: Option<String>,
}

impl EquipoRecord {
    /// Подпись опции: "{codigo} - {nombre}"
    pub fn label(&self) -> String {
        let nombre = self
            .nombre
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("Sin nombre");
        format!("{} - {}", self.codigo, nombre)
    }
}

/// Опция `<select>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipoOption {
    pub value: String,
    pub label: String,
}

/// Каталог оборудования: тип → упорядоченный список записей
///
/// На странице он встраивается как `window.equiposData` с той же JSON-формой.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EquipmentCatalog(pub BTreeMap<String, Vec<EquipoRecord>>);

impl EquipmentCatalog {
    /// Собрать каталог из активного оборудования, записи упорядочены по коду
    pub fn from_equipos<I>(equipos: I) -> Self
    where
        I: IntoIterator<Item = Equipo>,
    {
        let mut map: BTreeMap<String, Vec<EquipoRecord>> = BTreeMap::new();
        for e in equipos.into_iter().filter(|e| e.activo) {
            map.entry(e.tipo).or_default().push(EquipoRecord {
                id: e.id,
                codigo: e.codigo,
                nombre: e.nombre,
            });
        }
        for records in map.values_mut() {
            records.sort_by(|a, b| a.codigo.cmp(&b.codigo));
        }
        Self(map)
    }

    pub fn tipos(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    /// Опции для выбранного типа; неизвестный или пустой тип даёт пустой список
    pub fn options_for(&self, tipo: &str) -> Vec<EquipoOption> {
        self.0
            .get(tipo)
            .map(|records| {
                records
                    .iter()
                    .map(|r| EquipoOption {
                        value: r.id.to_string(),
                        label: r.label(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
