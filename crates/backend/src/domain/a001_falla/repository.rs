use contracts::domain::a001_falla::{Falla, FallaEstado, FallaId, Prioridad};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a001_falla")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub equipo_tipo: String,
    pub equipo_id: i64,
    pub tipo_falla_id: Option<i64>,
    pub descripcion: Option<String>,
    pub prioridad: Option<String>,
    pub fecha_reporte: chrono::DateTime<chrono::Utc>,
    pub estado: String,
    pub fecha_cierre: Option<chrono::DateTime<chrono::Utc>>,
    pub solucion_aplicada: Option<String>,
    pub observaciones: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Falla {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let estado = m
            .estado
            .parse::<FallaEstado>()
            .map_err(|e| anyhow::anyhow!("a001_falla id={}: {}", m.id, e))?;
        // Неизвестный приоритет не мешает работе с falla
        let prioridad = m.prioridad.as_deref().and_then(|p| match p.parse::<Prioridad>() {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::warn!("a001_falla id={}: {}", m.id, e);
                None
            }
        });

        Ok(Falla {
            id: FallaId(m.id),
            equipo_tipo: m.equipo_tipo,
            equipo_id: m.equipo_id,
            tipo_falla_id: m.tipo_falla_id,
            descripcion: m.descripcion,
            prioridad,
            fecha_reporte: m.fecha_reporte,
            estado,
            fecha_cierre: m.fecha_cierre,
            solucion_aplicada: m.solucion_aplicada,
            observaciones: m.observaciones,
        })
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_aggregates(models: Vec<Model>) -> anyhow::Result<Vec<Falla>> {
    models.into_iter().map(Falla::try_from).collect()
}

/// Самая свежая открытая falla для оборудования
pub async fn find_active_for_equipo(
    equipo_tipo: &str,
    equipo_id: i64,
) -> anyhow::Result<Option<Falla>> {
    let activos: Vec<&str> = FallaEstado::ACTIVOS.iter().map(|e| e.as_str()).collect();
    let result = Entity::find()
        .filter(Column::EquipoTipo.eq(equipo_tipo))
        .filter(Column::EquipoId.eq(equipo_id))
        .filter(Column::Estado.is_in(activos))
        .order_by_desc(Column::FechaReporte)
        .one(conn())
        .await?;
    result.map(Falla::try_from).transpose()
}

pub async fn get_by_id(id: i64) -> anyhow::Result<Option<Falla>> {
    let result = Entity::find_by_id(id).one(conn()).await?;
    result.map(Falla::try_from).transpose()
}

/// Все fallas, новые сверху
pub async fn list_all() -> anyhow::Result<Vec<Falla>> {
    let models = Entity::find()
        .order_by_desc(Column::FechaReporte)
        .all(conn())
        .await?;
    to_aggregates(models)
}

pub async fn list_for_equipo(equipo_tipo: &str, equipo_id: i64) -> anyhow::Result<Vec<Falla>> {
    let models = Entity::find()
        .filter(Column::EquipoTipo.eq(equipo_tipo))
        .filter(Column::EquipoId.eq(equipo_id))
        .order_by_desc(Column::FechaReporte)
        .all(conn())
        .await?;
    to_aggregates(models)
}

pub async fn insert(aggregate: &Falla) -> anyhow::Result<FallaId> {
    let active = ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        equipo_tipo: Set(aggregate.equipo_tipo.clone()),
        equipo_id: Set(aggregate.equipo_id),
        tipo_falla_id: Set(aggregate.tipo_falla_id),
        descripcion: Set(aggregate.descripcion.clone()),
        prioridad: Set(aggregate.prioridad.map(|p| p.as_str().to_string())),
        fecha_reporte: Set(aggregate.fecha_reporte),
        estado: Set(aggregate.estado.as_str().to_string()),
        fecha_cierre: Set(aggregate.fecha_cierre),
        solucion_aplicada: Set(aggregate.solucion_aplicada.clone()),
        observaciones: Set(aggregate.observaciones.clone()),
    };
    let model = active.insert(conn()).await?;
    Ok(FallaId(model.id))
}

/// Сохранить состояние и поля закрытия
pub async fn update_estado(aggregate: &Falla) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(aggregate.id.value()),
        estado: Set(aggregate.estado.as_str().to_string()),
        fecha_cierre: Set(aggregate.fecha_cierre),
        solucion_aplicada: Set(aggregate.solucion_aplicada.clone()),
        observaciones: Set(aggregate.observaciones.clone()),
        ..Default::default()
    };
    active.update(conn()).await?;
    Ok(())
}
