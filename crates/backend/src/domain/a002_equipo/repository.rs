use contracts::domain::a002_equipo::{Equipo, EquipoId};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a002_equipo")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tipo: String,
    pub codigo: String,
    pub nombre: Option<String>,
    pub activo: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Equipo {
    fn from(m: Model) -> Self {
        Equipo {
            id: EquipoId(m.id),
            tipo: m.tipo,
            codigo: m.codigo,
            nombre: m.nombre,
            activo: m.activo,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn list_active() -> anyhow::Result<Vec<Equipo>> {
    let items = Entity::find()
        .filter(Column::Activo.eq(true))
        .order_by_asc(Column::Tipo)
        .order_by_asc(Column::Codigo)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_tipo_and_codigo(tipo: &str, codigo: &str) -> anyhow::Result<Option<Equipo>> {
    let result = Entity::find()
        .filter(Column::Tipo.eq(tipo))
        .filter(Column::Codigo.eq(codigo))
        .one(conn())
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert(equipo: &Equipo) -> anyhow::Result<EquipoId> {
    let active = ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        tipo: Set(equipo.tipo.clone()),
        codigo: Set(equipo.codigo.clone()),
        nombre: Set(equipo.nombre.clone()),
        activo: Set(equipo.activo),
    };
    let model = active.insert(conn()).await?;
    Ok(EquipoId(model.id))
}
