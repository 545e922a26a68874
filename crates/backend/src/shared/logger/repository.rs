use chrono::Utc;
use contracts::shared::logger::LogEntry;
use sea_orm::entity::prelude::*;
use sea_orm::{EntityTrait, QueryOrder, QuerySelect, Set};

use crate::shared::data::db::get_connection;

/// Сколько записей отдаёт `GET /api/logs`
const LIST_LIMIT: u64 = 1000;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "system_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub timestamp: String,
    pub source: String,
    pub category: String,
    pub message: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for LogEntry {
    fn from(m: Model) -> Self {
        LogEntry {
            id: m.id,
            timestamp: m.timestamp,
            source: m.source,
            category: m.category,
            message: m.message,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

/// Записать событие в фоне, не дожидаясь БД
pub fn append_detached(source: &str, category: &str, message: &str) {
    let source = source.to_string();
    let category = category.to_string();
    let message = message.to_string();

    tokio::spawn(async move {
        if let Err(e) = append(&source, &category, &message).await {
            tracing::warn!("Failed to write system_log entry: {}", e);
        }
    });
}

pub async fn append(source: &str, category: &str, message: &str) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        timestamp: Set(Utc::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()),
        source: Set(source.to_string()),
        category: Set(category.to_string()),
        message: Set(message.to_string()),
    };

    active.insert(conn()).await?;
    Ok(())
}

/// Последние записи, новые сверху
pub async fn list_recent() -> anyhow::Result<Vec<LogEntry>> {
    let logs = Entity::find()
        .order_by_desc(Column::Id)
        .limit(LIST_LIMIT)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(logs)
}

pub async fn clear() -> anyhow::Result<u64> {
    let result = Entity::delete_many().exec(conn()).await?;
    Ok(result.rows_affected)
}
