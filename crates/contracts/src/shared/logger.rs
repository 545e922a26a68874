use serde::{Deserialize, Serialize};

/// Запись лога системы
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub timestamp: String,
    pub source: String, // "client" или "server"
    pub category: String,
    pub message: String,
}

/// DTO для создания новой записи лога
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLogRequest {
    pub source: String,
    pub category: String,
    pub message: String,
}

impl CreateLogRequest {
    pub fn client(category: &str, message: impl Into<String>) -> Self {
        Self {
            source: "client".to_string(),
            category: category.to_string(),
            message: message.into(),
        }
    }
}
