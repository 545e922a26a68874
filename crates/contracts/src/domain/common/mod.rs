//! Общие строительные блоки агрегатов

pub mod aggregate_id;
