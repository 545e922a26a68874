//! Общие типы, которыми обмениваются backend и frontend

pub mod domain;
pub mod shared;
