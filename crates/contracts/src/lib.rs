//! Общие типы данных backend и клиентов (сериализуются в JSON API)

pub mod domain;
pub mod shared;
pub mod system;
pub mod usecases;
