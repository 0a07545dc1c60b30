//! Общие типы и трейты агрегатов каталога

pub mod aggregate;
pub mod entity_metadata;

pub use aggregate::{AggregateId, AggregateRoot, BaseAggregate};
pub use entity_metadata::EntityMetadata;
