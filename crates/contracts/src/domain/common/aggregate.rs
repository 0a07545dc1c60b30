use super::EntityMetadata;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::hash::Hash;

/// Идентификатор агрегата, хранимый в БД как TEXT
pub trait AggregateId:
    Clone + Copy + PartialEq + Eq + Hash + Serialize + DeserializeOwned + std::fmt::Debug
{
    fn as_string(&self) -> String;

    fn from_string(s: &str) -> Result<Self, String>;
}

/// Объявляет newtype-обертку над Uuid и реализует для нее [`AggregateId`]
#[macro_export]
macro_rules! uuid_aggregate_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
        )]
        pub struct $name(pub uuid::Uuid);

        impl $name {
            pub fn new(value: uuid::Uuid) -> Self {
                Self(value)
            }

            pub fn new_v4() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            pub fn value(&self) -> uuid::Uuid {
                self.0
            }
        }

        impl $crate::domain::common::AggregateId for $name {
            fn as_string(&self) -> String {
                self.0.to_string()
            }

            fn from_string(s: &str) -> Result<Self, String> {
                uuid::Uuid::parse_str(s)
                    .map($name::new)
                    .map_err(|e| format!("Invalid UUID: {}", e))
            }
        }
    };
}

/// Поля, общие для всех записей каталога.
/// `code`: бизнес-ключ (SKU товара, slug категории), `description`: отображаемое имя.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseAggregate<Id> {
    pub id: Id,
    pub code: String,
    pub description: String,
    pub metadata: EntityMetadata,
}

impl<Id> BaseAggregate<Id> {
    pub fn new(id: Id, code: String, description: String) -> Self {
        Self {
            id,
            code,
            description,
            metadata: EntityMetadata::new(),
        }
    }

    /// Для загрузки из БД
    pub fn with_metadata(id: Id, code: String, description: String, metadata: EntityMetadata) -> Self {
        Self {
            id,
            code,
            description,
            metadata,
        }
    }

    pub fn touch(&mut self) {
        self.metadata.touch();
    }
}

/// Корень агрегата: экземплярные данные + статическое описание класса
pub trait AggregateRoot {
    type Id: AggregateId;

    fn id(&self) -> Self::Id;

    fn code(&self) -> &str;

    fn description(&self) -> &str;

    fn metadata(&self) -> &EntityMetadata;

    /// Индекс агрегата в системе (например, "a003")
    fn aggregate_index() -> &'static str;

    /// Имя коллекции (например, "product")
    fn collection_name() -> &'static str;

    /// Имя элемента для UI и логов
    fn element_name() -> &'static str;

    /// "a003_product": совпадает с именем таблицы
    fn full_name() -> String {
        format!("{}_{}", Self::aggregate_index(), Self::collection_name())
    }
}
