use crate::domain::common::{AggregateRoot, BaseAggregate, EntityMetadata};
use crate::uuid_aggregate_id;
use serde::{Deserialize, Serialize};

uuid_aggregate_id!(CategoryId);

/// Категория каталога. `description` хранит отображаемое имя,
/// по которому строки импорта ищут категорию.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(flatten)]
    pub base: BaseAggregate<CategoryId>,

    #[serde(rename = "parentId")]
    pub parent_id: Option<String>,
}

impl Category {
    pub fn new_for_insert(code: String, name: String, parent_id: Option<String>) -> Self {
        Self {
            base: BaseAggregate::new(CategoryId::new_v4(), code, name),
            parent_id,
        }
    }

    pub fn name(&self) -> &str {
        &self.base.description
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Category name must not be empty".into());
        }
        if self.base.code.trim().is_empty() {
            return Err("Category code must not be empty".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for Category {
    type Id = CategoryId;

    fn id(&self) -> Self::Id {
        self.base.id
    }

    fn code(&self) -> &str {
        &self.base.code
    }

    fn description(&self) -> &str {
        &self.base.description
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn aggregate_index() -> &'static str {
        "a001"
    }

    fn collection_name() -> &'static str {
        "category"
    }

    fn element_name() -> &'static str {
        "Category"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CategoryDto {
    pub code: Option<String>,
    pub description: String,
    #[serde(rename = "parentId")]
    pub parent_id: Option<String>,
}
