use super::repository;
use crate::shared::text::slugify;
use contracts::domain::a001_category::aggregate::{Category, CategoryDto};
use contracts::domain::common::AggregateRoot;
use uuid::Uuid;

pub async fn create(dto: CategoryDto) -> anyhow::Result<Uuid> {
    if let Some(existing) = repository::find_by_name_ignore_case(&dto.description).await? {
        anyhow::bail!("Category '{}' already exists", existing.name());
    }

    let code = dto
        .code
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| slugify(&dto.description));
    let mut aggregate = Category::new_for_insert(code, dto.description.trim().to_string(), dto.parent_id);

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
    aggregate.before_write();

    let id = repository::insert(&aggregate).await?;
    tracing::info!("{} created: {} ({})", Category::full_name(), aggregate.name(), id);
    Ok(id)
}

pub async fn list_all() -> anyhow::Result<Vec<Category>> {
    repository::list_all().await
}
