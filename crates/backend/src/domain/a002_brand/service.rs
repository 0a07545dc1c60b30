use super::repository;
use crate::shared::text::slugify;
use contracts::domain::a002_brand::aggregate::{Brand, BrandDto};
use uuid::Uuid;

pub async fn create(dto: BrandDto) -> anyhow::Result<Uuid> {
    let code = dto
        .code
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| slugify(&dto.description));
    let mut aggregate = Brand::new_for_insert(code, dto.description.trim().to_string());

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
    aggregate.before_write();

    repository::insert(&aggregate).await
}

pub async fn list_all() -> anyhow::Result<Vec<Brand>> {
    repository::list_all().await
}
