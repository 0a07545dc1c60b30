use super::{question_repository, repository, variant_repository};
use crate::shared::data::db::get_connection;
use contracts::domain::a003_product::aggregate::{Product, ProductQuestion};
use contracts::domain::common::AggregateRoot;
use sea_orm::TransactionTrait;
use std::collections::HashSet;
use uuid::Uuid;

/// Создание товара вместе с вариантами в одной транзакции
pub async fn create_product(mut aggregate: Product) -> anyhow::Result<Uuid> {
    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
    aggregate.before_write();

    let txn = get_connection().begin().await?;
    let id = repository::insert(&txn, &aggregate).await?;
    let variants = variant_repository::insert_many(&txn, id, &aggregate.variants).await?;
    txn.commit().await?;

    tracing::debug!(
        "{} created: sku={} variants={} ({})",
        Product::full_name(),
        aggregate.sku(),
        variants,
        id
    );
    Ok(id)
}

/// Вопрос к товару; при наличии ответа вопрос сразу помечается отвеченным
pub async fn add_question(
    product_id: Uuid,
    question: &str,
    answer: Option<&str>,
) -> anyhow::Result<Uuid> {
    let question_id = question_repository::insert_question(product_id, question).await?;
    if let Some(answer) = answer.filter(|a| !a.trim().is_empty()) {
        question_repository::set_answer(question_id, answer).await?;
    }
    Ok(question_id)
}

pub async fn list_questions(product_id: Uuid) -> anyhow::Result<Vec<ProductQuestion>> {
    question_repository::list_by_product(product_id).await
}

/// Товары продавца с вариантами
pub async fn list_by_seller(seller_id: &str) -> anyhow::Result<Vec<Product>> {
    let mut items = repository::list_by_seller(seller_id).await?;
    let ids = items.iter().map(|p| p.base.id.value().to_string()).collect();
    let mut variants = variant_repository::list_by_product_ids(ids).await?;
    for item in items.iter_mut() {
        if let Some(list) = variants.remove(&item.base.id.value().to_string()) {
            item.variants = list;
        }
    }
    Ok(items)
}

pub async fn load_sku_snapshot() -> anyhow::Result<HashSet<String>> {
    repository::load_all_skus().await
}

pub async fn sku_exists(sku: &str) -> anyhow::Result<bool> {
    Ok(repository::find_by_sku(sku).await?.is_some())
}
