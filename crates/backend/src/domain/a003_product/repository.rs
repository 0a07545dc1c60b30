use chrono::Utc;
use contracts::domain::a003_product::aggregate::{Product, ProductId};
use contracts::domain::a003_product::price::{DiscountType, PriceBreakdown};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a003_product")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// SKU
    pub code: String,
    /// Заголовок товара
    pub description: String,
    pub slug: String,
    pub seller_id: String,
    pub category_id: String,
    pub brand_id: Option<String>,
    pub full_description: String,
    pub short_description: String,
    pub price_base: f64,
    pub price_list: f64,
    pub price_final: f64,
    pub discount_type: Option<String>,
    pub discount_value: f64,
    pub quantity: i64,
    pub is_featured: bool,
    pub is_active: bool,
    pub is_returnable: bool,
    pub images_json: String,
    pub bullet_points_json: String,
    pub dimensions_json: Option<String>,
    pub seo_json: Option<String>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn discount_type_to_db(value: Option<DiscountType>) -> Option<String> {
    value.map(|t| match t {
        DiscountType::Percent => "percent".to_string(),
        DiscountType::Amount => "amount".to_string(),
    })
}

impl From<Model> for Product {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        Product {
            base: BaseAggregate::with_metadata(ProductId(uuid), m.code, m.description, metadata),
            slug: m.slug,
            seller_id: m.seller_id,
            category_id: m.category_id,
            brand_id: m.brand_id,
            full_description: m.full_description,
            short_description: m.short_description,
            price: PriceBreakdown {
                base: m.price_base,
                list: m.price_list,
                final_price: m.price_final,
                discount_type: m.discount_type.as_deref().and_then(DiscountType::parse),
                discount_value: m.discount_value,
            },
            quantity: m.quantity,
            is_featured: m.is_featured,
            is_active: m.is_active,
            is_returnable: m.is_returnable,
            images: serde_json::from_str(&m.images_json).unwrap_or_default(),
            bullet_points: serde_json::from_str(&m.bullet_points_json).unwrap_or_default(),
            dimensions: m
                .dimensions_json
                .as_deref()
                .and_then(|s| serde_json::from_str(s).ok())
                .unwrap_or_default(),
            seo: m
                .seo_json
                .as_deref()
                .and_then(|s| serde_json::from_str(s).ok())
                .unwrap_or_default(),
            variants: Vec::new(),
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

/// Вставка товара в рамках переданного соединения/транзакции
pub async fn insert<C: ConnectionTrait>(db: &C, aggregate: &Product) -> anyhow::Result<Uuid> {
    let uuid = aggregate.base.id.value();
    let dimensions_json = if aggregate.dimensions.is_empty() {
        None
    } else {
        Some(serde_json::to_string(&aggregate.dimensions)?)
    };
    let seo_json = if aggregate.seo == Default::default() {
        None
    } else {
        Some(serde_json::to_string(&aggregate.seo)?)
    };

    let active = ActiveModel {
        id: Set(uuid.to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        slug: Set(aggregate.slug.clone()),
        seller_id: Set(aggregate.seller_id.clone()),
        category_id: Set(aggregate.category_id.clone()),
        brand_id: Set(aggregate.brand_id.clone()),
        full_description: Set(aggregate.full_description.clone()),
        short_description: Set(aggregate.short_description.clone()),
        price_base: Set(aggregate.price.base),
        price_list: Set(aggregate.price.list),
        price_final: Set(aggregate.price.final_price),
        discount_type: Set(discount_type_to_db(aggregate.price.discount_type)),
        discount_value: Set(aggregate.price.discount_value),
        quantity: Set(aggregate.quantity),
        is_featured: Set(aggregate.is_featured),
        is_active: Set(aggregate.is_active),
        is_returnable: Set(aggregate.is_returnable),
        images_json: Set(serde_json::to_string(&aggregate.images)?),
        bullet_points_json: Set(serde_json::to_string(&aggregate.bullet_points)?),
        dimensions_json: Set(dimensions_json),
        seo_json: Set(seo_json),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    };
    active.insert(db).await?;
    Ok(uuid)
}

/// Товары продавца (новые сверху), без табличных частей
pub async fn list_by_seller(seller_id: &str) -> anyhow::Result<Vec<Product>> {
    let items = Entity::find()
        .filter(Column::SellerId.eq(seller_id))
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::CreatedAt)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

/// Снимок всех SKU товаров в БД (для проверки коллизий сгенерированных SKU)
pub async fn load_all_skus() -> anyhow::Result<HashSet<String>> {
    let skus: Vec<String> = Entity::find()
        .select_only()
        .column(Column::Code)
        .into_tuple()
        .all(conn())
        .await?;
    Ok(skus.into_iter().collect())
}

/// Товар по SKU (включая помеченные на удаление: SKU уникален в таблице)
pub async fn find_by_sku(sku: &str) -> anyhow::Result<Option<Product>> {
    let model = Entity::find()
        .filter(Column::Code.eq(sku))
        .one(conn())
        .await?;
    Ok(model.map(Into::into))
}
