use contracts::domain::a003_product::aggregate::ProductVariant;
use std::collections::HashMap;
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a003_product_variant")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub product_id: String,
    pub line_no: i32,
    pub title: String,
    pub sku: String,
    pub price: Option<f64>,
    pub quantity: i64,
    pub color: Option<String>,
    pub size: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProductVariant {
    fn from(m: Model) -> Self {
        ProductVariant {
            title: m.title,
            sku: m.sku,
            price: m.price,
            quantity: m.quantity,
            color: m.color,
            size: m.size,
        }
    }
}

/// Пакетная вставка вариантов товара (порядок сохраняется в line_no)
pub async fn insert_many<C: ConnectionTrait>(
    db: &C,
    product_id: Uuid,
    variants: &[ProductVariant],
) -> anyhow::Result<usize> {
    if variants.is_empty() {
        return Ok(0);
    }

    let actives: Vec<ActiveModel> = variants
        .iter()
        .enumerate()
        .map(|(idx, v)| ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            product_id: Set(product_id.to_string()),
            line_no: Set(idx as i32 + 1),
            title: Set(v.title.clone()),
            sku: Set(v.sku.clone()),
            price: Set(v.price),
            quantity: Set(v.quantity),
            color: Set(v.color.clone()),
            size: Set(v.size.clone()),
        })
        .collect();

    Entity::insert_many(actives).exec_without_returning(db).await?;
    Ok(variants.len())
}

/// Варианты для набора товаров: product_id -> варианты по line_no
pub async fn list_by_product_ids(
    product_ids: Vec<String>,
) -> anyhow::Result<HashMap<String, Vec<ProductVariant>>> {
    let mut grouped: HashMap<String, Vec<ProductVariant>> = HashMap::new();
    if product_ids.is_empty() {
        return Ok(grouped);
    }

    let rows = Entity::find()
        .filter(Column::ProductId.is_in(product_ids))
        .order_by_asc(Column::LineNo)
        .all(get_connection())
        .await?;

    for row in rows {
        grouped
            .entry(row.product_id.clone())
            .or_default()
            .push(row.into());
    }
    Ok(grouped)
}
