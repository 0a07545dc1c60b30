use super::price::PriceBreakdown;
use crate::domain::common::{AggregateRoot, BaseAggregate, EntityMetadata};
use crate::uuid_aggregate_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

uuid_aggregate_id!(ProductId);

// ============================================================================
// Aggregate Root
// ============================================================================

/// Товар продавца. `base.code`: SKU, `base.description`: заголовок.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(flatten)]
    pub base: BaseAggregate<ProductId>,

    pub slug: String,

    #[serde(rename = "sellerId")]
    pub seller_id: String,

    #[serde(rename = "categoryId")]
    pub category_id: String,

    #[serde(rename = "brandId")]
    pub brand_id: Option<String>,

    #[serde(rename = "fullDescription", default)]
    pub full_description: String,

    #[serde(rename = "shortDescription", default)]
    pub short_description: String,

    pub price: PriceBreakdown,

    #[serde(default)]
    pub quantity: i64,

    #[serde(rename = "isFeatured", default)]
    pub is_featured: bool,

    #[serde(rename = "isActive", default)]
    pub is_active: bool,

    #[serde(rename = "isReturnable", default)]
    pub is_returnable: bool,

    #[serde(default)]
    pub images: Vec<String>,

    #[serde(rename = "bulletPoints", default)]
    pub bullet_points: Vec<String>,

    #[serde(default)]
    pub dimensions: Dimensions,

    #[serde(default)]
    pub seo: SeoMeta,

    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

impl Product {
    pub fn sku(&self) -> &str {
        &self.base.code
    }

    pub fn title(&self) -> &str {
        &self.base.description
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Product title must not be empty".into());
        }
        if self.base.code.trim().is_empty() {
            return Err("Product SKU must not be empty".into());
        }
        if self.slug.is_empty() {
            return Err("Product slug must not be empty".into());
        }
        if self.category_id.trim().is_empty() {
            return Err("Product category must be set".into());
        }
        if self.seller_id.trim().is_empty() {
            return Err("Product owner (seller) must be set".into());
        }
        if self.price.final_price < 0.0 || self.price.list < 0.0 {
            return Err("Product price must not be negative".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for Product {
    type Id = ProductId;

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
        "a003"
    }

    fn collection_name() -> &'static str {
        "product"
    }

    fn element_name() -> &'static str {
        "Product"
    }
}

// ============================================================================
// Табличные части
// ============================================================================

/// Вариант товара (цвет/размер) со своим SKU
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub title: String,
    pub sku: String,
    /// Цена варианта; None: наследуется от товара
    pub price: Option<f64>,
    #[serde(default)]
    pub quantity: i64,
    pub color: Option<String>,
    pub size: Option<String>,
}

/// Вопрос покупателя/продавца к товару
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductQuestion {
    pub id: String,
    #[serde(rename = "productId")]
    pub product_id: String,
    pub question: String,
    pub answer: Option<String>,
    #[serde(rename = "isAnswered")]
    pub is_answered: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Габариты упаковки
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

impl Dimensions {
    pub fn is_empty(&self) -> bool {
        self.length.is_none()
            && self.width.is_none()
            && self.height.is_none()
            && self.weight.is_none()
    }
}

/// SEO-поля карточки товара
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeoMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}
