use crate::domain::a003_product::{Dimensions, PriceBreakdown, SeoMeta};
use serde::{Deserialize, Serialize};

/// Категория, подобранная автоматически по тексту товара
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMatch {
    pub id: String,
    pub name: String,
    pub score: usize,
}

/// Вариант товара из колонок `variant{N}_*`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantRecord {
    pub title: String,
    pub sku: String,
    pub price: Option<f64>,
    #[serde(default)]
    pub quantity: i64,
    pub color: Option<String>,
    pub size: Option<String>,
}

/// Пара вопрос/ответ из колонок `q{N}_question` / `q{N}_answer`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaRecord {
    pub question: String,
    pub answer: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Нормализованная строка импорта, готовая к записи.
///
/// Возвращается оператору в превью и принимается обратно при фиксации
/// (возможно, после ручной правки).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedProductRecord {
    /// Номер строки в файле (заголовок: строка 1)
    pub row: usize,

    pub title: String,

    pub slug: String,

    pub sku: String,

    /// SKU сгенерирован, а не взят из файла
    #[serde(rename = "skuGenerated", default)]
    pub sku_generated: bool,

    #[serde(default)]
    pub description: String,

    #[serde(rename = "shortDescription", default)]
    pub short_description: String,

    #[serde(rename = "categoryId")]
    pub category_id: String,

    #[serde(rename = "categoryName", default)]
    pub category_name: String,

    /// Заполнено, если категория подобрана автоматически
    #[serde(rename = "autoCategory", default)]
    pub auto_category: Option<CategoryMatch>,

    #[serde(rename = "brandId", default)]
    pub brand_id: Option<String>,

    #[serde(rename = "brandName", default)]
    pub brand_name: String,

    pub price: PriceBreakdown,

    #[serde(default)]
    pub quantity: i64,

    #[serde(rename = "isFeatured", default)]
    pub is_featured: bool,

    #[serde(rename = "isActive", default = "default_true")]
    pub is_active: bool,

    #[serde(rename = "isReturnable", default = "default_true")]
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
    pub variants: Vec<VariantRecord>,

    #[serde(default)]
    pub questions: Vec<QaRecord>,
}
