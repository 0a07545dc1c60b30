use super::spreadsheet::ImportRow;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};

/// Каноническое поле товара, в которое отображается заголовок файла
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Title,
    Sku,
    Description,
    ShortDescription,
    Category,
    Brand,
    PriceBase,
    PriceList,
    PriceFinal,
    DiscountType,
    DiscountValue,
    /// Устаревшая колонка `basePrice`
    BasePrice,
    /// Устаревшая колонка `salePrice`
    SalePrice,
    Quantity,
    IsFeatured,
    IsActive,
    IsReturnable,
    Images,
    DimensionLength,
    DimensionWidth,
    DimensionHeight,
    DimensionWeight,
    SeoTitle,
    SeoDescription,
    SeoKeywords,
}

impl CanonicalField {
    /// Путь поля в записи товара
    pub fn path(&self) -> &'static str {
        match self {
            CanonicalField::Title => "title",
            CanonicalField::Sku => "sku",
            CanonicalField::Description => "description",
            CanonicalField::ShortDescription => "shortDescription",
            CanonicalField::Category => "category",
            CanonicalField::Brand => "brand",
            CanonicalField::PriceBase => "price.base",
            CanonicalField::PriceList => "price.list",
            CanonicalField::PriceFinal => "price.final",
            CanonicalField::DiscountType => "price.discountType",
            CanonicalField::DiscountValue => "price.discountValue",
            CanonicalField::BasePrice => "basePrice",
            CanonicalField::SalePrice => "salePrice",
            CanonicalField::Quantity => "quantity",
            CanonicalField::IsFeatured => "isFeatured",
            CanonicalField::IsActive => "isActive",
            CanonicalField::IsReturnable => "isReturnable",
            CanonicalField::Images => "images",
            CanonicalField::DimensionLength => "dimensions.length",
            CanonicalField::DimensionWidth => "dimensions.width",
            CanonicalField::DimensionHeight => "dimensions.height",
            CanonicalField::DimensionWeight => "dimensions.weight",
            CanonicalField::SeoTitle => "seo.title",
            CanonicalField::SeoDescription => "seo.description",
            CanonicalField::SeoKeywords => "seo.keywords",
        }
    }
}

/// Алиасы заголовков (нижний регистр, без пробелов)
const HEADER_ALIASES: &[(&str, CanonicalField)] = &[
    ("title", CanonicalField::Title),
    ("name", CanonicalField::Title),
    ("productname", CanonicalField::Title),
    ("producttitle", CanonicalField::Title),
    ("sku", CanonicalField::Sku),
    ("productsku", CanonicalField::Sku),
    ("itemsku", CanonicalField::Sku),
    ("description", CanonicalField::Description),
    ("fulldescription", CanonicalField::Description),
    ("longdescription", CanonicalField::Description),
    ("shortdescription", CanonicalField::ShortDescription),
    ("summary", CanonicalField::ShortDescription),
    ("category", CanonicalField::Category),
    ("categoryname", CanonicalField::Category),
    ("brand", CanonicalField::Brand),
    ("brandname", CanonicalField::Brand),
    ("price.base", CanonicalField::PriceBase),
    ("price_base", CanonicalField::PriceBase),
    ("price.list", CanonicalField::PriceList),
    ("price_list", CanonicalField::PriceList),
    ("listprice", CanonicalField::PriceList),
    ("price", CanonicalField::PriceList),
    ("price.final", CanonicalField::PriceFinal),
    ("price_final", CanonicalField::PriceFinal),
    ("finalprice", CanonicalField::PriceFinal),
    ("price.discounttype", CanonicalField::DiscountType),
    ("discounttype", CanonicalField::DiscountType),
    ("price.discountvalue", CanonicalField::DiscountValue),
    ("discountvalue", CanonicalField::DiscountValue),
    ("discount", CanonicalField::DiscountValue),
    ("baseprice", CanonicalField::BasePrice),
    ("saleprice", CanonicalField::SalePrice),
    ("quantity", CanonicalField::Quantity),
    ("qty", CanonicalField::Quantity),
    ("stock", CanonicalField::Quantity),
    ("isfeatured", CanonicalField::IsFeatured),
    ("featured", CanonicalField::IsFeatured),
    ("isactive", CanonicalField::IsActive),
    ("active", CanonicalField::IsActive),
    ("isreturnable", CanonicalField::IsReturnable),
    ("returnable", CanonicalField::IsReturnable),
    ("images", CanonicalField::Images),
    ("imageurls", CanonicalField::Images),
    ("image", CanonicalField::Images),
    ("dimensions_length", CanonicalField::DimensionLength),
    ("dimensions.length", CanonicalField::DimensionLength),
    ("dimensions_width", CanonicalField::DimensionWidth),
    ("dimensions.width", CanonicalField::DimensionWidth),
    ("dimensions_height", CanonicalField::DimensionHeight),
    ("dimensions.height", CanonicalField::DimensionHeight),
    ("dimensions_weight", CanonicalField::DimensionWeight),
    ("dimensions.weight", CanonicalField::DimensionWeight),
    ("seo_title", CanonicalField::SeoTitle),
    ("seo.title", CanonicalField::SeoTitle),
    ("seo_description", CanonicalField::SeoDescription),
    ("seo.description", CanonicalField::SeoDescription),
    ("seo_keywords", CanonicalField::SeoKeywords),
    ("seo.keywords", CanonicalField::SeoKeywords),
];

pub const MAX_BULLETS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantField {
    Title,
    Sku,
    Price,
    Quantity,
    Color,
    Size,
}

impl VariantField {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "title" => Some(Self::Title),
            "sku" => Some(Self::Sku),
            "price" => Some(Self::Price),
            "quantity" => Some(Self::Quantity),
            "color" => Some(Self::Color),
            "size" => Some(Self::Size),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QaField {
    Question,
    Answer,
}

/// Куда направляется значение колонки
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderTarget {
    Field(CanonicalField),
    Variant(u32, VariantField),
    Qa(u32, QaField),
    Bullet(u32),
}

static VARIANT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^variant(\d+)_(title|sku|price|quantity|color|size)$").expect("valid regex")
});
static QA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^q(\d+)_(question|answer)$").expect("valid regex"));
static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^bullet(\d+)$").expect("valid regex"));

/// Нормализация заголовка: нижний регистр, без пробельных символов
pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Распознать заголовок файла. `None`: колонка игнорируется.
pub fn resolve_header(header: &str) -> Option<HeaderTarget> {
    let key = normalize_header(header);
    if key.is_empty() {
        return None;
    }

    if let Some((_, field)) = HEADER_ALIASES.iter().find(|(alias, _)| *alias == key) {
        return Some(HeaderTarget::Field(*field));
    }

    if let Some(caps) = VARIANT_RE.captures(&key) {
        let index = caps[1].parse().ok()?;
        let field = VariantField::parse(&caps[2])?;
        return Some(HeaderTarget::Variant(index, field));
    }

    if let Some(caps) = QA_RE.captures(&key) {
        let index = caps[1].parse().ok()?;
        let field = if &caps[2] == "question" {
            QaField::Question
        } else {
            QaField::Answer
        };
        return Some(HeaderTarget::Qa(index, field));
    }

    if let Some(caps) = BULLET_RE.captures(&key) {
        let index: u32 = caps[1].parse().ok()?;
        if (1..=MAX_BULLETS).contains(&index) {
            return Some(HeaderTarget::Bullet(index));
        }
    }

    None
}

/// Строка после сопоставления заголовков
#[derive(Debug, Clone, Default)]
pub struct NormalizedRow {
    pub row_number: usize,
    pub fields: HashMap<CanonicalField, String>,
    pub variants: BTreeMap<u32, HashMap<VariantField, String>>,
    pub questions: BTreeMap<u32, HashMap<QaField, String>>,
    pub bullets: BTreeMap<u32, String>,
    /// Исходные ячейки (для отчета о невалидной строке)
    pub raw: IndexMap<String, String>,
}

impl NormalizedRow {
    /// Значение поля без пробелов по краям; "" если колонки нет
    pub fn get(&self, field: CanonicalField) -> &str {
        self.fields.get(&field).map(String::as_str).unwrap_or("")
    }
}

/// Сопоставление заголовков одного файла
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    targets: Vec<(String, HeaderTarget)>,
    ignored: Vec<String>,
}

impl HeaderMap {
    pub fn build(headers: &[String]) -> Self {
        let mut map = HeaderMap::default();
        for header in headers.iter().filter(|h| !h.trim().is_empty()) {
            match resolve_header(header) {
                Some(target) => {
                    if let HeaderTarget::Field(field) = target {
                        tracing::debug!("Column '{}' -> {}", header, field.path());
                    }
                    map.targets.push((header.clone(), target));
                }
                None => {
                    if !map.ignored.contains(header) {
                        map.ignored.push(header.clone());
                    }
                }
            }
        }
        map
    }

    /// Заголовки, не сопоставленные ни с одним полем
    pub fn ignored_headers(&self) -> &[String] {
        &self.ignored
    }

    /// Разложить ячейки строки по каноническим полям.
    /// Если на одно поле указывают несколько колонок, берется первое непустое значение.
    pub fn apply(&self, row: &ImportRow) -> NormalizedRow {
        let mut normalized = NormalizedRow {
            row_number: row.row_number,
            raw: row.cells.clone(),
            ..Default::default()
        };

        for (header, target) in &self.targets {
            let value = match row.cells.get(header) {
                Some(v) if !v.trim().is_empty() => v.trim().to_string(),
                _ => continue,
            };
            match *target {
                HeaderTarget::Field(field) => {
                    normalized.fields.entry(field).or_insert(value);
                }
                HeaderTarget::Variant(index, field) => {
                    normalized
                        .variants
                        .entry(index)
                        .or_default()
                        .entry(field)
                        .or_insert(value);
                }
                HeaderTarget::Qa(index, field) => {
                    normalized
                        .questions
                        .entry(index)
                        .or_default()
                        .entry(field)
                        .or_insert(value);
                }
                HeaderTarget::Bullet(index) => {
                    normalized.bullets.entry(index).or_insert(value);
                }
            }
        }

        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> ImportRow {
        ImportRow {
            row_number: 2,
            cells: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_aliases_ignore_case_and_whitespace() {
        assert_eq!(
            resolve_header(" Product Name "),
            Some(HeaderTarget::Field(CanonicalField::Title))
        );
        assert_eq!(
            resolve_header("Price.DiscountType"),
            Some(HeaderTarget::Field(CanonicalField::DiscountType))
        );
        assert_eq!(
            resolve_header("basePrice"),
            Some(HeaderTarget::Field(CanonicalField::BasePrice))
        );
        assert_eq!(resolve_header("Warehouse"), None);
        assert_eq!(
            resolve_header("seo_keywords"),
            Some(HeaderTarget::Field(CanonicalField::SeoKeywords))
        );
    }

    #[test]
    fn test_indexed_extractors() {
        assert_eq!(
            resolve_header("Variant2_SKU"),
            Some(HeaderTarget::Variant(2, VariantField::Sku))
        );
        assert_eq!(
            resolve_header("q10_answer"),
            Some(HeaderTarget::Qa(10, QaField::Answer))
        );
        assert_eq!(resolve_header("bullet10"), Some(HeaderTarget::Bullet(10)));
        assert_eq!(resolve_header("bullet11"), None);
        assert_eq!(resolve_header("bullet0"), None);
        assert_eq!(resolve_header("variant1_weight"), None);
    }

    #[test]
    fn test_ignored_headers_collected_once() {
        let headers: Vec<String> = ["title", "Warehouse", "sku", "Warehouse", ""]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let map = HeaderMap::build(&headers);
        assert_eq!(map.ignored_headers(), &["Warehouse".to_string()]);
    }

    #[test]
    fn test_apply_groups_indexed_fields() {
        let headers: Vec<String> = [
            "Title",
            "variant2_title",
            "variant1_title",
            "variant1_sku",
            "q1_question",
            "bullet3",
            "bullet1",
            "note",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let map = HeaderMap::build(&headers);
        let normalized = map.apply(&row(&[
            ("Title", " Mug "),
            ("variant2_title", "Large"),
            ("variant1_title", "Small"),
            ("variant1_sku", "M-S"),
            ("q1_question", "Dishwasher safe?"),
            ("bullet3", "third"),
            ("bullet1", "first"),
            ("note", "ignored"),
        ]));

        assert_eq!(normalized.get(CanonicalField::Title), "Mug");
        assert_eq!(normalized.get(CanonicalField::Sku), "");
        assert_eq!(normalized.variants.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(normalized.variants[&1][&VariantField::Sku], "M-S");
        assert_eq!(normalized.questions[&1][&QaField::Question], "Dishwasher safe?");
        assert_eq!(
            normalized.bullets.values().cloned().collect::<Vec<_>>(),
            vec!["first", "third"]
        );
        assert_eq!(normalized.raw["note"], "ignored");
    }

    #[test]
    fn test_first_non_empty_alias_wins() {
        let headers: Vec<String> = ["name", "title"].iter().map(|s| s.to_string()).collect();
        let map = HeaderMap::build(&headers);
        let normalized = map.apply(&row(&[("name", ""), ("title", "Mug")]));
        assert_eq!(normalized.get(CanonicalField::Title), "Mug");
    }
}
