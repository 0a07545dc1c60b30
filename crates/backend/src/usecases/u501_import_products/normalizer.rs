use super::category_matcher::{CategoryMatcher, NamedRef};
use super::error::ImportError;
use super::header_map::{CanonicalField, NormalizedRow, QaField, VariantField};
use super::price::{derive_price, PriceInput};
use super::sku::generate_sku;
use crate::shared::text::slugify;
use contracts::domain::a003_product::price::DiscountType;
use contracts::domain::a003_product::{Dimensions, SeoMeta};
use contracts::usecases::u501_import_products::{
    InvalidRow, ParsedProductRecord, QaRecord, VariantRecord,
};
use rand::Rng;
use std::collections::HashSet;

/// Снимок справочников на момент разбора файла
#[derive(Debug, Clone, Default)]
pub struct ImportContext {
    pub categories: Vec<NamedRef>,
    pub brands: Vec<NamedRef>,
    /// SKU, уже существующие в БД
    pub existing_skus: HashSet<String>,
    pub sku_max_attempts: u32,
}

impl ImportContext {
    fn find_by_name<'a>(items: &'a [NamedRef], name: &str) -> Option<&'a NamedRef> {
        let name = name.trim().to_lowercase();
        items.iter().find(|i| i.name.trim().to_lowercase() == name)
    }

    pub fn find_category(&self, name: &str) -> Option<&NamedRef> {
        Self::find_by_name(&self.categories, name)
    }

    pub fn find_brand(&self, name: &str) -> Option<&NamedRef> {
        Self::find_by_name(&self.brands, name)
    }
}

/// Число из ячейки: запятая как десятичный разделитель, мусор -> 0
pub fn parse_number(value: &str) -> f64 {
    value
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn parse_optional_number(value: &str) -> Option<f64> {
    (!value.trim().is_empty()).then(|| parse_number(value))
}

fn parse_quantity(value: &str) -> i64 {
    parse_number(value).max(0.0) as i64
}

/// Флаг: "true"/"yes" без учета регистра; пустая ячейка -> значение по умолчанию
pub fn parse_flag(value: &str, default: bool) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return default;
    }
    value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes")
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn split_list(value: &str, separators: &[char]) -> Vec<String> {
    value
        .split(|c| separators.contains(&c))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Проверка и разрешение строк одного файла.
///
/// SKU файла резервируются по мере обхода: первое вхождение занимает SKU,
/// следующие строки с тем же SKU становятся невалидными.
pub struct RowValidator<'a, R: Rng + ?Sized> {
    context: &'a ImportContext,
    matcher: &'a dyn CategoryMatcher,
    rng: &'a mut R,
    now_ms: i64,
    used_skus: HashSet<String>,
}

impl<'a, R: Rng + ?Sized> RowValidator<'a, R> {
    pub fn new(
        context: &'a ImportContext,
        matcher: &'a dyn CategoryMatcher,
        rng: &'a mut R,
        now_ms: i64,
    ) -> Self {
        Self {
            context,
            matcher,
            rng,
            now_ms,
            used_skus: HashSet::new(),
        }
    }

    pub fn validate_all(
        mut self,
        rows: &[NormalizedRow],
    ) -> (Vec<ParsedProductRecord>, Vec<InvalidRow>) {
        let mut valid = Vec::new();
        let mut invalid = Vec::new();

        for row in rows {
            match self.validate_row(row) {
                Ok(record) => valid.push(record),
                Err(e) => invalid.push(InvalidRow {
                    row: row.row_number,
                    message: e.to_string(),
                    raw: row.raw.clone(),
                }),
            }
        }

        (valid, invalid)
    }

    fn next_generated_sku(&mut self) -> String {
        let context = self.context;
        let used = &self.used_skus;
        generate_sku(
            &mut *self.rng,
            self.now_ms,
            context.sku_max_attempts,
            |candidate| context.existing_skus.contains(candidate) || used.contains(candidate),
        )
    }

    pub fn validate_row(&mut self, row: &NormalizedRow) -> Result<ParsedProductRecord, ImportError> {
        let title = row.get(CanonicalField::Title).to_string();
        if title.is_empty() {
            return Err(ImportError::Validation(
                "Missing required field: title".into(),
            ));
        }

        let (sku, sku_generated) = match non_empty(row.get(CanonicalField::Sku)) {
            Some(sku) => (sku, false),
            None => (self.next_generated_sku(), true),
        };

        if !self.used_skus.insert(sku.clone()) {
            return Err(ImportError::Validation(format!(
                "Duplicate SKU in file: {}",
                sku
            )));
        }

        let description = row.get(CanonicalField::Description).to_string();
        let category_name = row.get(CanonicalField::Category);
        let (category_id, category_name, auto_category) =
            match self.context.find_category(category_name) {
                Some(category) if !category_name.is_empty() => {
                    (category.id.clone(), category.name.clone(), None)
                }
                _ => {
                    let text = format!("{} {}", title, description);
                    match self.matcher.best_match(&text, &self.context.categories) {
                        Some(found) => (found.id.clone(), found.name.clone(), Some(found)),
                        None if category_name.is_empty() => {
                            return Err(ImportError::Validation(
                                "Category missing and auto-categorization failed".into(),
                            ))
                        }
                        None => {
                            return Err(ImportError::Validation(format!(
                                "Category \"{}\" not found and auto-categorization failed",
                                category_name
                            )))
                        }
                    }
                }
            };

        let brand_name = row.get(CanonicalField::Brand).to_string();
        let brand_id = if brand_name.is_empty() {
            None
        } else {
            self.context.find_brand(&brand_name).map(|b| b.id.clone())
        };

        let price = derive_price(&PriceInput {
            base: parse_number(row.get(CanonicalField::PriceBase)),
            list: parse_number(row.get(CanonicalField::PriceList)),
            final_price: parse_number(row.get(CanonicalField::PriceFinal)),
            legacy_base: parse_number(row.get(CanonicalField::BasePrice)),
            legacy_sale: parse_number(row.get(CanonicalField::SalePrice)),
            discount_type: DiscountType::parse(row.get(CanonicalField::DiscountType)),
            discount_value: parse_number(row.get(CanonicalField::DiscountValue)),
        });

        let slug = slugify(&format!("{}-{}", title, sku));

        Ok(ParsedProductRecord {
            row: row.row_number,
            title,
            slug,
            sku,
            sku_generated,
            description,
            short_description: row.get(CanonicalField::ShortDescription).to_string(),
            category_id,
            category_name,
            auto_category,
            brand_id,
            brand_name,
            price,
            quantity: parse_quantity(row.get(CanonicalField::Quantity)),
            is_featured: parse_flag(row.get(CanonicalField::IsFeatured), false),
            is_active: parse_flag(row.get(CanonicalField::IsActive), true),
            is_returnable: parse_flag(row.get(CanonicalField::IsReturnable), true),
            images: split_list(row.get(CanonicalField::Images), &[',', '|', '\n']),
            bullet_points: row.bullets.values().cloned().collect(),
            dimensions: extract_dimensions(row),
            seo: extract_seo(row),
            variants: extract_variants(row),
            questions: extract_questions(row),
        })
    }
}

fn extract_dimensions(row: &NormalizedRow) -> Dimensions {
    Dimensions {
        length: parse_optional_number(row.get(CanonicalField::DimensionLength)),
        width: parse_optional_number(row.get(CanonicalField::DimensionWidth)),
        height: parse_optional_number(row.get(CanonicalField::DimensionHeight)),
        weight: parse_optional_number(row.get(CanonicalField::DimensionWeight)),
    }
}

fn extract_seo(row: &NormalizedRow) -> SeoMeta {
    SeoMeta {
        title: non_empty(row.get(CanonicalField::SeoTitle)),
        description: non_empty(row.get(CanonicalField::SeoDescription)),
        keywords: split_list(row.get(CanonicalField::SeoKeywords), &[',']),
    }
}

/// Варианты по возрастанию индекса; без заголовка или SKU вариант отбрасывается
fn extract_variants(row: &NormalizedRow) -> Vec<VariantRecord> {
    row.variants
        .values()
        .filter_map(|cells| {
            let get = |field: VariantField| cells.get(&field).map(String::as_str).unwrap_or("");
            let title = non_empty(get(VariantField::Title))?;
            let sku = non_empty(get(VariantField::Sku))?;
            Some(VariantRecord {
                title,
                sku,
                price: parse_optional_number(get(VariantField::Price)),
                quantity: parse_quantity(get(VariantField::Quantity)),
                color: non_empty(get(VariantField::Color)),
                size: non_empty(get(VariantField::Size)),
            })
        })
        .collect()
}

fn extract_questions(row: &NormalizedRow) -> Vec<QaRecord> {
    row.questions
        .values()
        .filter_map(|cells| {
            let question = non_empty(cells.get(&QaField::Question)?)?;
            let answer = cells.get(&QaField::Answer).and_then(|a| non_empty(a));
            Some(QaRecord { question, answer })
        })
        .collect()
}
