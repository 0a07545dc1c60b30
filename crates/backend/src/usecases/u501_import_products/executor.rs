use super::category_matcher::CategoryMatcher;
use super::error::ImportError;
use super::header_map::HeaderMap;
use super::normalizer::{ImportContext, RowValidator};
use super::price::{derive_price, PriceInput};
use super::spreadsheet::read_sheet;
use crate::shared::cache::{listing_cache, PRODUCTS_TAG, PRODUCT_LIST_PATH};
use crate::shared::text::slugify;
use async_trait::async_trait;
use contracts::usecases::u501_import_products::{
    CommitResult, ImportPreview, ParsedProductRecord, QaRecord, RowError,
};
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// Куда записываются подтвержденные товары
#[async_trait]
pub trait ProductSink: Send + Sync {
    /// Товар и его варианты (одной транзакцией)
    async fn create_product(
        &self,
        seller_id: &str,
        record: &ParsedProductRecord,
    ) -> anyhow::Result<Uuid>;

    async fn add_question(&self, product_id: Uuid, qa: &QaRecord) -> anyhow::Result<()>;
}

/// Executor для UseCase импорта товаров
#[derive(Clone)]
pub struct ImportExecutor {
    sink: Arc<dyn ProductSink>,
    matcher: Arc<dyn CategoryMatcher>,
}

impl ImportExecutor {
    pub fn new(sink: Arc<dyn ProductSink>, matcher: Arc<dyn CategoryMatcher>) -> Self {
        Self { sink, matcher }
    }

    /// Разобрать файл и разделить строки на валидные и невалидные. В БД ничего не пишет.
    pub fn preview<R: Rng + ?Sized>(
        &self,
        file_name: &str,
        bytes: &[u8],
        context: &ImportContext,
        rng: &mut R,
        now_ms: i64,
    ) -> Result<ImportPreview, ImportError> {
        let sheet = read_sheet(file_name, bytes)?;
        let header_map = HeaderMap::build(&sheet.headers);

        let ignored = header_map.ignored_headers().to_vec();
        if !ignored.is_empty() {
            tracing::warn!("{}: ignoring unrecognized columns {:?}", file_name, ignored);
        }

        let rows: Vec<_> = sheet.rows.iter().map(|r| header_map.apply(r)).collect();
        let (valid, invalid) =
            RowValidator::new(context, self.matcher.as_ref(), rng, now_ms).validate_all(&rows);

        tracing::info!(
            "Import preview of {}: {} rows, {} valid, {} invalid",
            file_name,
            rows.len(),
            valid.len(),
            invalid.len()
        );

        Ok(ImportPreview::new(valid, invalid, ignored))
    }

    /// Записать подтвержденные строки по одной. Ошибка строки не откатывает остальные.
    pub async fn commit(&self, seller_id: &str, records: Vec<ParsedProductRecord>) -> CommitResult {
        let total = records.len();
        let mut result = CommitResult {
            success: true,
            ..Default::default()
        };
        let mut seen_skus: HashSet<String> = HashSet::new();

        for record in &records {
            let record = &refresh_derived(record);
            if let Err(message) = check_record(record, &mut seen_skus) {
                result.failed += 1;
                result.errors.push(RowError {
                    row: record.row,
                    message,
                });
                continue;
            }

            let product_id = match self.sink.create_product(seller_id, record).await {
                Ok(id) => id,
                Err(e) => {
                    let error = ImportError::Persistence(format!("{:#}", e));
                    tracing::warn!("Row {}: product {} not created: {}", record.row, record.sku, error);
                    result.failed += 1;
                    result.errors.push(RowError {
                        row: record.row,
                        message: error.to_string(),
                    });
                    continue;
                }
            };
            result.inserted += 1;

            for qa in &record.questions {
                if let Err(e) = self.sink.add_question(product_id, qa).await {
                    tracing::warn!("Row {}: question not saved: {:#}", record.row, e);
                    result.warnings.push(RowError {
                        row: record.row,
                        message: format!("Question \"{}\" not saved: {:#}", qa.question, e),
                    });
                }
            }
        }

        let cache = listing_cache();
        cache.revalidate_path(PRODUCT_LIST_PATH);
        cache.revalidate_tag(PRODUCTS_TAG);

        tracing::info!(
            "Import commit for seller {}: {} of {} inserted, {} failed",
            seller_id,
            result.inserted,
            total,
            result.failed
        );
        result
    }
}

/// Пересчитать производные поля (final, slug) из полей, которые мог править оператор
fn refresh_derived(record: &ParsedProductRecord) -> ParsedProductRecord {
    let mut record = record.clone();
    record.title = record.title.trim().to_string();
    record.sku = record.sku.trim().to_string();
    record.price = derive_price(&PriceInput::from_breakdown(&record.price));
    record.slug = slugify(&format!("{}-{}", record.title, record.sku));
    record
}

/// Повторная проверка записи: оператор мог ее отредактировать после превью
fn check_record(record: &ParsedProductRecord, seen_skus: &mut HashSet<String>) -> Result<(), String> {
    if record.title.trim().is_empty() {
        return Err("Missing required field: title".into());
    }
    let sku = record.sku.trim();
    if sku.is_empty() {
        return Err("Missing required field: sku".into());
    }
    if record.category_id.trim().is_empty() {
        return Err("Missing required field: categoryId".into());
    }
    if !seen_skus.insert(sku.to_string()) {
        return Err(format!("Duplicate SKU in file: {}", sku));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::category_matcher::{LexicalCategoryMatcher, NamedRef};
    use super::*;
    use contracts::domain::a003_product::{DiscountType, PriceBreakdown};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Mutex;

    /// Sink в памяти: падает на SKU из списка и на вопросах с текстом "fail"
    #[derive(Default)]
    struct MemorySink {
        failing_skus: Vec<String>,
        products: Mutex<Vec<(String, ParsedProductRecord)>>,
        questions: Mutex<Vec<(Uuid, String)>>,
    }

    #[async_trait]
    impl ProductSink for MemorySink {
        async fn create_product(
            &self,
            seller_id: &str,
            record: &ParsedProductRecord,
        ) -> anyhow::Result<Uuid> {
            if self.failing_skus.contains(&record.sku) {
                anyhow::bail!("UNIQUE constraint failed: a003_product.code");
            }
            self.products
                .lock()
                .unwrap()
                .push((seller_id.to_string(), record.clone()));
            Ok(Uuid::new_v4())
        }

        async fn add_question(&self, product_id: Uuid, qa: &QaRecord) -> anyhow::Result<()> {
            if qa.question == "fail" {
                anyhow::bail!("disk full");
            }
            self.questions
                .lock()
                .unwrap()
                .push((product_id, qa.question.clone()));
            Ok(())
        }
    }

    fn record(row: usize, sku: &str) -> ParsedProductRecord {
        ParsedProductRecord {
            row,
            title: format!("Product {}", row),
            slug: format!("product-{}", row),
            sku: sku.to_string(),
            sku_generated: false,
            description: String::new(),
            short_description: String::new(),
            category_id: "cat-1".into(),
            category_name: "Mug".into(),
            auto_category: None,
            brand_id: None,
            brand_name: String::new(),
            price: PriceBreakdown::default(),
            quantity: 1,
            is_featured: false,
            is_active: true,
            is_returnable: true,
            images: vec![],
            bullet_points: vec![],
            dimensions: Default::default(),
            seo: Default::default(),
            variants: vec![],
            questions: vec![],
        }
    }

    fn executor(sink: Arc<MemorySink>) -> ImportExecutor {
        ImportExecutor::new(sink, Arc::new(LexicalCategoryMatcher))
    }

    #[tokio::test]
    async fn test_commit_counts_failures_and_keeps_successes() {
        let sink = Arc::new(MemorySink {
            failing_skus: vec!["B".into(), "D".into()],
            ..Default::default()
        });
        let records = vec![
            record(2, "A"),
            record(3, "B"),
            record(4, "C"),
            record(5, "D"),
            record(6, "E"),
        ];

        let result = executor(sink.clone()).commit("seller-1", records).await;

        assert_eq!(result.inserted + result.failed, 5);
        assert_eq!(result.inserted, 3);
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].row, 3);
        assert!(result.errors[0].message.contains("UNIQUE"));
        assert_eq!(result.errors[1].row, 5);

        let products = sink.products.lock().unwrap();
        let skus: Vec<&str> = products.iter().map(|(_, r)| r.sku.as_str()).collect();
        assert_eq!(skus, vec!["A", "C", "E"]);
        assert!(products.iter().all(|(seller, _)| seller == "seller-1"));
    }

    #[tokio::test]
    async fn test_commit_rechecks_edited_records() {
        let sink = Arc::new(MemorySink::default());
        let mut blank_title = record(2, "A");
        blank_title.title = "  ".into();
        let mut no_category = record(3, "B");
        no_category.category_id.clear();
        let records = vec![blank_title, no_category, record(4, "C"), record(5, "C")];

        let result = executor(sink.clone()).commit("seller-1", records).await;

        assert_eq!(result.inserted, 1);
        assert_eq!(result.failed, 3);
        assert_eq!(result.errors[0].message, "Missing required field: title");
        assert_eq!(result.errors[2].message, "Duplicate SKU in file: C");
        assert_eq!(sink.products.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_commit_rederives_edited_price_and_slug() {
        let sink = Arc::new(MemorySink::default());
        let mut edited = record(2, "MUG-9");
        edited.title = "Blue Mug".into();
        edited.price = PriceBreakdown {
            base: 200.0,
            list: 200.0,
            final_price: 80.0,
            discount_type: Some(DiscountType::Percent),
            discount_value: 20.0,
        };

        let result = executor(sink.clone()).commit("seller-1", vec![edited]).await;

        assert_eq!(result.inserted, 1);
        let products = sink.products.lock().unwrap();
        let stored = &products[0].1;
        assert_eq!(stored.price.final_price, 160.0);
        assert_eq!(stored.price.discount_type, Some(DiscountType::Percent));
        assert_eq!(stored.slug, "blue-mug-mug-9");
    }

    #[tokio::test]
    async fn test_question_failure_is_warning() {
        let sink = Arc::new(MemorySink::default());
        let mut with_qa = record(2, "A");
        with_qa.questions = vec![
            QaRecord {
                question: "Size?".into(),
                answer: Some("Large".into()),
            },
            QaRecord {
                question: "fail".into(),
                answer: None,
            },
        ];

        let result = executor(sink.clone()).commit("seller-1", vec![with_qa]).await;

        assert_eq!(result.inserted, 1);
        assert_eq!(result.failed, 0);
        assert!(result.errors.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].row, 2);
        assert_eq!(sink.questions.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_commit_invalidates_product_listing() {
        let cache = listing_cache();
        cache.put(PRODUCT_LIST_PATH, "seller-cache-test", &[PRODUCTS_TAG], serde_json::json!([]));

        let sink = Arc::new(MemorySink::default());
        executor(sink).commit("seller-cache-test", vec![record(2, "A")]).await;

        assert!(cache.get(PRODUCT_LIST_PATH, "seller-cache-test").is_none());
    }

    #[test]
    fn test_preview_from_csv() {
        let context = ImportContext {
            categories: vec![NamedRef::new("cat-mug", "Mug")],
            sku_max_attempts: 5,
            ..Default::default()
        };
        let csv = "title,sku,category,warehouse,price.list,price.final\n\
                   Red Mug,MUG-1,Mug,A1,100,80\n\
                   ,MUG-2,Mug,A2,10,\n\
                   Blue Mug,MUG-1,Mug,A3,10,\n";
        let mut rng = StdRng::seed_from_u64(3);
        let preview = executor(Arc::new(MemorySink::default()))
            .preview("products.csv", csv.as_bytes(), &context, &mut rng, 0)
            .unwrap();

        assert!(preview.success);
        assert_eq!(preview.summary.valid, 1);
        assert_eq!(preview.summary.invalid, 2);
        assert_eq!(preview.valid[0].price.discount_value, 20.0);
        assert_eq!(preview.invalid[0].row, 3);
        assert_eq!(preview.invalid[1].message, "Duplicate SKU in file: MUG-1");
        assert_eq!(preview.ignored_headers, vec!["warehouse"]);
    }

    #[test]
    fn test_preview_rejects_unreadable_file() {
        let mut rng = StdRng::seed_from_u64(3);
        let result = executor(Arc::new(MemorySink::default())).preview(
            "products.xlsx",
            b"definitely not a workbook",
            &ImportContext::default(),
            &mut rng,
            0,
        );
        assert!(matches!(result, Err(ImportError::Parse(_))));
    }
}
