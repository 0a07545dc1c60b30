use super::category_matcher::NamedRef;
use super::executor::ProductSink;
use super::normalizer::ImportContext;
use crate::domain::{a001_category, a002_brand, a003_product};
use async_trait::async_trait;
use contracts::domain::a003_product::{Product, ProductId, ProductVariant};
use contracts::domain::common::BaseAggregate;
use contracts::usecases::u501_import_products::{ParsedProductRecord, QaRecord};
use uuid::Uuid;

/// Запись товаров импорта в БД через сервис a003_product
pub struct DbProductSink;

#[async_trait]
impl ProductSink for DbProductSink {
    async fn create_product(
        &self,
        seller_id: &str,
        record: &ParsedProductRecord,
    ) -> anyhow::Result<Uuid> {
        if a003_product::service::sku_exists(&record.sku).await? {
            anyhow::bail!("SKU already exists: {}", record.sku);
        }
        a003_product::service::create_product(record_to_product(seller_id, record)).await
    }

    async fn add_question(&self, product_id: Uuid, qa: &QaRecord) -> anyhow::Result<()> {
        a003_product::service::add_question(product_id, &qa.question, qa.answer.as_deref())
            .await?;
        Ok(())
    }
}

pub fn record_to_product(seller_id: &str, record: &ParsedProductRecord) -> Product {
    Product {
        base: BaseAggregate::new(
            ProductId::new_v4(),
            record.sku.trim().to_string(),
            record.title.trim().to_string(),
        ),
        slug: record.slug.clone(),
        seller_id: seller_id.to_string(),
        category_id: record.category_id.clone(),
        brand_id: record.brand_id.clone(),
        full_description: record.description.clone(),
        short_description: record.short_description.clone(),
        price: record.price.clone(),
        quantity: record.quantity,
        is_featured: record.is_featured,
        is_active: record.is_active,
        is_returnable: record.is_returnable,
        images: record.images.clone(),
        bullet_points: record.bullet_points.clone(),
        dimensions: record.dimensions.clone(),
        seo: record.seo.clone(),
        variants: record
            .variants
            .iter()
            .map(|v| ProductVariant {
                title: v.title.clone(),
                sku: v.sku.clone(),
                price: v.price,
                quantity: v.quantity,
                color: v.color.clone(),
                size: v.size.clone(),
            })
            .collect(),
    }
}

/// Снимок категорий, брендов и SKU из БД для разбора одного файла
pub async fn load_context(sku_max_attempts: u32) -> anyhow::Result<ImportContext> {
    let categories = a001_category::service::list_all()
        .await?
        .into_iter()
        .map(|c| NamedRef::new(c.base.id.value().to_string(), c.name()))
        .collect();
    let brands = a002_brand::service::list_all()
        .await?
        .into_iter()
        .map(|b| NamedRef::new(b.base.id.value().to_string(), b.name()))
        .collect();
    let existing_skus = a003_product::service::load_sku_snapshot().await?;

    Ok(ImportContext {
        categories,
        brands,
        existing_skus,
        sku_max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::super::category_matcher::LexicalCategoryMatcher;
    use super::super::executor::ImportExecutor;
    use super::*;
    use crate::shared::data::db::initialize_database;
    use contracts::domain::a003_product::PriceBreakdown;
    use contracts::usecases::u501_import_products::VariantRecord;
    use std::sync::Arc;

    fn sample(row: usize, sku: &str) -> ParsedProductRecord {
        ParsedProductRecord {
            row,
            title: format!("Mug {}", row),
            slug: String::new(),
            sku: sku.to_string(),
            sku_generated: false,
            description: String::new(),
            short_description: String::new(),
            category_id: "cat-mug".into(),
            category_name: "Mug".into(),
            auto_category: None,
            brand_id: None,
            brand_name: String::new(),
            price: PriceBreakdown {
                base: 10.0,
                list: 10.0,
                final_price: 10.0,
                ..Default::default()
            },
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

    /// Единственный тест с реальной БД: соединение глобальное и инициализируется один раз
    #[tokio::test]
    async fn test_commit_through_database() {
        let db_file = std::env::temp_dir().join(format!("u501-import-{}.db", Uuid::new_v4()));
        initialize_database(&db_file).await.unwrap();

        let executor =
            ImportExecutor::new(Arc::new(DbProductSink), Arc::new(LexicalCategoryMatcher));

        let mut with_extras = sample(2, "A");
        with_extras.variants = vec![VariantRecord {
            title: "Large".into(),
            sku: "A-L".into(),
            price: Some(12.5),
            quantity: 3,
            color: None,
            size: Some("L".into()),
        }];
        with_extras.questions = vec![
            QaRecord {
                question: "Q?".into(),
                answer: Some("Yes".into()),
            },
            QaRecord {
                question: "Q2".into(),
                answer: None,
            },
        ];

        let result = executor
            .commit("seller-db", vec![with_extras, sample(3, "B")])
            .await;
        assert_eq!(result.inserted, 2);
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);

        let again = executor.commit("seller-db", vec![sample(4, "A")]).await;
        assert_eq!(again.inserted, 0);
        assert_eq!(again.failed, 1);
        assert_eq!(again.errors[0].row, 4);
        assert_eq!(again.errors[0].message, "SKU already exists: A");

        let products = a003_product::service::list_by_seller("seller-db").await.unwrap();
        assert_eq!(products.len(), 2);
        let product = products.iter().find(|p| p.sku() == "A").unwrap();
        assert_eq!(product.slug, "mug-2-a");
        assert_eq!(product.variants.len(), 1);
        assert_eq!(product.variants[0].sku, "A-L");
        assert_eq!(product.variants[0].price, Some(12.5));

        let questions = a003_product::service::list_questions(product.base.id.value())
            .await
            .unwrap();
        assert_eq!(questions.len(), 2);
        let answered = questions.iter().find(|q| q.question == "Q?").unwrap();
        assert_eq!(answered.answer.as_deref(), Some("Yes"));
        assert!(answered.is_answered);
        let open = questions.iter().find(|q| q.question == "Q2").unwrap();
        assert_eq!(open.answer, None);
        assert!(!open.is_answered);

        let _ = std::fs::remove_file(&db_file);
    }

    #[test]
    fn test_record_to_product() {
        let record = ParsedProductRecord {
            row: 2,
            title: " Red Mug ".into(),
            slug: "red-mug-mug-1".into(),
            sku: "MUG-1".into(),
            sku_generated: false,
            description: "Large ceramic mug".into(),
            short_description: String::new(),
            category_id: "cat-mug".into(),
            category_name: "Mug".into(),
            auto_category: None,
            brand_id: Some("brand-acme".into()),
            brand_name: "Acme".into(),
            price: PriceBreakdown {
                list: 10.0,
                final_price: 10.0,
                ..Default::default()
            },
            quantity: 4,
            is_featured: false,
            is_active: true,
            is_returnable: true,
            images: vec!["a.jpg".into()],
            bullet_points: vec![],
            dimensions: Default::default(),
            seo: Default::default(),
            variants: vec![VariantRecord {
                title: "Small".into(),
                sku: "MUG-1-S".into(),
                price: None,
                quantity: 2,
                color: Some("red".into()),
                size: None,
            }],
            questions: vec![],
        };

        let product = record_to_product("seller-9", &record);
        assert_eq!(product.sku(), "MUG-1");
        assert_eq!(product.title(), "Red Mug");
        assert_eq!(product.seller_id, "seller-9");
        assert_eq!(product.full_description, "Large ceramic mug");
        assert_eq!(product.variants[0].color.as_deref(), Some("red"));
        assert!(product.validate().is_ok());
    }
}
