use axum::{extract::Multipart, Json};
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u501_import_products::{
    CommitRequest, CommitResult, ImportPreview, ImportProducts,
};
use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

use crate::shared::config::get_config;
use crate::shared::logger;
use crate::system::auth::extractor::CurrentUser;
use crate::usecases::u501_import_products::category_matcher::LexicalCategoryMatcher;
use crate::usecases::u501_import_products::sink::{load_context, DbProductSink};
use crate::usecases::u501_import_products::{ImportError, ImportExecutor};

static EXECUTOR: Lazy<ImportExecutor> = Lazy::new(|| {
    ImportExecutor::new(Arc::new(DbProductSink), Arc::new(LexicalCategoryMatcher))
});

fn seller_of(user: &CurrentUser) -> Result<String, ImportError> {
    let seller_id = user.seller_id().trim();
    if seller_id.is_empty() {
        return Err(ImportError::Authorization(
            "Token does not identify a seller".into(),
        ));
    }
    Ok(seller_id.to_string())
}

/// POST /api/u501/import/preview: multipart с полем `file`
pub async fn preview(
    user: CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<ImportPreview>, ImportError> {
    let seller_id = seller_of(&user)?;

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ImportError::Parse(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ImportError::Parse(format!("Failed to read uploaded file: {}", e)))?;
        upload = Some((file_name, bytes.to_vec()));
        break;
    }
    let (file_name, bytes) =
        upload.ok_or_else(|| ImportError::Parse("Multipart field \"file\" is missing".into()))?;

    let context = load_context(get_config().import.sku_max_attempts).await?;
    let mut rng = StdRng::from_entropy();
    let now_ms = chrono::Utc::now().timestamp_millis();

    let preview = EXECUTOR.preview(&file_name, &bytes, &context, &mut rng, now_ms)?;

    logger::log(
        ImportProducts::usecase_index(),
        &format!(
            "Import preview by {}: {} ({} bytes), {} valid, {} invalid",
            seller_id,
            file_name,
            bytes.len(),
            preview.summary.valid,
            preview.summary.invalid
        ),
    );
    Ok(Json(preview))
}

/// POST /api/u501/import/commit
pub async fn commit(
    user: CurrentUser,
    Json(request): Json<CommitRequest>,
) -> Result<Json<CommitResult>, ImportError> {
    let seller_id = seller_of(&user)?;
    let result = EXECUTOR.commit(&seller_id, request.valid).await;

    logger::log(
        ImportProducts::usecase_index(),
        &format!(
            "Import commit by {}: {} inserted, {} failed, {} warnings",
            seller_id,
            result.inserted,
            result.failed,
            result.warnings.len()
        ),
    );
    Ok(Json(result))
}
