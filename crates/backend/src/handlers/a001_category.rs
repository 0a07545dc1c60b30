use axum::Json;
use serde_json::json;

use crate::domain::a001_category;

/// GET /api/category
pub async fn list_all() -> Result<
    Json<Vec<contracts::domain::a001_category::aggregate::Category>>,
    axum::http::StatusCode,
> {
    match a001_category::service::list_all().await {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Failed to list categories: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/category
pub async fn create(
    Json(dto): Json<contracts::domain::a001_category::aggregate::CategoryDto>,
) -> Result<Json<serde_json::Value>, axum::http::StatusCode> {
    match a001_category::service::create(dto).await {
        Ok(id) => Ok(Json(json!({"id": id.to_string()}))),
        Err(e) => {
            tracing::warn!("Category not created: {}", e);
            Err(axum::http::StatusCode::BAD_REQUEST)
        }
    }
}
