use axum::Json;
use serde_json::json;

use crate::domain::a002_brand;

/// GET /api/brand
pub async fn list_all(
) -> Result<Json<Vec<contracts::domain::a002_brand::aggregate::Brand>>, axum::http::StatusCode> {
    match a002_brand::service::list_all().await {
        Ok(v) => Ok(Json(v)),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/brand
pub async fn create(
    Json(dto): Json<contracts::domain::a002_brand::aggregate::BrandDto>,
) -> Result<Json<serde_json::Value>, axum::http::StatusCode> {
    match a002_brand::service::create(dto).await {
        Ok(id) => Ok(Json(json!({"id": id.to_string()}))),
        Err(e) => {
            tracing::warn!("Brand not created: {}", e);
            Err(axum::http::StatusCode::BAD_REQUEST)
        }
    }
}
