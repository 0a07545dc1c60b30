use axum::Json;

use crate::domain::a003_product;
use crate::shared::cache::{listing_cache, PRODUCTS_TAG, PRODUCT_LIST_PATH};
use crate::system::auth::extractor::CurrentUser;

/// GET /api/product: товары текущего продавца (через кэш списков)
pub async fn list_mine(
    user: CurrentUser,
) -> Result<Json<serde_json::Value>, axum::http::StatusCode> {
    let cache = listing_cache();
    if let Some(body) = cache.get(PRODUCT_LIST_PATH, user.seller_id()) {
        return Ok(Json(body));
    }

    let items = match a003_product::service::list_by_seller(user.seller_id()).await {
        Ok(v) => v,
        Err(e) => {
            tracing::error!("Failed to list products of {}: {}", user.seller_id(), e);
            return Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let body = serde_json::to_value(items)
        .map_err(|_| axum::http::StatusCode::INTERNAL_SERVER_ERROR)?;
    cache.put(PRODUCT_LIST_PATH, user.seller_id(), &[PRODUCTS_TAG], body.clone());
    Ok(Json(body))
}
