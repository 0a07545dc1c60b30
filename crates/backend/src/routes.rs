use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::shared::config::Config;
use crate::system::auth::middleware::{require_admin, require_auth};
use crate::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes(config: &Config) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // CATALOG
        // ========================================
        // A001 Category handlers
        .route(
            "/api/category",
            get(handlers::a001_category::list_all).merge(
                post(handlers::a001_category::create)
                    .layer(middleware::from_fn(require_admin)),
            ),
        )
        // A002 Brand handlers
        .route(
            "/api/brand",
            get(handlers::a002_brand::list_all).merge(
                post(handlers::a002_brand::create).layer(middleware::from_fn(require_auth)),
            ),
        )
        // A003 Product handlers (seller scope)
        .route(
            "/api/product",
            get(handlers::a003_product::list_mine).layer(middleware::from_fn(require_auth)),
        )
        // ========================================
        // USECASES
        // ========================================
        // U501 Import products
        .route(
            "/api/u501/import/preview",
            post(handlers::u501_import_products::preview)
                .layer(DefaultBodyLimit::max(config.import.max_upload_bytes()))
                .layer(middleware::from_fn(require_auth)),
        )
        .route(
            "/api/u501/import/commit",
            post(handlers::u501_import_products::commit)
                .layer(DefaultBodyLimit::max(config.import.max_upload_bytes()))
                .layer(middleware::from_fn(require_auth)),
        )
        // ========================================
        // SYSTEM
        // ========================================
        .route("/api/logs", get(handlers::logs::list_recent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app() -> Router {
        let config: Config = toml::from_str("[database]\npath = \"unused.db\"\n").unwrap();
        configure_routes(&config)
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_import_requires_token() {
        for uri in ["/api/u501/import/preview", "/api/u501/import/commit"] {
            let response = app()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri(uri)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_product_list_requires_token() {
        let response = app()
            .oneshot(Request::builder().uri("/api/product").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_category_create_requires_token() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/category")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"description":"Mugs"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
