use axum::{body::Body, extract::Request, middleware::Next, response::Response};

use super::AuthError;

fn bearer_token(req: &Request<Body>) -> Result<&str, AuthError> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)
}

/// Middleware: требует валидный JWT, кладет claims в extensions запроса
pub async fn require_auth(mut req: Request<Body>, next: Next) -> Result<Response, AuthError> {
    let token = bearer_token(&req)?;

    let claims = super::jwt::validate_token(token).map_err(|e| {
        tracing::warn!("Rejected token: {:#}", e);
        AuthError::InvalidToken
    })?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Middleware: то же, что `require_auth`, плюс признак администратора
pub async fn require_admin(mut req: Request<Body>, next: Next) -> Result<Response, AuthError> {
    let token = bearer_token(&req)?;

    let claims = super::jwt::validate_token(token).map_err(|_| AuthError::InvalidToken)?;
    if !claims.is_admin {
        return Err(AuthError::Forbidden);
    }

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use axum::{middleware, routing::get, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/private", get(|| async { "ok" }))
            .layer(middleware::from_fn(require_auth))
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let response = app()
            .oneshot(Request::builder().uri("/private").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Missing bearer token");
    }

    #[tokio::test]
    async fn test_garbage_token_is_unauthorized() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/private")
                    .header("Authorization", "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
