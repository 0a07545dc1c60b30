use anyhow::{Context, Result};
use contracts::system::auth::TokenClaims;
use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::shared::config::get_config;

/// Проверить токен внешнего провайдера и извлечь claims.
/// Токены здесь не выпускаются: только проверяются общим секретом.
pub fn validate_token(token: &str) -> Result<TokenClaims> {
    let secret = &get_config().auth.jwt_secret;
    if secret.is_empty() {
        anyhow::bail!("JWT secret is not configured");
    }
    decode_with_secret(token, secret)
}

pub fn decode_with_secret(token: &str, secret: &str) -> Result<TokenClaims> {
    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode JWT token")?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn make_token(secret: &str, exp_offset_secs: i64) -> String {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: "seller-42".into(),
            username: "shop".into(),
            is_admin: false,
            exp: (now + exp_offset_secs) as usize,
            iat: now as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_yields_seller() {
        let token = make_token("s3cret", 3600);
        let claims = decode_with_secret(&token, "s3cret").unwrap();
        assert_eq!(claims.seller_id(), "seller-42");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = make_token("s3cret", 3600);
        assert!(decode_with_secret(&token, "other").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = make_token("s3cret", -3600);
        assert!(decode_with_secret(&token, "s3cret").is_err());
    }
}
