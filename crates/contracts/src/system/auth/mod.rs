use serde::{Deserialize, Serialize};

/// Claims токена, выпущенного внешним провайдером авторизации.
/// `sub`: идентификатор продавца, от имени которого выполняется запрос.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
    pub exp: usize,
    pub iat: usize,
}

impl TokenClaims {
    /// ID продавца (владельца строк products)
    pub fn seller_id(&self) -> &str {
        &self.sub
    }
}
