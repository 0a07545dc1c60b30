use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Ошибки импорта товаров
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Файл не читается как книга/CSV (прерывает весь импорт)
    #[error("{0}")]
    Parse(String),

    #[error("{0}")]
    Authorization(String),

    /// Строка не прошла проверку (в `invalid[]` превью)
    #[error("{0}")]
    Validation(String),

    /// Не удалось записать товар (в `errors[]` результата фиксации)
    #[error("{0}")]
    Persistence(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ImportError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ImportError::Parse(_) | ImportError::Validation(_) => StatusCode::BAD_REQUEST,
            ImportError::Authorization(_) => StatusCode::UNAUTHORIZED,
            ImportError::Persistence(_) | ImportError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ImportError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Import failed: {:#}", self);
        } else {
            tracing::warn!("Import rejected: {}", self);
        }
        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}
