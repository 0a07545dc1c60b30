use axum::{extract::Query, Json};
use serde::Deserialize;

use crate::shared::logger;

#[derive(Deserialize)]
pub struct LogsParams {
    pub limit: Option<u64>,
}

/// GET /api/logs
pub async fn list_recent(
    Query(params): Query<LogsParams>,
) -> Result<Json<Vec<contracts::shared::logger::LogEntry>>, axum::http::StatusCode> {
    let limit = params.limit.unwrap_or(200).min(1000);
    match logger::repository::get_recent_logs(limit).await {
        Ok(logs) => Ok(Json(logs)),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}
