use super::record::ParsedProductRecord;
use serde::{Deserialize, Serialize};

/// Запрос на фиксацию импорта: подтвержденные оператором валидные строки превью
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRequest {
    pub valid: Vec<ParsedProductRecord>,
}
