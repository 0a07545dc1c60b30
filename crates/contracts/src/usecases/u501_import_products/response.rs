use super::record::ParsedProductRecord;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Строка, не прошедшая проверку
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvalidRow {
    pub row: usize,
    pub message: String,
    /// Исходные ячейки строки (заголовок -> значение) в порядке колонок файла
    pub raw: IndexMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub valid: usize,
    pub invalid: usize,
}

/// Превью импорта: ничего не записано в БД
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportPreview {
    pub success: bool,
    pub valid: Vec<ParsedProductRecord>,
    pub invalid: Vec<InvalidRow>,
    pub summary: ImportSummary,
    /// Заголовки файла, которые не удалось сопоставить ни с одним полем
    #[serde(rename = "ignoredHeaders", default)]
    pub ignored_headers: Vec<String>,
}

impl ImportPreview {
    pub fn new(
        valid: Vec<ParsedProductRecord>,
        invalid: Vec<InvalidRow>,
        ignored_headers: Vec<String>,
    ) -> Self {
        let summary = ImportSummary {
            valid: valid.len(),
            invalid: invalid.len(),
        };
        Self {
            success: true,
            valid,
            invalid,
            summary,
            ignored_headers,
        }
    }
}

/// Ошибка/предупреждение по конкретной строке файла
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

/// Итог фиксации импорта
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitResult {
    pub success: bool,
    pub inserted: usize,
    pub failed: usize,
    pub errors: Vec<RowError>,
    /// Товар создан, но часть вопросов/ответов не записалась
    #[serde(default)]
    pub warnings: Vec<RowError>,
}
