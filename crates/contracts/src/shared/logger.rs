use serde::{Deserialize, Serialize};

/// Запись системного лога (события импорта и т.п.)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub timestamp: String,
    /// Кто записал событие: "server" или "client"
    pub source: String,
    pub category: String,
    pub message: String,
}
