pub mod repository;

use repository::log_event_internal;

/// Записать событие сервера в system_log (не блокирует вызывающего)
///
/// # Примеры
/// ```ignore
/// logger::log("u501", "Import preview: 12 valid, 3 invalid");
/// ```
pub fn log(category: &str, message: &str) {
    log_event_internal("server", category, message);
}
