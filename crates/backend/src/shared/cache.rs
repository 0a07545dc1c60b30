use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// Путь списка товаров продавца
pub const PRODUCT_LIST_PATH: &str = "/api/product";
/// Тег всех закэшированных списков товаров
pub const PRODUCTS_TAG: &str = "products";

static LISTING_CACHE: Lazy<ListingCache> = Lazy::new(ListingCache::new);

/// Глобальный кэш ответов списочных представлений
pub fn listing_cache() -> &'static ListingCache {
    &LISTING_CACHE
}

struct CachedEntry {
    path: String,
    tags: HashSet<String>,
    body: Value,
}

/// In-memory кэш JSON-ответов списков.
///
/// Ключ: путь запроса плюс вариант (например, ID продавца). Запись можно
/// сбросить по пути (`revalidate_path`) или по любому из тегов (`revalidate_tag`).
pub struct ListingCache {
    entries: RwLock<HashMap<String, CachedEntry>>,
}

impl ListingCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn key(path: &str, variant: &str) -> String {
        format!("{}|{}", path, variant)
    }

    pub fn get(&self, path: &str, variant: &str) -> Option<Value> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(&Self::key(path, variant))
            .map(|entry| entry.body.clone())
    }

    pub fn put(&self, path: &str, variant: &str, tags: &[&str], body: Value) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            Self::key(path, variant),
            CachedEntry {
                path: path.to_string(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                body,
            },
        );
    }

    /// Сбросить все варианты указанного пути. Возвращает число удаленных записей.
    pub fn revalidate_path(&self, path: &str) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|_, entry| entry.path != path);
        let removed = before - entries.len();
        tracing::debug!("revalidate_path({}): {} entries dropped", path, removed);
        removed
    }

    /// Сбросить все записи с тегом. Возвращает число удаленных записей.
    pub fn revalidate_tag(&self, tag: &str) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|_, entry| !entry.tags.contains(tag));
        let removed = before - entries.len();
        tracing::debug!("revalidate_tag({}): {} entries dropped", tag, removed);
        removed
    }
}

impl Default for ListingCache {
    fn default() -> Self {
        Self::new()
    }
}
