use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use std::path::Path;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Таблицы, создаваемые при старте (минимальный bootstrap схемы)
const SCHEMA: &[(&str, &str)] = &[
    (
        "a001_category",
        r#"
        CREATE TABLE a001_category (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            parent_id TEXT,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
    ),
    (
        "a002_brand",
        r#"
        CREATE TABLE a002_brand (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
    ),
    (
        "a003_product",
        r#"
        CREATE TABLE a003_product (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            seller_id TEXT NOT NULL,
            category_id TEXT NOT NULL,
            brand_id TEXT,
            full_description TEXT NOT NULL DEFAULT '',
            short_description TEXT NOT NULL DEFAULT '',
            price_base REAL NOT NULL DEFAULT 0,
            price_list REAL NOT NULL DEFAULT 0,
            price_final REAL NOT NULL DEFAULT 0,
            discount_type TEXT,
            discount_value REAL NOT NULL DEFAULT 0,
            quantity INTEGER NOT NULL DEFAULT 0,
            is_featured INTEGER NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1,
            is_returnable INTEGER NOT NULL DEFAULT 1,
            images_json TEXT NOT NULL DEFAULT '[]',
            bullet_points_json TEXT NOT NULL DEFAULT '[]',
            dimensions_json TEXT,
            seo_json TEXT,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
    ),
    (
        "a003_product_variant",
        r#"
        CREATE TABLE a003_product_variant (
            id TEXT PRIMARY KEY NOT NULL,
            product_id TEXT NOT NULL,
            line_no INTEGER NOT NULL DEFAULT 0,
            title TEXT NOT NULL,
            sku TEXT NOT NULL,
            price REAL,
            quantity INTEGER NOT NULL DEFAULT 0,
            color TEXT,
            size TEXT
        );
        "#,
    ),
    (
        "a003_product_question",
        r#"
        CREATE TABLE a003_product_question (
            id TEXT PRIMARY KEY NOT NULL,
            product_id TEXT NOT NULL,
            question TEXT NOT NULL,
            answer TEXT,
            is_answered INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT
        );
        "#,
    ),
    (
        "system_log",
        r#"
        CREATE TABLE system_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp TEXT NOT NULL,
            source TEXT NOT NULL,
            category TEXT NOT NULL,
            message TEXT NOT NULL
        );
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_a003_product_seller ON a003_product (seller_id);",
    "CREATE INDEX IF NOT EXISTS idx_a003_product_variant_product ON a003_product_variant (product_id);",
    "CREATE INDEX IF NOT EXISTS idx_a003_product_question_product ON a003_product_question (product_id);",
];

fn build_sqlite_url(path: &Path) -> String {
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    format!("sqlite://{}{}?mode=rwc", prefix, normalized)
}

async fn table_exists(conn: &DatabaseConnection, table_name: &str) -> anyhow::Result<bool> {
    let rows = conn
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT name FROM sqlite_master WHERE type='table' AND name = ?",
            [table_name.into()],
        ))
        .await?;
    Ok(!rows.is_empty())
}

/// Создает недостающие таблицы и индексы
pub async fn ensure_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    for (table_name, ddl) in SCHEMA {
        if table_exists(conn, table_name).await? {
            continue;
        }
        tracing::info!("Creating {} table", table_name);
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, ddl.to_string()))
            .await?;
    }
    for ddl in INDEXES {
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, ddl.to_string()))
            .await?;
    }
    Ok(())
}

pub async fn initialize_database(db_file: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    let db_url = build_sqlite_url(&absolute_path);
    tracing::info!("Opening database {}", absolute_path.display());

    let conn = Database::connect(&db_url).await?;
    ensure_schema(&conn).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_sqlite_url() {
        assert_eq!(
            build_sqlite_url(Path::new("/var/data/app.db")),
            "sqlite:///var/data/app.db?mode=rwc"
        );
        assert_eq!(
            build_sqlite_url(Path::new("C:\\data\\app.db")),
            "sqlite:///C:/data/app.db?mode=rwc"
        );
    }
}
