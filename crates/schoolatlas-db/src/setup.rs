//! Database setup and initialization.
//!
//! This module provides the `setup_database()` function for initializing
//! the `SQLite` database with full schema. Entry points call this with the
//! resolved database path.

use anyhow::Result;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use std::path::Path;
use tracing::debug;

/// Sets up the `SQLite` database connection and ensures the schema exists.
///
/// This function:
/// 1. Creates the parent directory and the database file if missing
/// 2. Turns on foreign key enforcement for every pooled connection
/// 3. Creates all tables, indexes and cleanup triggers
///
/// # Errors
///
/// Returns an error if the database file cannot be opened or created, or
/// if schema creation fails.
///
/// # Example
///
/// ```rust,no_run
/// use schoolatlas_db::setup_database;
/// use std::path::Path;
///
/// # async fn example() -> anyhow::Result<()> {
/// let db_path = Path::new("/path/to/schoolatlas.db");
/// let pool = setup_database(db_path).await?;
/// # Ok(())
/// # }
/// ```
pub async fn setup_database(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let pool = SqlitePool::connect_with(
        SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .foreign_keys(true),
    )
    .await?;

    create_schema(&pool).await?;
    debug!(path = %db_path.display(), "Database ready");

    Ok(pool)
}

/// Sets up an in-memory `SQLite` database for testing.
///
/// The pool holds exactly one connection that never expires, since the
/// database disappears with its last connection.
#[cfg(any(test, feature = "test-utils"))]
pub async fn setup_test_database() -> Result<SqlitePool> {
    use sqlx::sqlite::SqlitePoolOptions;

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(
            SqliteConnectOptions::new()
                .in_memory(true)
                .foreign_keys(true),
        )
        .await?;
    create_schema(&pool).await?;
    Ok(pool)
}

/// Creates the complete database schema.
///
/// Safe to call multiple times as all statements use IF NOT EXISTS.
pub(crate) async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS countries (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            code TEXT NOT NULL,
            flag_url TEXT NOT NULL DEFAULT '',
            total_schools INTEGER NOT NULL DEFAULT 0,
            last_updated TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS provinces (
            id TEXT PRIMARY KEY NOT NULL,
            country_id TEXT NOT NULL,
            name TEXT NOT NULL,
            province_type TEXT NOT NULL CHECK (province_type IN ('PROVINCE', 'CITY')),
            total_schools INTEGER NOT NULL DEFAULT 0,
            latitude REAL NOT NULL DEFAULT 0,
            longitude REAL NOT NULL DEFAULT 0,
            last_updated TEXT NOT NULL,
            FOREIGN KEY (country_id) REFERENCES countries(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_provinces_country ON provinces(country_id)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schools (
            id TEXT PRIMARY KEY NOT NULL,
            province_id TEXT NOT NULL,
            name TEXT NOT NULL,
            school_type TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            established_year INTEGER,
            website TEXT,
            email TEXT,
            phone TEXT,
            address TEXT NOT NULL DEFAULT '',
            latitude REAL NOT NULL DEFAULT 0,
            longitude REAL NOT NULL DEFAULT 0,
            annual_fees REAL NOT NULL DEFAULT 0,
            rating REAL NOT NULL DEFAULT 0,
            acceptance_rate INTEGER,
            image_urls TEXT NOT NULL DEFAULT '[]',
            facilities TEXT NOT NULL DEFAULT '[]',
            programs TEXT NOT NULL DEFAULT '[]',
            admission_requirements TEXT NOT NULL DEFAULT '[]',
            application_deadlines TEXT NOT NULL DEFAULT '{}',
            academic_calendar TEXT NOT NULL DEFAULT '{}',
            is_favorite INTEGER NOT NULL DEFAULT 0,
            last_updated TEXT NOT NULL,
            FOREIGN KEY (province_id) REFERENCES provinces(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_schools_province ON schools(province_id, school_type)",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_schools_name ON schools(name)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_schools_favorite ON schools(is_favorite) WHERE is_favorite = 1",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS translations (
            entity_id TEXT NOT NULL,
            entity_type TEXT NOT NULL CHECK (entity_type IN ('COUNTRY', 'PROVINCE', 'SCHOOL')),
            language TEXT NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            additional_info TEXT NOT NULL DEFAULT '{}',
            PRIMARY KEY (entity_id, entity_type, language)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_translations_lookup ON translations(entity_type, language)",
    )
    .execute(pool)
    .await?;

    // Translations have no foreign key (the owner table varies by type), so
    // deletes are propagated by triggers. Cascaded deletes fire them too.
    for (table, entity_type) in [
        ("countries", "COUNTRY"),
        ("provinces", "PROVINCE"),
        ("schools", "SCHOOL"),
    ] {
        sqlx::query(&format!(
            r#"
            CREATE TRIGGER IF NOT EXISTS trg_{table}_delete_translations
            AFTER DELETE ON {table}
            BEGIN
                DELETE FROM translations
                WHERE entity_type = '{entity_type}' AND entity_id = OLD.id;
            END
            "#
        ))
        .execute(pool)
        .await?;
    }

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings_kv (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
