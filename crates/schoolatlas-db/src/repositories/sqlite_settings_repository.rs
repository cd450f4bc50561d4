//! Settings persisted as one JSON document in `settings_kv`.
//!
//! A missing row means nothing was saved yet and loads as defaults. A row
//! that no longer deserializes is reported, not silently replaced.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use schoolatlas_core::{RepositoryError, Settings, SettingsRepository};

use super::row_mappers::{format_datetime, storage_error, to_json};

/// Key of the settings document.
const SETTINGS_KEY: &str = "app_settings";

pub struct SqliteSettingsRepository {
    pool: SqlitePool,
}

impl SqliteSettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for SqliteSettingsRepository {
    async fn load(&self) -> Result<Settings, RepositoryError> {
        let stored: Option<String> =
            sqlx::query_scalar("SELECT value FROM settings_kv WHERE key = ?")
                .bind(SETTINGS_KEY)
                .fetch_optional(&self.pool)
                .await
                .map_err(storage_error)?;

        let Some(json) = stored else {
            return Ok(Settings::with_defaults());
        };
        serde_json::from_str(&json).map_err(|e| {
            RepositoryError::Serialization(format!("stored settings are unreadable: {e}"))
        })
    }

    async fn save(&self, settings: &Settings) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO settings_kv (key, value, updated_at) VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(SETTINGS_KEY)
        .bind(to_json(settings)?)
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        debug!("Settings saved");
        Ok(())
    }
}
