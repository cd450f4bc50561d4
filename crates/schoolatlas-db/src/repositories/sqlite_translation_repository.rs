//! `SQLite` implementation of the `TranslationRepository` trait.

use async_trait::async_trait;
use sqlx::SqlitePool;

use schoolatlas_core::{EntityType, Language, RepositoryError, Translation, TranslationRepository};

use super::row_mappers::{row_to_translation, storage_error, to_json};

const TRANSLATION_SELECT_COLUMNS: &str =
    "entity_id, entity_type, language, name, description, additional_info";

/// `SQLite` implementation of the `TranslationRepository` trait.
pub struct SqliteTranslationRepository {
    pool: SqlitePool,
}

impl SqliteTranslationRepository {
    /// Create a new `SQLite` translation repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TranslationRepository for SqliteTranslationRepository {
    async fn list_for(
        &self,
        entity_type: EntityType,
        language: Language,
    ) -> Result<Vec<Translation>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {TRANSLATION_SELECT_COLUMNS} FROM translations \
             WHERE entity_type = ? AND language = ? ORDER BY entity_id"
        ))
        .bind(entity_type.as_str())
        .bind(language.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter().map(row_to_translation).collect()
    }

    async fn get(
        &self,
        entity_id: &str,
        entity_type: EntityType,
        language: Language,
    ) -> Result<Option<Translation>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {TRANSLATION_SELECT_COLUMNS} FROM translations \
             WHERE entity_id = ? AND entity_type = ? AND language = ?"
        ))
        .bind(entity_id)
        .bind(entity_type.as_str())
        .bind(language.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        row.as_ref().map(row_to_translation).transpose()
    }

    async fn upsert_many(&self, translations: &[Translation]) -> Result<usize, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage_error)?;

        for translation in translations {
            sqlx::query(
                r#"
                INSERT INTO translations
                    (entity_id, entity_type, language, name, description, additional_info)
                VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT(entity_id, entity_type, language) DO UPDATE SET
                    name = excluded.name,
                    description = excluded.description,
                    additional_info = excluded.additional_info
                "#,
            )
            .bind(&translation.entity_id)
            .bind(translation.entity_type.as_str())
            .bind(translation.language.as_str())
            .bind(&translation.name)
            .bind(&translation.description)
            .bind(to_json(&translation.additional_info)?)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;
        }

        tx.commit()
            .await
            .map_err(storage_error)?;

        Ok(translations.len())
    }

    async fn delete_for_entity(
        &self,
        entity_id: &str,
        entity_type: EntityType,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM translations WHERE entity_id = ? AND entity_type = ?")
            .bind(entity_id)
            .bind(entity_type.as_str())
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(result.rows_affected())
    }
}
