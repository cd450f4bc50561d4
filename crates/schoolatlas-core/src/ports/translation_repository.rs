//! Translation repository trait definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{EntityType, Language, Translation};

/// Repository for the sparse translation overlay.
///
/// Rows are keyed by `(entity_id, entity_type, language)`. Removing an
/// entity removes its translations.
#[async_trait]
pub trait TranslationRepository: Send + Sync {
    /// Every translation of one entity type in one language.
    async fn list_for(
        &self,
        entity_type: EntityType,
        language: Language,
    ) -> Result<Vec<Translation>, RepositoryError>;

    /// The translation of a single entity, if one exists.
    async fn get(
        &self,
        entity_id: &str,
        entity_type: EntityType,
        language: Language,
    ) -> Result<Option<Translation>, RepositoryError>;

    /// Insert or replace translations in a single transaction.
    ///
    /// Returns the number of rows written.
    async fn upsert_many(&self, translations: &[Translation]) -> Result<usize, RepositoryError>;

    /// Remove all translations of one entity. Returns the number removed.
    async fn delete_for_entity(
        &self,
        entity_id: &str,
        entity_type: EntityType,
    ) -> Result<u64, RepositoryError>;
}
