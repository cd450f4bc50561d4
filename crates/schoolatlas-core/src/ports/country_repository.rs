//! Country repository trait definition.
//!
//! This port defines the interface for cached country persistence.
//! Implementations must handle all storage details internally.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::Country;

/// Repository for the local country cache.
///
/// # Design Rules
///
/// - No `sqlx` types in signatures
/// - Writes are whole-row upserts; there is no partial update
/// - Translations live in `TranslationRepository`, not here
#[async_trait]
pub trait CountryRepository: Send + Sync {
    /// List all cached countries, ordered by name.
    async fn list(&self) -> Result<Vec<Country>, RepositoryError>;

    /// Get a country by id, or `None` if it isn't cached.
    async fn get_by_id(&self, id: &str) -> Result<Option<Country>, RepositoryError>;

    /// Countries whose name contains `query` (case-insensitive), ordered by name.
    async fn search(&self, query: &str) -> Result<Vec<Country>, RepositoryError>;

    /// Insert or replace countries in a single transaction.
    ///
    /// Returns the number of rows written.
    async fn upsert_many(&self, countries: &[Country]) -> Result<usize, RepositoryError>;

    /// Delete a country along with its provinces, schools and translations.
    ///
    /// Returns `Err(RepositoryError::NotFound)` if the country doesn't exist.
    async fn delete(&self, id: &str) -> Result<(), RepositoryError>;
}
