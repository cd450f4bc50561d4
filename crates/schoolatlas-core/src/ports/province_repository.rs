//! Province repository trait definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::Province;

/// Repository for the local province cache.
#[async_trait]
pub trait ProvinceRepository: Send + Sync {
    /// Provinces of a country, ordered by name.
    async fn list_by_country(&self, country_id: &str) -> Result<Vec<Province>, RepositoryError>;

    /// Get a province by id, or `None` if it isn't cached.
    async fn get_by_id(&self, id: &str) -> Result<Option<Province>, RepositoryError>;

    /// Insert or replace provinces in a single transaction.
    ///
    /// Provinces whose country is not cached are skipped. Returns the number
    /// of rows written.
    async fn upsert_many(&self, provinces: &[Province]) -> Result<usize, RepositoryError>;

    /// Delete every province of a country (cascading to schools).
    ///
    /// Returns the number of provinces removed.
    async fn delete_by_country(&self, country_id: &str) -> Result<u64, RepositoryError>;
}
