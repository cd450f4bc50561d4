//! School repository trait definition.
//!
//! This port defines the interface for cached school persistence, including
//! the local-only favorite flag.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{School, SchoolSearch, SchoolType};

/// Repository for the local school cache.
///
/// # Design Rules
///
/// - No `sqlx` types in signatures
/// - `is_favorite` is owned by the local store: upserts never overwrite it
/// - Filtering beyond the indexed columns belongs in the pure filter
///   functions, not here
#[async_trait]
pub trait SchoolRepository: Send + Sync {
    /// Schools of a province ordered by name, optionally narrowed to one type.
    async fn list_by_province(
        &self,
        province_id: &str,
        school_type: Option<SchoolType>,
    ) -> Result<Vec<School>, RepositoryError>;

    /// Get a school by id, or `None` if it isn't cached.
    async fn get_by_id(&self, id: &str) -> Result<Option<School>, RepositoryError>;

    /// Substring search over name, description, programs and facilities,
    /// scoped by the search filters.
    async fn search(&self, search: &SchoolSearch) -> Result<Vec<School>, RepositoryError>;

    /// All schools marked as favorite, ordered by name.
    async fn favorites(&self) -> Result<Vec<School>, RepositoryError>;

    /// Flip a school's favorite flag and return the new value.
    ///
    /// Returns `Err(RepositoryError::NotFound)` if the school isn't cached.
    async fn toggle_favorite(&self, id: &str) -> Result<bool, RepositoryError>;

    /// Insert or replace schools in a single transaction.
    ///
    /// Existing favorite flags are kept. Schools whose province is not cached
    /// are skipped. Returns the number of rows written.
    async fn upsert_many(&self, schools: &[School]) -> Result<usize, RepositoryError>;

    /// Delete every school of a province. Returns the number removed.
    async fn delete_by_province(&self, province_id: &str) -> Result<u64, RepositoryError>;
}
