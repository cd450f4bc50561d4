//! Composition utilities for building `Repos` with `SQLite` backends.
//!
//! This module is focused purely on construction and should not contain
//! any domain logic.

use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;

use schoolatlas_core::Repos;

use crate::repositories::{
    SqliteCountryRepository, SqliteProvinceRepository, SqliteSchoolRepository,
    SqliteSettingsRepository, SqliteTranslationRepository,
};

/// Factory for creating repository instances with `SQLite` backends.
pub struct CoreFactory;

impl CoreFactory {
    /// Open (or create) the database at `db_path` with the full schema.
    pub async fn create_pool(db_path: &Path) -> anyhow::Result<SqlitePool> {
        crate::setup::setup_database(db_path).await
    }

    /// Create an in-memory `SQLite` pool for testing.
    #[cfg(any(test, feature = "test-utils"))]
    pub async fn create_test_pool() -> anyhow::Result<SqlitePool> {
        crate::setup::setup_test_database().await
    }

    /// Build all `SQLite` repositories from a pool.
    ///
    /// This is the recommended way for adapters to obtain repositories.
    /// Returns a `Repos` struct from `schoolatlas-core` containing
    /// trait-object-wrapped repositories.
    pub fn build_repos(pool: SqlitePool) -> Repos {
        Repos::new(
            Self::country_repository(pool.clone()),
            Self::province_repository(pool.clone()),
            Self::school_repository(pool.clone()),
            Self::translation_repository(pool.clone()),
            Self::settings_repository(pool),
        )
    }

    /// Create a country repository from a pool.
    pub fn country_repository(pool: SqlitePool) -> Arc<SqliteCountryRepository> {
        Arc::new(SqliteCountryRepository::new(pool))
    }

    /// Create a province repository from a pool.
    pub fn province_repository(pool: SqlitePool) -> Arc<SqliteProvinceRepository> {
        Arc::new(SqliteProvinceRepository::new(pool))
    }

    /// Create a school repository from a pool.
    pub fn school_repository(pool: SqlitePool) -> Arc<SqliteSchoolRepository> {
        Arc::new(SqliteSchoolRepository::new(pool))
    }

    /// Create a translation repository from a pool.
    pub fn translation_repository(pool: SqlitePool) -> Arc<SqliteTranslationRepository> {
        Arc::new(SqliteTranslationRepository::new(pool))
    }

    /// Create a settings repository from a pool.
    pub fn settings_repository(pool: SqlitePool) -> Arc<SqliteSettingsRepository> {
        Arc::new(SqliteSettingsRepository::new(pool))
    }
}

/// Test database helper for integration tests.
///
/// Provides an in-memory `SQLite` database with the production schema
/// already applied.
#[cfg(any(test, feature = "test-utils"))]
pub struct TestDb {
    pool: SqlitePool,
}

#[cfg(any(test, feature = "test-utils"))]
impl TestDb {
    /// Create a new in-memory test database with full schema.
    pub async fn new() -> anyhow::Result<Self> {
        let pool = crate::setup::setup_test_database().await?;
        Ok(Self { pool })
    }

    /// Get the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// All repositories over this database.
    pub fn repos(&self) -> Repos {
        CoreFactory::build_repos(self.pool.clone())
    }

    pub fn country_repository(&self) -> SqliteCountryRepository {
        SqliteCountryRepository::new(self.pool.clone())
    }

    pub fn province_repository(&self) -> SqliteProvinceRepository {
        SqliteProvinceRepository::new(self.pool.clone())
    }

    pub fn school_repository(&self) -> SqliteSchoolRepository {
        SqliteSchoolRepository::new(self.pool.clone())
    }

    pub fn translation_repository(&self) -> SqliteTranslationRepository {
        SqliteTranslationRepository::new(self.pool.clone())
    }

    pub fn settings_repository(&self) -> SqliteSettingsRepository {
        SqliteSettingsRepository::new(self.pool.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolatlas_core::Language;

    #[tokio::test]
    async fn test_build_repos_share_one_database() {
        let db = TestDb::new().await.unwrap();
        let repos = db.repos();

        let mut settings = repos.settings.load().await.unwrap();
        settings.language = Some(Language::Lingala);
        repos.settings.save(&settings).await.unwrap();

        let reloaded = CoreFactory::build_repos(db.pool().clone());
        assert_eq!(
            reloaded.settings.load().await.unwrap().language,
            Some(Language::Lingala)
        );
        assert!(reloaded.countries.list().await.unwrap().is_empty());
    }
}
