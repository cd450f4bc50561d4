//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `sqlx` or `reqwest` types in any signature
//! - Repository traits are minimal and query-shaped
//! - The remote catalog port returns entities already split from their
//!   translations

pub mod catalog_remote;
pub mod country_repository;
pub mod province_repository;
pub mod school_repository;
pub mod settings_repository;
pub mod translation_repository;

use std::sync::Arc;
use thiserror::Error;

pub use catalog_remote::{
    CatalogRemotePort, CountryDetails, RemoteError, RemoteResult, WithTranslations,
};
pub use country_repository::CountryRepository;
pub use province_repository::ProvinceRepository;
pub use school_repository::SchoolRepository;
pub use settings_repository::SettingsRepository;
pub use translation_repository::TranslationRepository;

/// Container for all repository trait objects.
///
/// Lives in the core crate so services can accept it without depending on
/// `schoolatlas-db`.
///
/// ```ignore
/// // In schoolatlas-db factory:
/// pub fn build_repos(pool: &SqlitePool) -> Repos { ... }
///
/// // In bootstrap:
/// let repos = schoolatlas_db::factory::build_repos(&pool);
/// let catalog = CatalogService::new(repos, remote, language);
/// ```
#[derive(Clone)]
pub struct Repos {
    pub countries: Arc<dyn CountryRepository>,
    pub provinces: Arc<dyn ProvinceRepository>,
    pub schools: Arc<dyn SchoolRepository>,
    pub translations: Arc<dyn TranslationRepository>,
    pub settings: Arc<dyn SettingsRepository>,
}

impl Repos {
    /// Create a new Repos container.
    pub fn new(
        countries: Arc<dyn CountryRepository>,
        provinces: Arc<dyn ProvinceRepository>,
        schools: Arc<dyn SchoolRepository>,
        translations: Arc<dyn TranslationRepository>,
        settings: Arc<dyn SettingsRepository>,
    ) -> Self {
        Self {
            countries,
            provinces,
            schools,
            translations,
            settings,
        }
    }
}

/// Failures reported by the local store.
///
/// Adapters translate their driver errors into these so services never see
/// a `sqlx` type.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// A row with the same key is already stored.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// The store itself failed (I/O, locked database, bad column).
    #[error("Storage error: {0}")]
    Storage(String),

    /// A JSON column or the settings document did not round-trip.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A foreign key or check constraint rejected the write.
    #[error("Constraint violation: {0}")]
    Constraint(String),
}

/// Error returned by core services.
///
/// State holders collapse it to a user-facing message.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Settings(#[from] crate::settings::SettingsError),

    /// A caller passed an argument no operation can accept.
    #[error("Validation error: {0}")]
    Validation(String),
}
