//! Repository implementations using `SQLite`.
//!
//! These implementations encapsulate all SQL queries and database access.
//! The `SqlitePool` is confined to this module and never exposed through
//! the port trait signatures.

mod row_mappers;
mod sqlite_country_repository;
mod sqlite_province_repository;
mod sqlite_school_repository;
mod sqlite_settings_repository;
mod sqlite_translation_repository;

pub use sqlite_country_repository::SqliteCountryRepository;
pub use sqlite_province_repository::SqliteProvinceRepository;
pub use sqlite_school_repository::SqliteSchoolRepository;
pub use sqlite_settings_repository::SqliteSettingsRepository;
pub use sqlite_translation_repository::SqliteTranslationRepository;
