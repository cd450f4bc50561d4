#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod paths;
pub mod ports;
pub mod services;
pub mod settings;
pub mod state;
pub mod sync;

#[cfg(test)]
mod test_support;

// Re-export commonly used types for convenience
pub use domain::{
    Country, CountrySortOrder, EntityType, Language, Localizable, Localized, Page, PageRequest,
    Paged, Province, ProvinceFilters, ProvinceSortOrder, ProvinceType, RangeValues, School,
    SchoolFilters, SchoolSearch, SchoolSortOrder, SchoolType, SearchFilters, Translation,
};
pub use ports::{
    CatalogRemotePort, CoreError, CountryDetails, CountryRepository, ProvinceRepository,
    RemoteError, RemoteResult, Repos, RepositoryError, SchoolRepository, SettingsRepository,
    TranslationRepository, WithTranslations,
};
pub use services::{CatalogService, SettingsService};
pub use settings::{
    DEFAULT_API_BASE_URL, Settings, SettingsError, SettingsUpdate, validate_settings,
};
pub use sync::{BoundResource, Resource, network_bound};

// Re-export path utilities
pub use paths::{PathError, data_root, database_path, resolve_database_path};
