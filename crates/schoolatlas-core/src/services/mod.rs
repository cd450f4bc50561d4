//! Core services - the application's business logic layer.
//!
//! Services orchestrate between ports and domain logic. They don't know
//! about concrete implementations.

mod catalog;
mod settings_service;

pub use catalog::{
    CatalogService, CountriesStream, CountryStream, ProvincesStream, SchoolPageStream,
    SchoolStream,
};
pub use settings_service::SettingsService;
