//! Domain types for the school catalog.
//!
//! Pure data and pure functions only: no I/O, no async.

mod country;
mod filters;
mod language;
mod page;
mod province;
mod school;
mod translation;

pub use country::Country;
pub use filters::{
    CountrySortOrder, MAX_RATING, ProvinceFilters, ProvinceSortOrder, RangeValues, SchoolFilters,
    SchoolSearch, SchoolSortOrder, SearchFilters, available_school_types,
    filter_and_sort_countries, filter_and_sort_provinces, filter_and_sort_schools,
};
pub use language::{Language, UnknownLanguage};
pub use page::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Page, PageRequest, Paged};
pub use province::{Province, ProvinceType};
pub use school::{School, SchoolType};
pub use translation::{
    EntityType, Localizable, Localized, PROGRAMS_KEY, REQUIREMENTS_KEY, Translation,
    localize_all,
};
