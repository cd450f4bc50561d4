//! Remote catalog port trait.

use async_trait::async_trait;

use super::error::RemoteResult;
use super::types::{CountryDetails, WithTranslations};
use crate::domain::{
    Country, Language, Page, PageRequest, Province, School, SchoolSearch, SchoolType,
};

/// Port trait for the remote school catalog.
///
/// # Design
///
/// - Uses core-owned domain types, not wire types
/// - Returns `RemoteError` for all failures
/// - Every call names the language translations are wanted in
#[async_trait]
pub trait CatalogRemotePort: Send + Sync {
    /// All countries.
    async fn list_countries(
        &self,
        language: Language,
    ) -> RemoteResult<Vec<WithTranslations<Country>>>;

    /// One country with its embedded provinces.
    async fn get_country(&self, id: &str, language: Language) -> RemoteResult<CountryDetails>;

    /// Provinces of a country.
    async fn list_provinces(
        &self,
        country_id: &str,
        language: Language,
    ) -> RemoteResult<Vec<WithTranslations<Province>>>;

    /// One page of a province's schools, optionally narrowed to one type.
    async fn list_schools(
        &self,
        province_id: &str,
        school_type: Option<SchoolType>,
        language: Language,
        page: PageRequest,
    ) -> RemoteResult<Page<WithTranslations<School>>>;

    /// One page of catalog-wide search results.
    async fn search_schools(
        &self,
        search: &SchoolSearch,
        language: Language,
        page: PageRequest,
    ) -> RemoteResult<Page<WithTranslations<School>>>;

    /// Full details of one school.
    async fn get_school(&self, id: &str, language: Language)
    -> RemoteResult<WithTranslations<School>>;
}
