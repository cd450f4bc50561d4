//! URL construction helpers for the catalog API.
//!
//! Pure functions: path segments are appended (and percent-encoded) onto
//! the configured base URL, query parameters go through `query_pairs_mut`.

use schoolatlas_core::{Language, PageRequest, SchoolSearch, SchoolType};
use url::Url;

use crate::error::{ApiError, ApiResult};
use crate::models::ApiConfig;

/// Append `segments` to the base URL's path and set the `language` query.
fn endpoint(config: &ApiConfig, segments: &[&str], language: Language) -> ApiResult<Url> {
    let mut url = config.base_url.clone();
    url.path_segments_mut()
        .map_err(|()| ApiError::InvalidBaseUrl(config.base_url.to_string()))?
        .pop_if_empty()
        .extend(segments);
    url.query_pairs_mut()
        .append_pair("language", language.as_str());
    Ok(url)
}

fn append_page(url: &mut Url, page: PageRequest) {
    url.query_pairs_mut()
        .append_pair("page", &page.page.to_string())
        .append_pair("pageSize", &page.page_size.to_string());
}

fn append_type(url: &mut Url, school_type: Option<SchoolType>) {
    if let Some(school_type) = school_type {
        url.query_pairs_mut()
            .append_pair("type", school_type.as_str());
    }
}

/// `GET countries`
pub fn build_countries_url(config: &ApiConfig, language: Language) -> ApiResult<Url> {
    endpoint(config, &["countries"], language)
}

/// `GET countries/{id}`
pub fn build_country_url(config: &ApiConfig, id: &str, language: Language) -> ApiResult<Url> {
    endpoint(config, &["countries", id], language)
}

/// `GET countries/{id}/provinces`
pub fn build_provinces_url(
    config: &ApiConfig,
    country_id: &str,
    language: Language,
) -> ApiResult<Url> {
    endpoint(config, &["countries", country_id, "provinces"], language)
}

/// `GET provinces/{id}/schools`
pub fn build_schools_url(
    config: &ApiConfig,
    province_id: &str,
    school_type: Option<SchoolType>,
    language: Language,
    page: PageRequest,
) -> ApiResult<Url> {
    let mut url = endpoint(config, &["provinces", province_id, "schools"], language)?;
    append_type(&mut url, school_type);
    append_page(&mut url, page);
    Ok(url)
}

/// `GET schools/search`
pub fn build_search_url(
    config: &ApiConfig,
    search: &SchoolSearch,
    language: Language,
    page: PageRequest,
) -> ApiResult<Url> {
    let mut url = endpoint(config, &["schools", "search"], language)?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("query", search.query.trim());
        if let Some(country_id) = &search.filters.country_id {
            query.append_pair("countryId", country_id);
        }
        if let Some(province_id) = &search.filters.province_id {
            query.append_pair("provinceId", province_id);
        }
    }
    append_type(&mut url, search.filters.school_type);
    append_page(&mut url, page);
    Ok(url)
}

/// `GET schools/{id}`
pub fn build_school_url(config: &ApiConfig, id: &str, language: Language) -> ApiResult<Url> {
    endpoint(config, &["schools", id], language)
}
