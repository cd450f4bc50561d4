//! `CatalogRemotePort` implementation for `CatalogClient`.
//!
//! Internal `ApiError`s are translated into the core `RemoteError` here so
//! no HTTP or JSON types cross the port boundary.

use async_trait::async_trait;
use schoolatlas_core::{
    CatalogRemotePort, Country, CountryDetails, Language, Page, PageRequest, Province,
    RemoteError, RemoteResult, School, SchoolSearch, SchoolType, WithTranslations,
};

use crate::client::CatalogClient;
use crate::error::ApiError;
use crate::http::HttpBackend;

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert internal `ApiError` to core `RemoteError`.
fn map_error(err: ApiError) -> RemoteError {
    match err {
        ApiError::RequestFailed { status, url } => match status {
            404 => RemoteError::NotFound {
                resource: resource_from_url(&url),
            },
            401 | 403 => RemoteError::Unauthorized,
            429 => RemoteError::RateLimited,
            _ => RemoteError::Network {
                message: format!("API request failed with status {status}: {url}"),
            },
        },
        ApiError::Network(e) => RemoteError::Network {
            message: e.to_string(),
        },
        ApiError::InvalidResponse { message } => RemoteError::InvalidResponse { message },
        ApiError::JsonParse(e) => RemoteError::InvalidResponse {
            message: e.to_string(),
        },
        ApiError::InvalidUrl(e) => RemoteError::Configuration {
            message: e.to_string(),
        },
        ApiError::InvalidBaseUrl(base) => RemoteError::Configuration {
            message: format!("unusable base URL: {base}"),
        },
    }
}

/// The last path segment of a request URL, without the query.
fn resource_from_url(url: &str) -> String {
    let path = url.split('?').next().unwrap_or(url);
    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(path)
        .to_string()
}

// ============================================================================
// Port Implementation
// ============================================================================

#[async_trait]
impl<B: HttpBackend> CatalogRemotePort for CatalogClient<B> {
    async fn list_countries(
        &self,
        language: Language,
    ) -> RemoteResult<Vec<WithTranslations<Country>>> {
        self.fetch_countries(language).await.map_err(map_error)
    }

    async fn get_country(&self, id: &str, language: Language) -> RemoteResult<CountryDetails> {
        self.fetch_country(id, language).await.map_err(map_error)
    }

    async fn list_provinces(
        &self,
        country_id: &str,
        language: Language,
    ) -> RemoteResult<Vec<WithTranslations<Province>>> {
        self.fetch_provinces(country_id, language)
            .await
            .map_err(map_error)
    }

    async fn list_schools(
        &self,
        province_id: &str,
        school_type: Option<SchoolType>,
        language: Language,
        page: PageRequest,
    ) -> RemoteResult<Page<WithTranslations<School>>> {
        self.fetch_schools(province_id, school_type, language, page)
            .await
            .map_err(map_error)
    }

    async fn search_schools(
        &self,
        search: &SchoolSearch,
        language: Language,
        page: PageRequest,
    ) -> RemoteResult<Page<WithTranslations<School>>> {
        self.fetch_search(search, language, page)
            .await
            .map_err(map_error)
    }

    async fn get_school(
        &self,
        id: &str,
        language: Language,
    ) -> RemoteResult<WithTranslations<School>> {
        self.fetch_school(id, language).await.map_err(map_error)
    }
}
