//! Internal API types for the catalog REST API.
//!
//! These types are internal to `schoolatlas-api` and are not exposed to
//! consumers. External consumers get core domain types through the
//! `CatalogRemotePort` implementation.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::config::CatalogClientConfig;
use crate::error::ApiResult;

// ============================================================================
// Configuration (used internally, see config.rs for public config)
// ============================================================================

/// Internal configuration for the catalog client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL, always ending in `/` so endpoint paths extend it
    pub base_url: Url,
    pub token: Option<String>,
    pub user_agent: String,
    pub timeout: Duration,
    pub max_retries: u8,
    /// Base delay in milliseconds for exponential backoff
    pub retry_base_delay_ms: u64,
}

impl ApiConfig {
    pub fn from_public(config: &CatalogClientConfig) -> ApiResult<Self> {
        let mut base_url = Url::parse(config.base_url.trim())?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            token: config.token.clone(),
            user_agent: config.user_agent.clone(),
            timeout: config.timeout,
            max_retries: config.max_retries,
            retry_base_delay_ms: u64::try_from(config.retry_base_delay.as_millis())
                .unwrap_or(u64::MAX),
        })
    }
}

// ============================================================================
// Wire types
// ============================================================================

/// One entry of an entity's `translations` map.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTranslation {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub additional_info: HashMap<String, String>,
}

/// Translations keyed by upper-case language name (`"SWAHILI"`).
pub type ApiTranslations = HashMap<String, ApiTranslation>;

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct ApiCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCountry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub flag_url: String,
    #[serde(default)]
    pub total_schools: u32,
    #[serde(default)]
    pub translations: ApiTranslations,
}

/// `GET /countries/{id}`: the country plus its provinces.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCountryDetails {
    #[serde(flatten)]
    pub country: ApiCountry,
    #[serde(default)]
    pub provinces: Vec<ApiProvince>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiProvince {
    pub id: String,
    pub country_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub province_type: String,
    #[serde(default)]
    pub total_schools: u32,
    #[serde(default)]
    pub coordinates: ApiCoordinates,
    #[serde(default)]
    pub translations: ApiTranslations,
}

/// A school as returned by list, search and detail endpoints.
///
/// List and search results carry a summary; detail fields default when
/// absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSchool {
    pub id: String,
    pub province_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub school_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub established_year: Option<i32>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub coordinates: ApiCoordinates,
    #[serde(default)]
    pub annual_fees: f64,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub acceptance_rate: Option<u8>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub facilities: Vec<String>,
    #[serde(default)]
    pub programs: Vec<String>,
    #[serde(default)]
    pub admission_requirements: Vec<String>,
    #[serde(default)]
    pub application_deadlines: HashMap<String, i64>,
    #[serde(default)]
    pub academic_calendar: HashMap<String, String>,
    #[serde(default)]
    pub translations: ApiTranslations,
}

/// Envelope of the paginated list endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPage<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total_items: u64,
    pub page: u32,
    pub total_pages: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_public_appends_trailing_slash() {
        let config = CatalogClientConfig::new().with_base_url("http://localhost:9000/v2");
        let api = ApiConfig::from_public(&config).unwrap();
        assert_eq!(api.base_url.as_str(), "http://localhost:9000/v2/");
        assert_eq!(api.retry_base_delay_ms, 500);
    }

    #[test]
    fn test_from_public_rejects_garbage() {
        let config = CatalogClientConfig::new().with_base_url("not a url");
        assert!(ApiConfig::from_public(&config).is_err());
    }

    #[test]
    fn test_school_summary_defaults_detail_fields() {
        let school: ApiSchool = serde_json::from_value(json!({
            "id": "s1",
            "provinceId": "lagos",
            "name": "Kings College",
            "type": "SECONDARY",
            "establishedYear": 1909,
            "coordinates": {"latitude": 6.45, "longitude": 3.4},
            "translations": {
                "YORUBA": {"name": "Kọlẹji Ọba", "additionalInfo": {}}
            }
        }))
        .unwrap();

        assert_eq!(school.established_year, Some(1909));
        assert!(school.facilities.is_empty());
        assert_eq!(school.rating, 0.0);
        assert_eq!(school.translations["YORUBA"].description, None);
    }

    #[test]
    fn test_country_details_flattens_country() {
        let details: ApiCountryDetails = serde_json::from_value(json!({
            "id": "gh",
            "name": "Ghana",
            "code": "GH",
            "flagUrl": "https://flags.example/gh.png",
            "totalSchools": 12,
            "translations": {},
            "provinces": [{
                "id": "acc",
                "countryId": "gh",
                "name": "Greater Accra",
                "type": "PROVINCE",
                "totalSchools": 4,
                "coordinates": {"latitude": 5.6, "longitude": -0.19},
                "translations": {}
            }]
        }))
        .unwrap();

        assert_eq!(details.country.id, "gh");
        assert_eq!(details.country.total_schools, 12);
        assert_eq!(details.provinces.len(), 1);
        assert_eq!(details.provinces[0].province_type, "PROVINCE");
    }

    #[test]
    fn test_page_envelope() {
        let page: ApiPage<serde_json::Value> = serde_json::from_value(json!({
            "items": [{}, {}],
            "totalItems": 42,
            "page": 2,
            "totalPages": 3
        }))
        .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_items, 42);
        assert_eq!((page.page, page.total_pages), (2, 3));
    }
}
