//! Catalog client for the African schools REST API.
//!
//! Endpoints are grouped by resource: `countries` covers countries and
//! provinces, `schools` covers listing, search and detail.

mod countries;
mod schools;

use crate::config::CatalogClientConfig;
use crate::error::ApiResult;
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::ApiConfig;

/// Default catalog client using the reqwest HTTP backend.
pub type DefaultCatalogClient = CatalogClient<ReqwestBackend>;

/// Client for the catalog REST API.
///
/// Generic over the HTTP backend so tests can swap in a fake. External
/// code should use `DefaultCatalogClient::new()` and talk to it through
/// `CatalogRemotePort`.
pub struct CatalogClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) config: ApiConfig,
}

impl DefaultCatalogClient {
    /// Create a new client with the given configuration.
    ///
    /// Fails when the base URL does not parse or the HTTP client cannot be
    /// built.
    pub fn new(config: &CatalogClientConfig) -> ApiResult<Self> {
        let internal_config = ApiConfig::from_public(config)?;
        let backend = ReqwestBackend::new(&internal_config)?;
        Ok(Self {
            backend,
            config: internal_config,
        })
    }
}

impl<B: HttpBackend> CatalogClient<B> {
    /// Create a new client with a custom backend.
    #[cfg(test)]
    pub(crate) const fn with_backend(config: ApiConfig, backend: B) -> Self {
        Self { backend, config }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub fn test_config() -> ApiConfig {
        ApiConfig::from_public(&CatalogClientConfig::new()).unwrap()
    }

    pub fn country_json(id: &str, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "code": id.to_uppercase(),
            "flagUrl": format!("https://flags.example/{id}.png"),
            "totalSchools": 3,
            "translations": {
                "FRENCH": {"name": format!("{name} (fr)")}
            }
        })
    }

    pub fn school_json(id: &str, province_id: &str, school_type: &str) -> serde_json::Value {
        json!({
            "id": id,
            "provinceId": province_id,
            "name": format!("School {id}"),
            "type": school_type,
            "rating": 4.1,
            "translations": {}
        })
    }

    #[test]
    fn test_default_client_creation() {
        assert!(DefaultCatalogClient::new(&CatalogClientConfig::new()).is_ok());
    }

    #[test]
    fn test_client_rejects_bad_base_url() {
        let config = CatalogClientConfig::new().with_base_url("::nope::");
        assert!(DefaultCatalogClient::new(&config).is_err());
    }
}
