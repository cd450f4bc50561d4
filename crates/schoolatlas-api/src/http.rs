//! Transport seam between the catalog client and the network.
//!
//! `CatalogClient` is generic over [`HttpBackend`] so unit tests can swap
//! in a canned backend. Only [`ReqwestBackend`] talks to a real server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT_LANGUAGE, AUTHORIZATION};
use schoolatlas_core::Language;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ApiError, ApiResult};
use crate::models::ApiConfig;

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// JSON GET transport. Crate-private; callers go through `CatalogRemotePort`.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// GET `url` with `Accept-Language` set from `language` and deserialize
    /// the JSON body.
    async fn get_json<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        language: Language,
    ) -> ApiResult<T>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Retries 5xx responses and network errors with exponential backoff,
/// `max_retries` times (none by default).
pub struct ReqwestBackend {
    client: reqwest::Client,
    max_retries: u8,
    retry_base_delay_ms: u64,
    auth_token: Option<String>,
}

impl ReqwestBackend {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            retry_base_delay_ms: config.retry_base_delay_ms,
            auth_token: config.token.clone(),
        })
    }

    fn build_request(&self, url: &Url, language: Language) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .get(url.as_str())
            .header(ACCEPT_LANGUAGE, language.iso_code());
        if let Some(ref token) = self.auth_token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        request
    }

    /// Fetch a URL, retrying transient errors.
    async fn fetch_with_retry(&self, url: &Url, language: Language) -> ApiResult<reqwest::Response> {
        let mut attempt: u8 = 0;
        loop {
            if attempt > 0 {
                let delay = Duration::from_millis(
                    self.retry_base_delay_ms
                        .saturating_mul(2u64.saturating_pow(u32::from(attempt) - 1)),
                );
                debug!(%url, attempt, ?delay, "Retrying catalog request");
                tokio::time::sleep(delay).await;
            }

            let error = match self.build_request(url, language).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }
                    let error = ApiError::RequestFailed {
                        status: status.as_u16(),
                        url: url.to_string(),
                    };
                    // 4xx is final
                    if !status.is_server_error() {
                        return Err(error);
                    }
                    error
                }
                Err(e) => e.into(),
            };

            if attempt >= self.max_retries {
                return Err(error);
            }
            warn!(%url, error = %error, "Transient catalog error");
            attempt += 1;
        }
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        language: Language,
    ) -> ApiResult<T> {
        let response = self.fetch_with_retry(url, language).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(Into::into)
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================
