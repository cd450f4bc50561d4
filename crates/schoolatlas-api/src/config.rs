//! Client settings exposed to hosts.
//!
//! Values are kept as given; `ApiConfig::from_public` parses the base URL
//! and appends a trailing `/` so endpoint paths like `countries/ke` extend
//! the version prefix instead of replacing it.

use std::time::Duration;

use schoolatlas_core::DEFAULT_API_BASE_URL;

/// Where the catalog lives and how hard to try reaching it.
///
/// ```
/// use schoolatlas_api::CatalogClientConfig;
/// use std::time::Duration;
///
/// let config = CatalogClientConfig::new()
///     .with_base_url("https://staging.africanschools.com/v1")
///     .with_timeout(Duration::from_secs(10))
///     .with_max_retries(2);
/// ```
#[derive(Debug, Clone)]
pub struct CatalogClientConfig {
    pub(crate) base_url: String,
    pub(crate) user_agent: String,
    pub(crate) timeout: Duration,
    /// Sent as a bearer token when present.
    pub(crate) token: Option<String>,
    pub(crate) max_retries: u8,
    /// First backoff step; each further retry doubles it.
    pub(crate) retry_base_delay: Duration,
}

impl Default for CatalogClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            user_agent: concat!("schoolatlas/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            token: None,
            max_retries: 0,
            retry_base_delay: Duration::from_millis(500),
        }
    }
}

impl CatalogClientConfig {
    /// Production catalog, no token, no retries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Point at another deployment, e.g. a staging server or local mock.
    /// A missing trailing `/` is tolerated.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Whole-request deadline (30 s unless set).
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Convenience for tokens read from the environment.
    #[must_use]
    pub fn with_optional_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Extra attempts after a 5xx or network failure. 4xx answers are
    /// never retried. With the default of 0 a failed fetch surfaces at once
    /// and screens fall back to cached data.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }
}
