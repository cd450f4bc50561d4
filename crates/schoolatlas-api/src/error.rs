//! Internal error types for catalog API operations.
//!
//! These errors are internal to `schoolatlas-api` and are mapped to
//! `RemoteError` at the port boundary.

use thiserror::Error;

/// Result type alias for catalog API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors related to catalog API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// API request failed with an HTTP error status.
    #[error("Catalog API request failed with status {status}: {url}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// API returned an invalid or unexpected response.
    #[error("Invalid response from catalog API: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// The base URL cannot have path segments appended (e.g. `mailto:`).
    #[error("Unusable base URL: {0}")]
    InvalidBaseUrl(String),

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}
