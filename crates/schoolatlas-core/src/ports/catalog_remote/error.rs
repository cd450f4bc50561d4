//! Error types for remote catalog operations.

use thiserror::Error;

/// Errors from remote catalog operations.
///
/// These are domain-level errors that consumers can handle.
/// Implementation-specific errors (HTTP, JSON) are mapped to these.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The requested resource does not exist remotely.
    #[error("Not found: {resource}")]
    NotFound {
        /// What was requested (path or id)
        resource: String,
    },

    /// The API rejected the credentials.
    #[error("Unauthorized: check the API token")]
    Unauthorized,

    /// API rate limit exceeded.
    #[error("Rate limit exceeded, try again later")]
    RateLimited,

    /// Network or connectivity error.
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error
        message: String,
    },

    /// Invalid response from the API.
    #[error("Invalid API response: {message}")]
    InvalidResponse {
        /// What was invalid
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Configuration {
        /// What's wrong with the configuration
        message: String,
    },
}

/// Result type alias for remote catalog operations.
pub type RemoteResult<T> = Result<T, RemoteError>;
