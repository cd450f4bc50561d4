#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// DefaultCatalogClient is meant to be used through the CatalogRemotePort
// trait, not its internal generic structure
#![allow(private_interfaces)]

mod client;
mod config;
mod error;
mod http;
mod models;
mod parsing;
mod port;
mod url;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::DefaultCatalogClient;

// Configuration
pub use config::CatalogClientConfig;

// Construction errors
pub use error::ApiError;
