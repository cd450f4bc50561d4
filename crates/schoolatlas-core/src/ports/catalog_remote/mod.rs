//! Remote school catalog port definitions.
//!
//! This module defines the port trait and DTOs for the REST catalog.
//! The actual implementation lives in `schoolatlas-api`.

mod client;
mod error;
mod types;

pub use client::CatalogRemotePort;
pub use error::{RemoteError, RemoteResult};
pub use types::{CountryDetails, WithTranslations};
