#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unsafe_code)]

mod config;
mod context;
mod logging;

pub use config::{
    API_TOKEN_ENV, API_URL_ENV, BootstrapConfig, DATABASE_ENV, LANGUAGE_ENV,
};
pub use context::{CatalogContext, build_context, build_context_with_remote};
pub use logging::init_tracing;
