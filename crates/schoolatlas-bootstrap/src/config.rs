//! Environment-driven configuration for the composition root.

use anyhow::{Context, Result};
use schoolatlas_core::Language;

/// Catalog API base URL override.
pub const API_URL_ENV: &str = "SCHOOLATLAS_API_URL";
/// Bearer token sent with every API request.
pub const API_TOKEN_ENV: &str = "SCHOOLATLAS_API_TOKEN";
/// Database file path override.
pub const DATABASE_ENV: &str = "SCHOOLATLAS_DB";
/// Initial catalog language, as a name (`SWAHILI`) or ISO code (`sw`).
pub const LANGUAGE_ENV: &str = "SCHOOLATLAS_LANGUAGE";

/// Bootstrap configuration.
///
/// `None` fields fall back to persisted settings, then built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapConfig {
    pub api_base_url: Option<String>,
    pub api_token: Option<String>,
    pub database_path: Option<String>,
    pub language: Option<Language>,
    /// Retry budget for transient API failures.
    pub max_retries: u8,
}

impl BootstrapConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let language = get(LANGUAGE_ENV)
            .map(|raw| raw.parse::<Language>())
            .transpose()
            .with_context(|| format!("Invalid {LANGUAGE_ENV}"))?;

        Ok(Self {
            api_base_url: get(API_URL_ENV),
            api_token: get(API_TOKEN_ENV),
            database_path: get(DATABASE_ENV),
            language,
            max_retries: 0,
        })
    }

    #[must_use]
    pub fn with_database_path(mut self, path: impl Into<String>) -> Self {
        self.database_path = Some(path.into());
        self
    }

    #[must_use]
    pub const fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u8) -> Self {
        self.max_retries = max_retries;
        self
    }
}
