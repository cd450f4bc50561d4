//! Persisted user preferences.
//!
//! Every write goes through [`validate_settings`]; an invalid update leaves
//! the stored blob untouched.

use std::sync::Arc;

use tracing::debug;

use crate::domain::Language;
use crate::ports::{CoreError, SettingsRepository};
use crate::settings::{Settings, SettingsUpdate, validate_settings};

/// Reads and writes the single settings record.
#[derive(Clone)]
pub struct SettingsService {
    repo: Arc<dyn SettingsRepository>,
}

impl SettingsService {
    pub fn new(repo: Arc<dyn SettingsRepository>) -> Self {
        Self { repo }
    }

    /// Stored settings, or defaults when nothing was saved yet.
    pub async fn get(&self) -> Result<Settings, CoreError> {
        Ok(self.repo.load().await?)
    }

    /// Merge `update` into the stored settings and persist the result.
    pub async fn update(&self, update: SettingsUpdate) -> Result<Settings, CoreError> {
        let mut settings = self.repo.load().await?;
        settings.merge(&update);
        validate_settings(&settings)?;
        self.repo.save(&settings).await?;
        debug!(?update, "Settings updated");
        Ok(settings)
    }

    /// Replace the stored settings wholesale.
    pub async fn save(&self, settings: &Settings) -> Result<(), CoreError> {
        validate_settings(settings)?;
        Ok(self.repo.save(settings).await?)
    }

    /// Restore defaults, dropping saved filters and sort orders.
    pub async fn reset(&self) -> Result<Settings, CoreError> {
        let defaults = Settings::with_defaults();
        self.repo.save(&defaults).await?;
        Ok(defaults)
    }

    /// Language to request catalog content in.
    pub async fn language(&self) -> Result<Language, CoreError> {
        Ok(self.get().await?.effective_language())
    }

    pub async fn set_language(&self, language: Language) -> Result<Settings, CoreError> {
        self.update(SettingsUpdate {
            language: Some(Some(language)),
            ..Default::default()
        })
        .await
    }

    /// Page size for paginated school lists.
    pub async fn page_size(&self) -> Result<u32, CoreError> {
        Ok(self.get().await?.effective_page_size())
    }
}
