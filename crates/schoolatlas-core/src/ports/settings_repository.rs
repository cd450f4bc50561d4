//! Settings repository trait definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::settings::Settings;

/// Repository for application settings persistence.
///
/// Settings are stored and retrieved as a whole; the implementation handles
/// serialization.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Load application settings.
    ///
    /// Returns default settings if none are stored.
    async fn load(&self) -> Result<Settings, RepositoryError>;

    /// Save application settings.
    async fn save(&self, settings: &Settings) -> Result<(), RepositoryError>;
}
