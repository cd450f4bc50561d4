//! Catalog bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together.
//! All concrete implementations are instantiated here:
//! - Database pool and repositories (via schoolatlas-db)
//! - REST client (via schoolatlas-api)
//! - Catalog and settings services (via schoolatlas-core)

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use schoolatlas_api::{CatalogClientConfig, DefaultCatalogClient};
use schoolatlas_core::paths::resolve_database_path;
use schoolatlas_core::{CatalogRemotePort, CatalogService, Repos, Settings, SettingsService};
use schoolatlas_db::{CoreFactory, SqlitePool, setup_database};

use crate::config::BootstrapConfig;

/// Fully composed catalog context.
pub struct CatalogContext {
    /// Stale-while-revalidate access to the catalog.
    pub catalog: CatalogService,
    /// Persisted user preferences.
    pub settings: SettingsService,
    /// The cache database, for hosts that need to close it on shutdown.
    pub pool: SqlitePool,
    /// Where the cache lives on disk.
    pub database_path: PathBuf,
}

struct Store {
    pool: SqlitePool,
    repos: Repos,
    settings: SettingsService,
    stored: Settings,
    database_path: PathBuf,
}

async fn open_store(config: &BootstrapConfig) -> Result<Store> {
    let database_path = resolve_database_path(config.database_path.as_deref())?;
    tracing::info!(
        target: "schoolatlas.paths",
        database_path = %database_path.display(),
        "Catalog bootstrap resolved paths"
    );

    let pool = setup_database(&database_path).await?;
    let repos = CoreFactory::build_repos(pool.clone());
    let settings = SettingsService::new(Arc::clone(&repos.settings));
    let stored = settings.get().await?;

    Ok(Store {
        pool,
        repos,
        settings,
        stored,
        database_path,
    })
}

fn assemble(
    config: &BootstrapConfig,
    store: Store,
    remote: Arc<dyn CatalogRemotePort>,
) -> CatalogContext {
    let language = config
        .language
        .unwrap_or_else(|| store.stored.effective_language());
    tracing::debug!(%language, "Catalog language");

    CatalogContext {
        catalog: CatalogService::new(store.repos, remote, language),
        settings: store.settings,
        pool: store.pool,
        database_path: store.database_path,
    }
}

/// Bootstrap the catalog with the REST client.
///
/// The API base URL comes from the config, then the persisted settings,
/// then the built-in default. The same order applies to the language.
pub async fn build_context(config: BootstrapConfig) -> Result<CatalogContext> {
    let store = open_store(&config).await?;

    let base_url = config
        .api_base_url
        .clone()
        .unwrap_or_else(|| store.stored.effective_api_base_url().to_string());
    tracing::info!(%base_url, retries = config.max_retries, "Catalog API client");

    let client = DefaultCatalogClient::new(
        &CatalogClientConfig::new()
            .with_base_url(base_url)
            .with_optional_token(config.api_token.clone())
            .with_max_retries(config.max_retries),
    )?;

    Ok(assemble(&config, store, Arc::new(client)))
}

/// Bootstrap the catalog against a caller-supplied remote.
pub async fn build_context_with_remote(
    config: BootstrapConfig,
    remote: Arc<dyn CatalogRemotePort>,
) -> Result<CatalogContext> {
    let store = open_store(&config).await?;
    Ok(assemble(&config, store, remote))
}
