//! Errors from data directory and database path resolution.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathError {
    /// `~` was used but the platform reports no home directory.
    #[error("Cannot expand `~`: no home directory")]
    NoHomeDir,

    /// No platform data directory and no `SCHOOLATLAS_DATA_DIR` override.
    #[error("No data directory available; set SCHOOLATLAS_DATA_DIR")]
    NoDataDir,

    #[error("Failed to create {}: {source}", path.display())]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Path cannot be empty")]
    EmptyPath,

    /// A relative path could not be anchored to the working directory.
    #[error("Cannot resolve relative path: {0}")]
    CurrentDir(#[source] io::Error),
}
