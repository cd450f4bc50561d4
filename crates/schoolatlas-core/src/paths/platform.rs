//! Data root resolution and user path normalization.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::PathError;

/// Environment variable overriding the data root.
pub const DATA_DIR_ENV: &str = "SCHOOLATLAS_DATA_DIR";

/// Get the root directory for application data.
///
/// Resolution order:
/// 1. `SCHOOLATLAS_DATA_DIR` environment variable
/// 2. System data directory (e.g., `~/.local/share/schoolatlas`)
pub fn data_root() -> Result<PathBuf, PathError> {
    data_root_from(env::var(DATA_DIR_ENV).ok().as_deref())
}

/// [`data_root`] with the override passed explicitly.
pub fn data_root_from(override_dir: Option<&str>) -> Result<PathBuf, PathError> {
    let root = match override_dir.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => normalize_user_path(raw)?,
        None => dirs::data_local_dir()
            .ok_or(PathError::NoDataDir)?
            .join("schoolatlas"),
    };

    ensure_dir(&root)?;
    Ok(root)
}

pub(super) fn ensure_dir(dir: &Path) -> Result<(), PathError> {
    if dir.exists() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|source| PathError::CreateFailed {
        path: dir.to_path_buf(),
        source,
    })
}

/// Normalize a user-provided path, expanding `~` and making it absolute.
pub fn normalize_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathError::EmptyPath);
    }

    let expanded = if trimmed.starts_with("~/") || trimmed == "~" {
        let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
        if trimmed == "~" {
            home
        } else {
            home.join(trimmed.trim_start_matches("~/"))
        }
    } else {
        PathBuf::from(trimmed)
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(expanded))
            .map_err(PathError::CurrentDir)
    }
}
