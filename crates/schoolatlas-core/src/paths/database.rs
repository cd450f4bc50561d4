//! Database path resolution.

use std::path::{Path, PathBuf};

use super::error::PathError;
use super::platform::{data_root, ensure_dir, normalize_user_path};

/// File name of the catalog cache database.
pub const DATABASE_FILE: &str = "schoolatlas.db";

/// Get the path to the catalog cache database.
///
/// Returns `data/schoolatlas.db` under the data root, creating `data/` if
/// needed.
pub fn database_path() -> Result<PathBuf, PathError> {
    database_path_in(&data_root()?)
}

/// Database path under an explicit data root.
pub fn database_path_in(root: &Path) -> Result<PathBuf, PathError> {
    let data_dir = root.join("data");
    ensure_dir(&data_dir)?;
    Ok(data_dir.join(DATABASE_FILE))
}

/// Resolve a user-supplied database path, or the default when none is given.
///
/// The parent directory of an explicit path is created if needed.
pub fn resolve_database_path(raw: Option<&str>) -> Result<PathBuf, PathError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => {
            let path = normalize_user_path(raw)?;
            if let Some(parent) = path.parent() {
                ensure_dir(parent)?;
            }
            Ok(path)
        }
        None => database_path(),
    }
}
