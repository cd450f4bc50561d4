//! Path utilities for schoolatlas data directories.
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - No interactive/terminal I/O

mod database;
mod error;
mod platform;

pub use database::{DATABASE_FILE, database_path, database_path_in, resolve_database_path};
pub use error::PathError;
pub use platform::{DATA_DIR_ENV, data_root, data_root_from, normalize_user_path};
