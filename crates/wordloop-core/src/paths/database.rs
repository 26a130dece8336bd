//! Database path resolution.

use std::path::{Path, PathBuf};

use super::error::PathError;
use super::root::{data_root, ensure_dir};

/// Database file name.
pub const DATABASE_FILE: &str = "wordloop.db";

/// Get the path to the wordloop database file.
///
/// Returns `<data root>/data/wordloop.db`; the `data/` subdirectory is
/// created if it doesn't exist.
pub fn database_path() -> Result<PathBuf, PathError> {
    database_path_in(&data_root()?)
}

/// Database path under an explicit root.
pub fn database_path_in(root: &Path) -> Result<PathBuf, PathError> {
    let data_dir = root.join("data");
    ensure_dir(&data_dir)?;
    Ok(data_dir.join(DATABASE_FILE))
}
