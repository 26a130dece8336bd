//! Data root resolution.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::PathError;

/// Environment variable overriding the data root.
pub const DATA_DIR_ENV: &str = "WORDLOOP_DATA_DIR";

/// Directory name under the system data directory.
const APP_DIR_NAME: &str = "wordloop";

/// Get the root directory for application data (database).
///
/// Resolution order:
/// 1. `WORDLOOP_DATA_DIR` environment variable
/// 2. System data directory (e.g., `~/.local/share/wordloop`)
///
/// The directory is created if missing.
pub fn data_root() -> Result<PathBuf, PathError> {
    let root = resolve_data_root(env::var(DATA_DIR_ENV).ok().as_deref(), dirs::data_local_dir())?;
    ensure_dir(&root)?;
    Ok(root)
}

/// Pure resolution step of [`data_root`], without touching the filesystem.
pub fn resolve_data_root(
    override_dir: Option<&str>,
    system_data_dir: Option<PathBuf>,
) -> Result<PathBuf, PathError> {
    if let Some(raw) = override_dir {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PathError::EmptyPath);
        }
        return Ok(PathBuf::from(trimmed));
    }

    system_data_dir
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or(PathError::NoDataDir)
}

/// Create `path` (and parents) unless it already is a directory.
pub fn ensure_dir(path: &Path) -> Result<(), PathError> {
    if path.exists() {
        if path.is_dir() {
            return Ok(());
        }
        return Err(PathError::NotADirectory(path.to_path_buf()));
    }
    fs::create_dir_all(path).map_err(|e| PathError::CreateFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
