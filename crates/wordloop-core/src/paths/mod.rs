//! Path utilities for wordloop data directories.
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - Resolution is split into a pure step and a filesystem step so the
//!   pure part is testable without mutating the process environment

mod database;
mod error;
mod root;

pub use database::{DATABASE_FILE, database_path, database_path_in};
pub use error::PathError;
pub use root::{DATA_DIR_ENV, data_root, ensure_dir, resolve_data_root};
