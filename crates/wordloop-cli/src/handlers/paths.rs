//! Paths command handler.
//!
//! Displays the resolved data directory and database file.

use anyhow::Result;

use crate::bootstrap::CliConfig;

/// Print resolved paths in `key = value` format.
///
/// Does not need a bootstrapped context, so it still works when the
/// database cannot be opened.
pub fn execute(config: &CliConfig) -> Result<()> {
    let db_path = config.database_path()?;
    let data_dir = db_path
        .parent()
        .and_then(|data| data.parent())
        .map_or_else(|| "--".to_string(), |root| root.display().to_string());

    println!("data_dir = {data_dir}");
    println!("database = {}", db_path.display());
    Ok(())
}
