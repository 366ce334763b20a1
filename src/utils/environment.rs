use std::path::PathBuf;

use anyhow::{Context, Result};

/// Directory name used under the platform data directory
pub const APP_DIR_NAME: &str = "query-history";

/// Resolve the directory holding the history snapshot and log file.
///
/// An explicit directory (from `--data-dir` or `QUERY_HISTORY_DIR`) wins;
/// otherwise the platform data directory is used:
/// - macOS: `~/Library/Application Support/query-history/`
/// - Linux: `~/.local/share/query-history/`
/// - Windows: `%APPDATA%\query-history\`
pub fn get_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    let base = dirs::data_dir().context("Failed to get platform data directory")?;
    Ok(base.join(APP_DIR_NAME))
}
