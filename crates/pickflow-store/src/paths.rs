//! Platform data directory resolution.

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::{StoreError, StoreResult};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "PICKFLOW_DATA_DIR";

/// Directory holding the preference files.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.pickflow.pickflow/`
/// - **Windows**: `%APPDATA%\pickflow\pickflow\data\`
/// - **Linux**: `~/.local/share/pickflow/`
///
/// ## Development Override
/// Set `PICKFLOW_DATA_DIR` to use a custom directory.
pub fn default_data_dir() -> StoreResult<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    ProjectDirs::from("com", "pickflow", "pickflow")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(StoreError::NoDataDir)
}
