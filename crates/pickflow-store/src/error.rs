//! # Storage Error Types
//!
//! ## Error Flow
//! ```text
//! std::io::Error / serde_json::Error
//!       │
//!       ▼
//! StoreError (this module) ← adds the file path
//!       │
//!       ▼
//! ApiError (in the CLI) ← shown to the operator
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Preference storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the file failed.
    ///
    /// ## When This Occurs
    /// - Directory not writable
    /// - Disk full
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but does not hold the expected JSON.
    #[error("Corrupt preference file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No home directory to derive the data directory from.
    #[error("Could not determine the data directory; set PICKFLOW_DATA_DIR")]
    NoDataDir,
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        StoreError::Json {
            path: path.into(),
            source,
        }
    }
}

/// Convenience type alias for Results with StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mentions_path() {
        let err = StoreError::io(
            "/tmp/prefs/favorites.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(
            err.to_string(),
            "I/O error on /tmp/prefs/favorites.json: denied"
        );
    }
}
