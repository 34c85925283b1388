//! # API Error Type
//!
//! Unified error type for station commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Pickflow                               │
//! │                                                                         │
//! │  stdin: "confirm ??"                                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<Response, ApiError>                                      │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Picking Error? ── PickingError::InvalidPhase ─────┐             │  │
//! │  │         │                                          │             │  │
//! │  │         ▼                                          ▼             │  │
//! │  │  Storage Error? ── StoreError::Io ─────────────── ApiError ────► │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────► │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stdout: {"type":"error","code":"VALIDATION_ERROR","message":"..."}     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Start-up failures (bad config, unreadable order file) never reach the
//! command loop; they are [`CliError`] and end the process.

use std::path::PathBuf;

use pickflow_core::{PickingError, ValidationError};
use pickflow_store::StoreError;
use serde::Serialize;
use thiserror::Error;

/// Error returned from station commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INVALID_PHASE",
///   "message": "Cannot scan while awaiting storage confirmation"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The command line could not be understood
    UnknownCommand,

    /// Input validation failed
    ValidationError,

    /// The operation is not allowed in the current phase
    InvalidPhase,

    /// The session already ended
    SessionEnded,

    /// The filtered order set is empty
    NothingToPick,

    /// Preference file could not be read or written
    StorageError,

    /// Internal error
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn unknown_command(line: &str) -> Self {
        ApiError::new(
            ErrorCode::UnknownCommand,
            format!("Unknown command: {}", line),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<PickingError> for ApiError {
    fn from(err: PickingError) -> Self {
        let code = match &err {
            PickingError::InvalidPhase { .. } => ErrorCode::InvalidPhase,
            PickingError::SessionEnded { .. } => ErrorCode::SessionEnded,
            PickingError::NothingToPick => ErrorCode::NothingToPick,
            PickingError::Validation(_) => ErrorCode::ValidationError,
            PickingError::StaleAutoAdvance { .. } => {
                // Timers handle this themselves; reaching here is a bug.
                tracing::error!("Stale auto-advance surfaced as command error: {}", err);
                ErrorCode::Internal
            }
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        // Log the path details, show a short message
        tracing::error!("Preference storage failed: {}", err);
        ApiError::new(ErrorCode::StorageError, "Could not save preferences")
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Start-up Errors
// =============================================================================

/// Errors that stop the station before the command loop starts.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read order file {path}: {source}")]
    OrdersRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Order file {path} is not valid JSON: {source}")]
    OrdersParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot start picking: {0}")]
    Session(#[from] PickingError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results with CliError.
pub type CliResult<T> = Result<T, CliError>;
