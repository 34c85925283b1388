//! # Error Types
//!
//! Domain-specific error types for pickflow-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pickflow-core errors (this file)                                      │
//! │  ├── PickingError     - Workflow operations in the wrong phase         │
//! │  └── ValidationError  - Orders / codes handed in from outside          │
//! │                                                                         │
//! │  pickflow-store errors (separate crate)                                │
//! │  └── StoreError       - Preference file failures                       │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── ApiError         - What the operator sees (serialized)            │
//! │                                                                         │
//! │  NOT AN ERROR: a scanned code that does not match the expected bin.    │
//! │  That is an ordinary `ScanOutcome::Mismatch`.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Picking Error
// =============================================================================

/// Errors raised by the picking workflow.
#[derive(Debug, Error)]
pub enum PickingError {
    /// The operation is not available in the current gate phase.
    ///
    /// ## When This Occurs
    /// - Scanning while the storage-slot interstitial is open
    /// - Confirming a storage slot while still picking
    #[error("Cannot {operation} while {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: String,
    },

    /// The session already produced its terminal outcome.
    #[error("Picking session already ended ({outcome})")]
    SessionEnded { outcome: String },

    /// There is no current item (the filtered order set is empty).
    #[error("Nothing to pick with the current delivery filter")]
    NothingToPick,

    /// A delayed auto-advance fired after the cursor had already moved.
    ///
    /// Hosts log this at debug level and drop it.
    #[error("Auto-advance token {token} is stale (current generation {current})")]
    StaleAutoAdvance { token: u64, current: u64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., invalid date, bad characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., the same order handed in twice).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// An item points at a bin the order does not carry.
    #[error("Item {item} references unknown bin {bin}")]
    UnknownBin { item: String, bin: String },

    /// Order is already picked, shipped or cancelled.
    #[error("Order {order} is {status} and cannot be picked")]
    NotPickable { order: String, status: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with PickingError.
pub type PickingResult<T> = Result<T, PickingError>;
