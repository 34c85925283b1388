//! # Validation Module
//!
//! Checks applied to everything that enters a picking session from outside:
//! the order list, scanned codes and storage slots typed by the picker.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Backend                                                      │
//! │  └── Orders are produced by the order service                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Session construction                                         │
//! │  └── THIS MODULE: quantities, bin references, unique order ids         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Scan / storage input                                         │
//! │  └── THIS MODULE: trimming and length limits                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pickflow_core::validation::{validate_scan_code, validate_storage_slot};
//!
//! assert_eq!(validate_scan_code("  A-01-03 ").unwrap(), "A-01-03");
//! assert!(validate_storage_slot("").is_err());
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::Order;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_SCAN_CODE_LEN: usize = 100;
const MAX_STORAGE_SLOT_LEN: usize = 50;

// =============================================================================
// Order Validators
// =============================================================================

/// Validates one order handed to a picking session.
///
/// ## Rules
/// - Order id must not be empty
/// - Status must still allow picking (open or in picking)
/// - Bin codes at most 100 characters
/// - Every line quantity must be between 1 and [`MAX_ITEM_QUANTITY`]
/// - Every bin id on a line must resolve to a bin on the order
pub fn validate_order(order: &Order) -> ValidationResult<()> {
    if order.id.as_str().trim().is_empty() {
        return Err(ValidationError::Required {
            field: "order id".to_string(),
        });
    }

    if !order.status.is_pickable() {
        return Err(ValidationError::NotPickable {
            order: order.id.to_string(),
            status: order.status.to_string(),
        });
    }

    if order
        .bin_locations
        .iter()
        .any(|bin| bin.code.trim().chars().count() > MAX_SCAN_CODE_LEN)
    {
        return Err(ValidationError::TooLong {
            field: format!("bin code on order {}", order.id),
            max: MAX_SCAN_CODE_LEN,
        });
    }

    for item in &order.items {
        if item.quantity == 0 || item.quantity > MAX_ITEM_QUANTITY {
            return Err(ValidationError::OutOfRange {
                field: format!("quantity of item {}", item.id),
                min: 1,
                max: i64::from(MAX_ITEM_QUANTITY),
            });
        }

        if let Some(missing) = item.bin_ids.iter().find(|id| order.bin(id).is_none()) {
            return Err(ValidationError::UnknownBin {
                item: item.id.to_string(),
                bin: missing.to_string(),
            });
        }
    }

    Ok(())
}

/// Validates the full order list: each order valid, ids unique.
pub fn validate_orders(orders: &[Order]) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(orders.len());

    for order in orders {
        validate_order(order)?;

        if !seen.insert(order.id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "order id".to_string(),
                value: order.id.to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Input Validators
// =============================================================================

/// Normalises a submitted scan code.
///
/// Empty is allowed: it means "proceed without verification".
pub fn validate_scan_code(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.chars().count() > MAX_SCAN_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "scan code".to_string(),
            max: MAX_SCAN_CODE_LEN,
        });
    }

    Ok(code.to_string())
}

/// Validates the storage slot the picked goods were put into.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Letters, digits and `- _ . /` only
pub fn validate_storage_slot(slot: &str) -> ValidationResult<String> {
    let slot = slot.trim();

    if slot.is_empty() {
        return Err(ValidationError::Required {
            field: "storage slot".to_string(),
        });
    }

    if slot.chars().count() > MAX_STORAGE_SLOT_LEN {
        return Err(ValidationError::TooLong {
            field: "storage slot".to_string(),
            max: MAX_STORAGE_SLOT_LEN,
        });
    }

    if !slot
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '/'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "storage slot".to_string(),
            reason: "must contain only letters, numbers, and - _ . /".to_string(),
        });
    }

    Ok(slot.to_string())
}
