//! # Scan Handler
//!
//! Compares a submitted bin code with the bin the picker was sent to.
//!
//! ```text
//!  submitted code
//!        │
//!        ├── empty ───────────────► Unverified  (counts as a pick)
//!        ├── == expected bin code ► Matched     (counts as a pick)
//!        └── anything else ───────► Mismatch    (nothing changes)
//! ```
//!
//! A mismatch is an ordinary outcome shown to the picker, never an error.
//! In every case the front end clears its input field afterwards.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::session::AutoAdvance;
use crate::types::BinLocation;

/// Verdict on a single submitted code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanCheck {
    /// Code equals the expected bin code.
    Matched,
    /// Nothing was scanned; the picker proceeds without verification.
    Unverified,
    /// Code does not belong to the expected bin.
    Mismatch {
        expected: Option<String>,
        submitted: String,
    },
}

impl ScanCheck {
    /// Whether the submission counts as a picked unit.
    pub fn counts_as_pick(&self) -> bool {
        matches!(self, ScanCheck::Matched | ScanCheck::Unverified)
    }
}

/// Checks a submitted code against the expected bin.
///
/// Both sides are compared after trimming; the comparison is exact otherwise,
/// since bin labels are printed in a fixed case.
pub fn check_scan(submitted: &str, expected: Option<&BinLocation>) -> ScanCheck {
    let submitted = submitted.trim();

    if submitted.is_empty() {
        return ScanCheck::Unverified;
    }

    match expected {
        Some(bin) if bin.code.trim() == submitted => ScanCheck::Matched,
        _ => ScanCheck::Mismatch {
            expected: expected.map(|bin| bin.code.clone()),
            submitted: submitted.to_string(),
        },
    }
}

/// What a scan submission did to the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum ScanOutcome {
    /// One unit counted; the item still needs more.
    Picked {
        picked: u32,
        total: u32,
        verified: bool,
    },
    /// The item reached its quantity. The host fires the auto-advance after
    /// the given delay.
    ItemComplete {
        picked: u32,
        verified: bool,
        auto_advance: AutoAdvance,
    },
    /// The item was already complete; waiting for the auto-advance.
    AlreadyComplete,
    /// Wrong bin. Nothing changed.
    Mismatch {
        expected: Option<String>,
        submitted: String,
    },
}
