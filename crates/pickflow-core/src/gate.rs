//! # Completion Gate
//!
//! Asks the picker for a storage slot before the session may finish, and
//! again whenever the delivery-date filter changes mid-session.
//!
//! ## State Transitions
//! ```text
//! ┌──────────┐  request_storage(PickingFinished)  ┌───────────────────────┐
//! │ Picking  │ ─────────────────────────────────► │ AwaitingStorage       │
//! │          │  request_storage(FilterChanged)    │   (trigger)           │
//! │          │ ─────────────────────────────────► │                       │
//! └──────────┘                                    └──────────┬────────────┘
//!      ▲                                                     │ confirm_storage(slot)
//!      │            trigger == FilterChanged                 │
//!      └─────────────────────────────────────────────────────┤
//!                                                            │ trigger == PickingFinished
//!                                                            ▼
//!                                                     ┌────────────┐
//!                                                     │  Complete  │
//!                                                     └────────────┘
//! ```
//!
//! Both triggers lead into the same interstitial but are kept as distinct,
//! named transitions so the confirmation knows where to go next.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{PickingError, PickingResult};
use crate::validation::validate_storage_slot;

/// Why the storage interstitial was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum StorageTrigger {
    /// Every item of every selected order has been worked through.
    PickingFinished,
    /// The delivery-date filter changed; a new slot is needed for the new set.
    FilterChanged,
}

/// Phase of the completion gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(tag = "phase", content = "trigger", rename_all = "snake_case")]
#[ts(export)]
pub enum GatePhase {
    #[default]
    Picking,
    AwaitingStorage(StorageTrigger),
    Complete,
}

impl fmt::Display for GatePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatePhase::Picking => write!(f, "picking"),
            GatePhase::AwaitingStorage(_) => write!(f, "awaiting storage confirmation"),
            GatePhase::Complete => write!(f, "complete"),
        }
    }
}

/// Result of confirming a storage slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum GateTransition {
    /// Picking continues on the newly filtered set.
    Resumed,
    /// The session is done.
    Completed,
}

/// The storage-confirmation step in front of completion.
#[derive(Debug, Clone, Default)]
pub struct CompletionGate {
    phase: GatePhase,
    storage_slot: Option<String>,
}

impl CompletionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GatePhase {
        self.phase
    }

    pub fn is_picking(&self) -> bool {
        self.phase == GatePhase::Picking
    }

    /// The last confirmed storage slot.
    pub fn storage_slot(&self) -> Option<&str> {
        self.storage_slot.as_deref()
    }

    /// Opens the storage interstitial.
    ///
    /// A pending `PickingFinished` is never replaced by `FilterChanged`.
    pub fn request_storage(&mut self, trigger: StorageTrigger) -> PickingResult<()> {
        match (self.phase, trigger) {
            (GatePhase::Picking, _)
            | (GatePhase::AwaitingStorage(StorageTrigger::FilterChanged), _) => {
                self.phase = GatePhase::AwaitingStorage(trigger);
                Ok(())
            }
            (GatePhase::AwaitingStorage(StorageTrigger::PickingFinished), _) => Ok(()),
            (GatePhase::Complete, _) => Err(PickingError::InvalidPhase {
                operation: "request a storage slot",
                phase: self.phase.to_string(),
            }),
        }
    }

    /// Confirms the storage slot and leaves the interstitial.
    pub fn confirm_storage(&mut self, slot: &str) -> PickingResult<GateTransition> {
        let GatePhase::AwaitingStorage(trigger) = self.phase else {
            return Err(PickingError::InvalidPhase {
                operation: "confirm a storage slot",
                phase: self.phase.to_string(),
            });
        };

        let slot = validate_storage_slot(slot)?;
        self.storage_slot = Some(slot);

        match trigger {
            StorageTrigger::FilterChanged => {
                self.phase = GatePhase::Picking;
                Ok(GateTransition::Resumed)
            }
            StorageTrigger::PickingFinished => {
                self.phase = GatePhase::Complete;
                Ok(GateTransition::Completed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finished_then_confirmed_completes() {
        let mut gate = CompletionGate::new();
        gate.request_storage(StorageTrigger::PickingFinished).unwrap();
        assert_eq!(
            gate.phase(),
            GatePhase::AwaitingStorage(StorageTrigger::PickingFinished)
        );

        assert_eq!(gate.confirm_storage("WA-03").unwrap(), GateTransition::Completed);
        assert_eq!(gate.phase(), GatePhase::Complete);
        assert_eq!(gate.storage_slot(), Some("WA-03"));
    }

    #[test]
    fn test_filter_change_resumes_picking() {
        let mut gate = CompletionGate::new();
        gate.request_storage(StorageTrigger::FilterChanged).unwrap();
        assert_eq!(gate.confirm_storage("WA-04").unwrap(), GateTransition::Resumed);
        assert!(gate.is_picking());
    }

    #[test]
    fn test_filter_change_does_not_downgrade_finished() {
        let mut gate = CompletionGate::new();
        gate.request_storage(StorageTrigger::PickingFinished).unwrap();
        gate.request_storage(StorageTrigger::FilterChanged).unwrap();
        assert_eq!(
            gate.phase(),
            GatePhase::AwaitingStorage(StorageTrigger::PickingFinished)
        );
    }

    #[test]
    fn test_confirm_outside_interstitial_is_rejected() {
        let mut gate = CompletionGate::new();
        assert!(matches!(
            gate.confirm_storage("WA-03"),
            Err(PickingError::InvalidPhase { .. })
        ));
    }

    #[test]
    fn test_invalid_slot_keeps_interstitial_open() {
        let mut gate = CompletionGate::new();
        gate.request_storage(StorageTrigger::PickingFinished).unwrap();
        assert!(gate.confirm_storage("   ").is_err());
        assert!(matches!(gate.phase(), GatePhase::AwaitingStorage(_)));
    }

    #[test]
    fn test_phase_serializes_with_trigger() {
        let json =
            serde_json::to_string(&GatePhase::AwaitingStorage(StorageTrigger::FilterChanged))
                .unwrap();
        assert_eq!(json, r#"{"phase":"awaiting_storage","trigger":"filter_changed"}"#);
    }
}
