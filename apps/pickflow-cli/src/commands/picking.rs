//! # Picking Commands
//!
//! ## Picking Dialog Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Picking Dialog                                       │
//! │                                                                         │
//! │  ┌──────────┐   scan    ┌──────────┐  last item  ┌──────────────────┐   │
//! │  │ Picking  │─────────►│ Item done│────────────►│ Storage slot?    │   │
//! │  │          │◄─────────│          │             │ (confirm <slot>) │   │
//! │  └──────────┘  auto /   └──────────┘             └────────┬─────────┘   │
//! │     │  ▲       next                                       │             │
//! │  filter│                                                  ▼             │
//! │     ▼  │ confirm                                   ┌──────────────┐     │
//! │  ┌──────────────────┐                              │  Completed   │     │
//! │  │ Storage slot?    │                              └──────────────┘     │
//! │  │ (filter changed) │                                                   │
//! │  └──────────────────┘      abort ──► Interrupted    quit ──► Closed     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use pickflow_core::{DeliveryFilter, PickingError, ScanOutcome};
use tracing::{debug, info};

use crate::commands::Response;
use crate::error::ApiError;
use crate::state::SessionState;
use crate::timer::AutoAdvanceTimer;

/// Handles a scanned bin code.
///
/// Completing an item schedules the auto-advance.
pub fn scan(
    session: &SessionState,
    timer: &AutoAdvanceTimer,
    code: &str,
) -> Result<Response, ApiError> {
    debug!(code, "scan command");

    let (outcome, snapshot) = session.with_session_mut(|s| {
        s.submit_scan(code).map(|outcome| (outcome, s.snapshot()))
    })?;

    match &outcome {
        ScanOutcome::ItemComplete { auto_advance, .. } => {
            timer.schedule(*auto_advance);
        }
        ScanOutcome::Mismatch {
            expected,
            submitted,
        } => {
            info!(?expected, submitted = %submitted, "Scanned bin does not match");
        }
        _ => {}
    }

    Ok(Response::Scan { outcome, snapshot })
}

/// Moves to the next item by hand.
pub fn next(session: &SessionState) -> Result<Response, ApiError> {
    debug!("next command");
    let (advance, snapshot) =
        session.with_session_mut(|s| s.advance().map(|advance| (advance, s.snapshot())))?;

    Ok(Response::Advanced {
        advance,
        automatic: false,
        snapshot,
    })
}

/// Moves back one item.
pub fn prev(session: &SessionState) -> Result<Response, ApiError> {
    debug!("prev command");
    let snapshot = session.with_session_mut(|s| s.retreat().map(|_| s.snapshot()))?;
    Ok(Response::Snapshot { snapshot })
}

/// Cycles to the item's next candidate bin.
pub fn switch_bin(session: &SessionState) -> Result<Response, ApiError> {
    debug!("bin command");
    let snapshot = session.with_session_mut(|s| s.switch_bin().map(|_| s.snapshot()))?;
    Ok(Response::Snapshot { snapshot })
}

/// Changes the delivery-date filter.
pub fn set_filter(
    session: &SessionState,
    value: &str,
    today: NaiveDate,
) -> Result<Response, ApiError> {
    let filter: DeliveryFilter = value.parse()?;
    debug!(%filter, "filter command");

    let snapshot = session.with_session_mut(|s| {
        let changed = s.set_filter(filter, today)?;
        if changed {
            info!(session_id = %s.id(), %filter, "Delivery filter changed");
        }
        Ok::<_, PickingError>(s.snapshot())
    })?;

    Ok(Response::Snapshot { snapshot })
}

/// Confirms the storage slot in the interstitial.
pub fn confirm_storage(session: &SessionState, slot: &str) -> Result<Response, ApiError> {
    debug!(slot, "confirm command");
    let (transition, snapshot) = session.with_session_mut(|s| {
        s.confirm_storage(slot)
            .map(|transition| (transition, s.snapshot()))
    })?;

    Ok(Response::Storage {
        transition,
        snapshot,
    })
}

/// Current state of the dialog.
pub fn status(session: &SessionState) -> Response {
    Response::Snapshot {
        snapshot: session.with_session(|s| s.snapshot()),
    }
}

/// Aborts mid-session.
pub fn abort(session: &SessionState) -> Result<Response, ApiError> {
    let outcome = session.with_session_mut(|s| s.interrupt())?;
    Ok(Response::Ended { outcome })
}

/// Dismisses the dialog. An already ended session just reports its outcome.
pub fn quit(session: &SessionState) -> Result<Response, ApiError> {
    let outcome = session.with_session_mut(|s| match s.outcome() {
        Some(outcome) => Ok(outcome.clone()),
        None => s.close(),
    })?;
    Ok(Response::Ended { outcome })
}
