//! # Auto-Advance Timer
//!
//! Completing an item hands out an [`AutoAdvance`] token. This module waits
//! the delay on a tokio task and then fires the token.
//!
//! ```text
//! scan ──► ItemComplete { token: 7, delay_ms: 1000 }
//!              │
//!              └── spawn ──► sleep(1000 ms) ──► fire_auto_advance(7)
//!                                                  │
//!                                 ┌────────────────┴───────────────┐
//!                                 ▼                                ▼
//!                        Ok ──► Response::Advanced       Stale ──► dropped
//!                               on the outbox            (picker moved on)
//! ```

use pickflow_core::{AutoAdvance, PickingError};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::commands::Response;
use crate::state::SessionState;

/// Schedules delayed auto-advances against the shared session.
#[derive(Clone)]
pub struct AutoAdvanceTimer {
    session: SessionState,
    outbox: UnboundedSender<Response>,
}

impl AutoAdvanceTimer {
    pub fn new(session: SessionState, outbox: UnboundedSender<Response>) -> Self {
        AutoAdvanceTimer { session, outbox }
    }

    /// Spawns the delayed advance. Must be called inside a tokio runtime.
    pub fn schedule(&self, auto_advance: AutoAdvance) -> JoinHandle<()> {
        let session = self.session.clone();
        let outbox = self.outbox.clone();

        debug!(
            token = auto_advance.token,
            delay_ms = auto_advance.delay_ms,
            "Auto-advance scheduled"
        );

        tokio::spawn(async move {
            tokio::time::sleep(auto_advance.delay()).await;

            let result = session.with_session_mut(|s| {
                s.fire_auto_advance(auto_advance.token)
                    .map(|advance| (advance, s.snapshot()))
            });

            match result {
                Ok((advance, snapshot)) => {
                    debug!(token = auto_advance.token, ?advance, "Auto-advance fired");
                    // The receiver is gone once the station shuts down.
                    let _ = outbox.send(Response::Advanced {
                        advance,
                        automatic: true,
                        snapshot,
                    });
                }
                Err(PickingError::StaleAutoAdvance { token, current }) => {
                    debug!(token, current, "Dropping stale auto-advance");
                }
                Err(PickingError::SessionEnded { .. }) => {
                    debug!(token = auto_advance.token, "Session ended before auto-advance");
                }
                Err(e) => warn!("Auto-advance failed: {}", e),
            }
        })
    }
}
