//! Session event sink that writes to the log.

use pickflow_core::{GatePhase, PickingEvents, Progress};
use tracing::{info, Span};

/// Logs every session callback inside the session's span.
///
/// The session id is only known once the session exists, so the span is
/// created with an empty `session_id` field that the caller records later.
pub struct TracingEvents {
    span: Span,
}

impl TracingEvents {
    pub fn new(span: Span) -> Self {
        TracingEvents { span }
    }
}

impl PickingEvents for TracingEvents {
    fn on_phase_change(&self, phase: GatePhase) {
        let _entered = self.span.enter();
        info!(%phase, "Picking phase changed");
    }

    fn on_complete(&self, storage_slot: &str, progress: &Progress) {
        let _entered = self.span.enter();
        info!(
            storage_slot,
            items = progress.items_done,
            quantity = progress.quantity_picked,
            "Picking completed"
        );
    }

    fn on_interrupt(&self, progress: &Progress) {
        let _entered = self.span.enter();
        info!(
            items_done = progress.items_done,
            items_total = progress.items_total,
            "Picking interrupted"
        );
    }

    fn on_close(&self) {
        let _entered = self.span.enter();
        info!("Picking dialog closed");
    }
}
