//! # Session State
//!
//! The picking session shared between the command loop and the
//! auto-advance timers.

use std::sync::{Arc, Mutex, PoisonError};

use pickflow_core::PickingSession;

/// Shared handle to the running picking session.
///
/// ## Thread Safety
/// `PickingSession` is a single actor. The `Mutex` only serialises the
/// command loop against timer tasks that fire a delayed auto-advance.
/// The lock is never held across an `.await`.
#[derive(Debug, Clone)]
pub struct SessionState {
    session: Arc<Mutex<PickingSession>>,
}

impl SessionState {
    pub fn new(session: PickingSession) -> Self {
        SessionState {
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// Executes a function with read access to the session.
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&PickingSession) -> R,
    {
        let session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&session)
    }

    /// Executes a function with write access to the session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let outcome = state.with_session_mut(|s| s.submit_scan("A-01"))?;
    /// ```
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut PickingSession) -> R,
    {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pickflow_core::{BinLocation, NoOpEvents, Order, OrderItem, SessionOptions};

    fn session() -> PickingSession {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let order = Order::new("A", "C-1", "Acme", today)
            .with_bin(BinLocation::new("b1", "A-01", "Aisle 1"))
            .with_item(OrderItem::new("i1", "ART-1", 2).with_bins(["b1"]));
        PickingSession::new(vec![order], SessionOptions::new(today), Box::new(NoOpEvents)).unwrap()
    }

    #[test]
    fn test_clones_share_the_session() {
        let state = SessionState::new(session());
        let other = state.clone();

        other
            .with_session_mut(|s| s.submit_scan("A-01"))
            .unwrap();
        assert_eq!(state.with_session(|s| s.cursor().picked_quantity()), 1);
    }
}
