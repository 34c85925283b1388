//! # Picking Session
//!
//! The picking workflow: one picker working through the selected orders,
//! item by item, bin by bin.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Picking Session                                  │
//! │                                                                         │
//! │  new(orders) ──► filter.apply() ──► cursor at (0,0,0,0)                 │
//! │                                                                         │
//! │  PICKING                                                               │
//! │  ├── submit_scan(code) ──► Picked / Mismatch / ItemComplete            │
//! │  │        ItemComplete ──► host waits delay ──► fire_auto_advance()    │
//! │  ├── advance() / retreat() / switch_bin()                              │
//! │  └── set_filter() ──► cursor reset ──► AWAITING STORAGE (filter)       │
//! │                                                                         │
//! │  last item passed ──► AWAITING STORAGE (finished)                      │
//! │                                                                         │
//! │  confirm_storage(slot)                                                  │
//! │  ├── filter changed ──► PICKING                                        │
//! │  └── finished ───────► COMPLETE ──► on_complete()                      │
//! │                                                                         │
//! │  interrupt() ──► on_interrupt()      close() ──► on_close()            │
//! │                                                                         │
//! │  Exactly one terminal callback fires per session.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Auto-Advance Tokens
//! Completing an item does not move the cursor immediately; the picker should
//! see the completed line first. The session hands out an [`AutoAdvance`]
//! token and the host calls [`PickingSession::fire_auto_advance`] after the
//! delay. Every cursor movement bumps a generation counter, so a timer that
//! fires after the picker already moved on is rejected as stale.

use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::cursor::{Advance, CursorPosition, PickingCursor, Progress};
use crate::error::{PickingError, PickingResult, ValidationError};
use crate::filter::{delivery_dates, DeliveryFilter};
use crate::gate::{CompletionGate, GatePhase, GateTransition, StorageTrigger};
use crate::scan::{check_scan, ScanCheck, ScanOutcome};
use crate::types::{BinLocation, Order, OrderItem, PickingMethod};
use crate::validation::{validate_orders, validate_scan_code};
use crate::DEFAULT_AUTO_ADVANCE_DELAY_MS;

// =============================================================================
// Options & Outcomes
// =============================================================================

/// Construction parameters of a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Calendar day used by the `past` filter.
    pub today: NaiveDate,
    pub filter: DeliveryFilter,
    pub method: PickingMethod,
    pub auto_advance_delay: Duration,
}

impl SessionOptions {
    pub fn new(today: NaiveDate) -> Self {
        SessionOptions {
            today,
            filter: DeliveryFilter::All,
            method: PickingMethod::Manual,
            auto_advance_delay: Duration::from_millis(DEFAULT_AUTO_ADVANCE_DELAY_MS),
        }
    }

    pub fn with_filter(mut self, filter: DeliveryFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_method(mut self, method: PickingMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_auto_advance_delay(mut self, delay: Duration) -> Self {
        self.auto_advance_delay = delay;
        self
    }
}

/// A scheduled move to the next item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AutoAdvance {
    pub token: u64,
    pub delay_ms: u64,
}

impl AutoAdvance {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum SessionOutcome {
    /// All items worked through and the storage slot confirmed.
    Completed {
        storage_slot: String,
        progress: Progress,
    },
    /// The picker aborted mid-session.
    Interrupted { progress: Progress },
    /// The dialog was dismissed.
    Closed,
}

impl fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionOutcome::Completed { .. } => write!(f, "completed"),
            SessionOutcome::Interrupted { .. } => write!(f, "interrupted"),
            SessionOutcome::Closed => write!(f, "closed"),
        }
    }
}

// =============================================================================
// Event Sink
// =============================================================================

/// Callbacks the host registers with a session.
///
/// Exactly one of `on_complete`, `on_interrupt` and `on_close` is invoked
/// over the lifetime of a session.
pub trait PickingEvents: Send + Sync {
    /// The gate moved to another phase.
    fn on_phase_change(&self, _phase: GatePhase) {}

    fn on_complete(&self, storage_slot: &str, progress: &Progress);

    fn on_interrupt(&self, progress: &Progress);

    fn on_close(&self);
}

/// Event sink that ignores everything.
pub struct NoOpEvents;

impl PickingEvents for NoOpEvents {
    fn on_complete(&self, _storage_slot: &str, _progress: &Progress) {}
    fn on_interrupt(&self, _progress: &Progress) {}
    fn on_close(&self) {}
}

// =============================================================================
// Snapshot
// =============================================================================

/// Everything the picking dialog renders, in one serialisable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub phase: GatePhase,
    pub filter: String,
    pub method: PickingMethod,
    pub position: Option<CursorPosition>,
    pub order: Option<Order>,
    pub item: Option<OrderItem>,
    pub bin: Option<BinLocation>,
    /// Only with [`PickingMethod::Scale`].
    pub expected_weight_grams: Option<u64>,
    pub progress: Progress,
    pub storage_slot: Option<String>,
    pub outcome: Option<SessionOutcome>,
    #[ts(as = "Vec<String>")]
    pub delivery_dates: Vec<NaiveDate>,
}

// =============================================================================
// Session
// =============================================================================

/// A single picker's walk through a set of orders.
pub struct PickingSession {
    id: Uuid,
    all_orders: Vec<Order>,
    today: NaiveDate,
    filter: DeliveryFilter,
    method: PickingMethod,
    auto_advance_delay: Duration,
    cursor: PickingCursor,
    gate: CompletionGate,
    /// Bumped on every cursor movement; auto-advance tokens carry it.
    generation: u64,
    pending_advance: Option<u64>,
    outcome: Option<SessionOutcome>,
    events: Box<dyn PickingEvents>,
}

impl fmt::Debug for PickingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PickingSession")
            .field("id", &self.id)
            .field("filter", &self.filter)
            .field("method", &self.method)
            .field("position", &self.cursor.position())
            .field("phase", &self.gate.phase())
            .field("outcome", &self.outcome)
            .finish()
    }
}

impl PickingSession {
    /// Starts a session over the given orders.
    ///
    /// Orders are validated up front; the cursor starts at `(0,0,0,0)` of the
    /// filtered set.
    pub fn new(
        orders: Vec<Order>,
        options: SessionOptions,
        events: Box<dyn PickingEvents>,
    ) -> PickingResult<Self> {
        validate_orders(&orders)?;

        let cursor = PickingCursor::new(options.filter.apply(&orders, options.today));

        Ok(PickingSession {
            id: Uuid::new_v4(),
            all_orders: orders,
            today: options.today,
            filter: options.filter,
            method: options.method,
            auto_advance_delay: options.auto_advance_delay,
            cursor,
            gate: CompletionGate::new(),
            generation: 0,
            pending_advance: None,
            outcome: None,
            events,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> GatePhase {
        self.gate.phase()
    }

    pub fn filter(&self) -> DeliveryFilter {
        self.filter
    }

    pub fn method(&self) -> PickingMethod {
        self.method
    }

    pub fn cursor(&self) -> &PickingCursor {
        &self.cursor
    }

    pub fn outcome(&self) -> Option<&SessionOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_ended(&self) -> bool {
        self.outcome.is_some()
    }

    /// Token of the auto-advance currently waiting to fire, if any.
    pub fn pending_auto_advance(&self) -> Option<u64> {
        self.pending_advance
    }

    pub fn progress(&self) -> Progress {
        self.cursor.progress()
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Moves to the next item; past the last one the storage step opens.
    pub fn advance(&mut self) -> PickingResult<Advance> {
        self.ensure_picking("advance")?;
        self.step_forward()
    }

    /// Moves to the previous item. No-op at the very first item.
    pub fn retreat(&mut self) -> PickingResult<bool> {
        self.ensure_picking("go back")?;
        let moved = self.cursor.retreat();
        if moved {
            self.bump_generation();
        }
        Ok(moved)
    }

    /// Cycles to the next candidate bin of the current item.
    pub fn switch_bin(&mut self) -> PickingResult<bool> {
        self.ensure_picking("switch bins")?;
        Ok(self.cursor.switch_bin())
    }

    // =========================================================================
    // Scanning
    // =========================================================================

    /// Handles a scanned (or typed) bin code.
    ///
    /// An empty code proceeds without verification and counts like a match.
    pub fn submit_scan(&mut self, code: &str) -> PickingResult<ScanOutcome> {
        self.ensure_picking("scan")?;

        let Some(total) = self.cursor.current_item().map(|item| item.quantity) else {
            return Err(PickingError::NothingToPick);
        };

        let check = match validate_scan_code(code) {
            Ok(code) => check_scan(&code, self.cursor.current_bin()),
            // Bin codes share the scan code limit, so an oversized code never matches.
            Err(ValidationError::TooLong { .. }) => ScanCheck::Mismatch {
                expected: self.cursor.current_bin().map(|bin| bin.code.clone()),
                submitted: code.trim().to_string(),
            },
            Err(e) => return Err(e.into()),
        };

        let verified = match check {
            ScanCheck::Matched => true,
            ScanCheck::Unverified => false,
            ScanCheck::Mismatch {
                expected,
                submitted,
            } => {
                return Ok(ScanOutcome::Mismatch {
                    expected,
                    submitted,
                })
            }
        };

        if self.cursor.item_complete() {
            return Ok(ScanOutcome::AlreadyComplete);
        }

        let picked = self.cursor.record_pick().unwrap_or(total);
        if picked < total {
            return Ok(ScanOutcome::Picked {
                picked,
                total,
                verified,
            });
        }

        let auto_advance = AutoAdvance {
            token: self.generation,
            delay_ms: u64::try_from(self.auto_advance_delay.as_millis()).unwrap_or(u64::MAX),
        };
        self.pending_advance = Some(auto_advance.token);

        Ok(ScanOutcome::ItemComplete {
            picked,
            verified,
            auto_advance,
        })
    }

    /// Runs a scheduled auto-advance.
    ///
    /// Fails with [`PickingError::StaleAutoAdvance`] when the cursor moved
    /// since the token was issued.
    pub fn fire_auto_advance(&mut self, token: u64) -> PickingResult<Advance> {
        self.ensure_not_ended()?;
        if self.pending_advance != Some(token) {
            return Err(PickingError::StaleAutoAdvance {
                token,
                current: self.generation,
            });
        }
        self.ensure_picking("advance")?;
        self.step_forward()
    }

    // =========================================================================
    // Filter & Completion
    // =========================================================================

    /// Switches the delivery-date filter.
    ///
    /// The cursor restarts at `(0,0,0,0)` of the new set and the storage
    /// interstitial opens. Returns `false` when the filtered orders stay the
    /// same; the cursor and phase are left alone then.
    pub fn set_filter(&mut self, filter: DeliveryFilter, today: NaiveDate) -> PickingResult<bool> {
        self.ensure_not_ended()?;
        if let GatePhase::AwaitingStorage(StorageTrigger::PickingFinished) = self.gate.phase() {
            return Err(PickingError::InvalidPhase {
                operation: "change the delivery filter",
                phase: self.gate.phase().to_string(),
            });
        }

        let filtered = filter.apply(&self.all_orders, today);
        let unchanged = filtered
            .iter()
            .filter(|order| !order.items.is_empty())
            .map(|order| &order.id)
            .eq(self.cursor.orders().iter().map(|order| &order.id));

        self.filter = filter;
        self.today = today;
        if unchanged {
            return Ok(false);
        }

        self.cursor.reset(filtered);
        self.bump_generation();

        self.gate.request_storage(StorageTrigger::FilterChanged)?;
        self.events.on_phase_change(self.gate.phase());
        Ok(true)
    }

    /// Confirms the storage slot shown in the interstitial.
    pub fn confirm_storage(&mut self, slot: &str) -> PickingResult<GateTransition> {
        self.ensure_not_ended()?;
        let transition = self.gate.confirm_storage(slot)?;
        self.events.on_phase_change(self.gate.phase());

        if transition == GateTransition::Completed {
            let storage_slot = self.gate.storage_slot().unwrap_or_default().to_string();
            let progress = self.cursor.progress();
            self.events.on_complete(&storage_slot, &progress);
            self.outcome = Some(SessionOutcome::Completed {
                storage_slot,
                progress,
            });
        }

        Ok(transition)
    }

    /// Aborts the session mid-way.
    pub fn interrupt(&mut self) -> PickingResult<SessionOutcome> {
        self.ensure_not_ended()?;
        let progress = self.cursor.progress();
        self.events.on_interrupt(&progress);
        Ok(self.finish(SessionOutcome::Interrupted { progress }))
    }

    /// Dismisses the session without side effects.
    pub fn close(&mut self) -> PickingResult<SessionOutcome> {
        self.ensure_not_ended()?;
        self.events.on_close();
        Ok(self.finish(SessionOutcome::Closed))
    }

    /// Everything the dialog needs to render the current state.
    pub fn snapshot(&self) -> SessionSnapshot {
        let item = self.cursor.current_item().cloned();
        let expected_weight_grams = match self.method {
            PickingMethod::Scale => item.as_ref().and_then(OrderItem::expected_weight_grams),
            PickingMethod::Manual => None,
        };

        SessionSnapshot {
            session_id: self.id.to_string(),
            phase: self.gate.phase(),
            filter: self.filter.to_string(),
            method: self.method,
            position: (!self.cursor.is_empty()).then(|| self.cursor.position()),
            order: self.cursor.current_order().cloned(),
            item,
            bin: self.cursor.current_bin().cloned(),
            expected_weight_grams,
            progress: self.cursor.progress(),
            storage_slot: self.gate.storage_slot().map(str::to_string),
            outcome: self.outcome.clone(),
            delivery_dates: delivery_dates(&self.all_orders),
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn step_forward(&mut self) -> PickingResult<Advance> {
        let step = self.cursor.advance();
        self.bump_generation();

        if step == Advance::Exhausted {
            self.gate.request_storage(StorageTrigger::PickingFinished)?;
            self.events.on_phase_change(self.gate.phase());
        }

        Ok(step)
    }

    fn bump_generation(&mut self) {
        self.generation += 1;
        self.pending_advance = None;
    }

    fn finish(&mut self, outcome: SessionOutcome) -> SessionOutcome {
        self.pending_advance = None;
        self.outcome = Some(outcome.clone());
        outcome
    }

    fn ensure_not_ended(&self) -> PickingResult<()> {
        match &self.outcome {
            Some(outcome) => Err(PickingError::SessionEnded {
                outcome: outcome.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn ensure_picking(&self, operation: &'static str) -> PickingResult<()> {
        self.ensure_not_ended()?;
        if self.gate.is_picking() {
            Ok(())
        } else {
            Err(PickingError::InvalidPhase {
                operation,
                phase: self.gate.phase().to_string(),
            })
        }
    }
}
