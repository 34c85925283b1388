//! # pickflow-core: Pure Picking Logic for Pickflow
//!
//! This crate is the **heart** of the warehouse picking station. It contains
//! the multi-order picking workflow as plain state transitions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pickflow Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Front end (web / terminal)                   │   │
//! │  │   Order list ──► Picking dialog ──► Storage slot ──► Done       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pickflow-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  filter   │  │  cursor   │  │   scan    │  │   gate    │  │   │
//! │  │   │ delivery  │  │ order/item│  │ bin code  │  │ storage   │  │   │
//! │  │   │  dates    │  │ /bin idx  │  │  checks   │  │ confirm   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                         session                                 │   │
//! │  │   NO I/O • NO CLOCK • NO TIMERS • DETERMINISTIC                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 pickflow-store (preferences)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Orders, items, bin locations, status enums
//! - [`error`] - Domain error types
//! - [`validation`] - Input checks for orders, scan codes, storage slots
//! - [`filter`] - Delivery-date filter
//! - [`cursor`] - Position inside the orders → items → bins traversal
//! - [`scan`] - Bin code verification
//! - [`gate`] - Storage confirmation before completion
//! - [`session`] - The picking workflow tying everything together
//! - [`persistence`] - Injected `Store` interface plus favorites / dashboard layout
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use pickflow_core::{
//!     BinLocation, NoOpEvents, Order, OrderItem, PickingSession, ScanOutcome, SessionOptions,
//! };
//!
//! let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
//! let order = Order::new("SO-1", "C-1", "Acme", date)
//!     .with_bin(BinLocation::new("b1", "A-01-03", "Shelf A / 1 / EG"))
//!     .with_item(OrderItem::new("i1", "ART-100", 1).with_bins(["b1"]));
//!
//! let mut session =
//!     PickingSession::new(vec![order], SessionOptions::new(date), Box::new(NoOpEvents)).unwrap();
//!
//! let outcome = session.submit_scan("A-01-03").unwrap();
//! assert!(matches!(outcome, ScanOutcome::ItemComplete { .. }));
//! ```

pub mod cursor;
pub mod error;
pub mod filter;
pub mod gate;
pub mod persistence;
pub mod scan;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cursor::{Advance, CursorPosition, PickingCursor, Progress};
pub use error::{PickingError, PickingResult, ValidationError};
pub use filter::{delivery_dates, DeliveryFilter};
pub use gate::{CompletionGate, GatePhase, GateTransition, StorageTrigger};
pub use persistence::{
    DashboardLayout, Favorites, InMemoryStore, PreferenceService, Store, WidgetPlacement,
};
pub use scan::{check_scan, ScanCheck, ScanOutcome};
pub use session::{
    AutoAdvance, NoOpEvents, PickingEvents, PickingSession, SessionOptions, SessionOutcome,
    SessionSnapshot,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single order line accepted into a picking session.
pub const MAX_ITEM_QUANTITY: u32 = 9_999;

/// Default pause before the cursor moves on after an item is fully picked.
///
/// Long enough for the picker to see the completed line turn green.
pub const DEFAULT_AUTO_ADVANCE_DELAY_MS: u64 = 1_000;
