//! # State Module
//!
//! Shared state of a running station.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────┐        ┌──────────────────────────────┐  │
//! │  │      SessionState        │        │      PreferencesState        │  │
//! │  │                          │        │                              │  │
//! │  │  Arc<Mutex<              │        │  Arc<Preferences>            │  │
//! │  │    PickingSession        │        │  (favorites.json,            │  │
//! │  │  >>                      │        │   dashboard.json)            │  │
//! │  └──────────────────────────┘        └──────────────────────────────┘  │
//! │         ▲            ▲                                                  │
//! │         │            │                                                  │
//! │   command loop   auto-advance timer task                               │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • SessionState: Mutex held only for the duration of one operation     │
//! │  • PreferencesState: every call reads and writes its own file          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod preferences;
mod session;

pub use preferences::PreferencesState;
pub use session::SessionState;
