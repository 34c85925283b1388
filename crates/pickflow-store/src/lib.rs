//! # pickflow-store: Preference Storage for Pickflow
//!
//! File-backed implementations of the [`Store`](pickflow_core::Store)
//! interface. Everything that touches the disk lives here, so
//! `pickflow-core` stays free of I/O.
//!
//! ## Module Organization
//!
//! - [`error`] - Storage error types
//! - [`json_file`] - `JsonFileStore<T>`, one JSON document per file
//! - [`paths`] - Platform data directory resolution
//! - [`preferences`] - Favorites and dashboard layout wired to files
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pickflow_store::Preferences;
//!
//! let prefs = Preferences::open_default().unwrap();
//! let starred = prefs.toggle_favorite("ART-100").unwrap();
//! println!("ART-100 favorite: {}", starred);
//! ```

pub mod error;
pub mod json_file;
pub mod paths;
pub mod preferences;

pub use error::{StoreError, StoreResult};
pub use json_file::JsonFileStore;
pub use paths::default_data_dir;
pub use preferences::Preferences;
