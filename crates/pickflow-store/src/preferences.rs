//! # File-Backed Preferences
//!
//! Wires the preference types from `pickflow-core` to one JSON file each.
//!
//! ```text
//! <data_dir>/
//! ├── favorites.json   ◄─── Favorites
//! └── dashboard.json   ◄─── DashboardLayout
//! ```

use std::path::{Path, PathBuf};

use pickflow_core::{DashboardLayout, Favorites, PreferenceService};
use tracing::info;

use crate::error::StoreResult;
use crate::json_file::JsonFileStore;
use crate::paths::default_data_dir;

pub const FAVORITES_FILE: &str = "favorites.json";
pub const DASHBOARD_FILE: &str = "dashboard.json";

/// Favorites and dashboard layout of one user.
pub struct Preferences {
    data_dir: PathBuf,
    favorites: PreferenceService<Favorites, JsonFileStore<Favorites>>,
    dashboard: PreferenceService<DashboardLayout, JsonFileStore<DashboardLayout>>,
}

impl Preferences {
    /// Opens the preferences stored under `data_dir`.
    ///
    /// Nothing is read or created until the first access.
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        info!(dir = ?data_dir, "Opening preferences");

        Preferences {
            favorites: PreferenceService::new(JsonFileStore::new(data_dir.join(FAVORITES_FILE))),
            dashboard: PreferenceService::new(JsonFileStore::new(data_dir.join(DASHBOARD_FILE))),
            data_dir,
        }
    }

    /// Opens the preferences in the platform data directory.
    pub fn open_default() -> StoreResult<Self> {
        Ok(Preferences::open(default_data_dir()?))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn favorites(&self) -> StoreResult<Favorites> {
        self.favorites.get()
    }

    /// Flips the favorite flag of `key` and saves. Returns the new flag.
    pub fn toggle_favorite(&self, key: &str) -> StoreResult<bool> {
        self.favorites.update(|favorites| favorites.toggle(key))
    }

    pub fn dashboard(&self) -> StoreResult<DashboardLayout> {
        self.dashboard.get()
    }

    /// Applies `change` to the dashboard layout and saves.
    pub fn update_dashboard<R>(
        &self,
        change: impl FnOnce(&mut DashboardLayout) -> R,
    ) -> StoreResult<R> {
        self.dashboard.update(change)
    }
}
