//! Preference state: favorites and dashboard layout.

use std::sync::Arc;

use pickflow_core::Favorites;
use pickflow_store::{Preferences, StoreResult};

/// Shared handle to the operator's preferences.
#[derive(Clone)]
pub struct PreferencesState {
    preferences: Arc<Preferences>,
}

impl PreferencesState {
    pub fn new(preferences: Preferences) -> Self {
        PreferencesState {
            preferences: Arc::new(preferences),
        }
    }

    pub fn favorites(&self) -> StoreResult<Favorites> {
        self.preferences.favorites()
    }

    pub fn toggle_favorite(&self, key: &str) -> StoreResult<bool> {
        self.preferences.toggle_favorite(key)
    }
}
