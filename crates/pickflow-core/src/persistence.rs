//! # Preference Persistence
//!
//! Client-side preferences (favorites, dashboard layout) go through an
//! injected [`Store`] instead of ambient storage, so the logic around them
//! runs against [`InMemoryStore`] in tests and against a file store in the
//! application.
//!
//! ```text
//! ┌──────────────────────┐      ┌─────────────────────┐
//! │ PreferenceService<T> │─────►│  Store<T>           │
//! │  get / update        │      │  load() / save(T)   │
//! └──────────────────────┘      └──────────┬──────────┘
//!                                          │
//!                     ┌────────────────────┼─────────────────────┐
//!                     ▼                                          ▼
//!            InMemoryStore<T> (here)               JsonFileStore<T> (pickflow-store)
//! ```

use std::collections::BTreeSet;
use std::convert::Infallible;
use std::marker::PhantomData;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Store Interface
// =============================================================================

/// Loads and saves one value of type `T`.
pub trait Store<T> {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<T>, Self::Error>;

    fn save(&self, value: &T) -> Result<(), Self::Error>;
}

/// Store keeping the value in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore<T> {
    value: Mutex<Option<T>>,
}

impl<T> InMemoryStore<T> {
    pub fn new() -> Self {
        InMemoryStore {
            value: Mutex::new(None),
        }
    }

    /// Creates a store that already holds `value`.
    pub fn with_value(value: T) -> Self {
        InMemoryStore {
            value: Mutex::new(Some(value)),
        }
    }
}

impl<T: Clone> Store<T> for InMemoryStore<T> {
    type Error = Infallible;

    fn load(&self) -> Result<Option<T>, Self::Error> {
        Ok(self
            .value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, value: &T) -> Result<(), Self::Error> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(value.clone());
        Ok(())
    }
}

// =============================================================================
// Preference Service
// =============================================================================

/// Load-or-default, mutate, save.
pub struct PreferenceService<T, S> {
    store: S,
    _value: PhantomData<fn() -> T>,
}

impl<T, S> PreferenceService<T, S>
where
    T: Default,
    S: Store<T>,
{
    pub fn new(store: S) -> Self {
        PreferenceService {
            store,
            _value: PhantomData,
        }
    }

    /// Current value, or the default when nothing was saved.
    pub fn get(&self) -> Result<T, S::Error> {
        Ok(self.store.load()?.unwrap_or_default())
    }

    /// Applies `change` to the current value and saves the result.
    pub fn update<R>(&self, change: impl FnOnce(&mut T) -> R) -> Result<R, S::Error> {
        let mut value = self.get()?;
        let result = change(&mut value);
        self.store.save(&value)?;
        Ok(result)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

// =============================================================================
// Favorites
// =============================================================================

/// Articles, customers or orders the user starred in the list screens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct Favorites(BTreeSet<String>);

impl Favorites {
    /// Flips the favorite flag. Returns whether `key` is a favorite now.
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.0.remove(key) {
            false
        } else {
            self.0.insert(key.to_string());
            true
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// =============================================================================
// Dashboard Layout
// =============================================================================

/// Grid placement of one dashboard widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct WidgetPlacement {
    pub widget: String,
    pub column: u16,
    pub row: u16,
    pub width: u16,
    pub height: u16,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl WidgetPlacement {
    pub fn new(widget: impl Into<String>, column: u16, row: u16, width: u16, height: u16) -> Self {
        WidgetPlacement {
            widget: widget.into(),
            column,
            row,
            width,
            height,
            visible: true,
        }
    }
}

/// Arrangement of the start-page widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardLayout {
    pub widgets: Vec<WidgetPlacement>,
}

impl Default for DashboardLayout {
    fn default() -> Self {
        DashboardLayout {
            widgets: vec![
                WidgetPlacement::new("open_orders", 0, 0, 2, 1),
                WidgetPlacement::new("picking_queue", 2, 0, 1, 1),
                WidgetPlacement::new("overdue_deliveries", 0, 1, 1, 1),
                WidgetPlacement::new("favorites", 1, 1, 2, 1),
            ],
        }
    }
}

impl DashboardLayout {
    fn find_mut(&mut self, widget: &str) -> Option<&mut WidgetPlacement> {
        self.widgets.iter_mut().find(|w| w.widget == widget)
    }

    /// Moves a widget to another grid cell. Returns false for unknown widgets.
    pub fn move_widget(&mut self, widget: &str, column: u16, row: u16) -> bool {
        match self.find_mut(widget) {
            Some(placement) => {
                placement.column = column;
                placement.row = row;
                true
            }
            None => false,
        }
    }

    pub fn set_visible(&mut self, widget: &str, visible: bool) -> bool {
        match self.find_mut(widget) {
            Some(placement) => {
                placement.visible = visible;
                true
            }
            None => false,
        }
    }

    pub fn hide(&mut self, widget: &str) -> bool {
        self.set_visible(widget, false)
    }

    /// Visible widgets, top-to-bottom then left-to-right.
    pub fn visible(&self) -> Vec<&WidgetPlacement> {
        let mut visible: Vec<_> = self.widgets.iter().filter(|w| w.visible).collect();
        visible.sort_by_key(|w| (w.row, w.column));
        visible
    }
}
