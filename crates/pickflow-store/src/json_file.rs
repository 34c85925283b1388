//! # JSON File Store
//!
//! Keeps one value per file as pretty-printed JSON.
//!
//! ## Write Path
//! ```text
//! save(value)
//!    │
//!    ├── create parent directory (first save only)
//!    ├── write  <name>.json.tmp
//!    └── rename <name>.json.tmp ──► <name>.json
//! ```
//! A crash mid-write leaves the previous file intact.

use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use pickflow_core::Store;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::StoreError;

/// [`Store`] backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore<T> {
    path: PathBuf,
    _value: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore {
            path: path.into(),
            _value: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl<T> Store<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned,
{
    type Error = StoreError;

    fn load(&self) -> Result<Option<T>, Self::Error> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = ?self.path, "Preference file not found");
                return Ok(None);
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        let value = serde_json::from_str(&contents).map_err(|e| StoreError::json(&self.path, e))?;
        debug!(path = ?self.path, "Preference file loaded");
        Ok(Some(value))
    }

    fn save(&self, value: &T) -> Result<(), Self::Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
                info!(dir = ?parent, "Created preference directory");
            }
        }

        let json =
            serde_json::to_string_pretty(value).map_err(|e| StoreError::json(&self.path, e))?;

        let temp = self.temp_path();
        fs::write(&temp, json).map_err(|e| StoreError::io(&temp, e))?;
        fs::rename(&temp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;

        debug!(path = ?self.path, "Preference file saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pickflow_core::{DashboardLayout, Favorites};

    #[test]
    fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::<Favorites>::new(dir.path().join("favorites.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_creates_directories_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dashboard.json");
        let store = JsonFileStore::<DashboardLayout>::new(&path);

        let mut layout = DashboardLayout::default();
        layout.move_widget("favorites", 3, 2);
        store.save(&layout).unwrap();

        assert!(path.exists());
        assert!(!store.temp_path().exists());
        assert_eq!(store.load().unwrap(), Some(layout));
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorites.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::<Favorites>::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Json { .. })));
    }
}
