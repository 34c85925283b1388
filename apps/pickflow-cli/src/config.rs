//! # Station Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority, applied in lib.rs)           │
//! │     --filter past --method scale                                       │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     PICKFLOW_AUTO_ADVANCE_MS=750                                       │
//! │     PICKFLOW_METHOD=scale                                              │
//! │     PICKFLOW_FILTER=past                                               │
//! │     PICKFLOW_DATA_DIR=/srv/pickflow                                    │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/pickflow/pickflow.toml (Linux)                           │
//! │     ~/Library/Application Support/com.pickflow.pickflow/ (macOS)       │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     manual picking, all orders, 1000 ms auto-advance                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # pickflow.toml
//! [picking]
//! auto_advance_delay_ms = 1000
//! method = "manual"          # manual | scale
//! default_filter = "past"    # all | past | YYYY-MM-DD
//!
//! [storage]
//! data_dir = "/srv/pickflow"
//! ```

use std::path::PathBuf;

use pickflow_core::{DeliveryFilter, PickingMethod, DEFAULT_AUTO_ADVANCE_DELAY_MS};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CliError, CliResult};

/// Upper bound for the auto-advance delay.
pub const MAX_AUTO_ADVANCE_DELAY_MS: u64 = 60_000;

// =============================================================================
// Sections
// =============================================================================

/// `[picking]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickingSettings {
    /// Pause between completing an item and moving to the next one.
    #[serde(default = "default_auto_advance_delay")]
    pub auto_advance_delay_ms: u64,

    #[serde(default)]
    pub method: PickingMethod,

    #[serde(default)]
    pub default_filter: DeliveryFilter,
}

fn default_auto_advance_delay() -> u64 {
    DEFAULT_AUTO_ADVANCE_DELAY_MS
}

impl Default for PickingSettings {
    fn default() -> Self {
        PickingSettings {
            auto_advance_delay_ms: default_auto_advance_delay(),
            method: PickingMethod::default(),
            default_filter: DeliveryFilter::default(),
        }
    }
}

/// `[storage]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Where preference files live. Platform data directory when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete station configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickflowConfig {
    #[serde(default)]
    pub picking: PickingSettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

impl PickflowConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (pickflow.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CliResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path).map_err(|source| {
                    CliError::ConfigRead {
                        path: path.clone(),
                        source,
                    }
                })?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CliResult<()> {
        if self.picking.auto_advance_delay_ms > MAX_AUTO_ADVANCE_DELAY_MS {
            return Err(CliError::InvalidConfig(format!(
                "auto_advance_delay_ms must be at most {}, got {}",
                MAX_AUTO_ADVANCE_DELAY_MS, self.picking.auto_advance_delay_ms
            )));
        }

        if let Some(dir) = &self.storage.data_dir {
            if dir.as_os_str().is_empty() {
                return Err(CliError::InvalidConfig("data_dir must not be empty".into()));
            }
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(ms) = lookup("PICKFLOW_AUTO_ADVANCE_MS") {
            match ms.parse::<u64>() {
                Ok(ms) => {
                    debug!(ms, "Overriding auto-advance delay from environment");
                    self.picking.auto_advance_delay_ms = ms;
                }
                Err(_) => warn!(value = %ms, "Ignoring non-numeric PICKFLOW_AUTO_ADVANCE_MS"),
            }
        }

        if let Some(method) = lookup("PICKFLOW_METHOD") {
            match method.parse::<PickingMethod>() {
                Ok(parsed) => {
                    debug!(method = %method, "Overriding picking method from environment");
                    self.picking.method = parsed;
                }
                Err(_) => warn!(method = %method, "Unknown picking method in environment"),
            }
        }

        if let Some(filter) = lookup("PICKFLOW_FILTER") {
            match filter.parse::<DeliveryFilter>() {
                Ok(parsed) => {
                    debug!(filter = %filter, "Overriding delivery filter from environment");
                    self.picking.default_filter = parsed;
                }
                Err(_) => warn!(filter = %filter, "Unknown delivery filter in environment"),
            }
        }

        if let Some(dir) = lookup("PICKFLOW_DATA_DIR") {
            if !dir.trim().is_empty() {
                self.storage.data_dir = Some(PathBuf::from(dir));
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "pickflow", "pickflow")
            .map(|dirs| dirs.config_dir().join("pickflow.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = PickflowConfig::default();
        assert_eq!(config.picking.auto_advance_delay_ms, 1_000);
        assert_eq!(config.picking.method, PickingMethod::Manual);
        assert_eq!(config.picking.default_filter, DeliveryFilter::All);
        assert!(config.storage.data_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: PickflowConfig = toml::from_str(
            r#"
            [picking]
            method = "scale"
            default_filter = "2026-03-02"
            "#,
        )
        .unwrap();

        assert_eq!(config.picking.method, PickingMethod::Scale);
        assert_eq!(config.picking.default_filter.to_string(), "2026-03-02");
        assert_eq!(config.picking.auto_advance_delay_ms, 1_000);
    }

    #[test]
    fn test_load_from_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pickflow.toml");
        std::fs::write(&path, "[picking]\nauto_advance_delay_ms = 250\n").unwrap();

        let config = PickflowConfig::load(Some(path)).unwrap();
        if std::env::var("PICKFLOW_AUTO_ADVANCE_MS").is_err() {
            assert_eq!(config.picking.auto_advance_delay_ms, 250);
        }
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PICKFLOW_AUTO_ADVANCE_MS", "400"),
            ("PICKFLOW_METHOD", "weight"),
            ("PICKFLOW_FILTER", "past"),
            ("PICKFLOW_DATA_DIR", "/srv/pickflow"),
        ]
        .into_iter()
        .collect();

        let mut config = PickflowConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.picking.auto_advance_delay_ms, 400);
        assert_eq!(config.picking.method, PickingMethod::Scale);
        assert_eq!(config.picking.default_filter, DeliveryFilter::Past);
        assert_eq!(
            config.storage.data_dir,
            Some(PathBuf::from("/srv/pickflow"))
        );
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let mut config = PickflowConfig::default();
        config.apply_overrides(|key| match key {
            "PICKFLOW_AUTO_ADVANCE_MS" => Some("soon".into()),
            "PICKFLOW_METHOD" => Some("telepathy".into()),
            _ => None,
        });
        assert_eq!(config, PickflowConfig::default());
    }

    #[test]
    fn test_config_validation() {
        let mut config = PickflowConfig::default();
        config.picking.auto_advance_delay_ms = MAX_AUTO_ADVANCE_DELAY_MS + 1;
        assert!(config.validate().is_err());

        let mut config = PickflowConfig::default();
        config.storage.data_dir = Some(PathBuf::new());
        assert!(config.validate().is_err());
    }
}
