//! # Session Configuration
//!
//! Tunables for scanner sessions: where documents live, the debounce and
//! restart delays, and the MultiScan engine limits.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SCANLINE_DATA_DIR=/tmp/scanline                                    │
//! │     SCANLINE_PERSIST_DEBOUNCE_MS=500                                   │
//! │     SCANLINE_RESTART_DELAY_MS=100                                      │
//! │     SCANLINE_GALLERY_DELAY_MS=500                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/scanline/scanner.toml (Linux)                            │
//! │     ~/Library/Application Support/app.Scanline.scanline/scanner.toml   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # scanner.toml
//! [storage]
//! data_dir = "/var/lib/scanline"   # optional, platform data dir otherwise
//!
//! [timing]
//! persist_debounce_ms = 500
//! restart_delay_ms = 100      # stop-before-restart heuristic
//! gallery_pick_delay_ms = 500
//!
//! [multiscan]
//! max_results = 200
//! caching_duration_ms = 3000
//! ```

use std::path::PathBuf;
use std::time::Duration;

use scanline_store::StoreConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{SessionError, SessionResult};

// =============================================================================
// Sections
// =============================================================================

/// Where the settings and history documents are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory. `None` uses the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

/// Session timers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Quiet period before edited settings are written.
    #[serde(default = "default_persist_debounce_ms")]
    pub persist_debounce_ms: u64,

    /// Pause between stopping and restarting the engine.
    ///
    /// The engine gives no stop acknowledgement, so this is a fixed wait.
    #[serde(default = "default_restart_delay_ms")]
    pub restart_delay_ms: u64,

    /// Delay before Gallery mode opens the picker.
    #[serde(default = "default_gallery_pick_delay_ms")]
    pub gallery_pick_delay_ms: u64,
}

fn default_persist_debounce_ms() -> u64 {
    500
}

fn default_restart_delay_ms() -> u64 {
    100
}

fn default_gallery_pick_delay_ms() -> u64 {
    500
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            persist_debounce_ms: default_persist_debounce_ms(),
            restart_delay_ms: default_restart_delay_ms(),
            gallery_pick_delay_ms: default_gallery_pick_delay_ms(),
        }
    }
}

impl TimingConfig {
    pub fn persist_debounce(&self) -> Duration {
        Duration::from_millis(self.persist_debounce_ms)
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }

    pub fn gallery_pick_delay(&self) -> Duration {
        Duration::from_millis(self.gallery_pick_delay_ms)
    }
}

/// Engine limits applied in MultiScan mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiscanConfig {
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    /// Window during which the engine suppresses repeats of a code.
    #[serde(default = "default_caching_duration_ms")]
    pub caching_duration_ms: u32,
}

fn default_max_results() -> u32 {
    200
}

fn default_caching_duration_ms() -> u32 {
    3000
}

impl Default for MultiscanConfig {
    fn default() -> Self {
        MultiscanConfig {
            max_results: default_max_results(),
            caching_duration_ms: default_caching_duration_ms(),
        }
    }
}

// =============================================================================
// Session Config
// =============================================================================

/// Complete session configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub multiscan: MultiscanConfig,
}

impl SessionConfig {
    /// Loads configuration from file and environment.
    ///
    /// ## Loading Order
    /// 1. Start with defaults
    /// 2. Load from TOML file (if exists)
    /// 3. Override with environment variables
    /// 4. Validate
    pub fn load(config_path: Option<PathBuf>) -> SessionResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading scanner config from file");
                let contents = std::fs::read_to_string(&path)?;
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
            warn!("Failed to load scanner config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> SessionResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SessionError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SessionError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)
            .map_err(|e| SessionError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Scanner config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SessionResult<()> {
        if self.timing.persist_debounce_ms == 0 {
            return Err(SessionError::InvalidConfig(
                "persist_debounce_ms must be greater than 0".into(),
            ));
        }

        if self.multiscan.max_results == 0 {
            return Err(SessionError::InvalidConfig(
                "multiscan.max_results must be greater than 0".into(),
            ));
        }

        if let Some(dir) = &self.storage.data_dir {
            if dir.as_os_str().is_empty() {
                return Err(SessionError::InvalidConfig("storage.data_dir is empty".into()));
            }
        }

        Ok(())
    }

    /// Resolves the store layout: the configured directory, or the platform
    /// data directory.
    pub fn store_config(&self) -> SessionResult<StoreConfig> {
        match &self.storage.data_dir {
            Some(dir) => Ok(StoreConfig::new(dir)),
            None => Ok(StoreConfig::platform_default()?),
        }
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var("SCANLINE_DATA_DIR") {
            debug!(data_dir = %dir, "Overriding data directory from environment");
            self.storage.data_dir = Some(PathBuf::from(dir));
        }

        let millis = |key: &str| -> Option<u64> {
            let raw = var(key)?;
            match raw.parse::<u64>() {
                Ok(ms) => Some(ms),
                Err(_) => {
                    warn!(key, value = %raw, "Ignoring non-numeric duration in environment");
                    None
                }
            }
        };

        if let Some(ms) = millis("SCANLINE_PERSIST_DEBOUNCE_MS") {
            self.timing.persist_debounce_ms = ms;
        }

        if let Some(ms) = millis("SCANLINE_RESTART_DELAY_MS") {
            self.timing.restart_delay_ms = ms;
        }

        if let Some(ms) = millis("SCANLINE_GALLERY_DELAY_MS") {
            self.timing.gallery_pick_delay_ms = ms;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("app", "Scanline", "scanline")
            .map(|dirs| dirs.config_dir().join("scanner.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.timing.persist_debounce(), Duration::from_millis(500));
        assert_eq!(config.timing.restart_delay(), Duration::from_millis(100));
        assert_eq!(config.timing.gallery_pick_delay(), Duration::from_millis(500));
        assert_eq!(config.multiscan.max_results, 200);
        assert_eq!(config.multiscan.caching_duration_ms, 3000);
        assert!(config.storage.data_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: SessionConfig = toml::from_str(
            r#"
            [timing]
            restart_delay_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.timing.restart_delay_ms, 250);
        assert_eq!(config.timing.persist_debounce_ms, 500);
        assert_eq!(config.multiscan, MultiscanConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("scanner.toml");

        let mut config = SessionConfig::default();
        config.storage.data_dir = Some(dir.path().join("data"));
        config.multiscan.max_results = 50;
        config.save(Some(path.clone())).unwrap();

        let loaded: SessionConfig =
            toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        loaded.validate().unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("SCANLINE_DATA_DIR", "/tmp/scanline-test"),
            ("SCANLINE_RESTART_DELAY_MS", "40"),
            ("SCANLINE_PERSIST_DEBOUNCE_MS", "soon"),
        ]
        .into_iter()
        .collect();

        let mut config = SessionConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(
            config.storage.data_dir,
            Some(PathBuf::from("/tmp/scanline-test"))
        );
        assert_eq!(config.timing.restart_delay_ms, 40);
        // Unparseable values leave the previous setting
        assert_eq!(config.timing.persist_debounce_ms, 500);
    }

    #[test]
    fn test_validate_rejects_zero_debounce() {
        let mut config = SessionConfig::default();
        config.timing.persist_debounce_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(SessionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_store_config_uses_data_dir() {
        let mut config = SessionConfig::default();
        config.storage.data_dir = Some(PathBuf::from("/data/scanline"));
        let store = config.store_config().unwrap();
        assert_eq!(store.data_dir, PathBuf::from("/data/scanline"));
    }
}
