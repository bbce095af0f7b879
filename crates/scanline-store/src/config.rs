//! # Store Configuration
//!
//! Where the documents and image blobs live.
//!
//! ```text
//! <data_dir>/
//! ├── scanner_settings.json   { "<mode>": { enabledTypes, scannerSettings } }
//! ├── scan_history.json       [ { text, type, image?, timestamp, count } ]
//! └── scan_<millis>.jpg       one blob per stored image
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::{StoreError, StoreResult};

pub const DEFAULT_SETTINGS_FILE: &str = "scanner_settings.json";
pub const DEFAULT_HISTORY_FILE: &str = "scan_history.json";

/// Store configuration.
///
/// ## Example
/// ```rust
/// use scanline_store::StoreConfig;
///
/// let config = StoreConfig::new("/tmp/scanline").history_file("history.json");
/// assert!(config.history_path().ends_with("history.json"));
/// assert!(config.blob_dir().ends_with("scanline"));
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding both documents.
    pub data_dir: PathBuf,

    /// Settings document file name.
    /// Default: `scanner_settings.json`
    pub settings_file: String,

    /// History document file name.
    /// Default: `scan_history.json`
    pub history_file: String,

    /// Directory for image blobs.
    /// Default: same as `data_dir`
    pub blob_dir: Option<PathBuf>,
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        StoreConfig {
            data_dir: data_dir.into(),
            settings_file: DEFAULT_SETTINGS_FILE.to_string(),
            history_file: DEFAULT_HISTORY_FILE.to_string(),
            blob_dir: None,
        }
    }

    /// Uses the platform data directory (e.g. `~/.local/share/scanline`).
    pub fn platform_default() -> StoreResult<Self> {
        let dirs = ProjectDirs::from("app", "Scanline", "scanline").ok_or(StoreError::NoDataDirectory)?;
        Ok(Self::new(dirs.data_dir()))
    }

    pub fn settings_file(mut self, name: impl Into<String>) -> Self {
        self.settings_file = name.into();
        self
    }

    pub fn history_file(mut self, name: impl Into<String>) -> Self {
        self.history_file = name.into();
        self
    }

    /// Stores image blobs somewhere other than the data directory.
    pub fn with_blob_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.blob_dir = Some(dir.into());
        self
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(&self.settings_file)
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(&self.history_file)
    }

    pub fn blob_dir(&self) -> &Path {
        self.blob_dir.as_deref().unwrap_or(&self.data_dir)
    }
}
