//! # Settings Store
//!
//! Per-mode scanner settings in one JSON document.
//!
//! ## Document Shape
//! ```text
//! {
//!   "v1":      { "enabledTypes": {...}, "scannerSettings": {...} },
//!   "vin":     { "enabledTypes": {...}, "scannerSettings": {...} },
//!   "<other>": <kept verbatim>
//! }
//! ```
//!
//! Entries are kept as raw JSON values, so an entry this build cannot parse
//! (or a mode it does not know) survives saves of other modes.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use scanline_core::{SavedSettings, ScanMode};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::document::{read_optional, write_replace};
use crate::error::StoreResult;
use crate::repository::SettingsRepository;

type SettingsDocument = BTreeMap<String, Value>;

/// JSON-file settings store.
#[derive(Debug)]
pub struct JsonSettingsStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles.
    lock: Mutex<()>,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonSettingsStore {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Loads the document, treating a corrupt one as empty.
    async fn load(&self) -> StoreResult<SettingsDocument> {
        let Some(contents) = read_optional(&self.path).await? else {
            return Ok(SettingsDocument::new());
        };

        match serde_json::from_str::<SettingsDocument>(&contents) {
            Ok(doc) => Ok(doc),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Settings document is corrupt, treating as empty"
                );
                Ok(SettingsDocument::new())
            }
        }
    }
}

#[async_trait]
impl SettingsRepository for JsonSettingsStore {
    async fn get_settings(&self, mode: ScanMode) -> StoreResult<Option<SavedSettings>> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;

        let Some(entry) = doc.remove(mode.as_str()) else {
            debug!(%mode, "No saved settings");
            return Ok(None);
        };

        match serde_json::from_value::<SavedSettings>(entry) {
            Ok(saved) => Ok(Some(saved)),
            Err(e) => {
                warn!(%mode, error = %e, "Saved settings entry is unreadable, ignoring");
                Ok(None)
            }
        }
    }

    async fn save_settings(&self, mode: ScanMode, settings: &SavedSettings) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;

        doc.insert(mode.as_str().to_string(), serde_json::to_value(settings)?);
        let bytes = serde_json::to_vec(&doc)?;
        write_replace(&self.path, &bytes).await?;

        debug!(%mode, "Settings saved");
        Ok(())
    }
}
