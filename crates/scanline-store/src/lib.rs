//! # scanline-store: Persistence Layer for Scanline
//!
//! This crate stores per-mode scanner settings and the scan history on the
//! device.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Scanline Data Flow                               │
//! │                                                                         │
//! │  Scanner session (debounced persist, fire-and-forget history)          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  scanline-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │    Store      │    │  Repositories  │    │  StoreConfig │  │   │
//! │  │   │   (lib.rs)    │    │  settings.rs   │    │  (paths)     │  │   │
//! │  │   │               │───►│  history.rs    │    │              │  │   │
//! │  │   │ opens data dir│    │  memory.rs     │    │              │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  <data_dir>/scanner_settings.json, scan_history.json, scan_*.jpg      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use scanline_store::{Store, StoreConfig};
//!
//! let store = Store::open(StoreConfig::new("/path/to/data")).await?;
//! let saved = store.settings().get_settings(ScanMode::Vin).await?;
//! let history = store.history().get_history().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
mod document;
pub mod error;
pub mod history;
pub mod memory;
pub mod repository;
pub mod settings;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use history::JsonHistoryStore;
pub use memory::{MemoryHistoryStore, MemorySettingsStore};
pub use repository::{HistoryRepository, SettingsRepository};
pub use settings::JsonSettingsStore;

use std::sync::Arc;

use tracing::info;

// =============================================================================
// Store
// =============================================================================

/// Handle to both JSON stores under one data directory.
///
/// Cheap to clone; the stores are shared.
#[derive(Debug, Clone)]
pub struct Store {
    settings: Arc<JsonSettingsStore>,
    history: Arc<JsonHistoryStore>,
}

impl Store {
    /// Creates the data directory if needed and opens both stores.
    pub async fn open(config: StoreConfig) -> StoreResult<Self> {
        info!(data_dir = %config.data_dir.display(), "Opening scanner store");

        tokio::fs::create_dir_all(&config.data_dir)
            .await
            .map_err(|e| StoreError::io(&config.data_dir, e))?;

        Ok(Store {
            settings: Arc::new(JsonSettingsStore::new(config.settings_path())),
            history: Arc::new(JsonHistoryStore::new(
                config.history_path(),
                config.blob_dir(),
            )),
        })
    }

    pub fn settings(&self) -> Arc<dyn SettingsRepository> {
        self.settings.clone()
    }

    pub fn history(&self) -> Arc<dyn HistoryRepository> {
        self.history.clone()
    }
}
