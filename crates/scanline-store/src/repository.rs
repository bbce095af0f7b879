//! # Repository Traits
//!
//! The persistence seams the session talks to.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  scanline-session                                                       │
//! │       │ Arc<dyn SettingsRepository>      Arc<dyn HistoryRepository>     │
//! │       ▼                                                                 │
//! │  ┌───────────────────────┐               ┌───────────────────────┐      │
//! │  │ JsonSettingsStore     │               │ JsonHistoryStore      │      │
//! │  │ MemorySettingsStore   │               │ MemoryHistoryStore    │      │
//! │  └───────────────────────┘               └───────────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use scanline_core::{HistoryRecord, NewScan, SavedSettings, ScanMode};

use crate::error::StoreResult;

/// Per-mode settings persistence.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Saved settings for `mode`, or `None` when nothing usable is stored.
    async fn get_settings(&self, mode: ScanMode) -> StoreResult<Option<SavedSettings>>;

    /// Replaces the entry for `mode`, keeping every other mode's entry.
    async fn save_settings(&self, mode: ScanMode, settings: &SavedSettings) -> StoreResult<()>;
}

/// Scan history persistence.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// All records, most recent first.
    async fn get_history(&self) -> StoreResult<Vec<HistoryRecord>>;

    /// Records a scan, merging it into an existing record with the same
    /// `(text, type)`. Returns the record as stored.
    async fn add_scan(&self, scan: NewScan) -> StoreResult<HistoryRecord>;

    /// Deletes every record and every stored image.
    async fn clear_history(&self) -> StoreResult<()>;
}
