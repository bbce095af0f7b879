//! # In-Memory Stores
//!
//! Process-local repositories with the same semantics as the JSON stores,
//! minus the files. Used for previews and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use scanline_core::{HistoryRecord, NewScan, SavedSettings, ScanMode};
use tokio::sync::Mutex;

use crate::error::StoreResult;
use crate::repository::{HistoryRepository, SettingsRepository};

/// Settings kept in a map.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    entries: Mutex<HashMap<ScanMode, SavedSettings>>,
    saves: Mutex<usize>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates an entry, as if saved by an earlier session.
    pub async fn seed(&self, mode: ScanMode, settings: SavedSettings) {
        self.entries.lock().await.insert(mode, settings);
    }

    /// Number of `save_settings` calls so far.
    pub async fn save_count(&self) -> usize {
        *self.saves.lock().await
    }
}

#[async_trait]
impl SettingsRepository for MemorySettingsStore {
    async fn get_settings(&self, mode: ScanMode) -> StoreResult<Option<SavedSettings>> {
        Ok(self.entries.lock().await.get(&mode).cloned())
    }

    async fn save_settings(&self, mode: ScanMode, settings: &SavedSettings) -> StoreResult<()> {
        self.entries.lock().await.insert(mode, settings.clone());
        *self.saves.lock().await += 1;
        Ok(())
    }
}

/// History kept in a vector. Images are stored as given.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    records: Mutex<Vec<HistoryRecord>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryRepository for MemoryHistoryStore {
    async fn get_history(&self) -> StoreResult<Vec<HistoryRecord>> {
        Ok(self.records.lock().await.clone())
    }

    async fn add_scan(&self, scan: NewScan) -> StoreResult<HistoryRecord> {
        let now = Utc::now();
        let mut records = self.records.lock().await;
        let record = match records.iter().position(|r| r.matches(&scan)) {
            Some(index) => {
                let mut existing = records.remove(index);
                existing.record_repeat(scan.image, now);
                existing
            }
            None => HistoryRecord::first_seen(scan, now),
        };
        records.insert(0, record.clone());
        Ok(record)
    }

    async fn clear_history(&self) -> StoreResult<()> {
        self.records.lock().await.clear();
        Ok(())
    }
}
