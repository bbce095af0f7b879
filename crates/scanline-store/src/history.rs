//! # History Store
//!
//! Deduplicated scan history with images moved out into blob files.
//!
//! ## add_scan
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  NewScan { text, type, image? }                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  load scan_history.json                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  image is "data:image/...;base64,XXXX" ?                               │
//! │       │ yes ──► decode ──► write scan_<millis>.jpg                     │
//! │       │                    image = "file://<blob_dir>/scan_<millis>.jpg"│
//! │       ▼                                                                 │
//! │  (text, type) already recorded ?                                        │
//! │       │ yes ──► count += 1, timestamp = now, image = new image if any  │
//! │       │         move record to the head                                │
//! │       │ no  ──► insert at the head with count 1                        │
//! │       ▼                                                                 │
//! │  write scan_history.json                                               │
//! │       │ failed   ──► remove the blob just written                      │
//! │       │ replaced ──► remove the record's previous blob                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every blob on disk is referenced by exactly one record.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use scanline_core::{HistoryRecord, ImageRef, NewScan};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::document::{read_optional, remove_if_exists, write_replace};
use crate::error::{StoreError, StoreResult};
use crate::repository::HistoryRepository;

const BLOB_PREFIX: &str = "scan_";
const BLOB_EXTENSION: &str = ".jpg";

/// Whether a file name belongs to the history's image blobs.
fn is_blob_name(name: &str) -> bool {
    name.starts_with(BLOB_PREFIX) && name.ends_with(BLOB_EXTENSION)
}

/// JSON-file history store.
#[derive(Debug)]
pub struct JsonHistoryStore {
    path: PathBuf,
    blob_dir: PathBuf,
    /// Serializes read-modify-write cycles from concurrent `add_scan` calls.
    lock: Mutex<()>,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>, blob_dir: impl Into<PathBuf>) -> Self {
        JsonHistoryStore {
            path: path.into(),
            blob_dir: blob_dir.into(),
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> StoreResult<Vec<HistoryRecord>> {
        let Some(contents) = read_optional(&self.path).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&contents) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "History document is corrupt, treating as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    async fn persist(&self, records: &[HistoryRecord]) -> StoreResult<()> {
        let bytes = serde_json::to_vec(records)?;
        write_replace(&self.path, &bytes).await
    }

    /// Picks `scan_<millis>.jpg`, adding a suffix if two scans land in the
    /// same millisecond.
    async fn blob_path(&self, at: DateTime<Utc>) -> StoreResult<PathBuf> {
        let millis = at.timestamp_millis();
        let mut candidate = self
            .blob_dir
            .join(format!("{BLOB_PREFIX}{millis}{BLOB_EXTENSION}"));
        let mut n = 1;
        while fs::try_exists(&candidate)
            .await
            .map_err(|e| StoreError::io(&candidate, e))?
        {
            candidate = self
                .blob_dir
                .join(format!("{BLOB_PREFIX}{millis}_{n}{BLOB_EXTENSION}"));
            n += 1;
        }
        Ok(candidate)
    }

    /// Moves an inline image into a blob file and returns its `file://` ref
    /// along with the blob written. Any other reference is kept as given.
    async fn store_image(
        &self,
        image: ImageRef,
        at: DateTime<Utc>,
    ) -> StoreResult<(ImageRef, Option<PathBuf>)> {
        let Some(payload) = image.base64_payload() else {
            return Ok((image, None));
        };

        let bytes = STANDARD.decode(payload)?;
        fs::create_dir_all(&self.blob_dir)
            .await
            .map_err(|e| StoreError::io(&self.blob_dir, e))?;
        let path = self.blob_path(at).await?;
        fs::write(&path, &bytes)
            .await
            .map_err(|e| StoreError::io(&path, e))?;

        debug!(path = %path.display(), size = bytes.len(), "Image blob written");
        let image = ImageRef::new(format!("file://{}", path.display()));
        Ok((image, Some(path)))
    }

    /// The blob file behind `image`, if this store wrote it.
    fn owned_blob(&self, image: &ImageRef) -> Option<PathBuf> {
        let path = Path::new(image.as_str().strip_prefix("file://")?);
        let name = path.file_name()?.to_str()?;
        (path.parent()? == self.blob_dir && is_blob_name(name)).then(|| path.to_path_buf())
    }

    async fn discard_blob(&self, path: &Path) {
        if let Err(e) = remove_if_exists(path).await {
            warn!(path = %path.display(), error = %e, "Failed to remove image blob");
        }
    }

    async fn delete_blobs(&self, dir: &Path) -> StoreResult<usize> {
        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(StoreError::io(dir, e)),
        };

        let mut removed = 0;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io(dir, e))?
        {
            let name = entry.file_name();
            if name.to_str().is_some_and(is_blob_name) {
                remove_if_exists(&entry.path()).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn add_scan_at(&self, scan: NewScan, at: DateTime<Utc>) -> StoreResult<HistoryRecord> {
        let _guard = self.lock.lock().await;

        let mut records = self.load().await?;

        let (image, new_blob) = match scan.image.clone() {
            Some(image) => {
                let (image, blob) = self.store_image(image, at).await?;
                (Some(image), blob)
            }
            None => (None, None),
        };

        let mut replaced = None;
        let record = match records.iter().position(|r| r.matches(&scan)) {
            Some(index) => {
                let mut existing = records.remove(index);
                if image.is_some() && existing.image != image {
                    replaced = existing.image.clone();
                }
                existing.record_repeat(image, at);
                existing
            }
            None => HistoryRecord::first_seen(NewScan { image, ..scan }, at),
        };
        records.insert(0, record.clone());

        if let Err(e) = self.persist(&records).await {
            if let Some(blob) = &new_blob {
                self.discard_blob(blob).await;
            }
            return Err(e);
        }

        if let Some(old_blob) = replaced.as_ref().and_then(|image| self.owned_blob(image)) {
            self.discard_blob(&old_blob).await;
        }

        debug!(
            text_len = record.text.len(),
            symbology = %record.symbology,
            count = record.occurrence_count,
            "Scan recorded"
        );
        Ok(record)
    }
}

#[async_trait]
impl HistoryRepository for JsonHistoryStore {
    async fn get_history(&self) -> StoreResult<Vec<HistoryRecord>> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    async fn add_scan(&self, scan: NewScan) -> StoreResult<HistoryRecord> {
        self.add_scan_at(scan, Utc::now()).await
    }

    async fn clear_history(&self) -> StoreResult<()> {
        let _guard = self.lock.lock().await;

        let removed = self.delete_blobs(&self.blob_dir).await?;
        remove_if_exists(&self.path).await?;

        info!(blobs_removed = removed, "History cleared");
        Ok(())
    }
}
