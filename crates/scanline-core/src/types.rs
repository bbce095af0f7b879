//! # Domain Types
//!
//! Value types shared by the session, the stores and the UI.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  ScannedItem    │   │ HistoryRecord   │   │ SavedSettings   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  text           │   │  text           │   │  enabledTypes   │       │
//! │  │  type           │   │  type           │   │  scannerSettings│       │
//! │  │  image?         │   │  image?         │   └─────────────────┘       │
//! │  └─────────────────┘   │  timestamp (ms) │                              │
//! │                        │  count          │   ┌─────────────────┐       │
//! │                        └─────────────────┘   │    ImageRef     │       │
//! │                                              │  data: URI or   │       │
//! │  Identity of a history record:               │  file:// path   │       │
//! │  (text, type)                                └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::settings::ScannerSettings;
use crate::symbology::{is_one_dimensional, EnabledTypes};

// =============================================================================
// Image Reference
// =============================================================================

/// Prefix added to bare base64 payloads coming from the engine.
pub const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

const BASE64_MARKER: &str = ";base64,";

/// An image attached to a scan: either an inline `data:` URI or a
/// `file://` reference to a stored blob.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(uri: impl Into<String>) -> Self {
        ImageRef(uri.into())
    }

    /// Wraps an image as the engine reports it.
    ///
    /// The engine sometimes sends raw base64 without a `data:` header; those
    /// payloads are assumed to be JPEG.
    ///
    /// ```rust
    /// use scanline_core::ImageRef;
    ///
    /// let img = ImageRef::from_engine_payload("/9j/4AAQ");
    /// assert_eq!(img.as_str(), "data:image/jpeg;base64,/9j/4AAQ");
    /// ```
    pub fn from_engine_payload(payload: &str) -> Self {
        if payload.starts_with("data:") {
            ImageRef(payload.to_string())
        } else {
            ImageRef(format!("{JPEG_DATA_URI_PREFIX}{payload}"))
        }
    }

    /// Builds a data URI for an image picked from the photo library.
    pub fn from_picked(base64: &str, mime_type: Option<&str>) -> Self {
        let mime = mime_type.filter(|m| !m.is_empty()).unwrap_or("image/jpeg");
        ImageRef(format!("data:{mime};base64,{base64}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Whether this is an inline image (as opposed to a stored file).
    pub fn is_data_uri(&self) -> bool {
        self.0.starts_with("data:image")
    }

    /// The base64 body of a data URI, if this is one.
    pub fn base64_payload(&self) -> Option<&str> {
        if !self.is_data_uri() {
            return None;
        }
        self.0
            .rsplit_once(BASE64_MARKER)
            .map(|(_, body)| body)
            .filter(|body| !body.is_empty())
    }
}

// =============================================================================
// Scanned Item
// =============================================================================

/// One decoded barcode shown in the session's result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScannedItem {
    /// Decoded text.
    pub text: String,

    /// Symbology name as reported by the engine (e.g. `"Code 128"`).
    #[serde(rename = "type")]
    pub symbology: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub image: Option<ImageRef>,
}

impl ScannedItem {
    pub fn new(text: impl Into<String>, symbology: impl Into<String>, image: Option<ImageRef>) -> Self {
        ScannedItem {
            text: text.into(),
            symbology: symbology.into(),
            image,
        }
    }

    /// Whether the reported symbology is a 1D barcode.
    pub fn is_one_dimensional(&self) -> bool {
        is_one_dimensional(&self.symbology)
    }
}

/// A scan handed to the history store.
pub type NewScan = ScannedItem;

// =============================================================================
// History Record
// =============================================================================

/// A scan remembered across sessions.
///
/// Records are identified by `(text, type)`; seeing the same pair again bumps
/// the count instead of adding a second record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HistoryRecord {
    pub text: String,

    #[serde(rename = "type")]
    pub symbology: String,

    /// `file://` path of the stored blob, or whatever reference was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub image: Option<ImageRef>,

    /// When the pair was last scanned, stored as epoch milliseconds.
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    #[ts(type = "number")]
    pub last_seen_at: DateTime<Utc>,

    #[serde(rename = "count")]
    pub occurrence_count: u32,
}

impl HistoryRecord {
    /// First sighting of a scan.
    pub fn first_seen(scan: NewScan, at: DateTime<Utc>) -> Self {
        HistoryRecord {
            text: scan.text,
            symbology: scan.symbology,
            image: scan.image,
            last_seen_at: at,
            occurrence_count: 1,
        }
    }

    /// Whether `scan` refers to the same barcode as this record.
    pub fn matches(&self, scan: &NewScan) -> bool {
        self.text == scan.text && self.symbology == scan.symbology
    }

    /// Registers another sighting. A new image replaces the old one; no image
    /// keeps it.
    pub fn record_repeat(&mut self, image: Option<ImageRef>, at: DateTime<Utc>) {
        self.occurrence_count = self.occurrence_count.saturating_add(1);
        self.last_seen_at = at;
        if image.is_some() {
            self.image = image;
        }
    }

    pub fn is_one_dimensional(&self) -> bool {
        is_one_dimensional(&self.symbology)
    }
}

// =============================================================================
// Saved Settings
// =============================================================================

/// What is persisted for one mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SavedSettings {
    pub enabled_types: EnabledTypes,
    pub scanner_settings: ScannerSettings,
}
