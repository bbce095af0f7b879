//! # Store Error Types
//!
//! Error types for document and blob operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / serde_json::Error / base64 DecodeError               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds the path that failed                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SessionError (scanline-session) ← Logged, never shown to the user     │
//! │                                                                         │
//! │  Parse failures of an existing document are NOT errors: the store      │
//! │  logs them and treats the document as empty.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a file failed.
    ///
    /// ## When This Occurs
    /// - Data directory missing and cannot be created
    /// - File permissions issue
    /// - Disk full
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document could not be serialized for writing.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A data-URI image did not carry valid base64.
    ///
    /// ## When This Occurs
    /// - The engine or picker handed over a truncated payload
    #[error("Invalid image payload: {0}")]
    InvalidImage(String),

    /// No platform data directory could be determined.
    #[error("No data directory available on this platform")]
    NoDataDirectory,
}

impl StoreError {
    /// Wraps an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<base64::DecodeError> for StoreError {
    fn from(err: base64::DecodeError) -> Self {
        StoreError::InvalidImage(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
