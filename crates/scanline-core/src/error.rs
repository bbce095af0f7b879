//! # Error Types
//!
//! Domain-specific error types for scanline-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  scanline-core errors (this file)                                      │
//! │  ├── CoreError        - Unknown identifiers, rejected updates          │
//! │  └── ValidationError  - Setting values outside their domain            │
//! │                                                                         │
//! │  scanline-store errors (separate crate)                                │
//! │  └── StoreError       - Document and blob I/O failures                 │
//! │                                                                         │
//! │  scanline-session errors (separate crate)                              │
//! │  └── SessionError     - Config, channel and wrapped lower errors       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SessionError → UI                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core scanner logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A mode identifier that is not part of the mode catalog.
    ///
    /// ## When This Occurs
    /// - Navigation passed a mode string the app does not know
    /// - A config file names a removed mode
    ///
    /// The registry is total over [`ScanMode`](crate::ScanMode), so this can
    /// only happen at the string boundary.
    #[error("Unknown scan mode: {0}")]
    UnknownMode(String),

    /// A symbology identifier that is not part of the static catalog.
    #[error("Unknown symbology: {0}")]
    UnknownSymbology(String),

    /// CSV export failed while writing a row.
    #[error("Export error: {0}")]
    Export(#[from] csv::Error),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Setting validation errors.
///
/// These are raised before a setting update touches any state, so a rejected
/// update leaves the session exactly as it was.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        value: i64,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
