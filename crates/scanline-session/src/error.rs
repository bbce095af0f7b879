//! # Session Error Types
//!
//! Error types for scanner sessions and their configuration.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Session Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │     Domain      │  │       Runtime           │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Core           │  │  ChannelClosed          │ │
//! │  │  ConfigLoad     │  │  (validation,   │  │  Store                  │ │
//! │  │  ConfigSave     │  │   unknown mode) │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use scanline_core::{CoreError, ValidationError};
use scanline_store::StoreError;
use thiserror::Error;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Session error type.
#[derive(Debug, Error)]
pub enum SessionError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid session configuration.
    #[error("Invalid session configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Domain Errors
    // =========================================================================
    /// Rejected by the core domain (unknown mode, out-of-range setting).
    ///
    /// ## When This Occurs
    /// - `update_setting` with a duplicate threshold outside `-1..=10`
    /// - parsing a mode identifier that does not exist
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // Runtime Errors
    // =========================================================================
    /// Persistence failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The session actor is gone (shut down or panicked).
    #[error("Channel error: {0}")]
    ChannelClosed(String),
}

impl From<ValidationError> for SessionError {
    fn from(err: ValidationError) -> Self {
        SessionError::Core(CoreError::Validation(err))
    }
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        SessionError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SessionError {
    fn from(err: toml::de::Error) -> Self {
        SessionError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for SessionError {
    fn from(err: toml::ser::Error) -> Self {
        SessionError::ConfigSaveFailed(err.to_string())
    }
}
