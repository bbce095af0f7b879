//! # scanline-core: Pure Scanner Logic for Scanline
//!
//! This crate is the **heart** of Scanline. It holds everything about the
//! scanner configuration that can be expressed without touching the engine,
//! the file system or a clock.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Scanline Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile UI (React Native)                     │   │
//! │  │    Home Grid ──► Scanner Screen ──► Result Sheet ──► History    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 scanline-session (controller)                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ scanline-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ symbology │  │   mode    │  │ settings  │  │ registry  │  │   │
//! │  │   │  catalog  │  │ ScanMode  │  │ Scanner-  │  │ defaults  │  │   │
//! │  │   │  1D / 2D  │  │  "vin"..  │  │ Settings  │  │ per mode  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO ENGINE • NO CLOCK • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                scanline-store (JSON documents)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`symbology`] - The static barcode catalog (30 1D + 11 2D families)
//! - [`mode`] - Scanning modes selected from the home screen
//! - [`settings`] - Scanner settings record and typed setting updates
//! - [`registry`] - Per-mode default settings and enabled symbologies
//! - [`decoder`] - Decoder configuration shapes pushed to the engine
//! - [`types`] - Scan results, history records, persisted bundles
//! - [`export`] - CSV export of scanned items
//! - [`validation`] - Setting value validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use scanline_core::registry::{default_enabled_types, default_settings};
//! use scanline_core::{ScanMode, Symbology};
//!
//! let mode: ScanMode = "vin".parse().unwrap();
//! let enabled = default_enabled_types(mode);
//! assert!(enabled.is_enabled(Symbology::OcrText));
//!
//! let settings = default_settings(ScanMode::Multiscan);
//! assert!(settings.continuous_scanning);
//! assert_eq!(settings.continuous_threshold, Some(-1));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod decoder;
pub mod error;
pub mod export;
pub mod mode;
pub mod registry;
pub mod settings;
pub mod symbology;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use decoder::{DecoderClass, DecoderConfig, DecoderConfigMap, MasterChecksum};
pub use error::{CoreError, CoreResult, ValidationError};
pub use mode::{RegionOfInterest, ScanMode};
pub use settings::{
    ArHeaderShowMode, ArLocationType, ArMode, ArOverlayRefresh, ArSettings, DecodingSpeed,
    Resolution, ScannerSettings, SettingKey, SettingUpdate,
};
pub use symbology::{EnabledTypes, Symbology, SymbologyFamily};
pub use types::{HistoryRecord, ImageRef, NewScan, SavedSettings, ScannedItem};
pub use export::items_to_csv;
pub use symbology::is_one_dimensional;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Lowest accepted duplicate threshold. `-1` disables duplicate filtering.
pub const MIN_CONTINUOUS_THRESHOLD: i32 = -1;

/// Highest accepted duplicate threshold, in seconds.
pub const MAX_CONTINUOUS_THRESHOLD: i32 = 10;

/// Threshold at which image capture stays on during continuous scanning.
///
/// Below this value results arrive fast enough that grabbing a full frame and
/// a thumbnail for every one of them costs more than it is worth.
pub const IMAGE_CAPTURE_MIN_THRESHOLD: i32 = 10;
