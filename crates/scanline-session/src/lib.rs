//! # scanline-session: Scanner Session Orchestration for Scanline
//!
//! Drives one scanner screen against the barcode engine: pushes the mode's
//! configuration, receives results, pauses and resumes, debounces settings
//! persistence and records history.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Scanline Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile UI (React Native)                     │   │
//! │  └───────────┬──────────────────────────────────▲──────────────────┘   │
//! │      commands│                                  │SessionSnapshot       │
//! │  ┌───────────▼──────────────────────────────────┴──────────────────┐   │
//! │  │              ★ scanline-session (THIS CRATE) ★                  │   │
//! │  │                                                                 │   │
//! │  │  ScannerSessionHandle ──mpsc──► ScannerSession (actor task)     │   │
//! │  │                                   │                             │   │
//! │  │                                   ▼                             │   │
//! │  │                           ScannerController ──► adapter         │   │
//! │  │                            (Effects, timers)      │             │   │
//! │  │                                                   ▼             │   │
//! │  │                                           dyn ScanEngine        │   │
//! │  └───────────┬─────────────────────────────────────────────────────┘   │
//! │              │                                                          │
//! │  ┌───────────▼─────────────┐      ┌─────────────────────────────┐      │
//! │  │ scanline-store          │      │ scanline-core               │      │
//! │  │ settings + history      │      │ modes, registry, decoders   │      │
//! │  └─────────────────────────┘      └─────────────────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`session`] - Actor task and its handle
//! - [`controller`] - Synchronous session state machine
//! - [`adapter`] - Settings to engine setter calls
//! - [`engine`] - The opaque engine seam
//! - [`picker`] - The photo library seam
//! - [`gallery`] - One-off home-screen photo scan
//! - [`recorder`] - Ordered history writer
//! - [`state`] - Scan phase, camera controls, UI snapshot
//! - [`events`] - Notices and the event emitter seam
//! - [`config`] - TOML + environment configuration
//! - [`logging`] - Tracing subscriber setup
//! - [`error`] - Session error type

// =============================================================================
// Module Declarations
// =============================================================================

pub mod adapter;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod events;
pub mod gallery;
pub mod logging;
pub mod picker;
pub mod recorder;
pub mod session;
pub mod state;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{MultiscanConfig, SessionConfig, StorageConfig, TimingConfig};
pub use controller::{Effect, PendingImageScan, ScannerController};
pub use engine::{DecoderResult, EngineConfig, EngineResult, ResultSink, ScanEngine};
pub use error::{SessionError, SessionResult};
pub use events::{NoOpEmitter, Notice, SessionEventEmitter};
pub use gallery::GalleryScanner;
pub use logging::init_tracing;
pub use picker::{ImagePicker, PickRequest, PickResponse, PickedImage};
pub use recorder::HistoryRecorder;
pub use session::{ScannerSession, ScannerSessionHandle, SessionDeps};
pub use state::{CameraControls, ScanPhase, SessionSnapshot, SessionState};
