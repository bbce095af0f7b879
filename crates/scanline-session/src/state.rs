//! # Session State
//!
//! The pause state machine and the snapshot the UI renders.
//!
//! ## Phases
//! ```text
//!            view ready / resume
//!   ┌──────┐ ──────────────────► ┌──────────┐
//!   │ Idle │                     │ Scanning │ ◄──────────────────┐
//!   └──────┘ ◄────── stop ────── └──────────┘                    │
//!                                     │                          │
//!                                     │ result while             │ resume /
//!                                     │ continuous is off        │ dismiss /
//!                                     ▼                          │ continuous on
//!                                ┌──────────┐                    │
//!                                │  Paused  │ ───────────────────┘
//!                                └──────────┘
//!                                frozen frame = full result image
//! ```

use scanline_core::{EnabledTypes, ImageRef, ScanMode, ScannedItem, ScannerSettings};
use serde::Serialize;
use ts_rs::TS;

// =============================================================================
// Phase & Pause
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum ScanPhase {
    #[default]
    Idle,
    Scanning,
    Paused,
}

/// Pause bookkeeping.
///
/// A frozen frame exists only while paused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    phase: ScanPhase,
    frozen_frame: Option<ImageRef>,
}

impl SessionState {
    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.phase == ScanPhase::Paused
    }

    pub fn frozen_frame(&self) -> Option<&ImageRef> {
        self.frozen_frame.as_ref()
    }

    pub(crate) fn set_scanning(&mut self) {
        self.phase = ScanPhase::Scanning;
        self.frozen_frame = None;
    }

    pub(crate) fn set_idle(&mut self) {
        self.phase = ScanPhase::Idle;
        self.frozen_frame = None;
    }

    /// Pauses on a result. Without a full image the previous frame is kept.
    pub(crate) fn pause(&mut self, frame: Option<ImageRef>) {
        self.phase = ScanPhase::Paused;
        if frame.is_some() {
            self.frozen_frame = frame;
        }
    }

    /// Leaves the paused state without touching the engine.
    pub(crate) fn clear_pause(&mut self) {
        if self.phase == ScanPhase::Paused {
            self.phase = ScanPhase::Idle;
        }
        self.frozen_frame = None;
    }
}

// =============================================================================
// Camera Controls
// =============================================================================

pub const ZOOM_NORMAL: f32 = 1.0;
pub const ZOOM_CLOSE: f32 = 1.5;
pub const BACK_CAMERA: u8 = 0;
pub const FRONT_CAMERA: u8 = 1;

/// Flash, zoom and camera selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CameraControls {
    pub flash_on: bool,
    pub zoom: f32,
    pub camera_id: u8,
}

impl Default for CameraControls {
    fn default() -> Self {
        CameraControls {
            flash_on: false,
            zoom: ZOOM_NORMAL,
            camera_id: BACK_CAMERA,
        }
    }
}

impl CameraControls {
    pub fn toggle_flash(&mut self) -> bool {
        self.flash_on = !self.flash_on;
        self.flash_on
    }

    pub fn toggle_zoom(&mut self) -> f32 {
        self.zoom = if self.zoom == ZOOM_NORMAL {
            ZOOM_CLOSE
        } else {
            ZOOM_NORMAL
        };
        self.zoom
    }

    pub fn toggle_camera(&mut self) -> u8 {
        self.camera_id = if self.camera_id == BACK_CAMERA {
            FRONT_CAMERA
        } else {
            BACK_CAMERA
        };
        self.camera_id
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Everything the scanner screen renders.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub mode: ScanMode,
    pub phase: ScanPhase,
    pub is_paused: bool,
    #[ts(optional)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frozen_frame: Option<ImageRef>,
    pub settings: ScannerSettings,
    pub enabled_types: EnabledTypes,
    /// Most recent first.
    pub items: Vec<ScannedItem>,
    pub camera: CameraControls,
    /// Enabled symbology labels, e.g. `"Code 128, QR"`.
    pub active_types: String,
}
