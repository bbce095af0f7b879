//! # Scanner Settings
//!
//! The user-editable scanner configuration and the typed updates applied to it.
//!
//! ## Update Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   UI toggle ──► SettingUpdate ──► validate() ──► apply(&mut settings)  │
//! │                 { key, value }       │                                  │
//! │                                      └── Err ─► nothing changes        │
//! │                                                                         │
//! │   The session then pushes the matching engine setter for `key()`.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::validate_continuous_threshold;
use crate::IMAGE_CAPTURE_MIN_THRESHOLD;

// =============================================================================
// Engine Enumerations
// =============================================================================

/// How hard the engine works on each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum DecodingSpeed {
    Fast,
    Normal,
    Slow,
    Rigorous,
}

/// Camera capture resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[allow(clippy::upper_case_acronyms)]
pub enum Resolution {
    HD,
    FHD,
}

/// Augmented-reality overlay behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum ArMode {
    Off,
    InteractiveDisabled,
    InteractiveEnabled,
    NonInteractive,
}

/// Shape drawn around each barcode in the AR overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum ArLocationType {
    None,
    Tight,
    BoundingBox,
}

/// When the AR header (decoded text) is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum ArHeaderShowMode {
    Never,
    Always,
    OnSelected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum ArOverlayRefresh {
    Smooth,
    Normal,
}

// =============================================================================
// AR Settings
// =============================================================================

/// Sub-settings that only matter in AR mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ArSettings {
    pub mode: ArMode,
    pub location_type: ArLocationType,
    pub header_show_mode: ArHeaderShowMode,
    pub overlay_refresh: ArOverlayRefresh,
    pub double_tap_to_freeze: bool,
}

impl Default for ArSettings {
    fn default() -> Self {
        ArSettings {
            mode: ArMode::InteractiveEnabled,
            location_type: ArLocationType::None,
            header_show_mode: ArHeaderShowMode::OnSelected,
            overlay_refresh: ArOverlayRefresh::Normal,
            double_tap_to_freeze: false,
        }
    }
}

// =============================================================================
// Scanner Settings
// =============================================================================

/// Scanner settings for one mode, as edited in the settings panel and
/// persisted per mode.
///
/// Missing fields in a persisted document fall back to the base record
/// ([`ScannerSettings::default`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct ScannerSettings {
    pub composite_mode: bool,
    pub pinch_to_zoom: bool,
    pub location_in_preview: bool,
    pub region_of_interest: bool,
    pub beep_on_success: bool,
    pub vibrate_on_success: bool,
    pub scan_blurred: bool,
    pub scan_deformed: bool,
    pub continuous_scanning: bool,
    pub decoding_speed: DecodingSpeed,
    pub resolution: Resolution,

    /// Seconds between duplicate reports, `-1` for unlimited.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub continuous_threshold: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub ar: Option<ArSettings>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub show_result_sheet: Option<bool>,
}

impl Default for ScannerSettings {
    /// The base record every mode starts from.
    fn default() -> Self {
        ScannerSettings {
            composite_mode: false,
            pinch_to_zoom: true,
            location_in_preview: true,
            region_of_interest: false,
            beep_on_success: true,
            vibrate_on_success: true,
            scan_blurred: false,
            scan_deformed: false,
            continuous_scanning: false,
            decoding_speed: DecodingSpeed::Normal,
            resolution: Resolution::HD,
            continuous_threshold: Some(0),
            ar: None,
            show_result_sheet: Some(true),
        }
    }
}

impl ScannerSettings {
    /// Duplicate threshold with the unset case read as `0`.
    #[inline]
    pub fn effective_threshold(&self) -> i32 {
        self.continuous_threshold.unwrap_or(0)
    }

    /// Whether the engine should capture full images and thumbnails.
    ///
    /// Capture is off only while continuous scanning runs with a threshold
    /// below [`IMAGE_CAPTURE_MIN_THRESHOLD`].
    pub fn should_enable_images(&self) -> bool {
        !(self.continuous_scanning && self.effective_threshold() < IMAGE_CAPTURE_MIN_THRESHOLD)
    }

    /// AR sub-settings, or the AR defaults when none were stored.
    pub fn ar_or_default(&self) -> ArSettings {
        self.ar.unwrap_or_default()
    }
}

// =============================================================================
// Setting Keys & Updates
// =============================================================================

/// Identifies one editable setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum SettingKey {
    CompositeMode,
    PinchToZoom,
    LocationInPreview,
    RegionOfInterest,
    BeepOnSuccess,
    VibrateOnSuccess,
    ScanBlurred,
    ScanDeformed,
    ContinuousScanning,
    DecodingSpeed,
    Resolution,
    ContinuousThreshold,
    ArMode,
    ArLocationType,
    ArHeaderShowMode,
    ArOverlayRefresh,
    ArDoubleTapToFreeze,
    ShowResultSheet,
}

/// A single setting change coming from the settings panel.
///
/// Serialized as `{ "key": "continuousThreshold", "value": 5 }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "key", content = "value", rename_all = "camelCase")]
pub enum SettingUpdate {
    CompositeMode(bool),
    PinchToZoom(bool),
    LocationInPreview(bool),
    RegionOfInterest(bool),
    BeepOnSuccess(bool),
    VibrateOnSuccess(bool),
    ScanBlurred(bool),
    ScanDeformed(bool),
    ContinuousScanning(bool),
    DecodingSpeed(DecodingSpeed),
    Resolution(Resolution),
    ContinuousThreshold(i32),
    ArMode(ArMode),
    ArLocationType(ArLocationType),
    ArHeaderShowMode(ArHeaderShowMode),
    ArOverlayRefresh(ArOverlayRefresh),
    ArDoubleTapToFreeze(bool),
    ShowResultSheet(bool),
}

impl SettingUpdate {
    pub fn key(&self) -> SettingKey {
        match self {
            SettingUpdate::CompositeMode(_) => SettingKey::CompositeMode,
            SettingUpdate::PinchToZoom(_) => SettingKey::PinchToZoom,
            SettingUpdate::LocationInPreview(_) => SettingKey::LocationInPreview,
            SettingUpdate::RegionOfInterest(_) => SettingKey::RegionOfInterest,
            SettingUpdate::BeepOnSuccess(_) => SettingKey::BeepOnSuccess,
            SettingUpdate::VibrateOnSuccess(_) => SettingKey::VibrateOnSuccess,
            SettingUpdate::ScanBlurred(_) => SettingKey::ScanBlurred,
            SettingUpdate::ScanDeformed(_) => SettingKey::ScanDeformed,
            SettingUpdate::ContinuousScanning(_) => SettingKey::ContinuousScanning,
            SettingUpdate::DecodingSpeed(_) => SettingKey::DecodingSpeed,
            SettingUpdate::Resolution(_) => SettingKey::Resolution,
            SettingUpdate::ContinuousThreshold(_) => SettingKey::ContinuousThreshold,
            SettingUpdate::ArMode(_) => SettingKey::ArMode,
            SettingUpdate::ArLocationType(_) => SettingKey::ArLocationType,
            SettingUpdate::ArHeaderShowMode(_) => SettingKey::ArHeaderShowMode,
            SettingUpdate::ArOverlayRefresh(_) => SettingKey::ArOverlayRefresh,
            SettingUpdate::ArDoubleTapToFreeze(_) => SettingKey::ArDoubleTapToFreeze,
            SettingUpdate::ShowResultSheet(_) => SettingKey::ShowResultSheet,
        }
    }

    /// Checks the value without touching any settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match *self {
            SettingUpdate::ContinuousThreshold(value) => validate_continuous_threshold(value),
            _ => Ok(()),
        }
    }

    /// Validates and merges this update into `settings`.
    ///
    /// On error `settings` is left untouched.
    pub fn apply(&self, settings: &mut ScannerSettings) -> Result<(), ValidationError> {
        self.validate()?;

        match *self {
            SettingUpdate::CompositeMode(v) => settings.composite_mode = v,
            SettingUpdate::PinchToZoom(v) => settings.pinch_to_zoom = v,
            SettingUpdate::LocationInPreview(v) => settings.location_in_preview = v,
            SettingUpdate::RegionOfInterest(v) => settings.region_of_interest = v,
            SettingUpdate::BeepOnSuccess(v) => settings.beep_on_success = v,
            SettingUpdate::VibrateOnSuccess(v) => settings.vibrate_on_success = v,
            SettingUpdate::ScanBlurred(v) => settings.scan_blurred = v,
            SettingUpdate::ScanDeformed(v) => settings.scan_deformed = v,
            SettingUpdate::ContinuousScanning(v) => settings.continuous_scanning = v,
            SettingUpdate::DecodingSpeed(v) => settings.decoding_speed = v,
            SettingUpdate::Resolution(v) => settings.resolution = v,
            SettingUpdate::ContinuousThreshold(v) => settings.continuous_threshold = Some(v),
            SettingUpdate::ArMode(v) => settings.ar.get_or_insert_with(ArSettings::default).mode = v,
            SettingUpdate::ArLocationType(v) => {
                settings.ar.get_or_insert_with(ArSettings::default).location_type = v
            }
            SettingUpdate::ArHeaderShowMode(v) => {
                settings.ar.get_or_insert_with(ArSettings::default).header_show_mode = v
            }
            SettingUpdate::ArOverlayRefresh(v) => {
                settings.ar.get_or_insert_with(ArSettings::default).overlay_refresh = v
            }
            SettingUpdate::ArDoubleTapToFreeze(v) => {
                settings.ar.get_or_insert_with(ArSettings::default).double_tap_to_freeze = v
            }
            SettingUpdate::ShowResultSheet(v) => settings.show_result_sheet = Some(v),
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
