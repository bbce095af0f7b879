//! # Engine Adapter
//!
//! Translates scanner settings and enabled types into [`ScanEngine`] calls.
//! Stateless: every function takes the engine and the values to push.
//!
//! ## Call Map
//! ```text
//! ┌──────────────────────┬──────────────────────────────────────────────────┐
//! │ Input                │ Engine calls                                     │
//! ├──────────────────────┼──────────────────────────────────────────────────┤
//! │ EnabledTypes + mode  │ configure(decoders), custom option               │
//! │                      │ "enable_ocr_functionality" (1 only in VIN)       │
//! │ ScannerSettings      │ one setter per flag, ROI box, AR (AR mode only), │
//! │                      │ duplicate threshold (continuous only)            │
//! │ image flags          │ image result + thumbnail, off only while         │
//! │                      │ continuous with threshold < 10                   │
//! │ mode extras          │ MultiScan caching, VIN restrictions, DPM, AR     │
//! │                      │ colors, DotCode type + ROI                       │
//! └──────────────────────┴──────────────────────────────────────────────────┘
//! ```

use scanline_core::{
    ArHeaderShowMode, ArMode, DecoderConfigMap, EnabledTypes, RegionOfInterest, ScanMode,
    ScannerSettings, SettingUpdate, Symbology,
};

use crate::config::MultiscanConfig;
use crate::engine::{EngineConfig, ScanEngine};

/// Engine custom option gating text recognition.
pub const OCR_OPTION: &str = "enable_ocr_functionality";

/// AR highlight for the selected code.
pub const AR_SELECTED_COLOR: &str = "#00FF00";

/// AR highlight for every other code.
pub const AR_NON_SELECTED_COLOR: &str = "#FF0000";

/// Value of [`OCR_OPTION`] for the given state.
pub fn ocr_option_value(enabled: &EnabledTypes, mode: ScanMode) -> i32 {
    i32::from(mode.allows_ocr() && enabled.is_enabled(Symbology::OcrText))
}

// =============================================================================
// Full Configuration
// =============================================================================

/// Initial configuration of a freshly created engine view.
pub fn configure(
    engine: &dyn ScanEngine,
    settings: &ScannerSettings,
    enabled: &EnabledTypes,
    mode: ScanMode,
) {
    engine.configure(&EngineConfig::full(
        DecoderConfigMap::from_enabled(enabled, mode),
        settings.should_enable_images(),
    ));
    engine.set_custom_option(OCR_OPTION, ocr_option_value(enabled, mode));
    apply_settings(engine, settings, mode);
}

/// Pushes every setting to the engine.
///
/// Does not start or stop scanning.
pub fn apply_settings(engine: &dyn ScanEngine, settings: &ScannerSettings, mode: ScanMode) {
    push_image_flags(engine, settings);

    engine.set_composite_enabled(settings.composite_mode);
    engine.set_pinch_to_zoom_enabled(settings.pinch_to_zoom);
    engine.set_location_in_preview_enabled(settings.location_in_preview);
    apply_region_of_interest(engine, settings.region_of_interest, mode);
    engine.set_beep_on_success_enabled(settings.beep_on_success);
    engine.set_vibrate_on_success_enabled(settings.vibrate_on_success);
    engine.set_upc_ean_deblur_enabled(settings.scan_blurred);
    engine.set_misshaped_1d_enabled(settings.scan_deformed);
    engine.set_close_session_on_result_enabled(!settings.continuous_scanning);
    engine.set_decoding_speed(settings.decoding_speed);
    engine.set_resolution(settings.resolution);

    if mode == ScanMode::ArMode {
        let ar = settings.ar_or_default();
        engine.set_ar_mode(ar.mode);
        engine.set_ar_location_type(ar.location_type);
        engine.set_ar_header_show_mode(ar.header_show_mode);
        engine.set_ar_overlay_refresh(ar.overlay_refresh);
        engine.set_ar_double_tap_to_freeze_enabled(ar.double_tap_to_freeze);
    }

    if settings.continuous_scanning {
        engine.set_threshold_between_duplicate_scans(settings.effective_threshold());
    }
}

/// Re-pushes the whole decoder map after a type toggle.
pub fn push_decoders(engine: &dyn ScanEngine, enabled: &EnabledTypes, mode: ScanMode) {
    engine.configure(&EngineConfig::decoders_only(DecoderConfigMap::from_enabled(
        enabled, mode,
    )));
    engine.set_custom_option(OCR_OPTION, ocr_option_value(enabled, mode));
}

pub fn push_image_flags(engine: &dyn ScanEngine, settings: &ScannerSettings) {
    let images = settings.should_enable_images();
    engine.set_image_result_enabled(images);
    engine.set_thumbnail_on_result_enabled(images);
}

fn apply_region_of_interest(engine: &dyn ScanEngine, visible: bool, mode: ScanMode) {
    engine.set_region_of_interest_visible(visible);
    if visible {
        // VIN and DPM keep the box set by their mode extras
        if let Some(roi) = mode.toggled_roi() {
            engine.set_region_of_interest(roi);
        }
    }
}

// =============================================================================
// Single Setting
// =============================================================================

/// Pushes one edited setting.
///
/// `settings` is the record after the update was applied. Restart
/// sequencing is left to the controller.
pub fn apply_setting(
    engine: &dyn ScanEngine,
    update: SettingUpdate,
    settings: &ScannerSettings,
    mode: ScanMode,
) {
    match update {
        SettingUpdate::CompositeMode(on) => engine.set_composite_enabled(on),
        SettingUpdate::PinchToZoom(on) => engine.set_pinch_to_zoom_enabled(on),
        SettingUpdate::LocationInPreview(on) => engine.set_location_in_preview_enabled(on),
        SettingUpdate::RegionOfInterest(on) => apply_region_of_interest(engine, on, mode),
        SettingUpdate::BeepOnSuccess(on) => engine.set_beep_on_success_enabled(on),
        SettingUpdate::VibrateOnSuccess(on) => engine.set_vibrate_on_success_enabled(on),
        SettingUpdate::ScanBlurred(on) => engine.set_upc_ean_deblur_enabled(on),
        SettingUpdate::ScanDeformed(on) => engine.set_misshaped_1d_enabled(on),
        SettingUpdate::ContinuousScanning(on) => {
            engine.set_close_session_on_result_enabled(!on);
            if on {
                engine.set_threshold_between_duplicate_scans(settings.effective_threshold());
            }
        }
        SettingUpdate::DecodingSpeed(speed) => engine.set_decoding_speed(speed),
        SettingUpdate::Resolution(resolution) => engine.set_resolution(resolution),
        SettingUpdate::ContinuousThreshold(seconds) => {
            engine.set_threshold_between_duplicate_scans(seconds)
        }
        SettingUpdate::ArMode(ar_mode) => engine.set_ar_mode(ar_mode),
        SettingUpdate::ArLocationType(location) => engine.set_ar_location_type(location),
        SettingUpdate::ArHeaderShowMode(show) => engine.set_ar_header_show_mode(show),
        SettingUpdate::ArOverlayRefresh(refresh) => engine.set_ar_overlay_refresh(refresh),
        SettingUpdate::ArDoubleTapToFreeze(on) => engine.set_ar_double_tap_to_freeze_enabled(on),
        // UI-only
        SettingUpdate::ShowResultSheet(_) => {}
    }
}

// =============================================================================
// Mode Extras
// =============================================================================

/// Mode-specific engine setup that has no user-facing setting.
pub fn apply_mode_extras(engine: &dyn ScanEngine, mode: ScanMode, multiscan: &MultiscanConfig) {
    match mode {
        ScanMode::Multiscan => {
            engine.set_maximum_results_count(multiscan.max_results);
            engine.set_multicode_caching_duration(multiscan.caching_duration_ms);
            engine.set_multicode_caching_enabled(true);
        }
        ScanMode::Vin => {
            engine.set_vin_restrictions_enabled(true);
            engine.set_region_of_interest(RegionOfInterest::VIN);
        }
        ScanMode::Dpm => {
            engine.set_barcode_type_enabled(Symbology::Datamatrix, true);
            engine.set_datamatrix_dpm_mode_enabled(true);
            engine.set_region_of_interest(RegionOfInterest::DPM);
        }
        ScanMode::ArMode => {
            engine.set_ar_mode(ArMode::InteractiveEnabled);
            engine.set_ar_selected_location_color(AR_SELECTED_COLOR);
            engine.set_ar_non_selected_location_color(AR_NON_SELECTED_COLOR);
            engine.set_ar_header_show_mode(ArHeaderShowMode::OnSelected);
        }
        ScanMode::Dotcode => {
            engine.set_barcode_type_enabled(Symbology::Dotcode, true);
            engine.set_region_of_interest(RegionOfInterest::DOTCODE);
        }
        ScanMode::V1
        | ScanMode::Mode1D
        | ScanMode::Mode2D
        | ScanMode::Continuous
        | ScanMode::Deblur
        | ScanMode::Mrz
        | ScanMode::Gallery => {}
    }
}
