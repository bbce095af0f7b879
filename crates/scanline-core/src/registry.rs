//! # Mode Registry
//!
//! Default enabled symbologies and default settings for every scan mode.
//!
//! Both functions are total over [`ScanMode`]: adding a mode without
//! deciding its defaults is a compile error, not a silent fallback.
//!
//! ```text
//! ┌─────────────┬──────────────────────────────────────┬───────────────────────────────┐
//! │ Mode        │ Enabled symbologies                  │ Settings over the base record │
//! ├─────────────┼──────────────────────────────────────┼───────────────────────────────┤
//! │ mode_1d     │ whole 1D family                      │ -                             │
//! │ mode_2d     │ 2D family minus ocrText              │ -                             │
//! │ continuous  │ everything minus ocrText             │ continuous                    │
//! │ v1          │ everything minus ocrText             │ -                             │
//! │ multiscan   │ common set                           │ continuous, threshold -1      │
//! │ vin         │ code39 code128 qr datamatrix ocrText │ slow, FHD, ROI, deformed      │
//! │ dpm         │ common set                           │ slow, FHD, ROI                │
//! │ deblur      │ common set                           │ blurred, deformed             │
//! │ dotcode     │ dotcode                              │ ROI, slow, continuous         │
//! │ ar_mode     │ qr code128 code39 upcA upcE ean13/8  │ FHD, slow, continuous, AR     │
//! │ mrz         │ idDocument                           │ continuous off                │
//! │ gallery     │ common set                           │ rigorous                      │
//! └─────────────┴──────────────────────────────────────┴───────────────────────────────┘
//!   common set = ean13 upcA code128 qr datamatrix
//! ```

use crate::mode::ScanMode;
use crate::settings::{ArSettings, DecodingSpeed, Resolution, ScannerSettings};
use crate::symbology::{EnabledTypes, Symbology, SymbologyFamily};

/// Enabled in every mode without a dedicated set.
const COMMON_SET: &[Symbology] = &[
    Symbology::Ean13,
    Symbology::UpcA,
    Symbology::Code128,
    Symbology::Qr,
    Symbology::Datamatrix,
];

const VIN_SET: &[Symbology] = &[
    Symbology::Code39,
    Symbology::Code128,
    Symbology::Qr,
    Symbology::Datamatrix,
    Symbology::OcrText,
];

const AR_SET: &[Symbology] = &[
    Symbology::Qr,
    Symbology::Code128,
    Symbology::Code39,
    Symbology::UpcA,
    Symbology::UpcE,
    Symbology::Ean13,
    Symbology::Ean8,
];

/// Symbologies switched on when a mode is opened for the first time.
pub fn default_enabled_types(mode: ScanMode) -> EnabledTypes {
    match mode {
        ScanMode::Mode1D => EnabledTypes::from_fn(|s| s.family() == SymbologyFamily::OneD),
        ScanMode::Mode2D => EnabledTypes::from_fn(|s| {
            s.family() == SymbologyFamily::TwoD && s != Symbology::OcrText
        }),
        ScanMode::Continuous | ScanMode::V1 => {
            EnabledTypes::from_fn(|s| s != Symbology::OcrText)
        }
        ScanMode::Dotcode => EnabledTypes::from_fn(|s| s == Symbology::Dotcode),
        ScanMode::Mrz => EnabledTypes::from_fn(|s| s == Symbology::IdDocument),
        ScanMode::Vin => EnabledTypes::from_fn(|s| VIN_SET.contains(&s)),
        ScanMode::ArMode => EnabledTypes::from_fn(|s| AR_SET.contains(&s)),
        ScanMode::Multiscan
        | ScanMode::Dpm
        | ScanMode::Deblur
        | ScanMode::Gallery => EnabledTypes::from_fn(|s| COMMON_SET.contains(&s)),
    }
}

/// Settings a mode starts with: the base record plus the mode's overrides.
pub fn default_settings(mode: ScanMode) -> ScannerSettings {
    let base = ScannerSettings::default();

    match mode {
        ScanMode::V1 | ScanMode::Mode1D | ScanMode::Mode2D => base,
        ScanMode::Continuous => ScannerSettings {
            continuous_scanning: true,
            ..base
        },
        ScanMode::Multiscan => ScannerSettings {
            continuous_scanning: true,
            continuous_threshold: Some(-1),
            ..base
        },
        ScanMode::Vin => ScannerSettings {
            decoding_speed: DecodingSpeed::Slow,
            resolution: Resolution::FHD,
            region_of_interest: true,
            scan_deformed: true,
            ..base
        },
        ScanMode::Dpm => ScannerSettings {
            decoding_speed: DecodingSpeed::Slow,
            resolution: Resolution::FHD,
            region_of_interest: true,
            ..base
        },
        ScanMode::Mrz => ScannerSettings {
            continuous_scanning: false,
            ..base
        },
        ScanMode::ArMode => ScannerSettings {
            resolution: Resolution::FHD,
            decoding_speed: DecodingSpeed::Slow,
            continuous_scanning: true,
            ar: Some(ArSettings::default()),
            ..base
        },
        ScanMode::Gallery => ScannerSettings {
            decoding_speed: DecodingSpeed::Rigorous,
            ..base
        },
        ScanMode::Dotcode => ScannerSettings {
            region_of_interest: true,
            decoding_speed: DecodingSpeed::Slow,
            continuous_scanning: true,
            ..base
        },
        ScanMode::Deblur => ScannerSettings {
            scan_blurred: true,
            scan_deformed: true,
            ..base
        },
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{ArHeaderShowMode, ArLocationType, ArMode, ArOverlayRefresh};

    #[test]
    fn test_every_mode_covers_catalog() {
        for mode in ScanMode::ALL {
            let types = default_enabled_types(mode);
            assert_eq!(types.iter().count(), Symbology::ALL.len(), "{mode}");
        }
    }

    #[test]
    fn test_dotcode_exactly_one() {
        let types = default_enabled_types(ScanMode::Dotcode);
        assert_eq!(types.enabled().collect::<Vec<_>>(), vec![Symbology::Dotcode]);
    }

    #[test]
    fn test_vin_set() {
        let enabled: Vec<_> = default_enabled_types(ScanMode::Vin).enabled().collect();
        assert_eq!(
            enabled,
            vec![
                Symbology::Code128,
                Symbology::Code39,
                Symbology::Datamatrix,
                Symbology::OcrText,
                Symbology::Qr,
            ]
        );
    }

    #[test]
    fn test_ocr_only_in_vin() {
        for mode in ScanMode::ALL {
            let ocr = default_enabled_types(mode).is_enabled(Symbology::OcrText);
            assert_eq!(ocr, mode == ScanMode::Vin, "{mode}");
        }
    }

    #[test]
    fn test_family_modes() {
        let one_d = default_enabled_types(ScanMode::Mode1D);
        assert_eq!(one_d.enabled_count(), 30);
        assert!(!one_d.is_enabled(Symbology::Qr));

        let two_d = default_enabled_types(ScanMode::Mode2D);
        assert_eq!(two_d.enabled_count(), 10);
        assert!(!two_d.is_enabled(Symbology::Ean13));

        assert_eq!(default_enabled_types(ScanMode::V1).enabled_count(), 40);
        assert_eq!(default_enabled_types(ScanMode::Gallery).enabled_count(), 5);
        assert_eq!(default_enabled_types(ScanMode::ArMode).enabled_count(), 7);
        assert!(default_enabled_types(ScanMode::Mrz).is_enabled(Symbology::IdDocument));
    }

    #[test]
    fn test_multiscan_defaults() {
        let settings = default_settings(ScanMode::Multiscan);
        assert!(settings.continuous_scanning);
        assert_eq!(settings.continuous_threshold, Some(-1));
        assert!(!settings.should_enable_images());
    }

    #[test]
    fn test_vin_and_dpm_defaults() {
        let vin = default_settings(ScanMode::Vin);
        assert_eq!(vin.decoding_speed, DecodingSpeed::Slow);
        assert_eq!(vin.resolution, Resolution::FHD);
        assert!(vin.region_of_interest && vin.scan_deformed);

        let dpm = default_settings(ScanMode::Dpm);
        assert!(dpm.region_of_interest);
        assert!(!dpm.scan_deformed);
    }

    #[test]
    fn test_ar_defaults() {
        let ar = default_settings(ScanMode::ArMode);
        assert!(ar.continuous_scanning);
        let sub = ar.ar.unwrap();
        assert_eq!(sub.mode, ArMode::InteractiveEnabled);
        assert_eq!(sub.location_type, ArLocationType::None);
        assert_eq!(sub.header_show_mode, ArHeaderShowMode::OnSelected);
        assert_eq!(sub.overlay_refresh, ArOverlayRefresh::Normal);
        assert!(!sub.double_tap_to_freeze);
        assert!(default_settings(ScanMode::Continuous).ar.is_none());
    }

    #[test]
    fn test_base_record() {
        let base = default_settings(ScanMode::V1);
        assert!(base.pinch_to_zoom && base.location_in_preview);
        assert!(base.beep_on_success && base.vibrate_on_success);
        assert!(!base.composite_mode && !base.region_of_interest);
        assert_eq!(base.continuous_threshold, Some(0));
        assert_eq!(base.show_result_sheet, Some(true));
        assert_eq!(default_settings(ScanMode::Gallery).decoding_speed, DecodingSpeed::Rigorous);
        assert!(default_settings(ScanMode::Deblur).scan_blurred);
    }

    #[test]
    fn test_defaults_are_deterministic() {
        for mode in ScanMode::ALL {
            assert_eq!(default_settings(mode), default_settings(mode));
            assert_eq!(default_enabled_types(mode), default_enabled_types(mode));
        }
    }
}
