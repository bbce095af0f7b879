//! # Scan Modes
//!
//! The scanning modes offered on the home screen. A mode is chosen once when
//! the scanner screen opens and never changes for that session.
//!
//! ```text
//! ┌──────────────────────────────┬──────────────────────────────────────────┐
//! │ General Barcodes             │ Showcase                                 │
//! │  mode_1d  mode_2d            │  multiscan  vin  dpm  deblur  dotcode    │
//! │  continuous                  │  ar_mode  mrz  gallery                   │
//! └──────────────────────────────┴──────────────────────────────────────────┘
//!                 v1 = default "anyscan" mode when none is given
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

// =============================================================================
// Region of Interest
// =============================================================================

/// A scanning window in percent of the preview (left, top, width, height).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RegionOfInterest {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl RegionOfInterest {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        RegionOfInterest {
            left,
            top,
            width,
            height,
        }
    }

    /// Box used when the user switches the ROI on in a mode without its own.
    pub const GENERIC: RegionOfInterest = RegionOfInterest::new(5.0, 5.0, 90.0, 90.0);
    /// Wide horizontal strip for VIN plates.
    pub const VIN: RegionOfInterest = RegionOfInterest::new(0.0, 35.0, 100.0, 30.0);
    /// Small centered square for direct part marks.
    pub const DPM: RegionOfInterest = RegionOfInterest::new(40.0, 40.0, 20.0, 10.0);
    pub const DOTCODE: RegionOfInterest = RegionOfInterest::new(30.0, 40.0, 40.0, 9.0);
}

// =============================================================================
// Scan Mode
// =============================================================================

/// A scanning mode, serialized with the identifiers used by navigation and
/// as keys of the persisted settings document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// Default mode when the screen is opened without one.
    #[default]
    V1,
    #[serde(rename = "mode_1d")]
    Mode1D,
    #[serde(rename = "mode_2d")]
    Mode2D,
    Continuous,
    Multiscan,
    Vin,
    Dpm,
    Deblur,
    Dotcode,
    ArMode,
    Mrz,
    Gallery,
}

impl ScanMode {
    pub const ALL: [ScanMode; 12] = [
        ScanMode::V1,
        ScanMode::Mode1D,
        ScanMode::Mode2D,
        ScanMode::Continuous,
        ScanMode::Multiscan,
        ScanMode::Vin,
        ScanMode::Dpm,
        ScanMode::Deblur,
        ScanMode::Dotcode,
        ScanMode::ArMode,
        ScanMode::Mrz,
        ScanMode::Gallery,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ScanMode::V1 => "v1",
            ScanMode::Mode1D => "mode_1d",
            ScanMode::Mode2D => "mode_2d",
            ScanMode::Continuous => "continuous",
            ScanMode::Multiscan => "multiscan",
            ScanMode::Vin => "vin",
            ScanMode::Dpm => "dpm",
            ScanMode::Deblur => "deblur",
            ScanMode::Dotcode => "dotcode",
            ScanMode::ArMode => "ar_mode",
            ScanMode::Mrz => "mrz",
            ScanMode::Gallery => "gallery",
        }
    }

    /// Home screen tile label.
    pub const fn label(self) -> &'static str {
        match self {
            ScanMode::V1 => "Anyscan",
            ScanMode::Mode1D => "1D",
            ScanMode::Mode2D => "2D",
            ScanMode::Continuous => "Continuous",
            ScanMode::Multiscan => "MultiScan",
            ScanMode::Vin => "VIN",
            ScanMode::Dpm => "DPM",
            ScanMode::Deblur => "DeBlur",
            ScanMode::Dotcode => "DotCode",
            ScanMode::ArMode => "AR Mode",
            ScanMode::Mrz => "MRZ",
            ScanMode::Gallery => "Gallery Scan",
        }
    }

    /// Modes that fix their own region of interest in the mode extras.
    ///
    /// For these the generic box is never pushed, even when the user toggles
    /// the ROI setting.
    pub const fn owns_roi(self) -> bool {
        matches!(self, ScanMode::Vin | ScanMode::Dpm)
    }

    /// Region pushed when the ROI setting is on and the mode does not own one.
    pub const fn toggled_roi(self) -> Option<RegionOfInterest> {
        match self {
            ScanMode::Vin | ScanMode::Dpm => None,
            ScanMode::Dotcode => Some(RegionOfInterest::DOTCODE),
            _ => Some(RegionOfInterest::GENERIC),
        }
    }

    /// Whether the camera preview scans live. Gallery only scans picked images.
    pub const fn scans_live(self) -> bool {
        !matches!(self, ScanMode::Gallery)
    }

    /// Whether the `ocrText` symbology may be toggled in this mode.
    pub const fn allows_ocr(self) -> bool {
        matches!(self, ScanMode::Vin)
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScanMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| CoreError::UnknownMode(s.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for mode in ScanMode::ALL {
            assert_eq!(mode.as_str().parse::<ScanMode>().unwrap(), mode);
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.as_str()));
        }
    }

    #[test]
    fn test_unknown_mode_is_error() {
        let err = "mode_3d".parse::<ScanMode>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownMode(ref m) if m == "mode_3d"));
    }

    #[test]
    fn test_default_is_v1() {
        assert_eq!(ScanMode::default(), ScanMode::V1);
    }

    #[test]
    fn test_roi_ownership() {
        assert!(ScanMode::Vin.owns_roi());
        assert!(ScanMode::Dpm.owns_roi());
        assert_eq!(ScanMode::Vin.toggled_roi(), None);
        assert_eq!(
            ScanMode::Dotcode.toggled_roi(),
            Some(RegionOfInterest::DOTCODE)
        );
        assert_eq!(
            ScanMode::ArMode.toggled_roi(),
            Some(RegionOfInterest::GENERIC)
        );
    }

    #[test]
    fn test_only_gallery_skips_live() {
        let offline: Vec<_> = ScanMode::ALL
            .into_iter()
            .filter(|m| !m.scans_live())
            .collect();
        assert_eq!(offline, vec![ScanMode::Gallery]);
    }
}
