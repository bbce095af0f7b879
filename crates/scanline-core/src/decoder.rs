//! # Decoder Configuration
//!
//! The per-symbology decoder entries pushed to the engine in one bulk
//! configure call.
//!
//! ## Config Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Symbology                        Class         Shape                   │
//! │  ───────────────────────────────  ────────────  ─────────────────────   │
//! │  code128 code93 codabar code11    WithLength    { enabled }  + length   │
//! │  msi                                                                    │
//! │  qr qrMicro datamatrix            DpmAware      { enabled }  + dpm      │
//! │  code39                           Code39        { enabled }  + checksum │
//! │  idDocument                       IdDocument    { enabled,              │
//! │                                                   masterChecksum }      │
//! │  everything else                  Generic       { enabled }             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::mode::ScanMode;
use crate::symbology::{EnabledTypes, Symbology};

// =============================================================================
// Decoder Class
// =============================================================================

/// Which engine config type a symbology needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderClass {
    Generic,
    WithLength,
    DpmAware,
    Code39,
    IdDocument,
}

impl DecoderClass {
    /// Static symbology → class table.
    pub const fn of(symbology: Symbology) -> DecoderClass {
        match symbology {
            Symbology::Code128
            | Symbology::Code93
            | Symbology::Codabar
            | Symbology::Code11
            | Symbology::Msi => DecoderClass::WithLength,
            Symbology::Qr | Symbology::QrMicro | Symbology::Datamatrix => DecoderClass::DpmAware,
            Symbology::Code39 => DecoderClass::Code39,
            Symbology::IdDocument => DecoderClass::IdDocument,
            _ => DecoderClass::Generic,
        }
    }
}

// =============================================================================
// Decoder Config
// =============================================================================

/// Master checksum handling for ID documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MasterChecksum {
    Disabled,
    Enabled,
}

/// One decoder entry as the engine expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "camelCase")]
pub enum DecoderConfig {
    Generic {
        enabled: bool,
    },
    WithLength {
        enabled: bool,
    },
    DpmAware {
        enabled: bool,
    },
    Code39 {
        enabled: bool,
    },
    IdDocument {
        enabled: bool,
        #[serde(rename = "masterChecksum")]
        master_checksum: MasterChecksum,
    },
}

impl DecoderConfig {
    /// Builds the entry for `symbology` in the shape its class requires.
    pub fn for_symbology(symbology: Symbology, enabled: bool) -> Self {
        match DecoderClass::of(symbology) {
            DecoderClass::Generic => DecoderConfig::Generic { enabled },
            DecoderClass::WithLength => DecoderConfig::WithLength { enabled },
            DecoderClass::DpmAware => DecoderConfig::DpmAware { enabled },
            DecoderClass::Code39 => DecoderConfig::Code39 { enabled },
            DecoderClass::IdDocument => DecoderConfig::IdDocument {
                enabled,
                master_checksum: MasterChecksum::Disabled,
            },
        }
    }

    pub fn enabled(&self) -> bool {
        match *self {
            DecoderConfig::Generic { enabled }
            | DecoderConfig::WithLength { enabled }
            | DecoderConfig::DpmAware { enabled }
            | DecoderConfig::Code39 { enabled }
            | DecoderConfig::IdDocument { enabled, .. } => enabled,
        }
    }

    pub fn class(&self) -> DecoderClass {
        match self {
            DecoderConfig::Generic { .. } => DecoderClass::Generic,
            DecoderConfig::WithLength { .. } => DecoderClass::WithLength,
            DecoderConfig::DpmAware { .. } => DecoderClass::DpmAware,
            DecoderConfig::Code39 { .. } => DecoderClass::Code39,
            DecoderConfig::IdDocument { .. } => DecoderClass::IdDocument,
        }
    }
}

// =============================================================================
// Decoder Config Map
// =============================================================================

/// Decoder entries for the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecoderConfigMap(BTreeMap<Symbology, DecoderConfig>);

impl DecoderConfigMap {
    /// Resolves every catalog member from the enabled map.
    ///
    /// `ocrText` is forced off outside VIN mode, whatever the map says.
    pub fn from_enabled(enabled: &EnabledTypes, mode: ScanMode) -> Self {
        let entries = Symbology::ALL
            .iter()
            .map(|&sym| {
                let on = enabled.is_enabled(sym) && (sym != Symbology::OcrText || mode.allows_ocr());
                (sym, DecoderConfig::for_symbology(sym, on))
            })
            .collect();
        DecoderConfigMap(entries)
    }

    pub fn get(&self, symbology: Symbology) -> Option<&DecoderConfig> {
        self.0.get(&symbology)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbology, &DecoderConfig)> + '_ {
        self.0.iter().map(|(&sym, cfg)| (sym, cfg))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::default_enabled_types;

    #[test]
    fn test_class_table() {
        assert_eq!(DecoderClass::of(Symbology::Msi), DecoderClass::WithLength);
        assert_eq!(DecoderClass::of(Symbology::QrMicro), DecoderClass::DpmAware);
        assert_eq!(DecoderClass::of(Symbology::Code39), DecoderClass::Code39);
        assert_eq!(DecoderClass::of(Symbology::IdDocument), DecoderClass::IdDocument);
        assert_eq!(DecoderClass::of(Symbology::OcrText), DecoderClass::Generic);
        assert_eq!(DecoderClass::of(Symbology::Ean13), DecoderClass::Generic);
    }

    #[test]
    fn test_id_document_master_checksum_disabled() {
        let cfg = DecoderConfig::for_symbology(Symbology::IdDocument, true);
        let value = serde_json::to_value(cfg).unwrap();
        assert_eq!(value["shape"], "idDocument");
        assert_eq!(value["masterChecksum"], "disabled");
        assert_eq!(value["enabled"], true);
    }

    #[test]
    fn test_map_covers_catalog() {
        let map = DecoderConfigMap::from_enabled(&default_enabled_types(ScanMode::V1), ScanMode::V1);
        assert_eq!(map.len(), 41);
        assert!(map.get(Symbology::Code128).unwrap().enabled());
        assert_eq!(
            map.get(Symbology::Datamatrix).unwrap().class(),
            DecoderClass::DpmAware
        );
    }

    #[test]
    fn test_ocr_forced_off_outside_vin() {
        let all_on = EnabledTypes::all(true);

        let map = DecoderConfigMap::from_enabled(&all_on, ScanMode::Mode2D);
        assert!(!map.get(Symbology::OcrText).unwrap().enabled());
        assert!(map.get(Symbology::Qr).unwrap().enabled());

        let map = DecoderConfigMap::from_enabled(&all_on, ScanMode::Vin);
        assert!(map.get(Symbology::OcrText).unwrap().enabled());
    }
}
