//! # Symbology Catalog
//!
//! The static catalog of barcode symbologies the engine can be told about.
//!
//! ## Catalog Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Symbology Catalog                               │
//! │                                                                         │
//! │  OneD (30)                               TwoD (11)                      │
//! │  ─────────────────────────────           ─────────────────────────      │
//! │  australianPost  codabar  code11         aztec      aztecCompact        │
//! │  code128  code25  code32  code39         datamatrix dotcode             │
//! │  code93  coop25  datalogic25             idDocument maxiCode            │
//! │  databar14  databarExpanded  ...         ocrText    pdf417  ...         │
//! │  upcA  upcE  upcE1                       qr         qrMicro             │
//! │                                                                         │
//! │  Declaration order == catalog order == display order                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The catalog is closed: symbologies are never created at runtime, so
//! [`EnabledTypes`] can always answer for every member.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

// =============================================================================
// Symbology Family
// =============================================================================

/// The two symbology families shown as separate groups in the settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SymbologyFamily {
    #[serde(rename = "1D")]
    OneD,
    #[serde(rename = "2D")]
    TwoD,
}

impl SymbologyFamily {
    /// Members of this family in catalog order.
    pub fn members(self) -> &'static [Symbology] {
        match self {
            SymbologyFamily::OneD => Symbology::ONE_D,
            SymbologyFamily::TwoD => Symbology::TWO_D,
        }
    }
}

// =============================================================================
// Symbology
// =============================================================================

/// A barcode symbology known to the scanning engine.
///
/// The serialized form is the engine's identifier (`"code128"`, `"upcA"`,
/// `"postalIMB"`), which is also the key used in persisted settings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum Symbology {
    // 1D
    AustralianPost,
    Codabar,
    Code11,
    Code128,
    Code25,
    Code32,
    Code39,
    Code93,
    Coop25,
    Datalogic25,
    Databar14,
    DatabarExpanded,
    DatabarLimited,
    Ean13,
    Ean8,
    Iata25,
    Interleaved25,
    Itf14,
    JapanesePost,
    Kix,
    Matrix25,
    Msi,
    Planet,
    #[serde(rename = "postalIMB")]
    PostalImb,
    Postnet,
    RoyalMail,
    Telepen,
    UpcA,
    UpcE,
    UpcE1,

    // 2D
    Aztec,
    AztecCompact,
    Datamatrix,
    Dotcode,
    IdDocument,
    MaxiCode,
    OcrText,
    Pdf417,
    Pdf417Micro,
    Qr,
    QrMicro,
}

impl Symbology {
    /// The full catalog, 1D family first.
    pub const ALL: &'static [Symbology] = &[
        Symbology::AustralianPost,
        Symbology::Codabar,
        Symbology::Code11,
        Symbology::Code128,
        Symbology::Code25,
        Symbology::Code32,
        Symbology::Code39,
        Symbology::Code93,
        Symbology::Coop25,
        Symbology::Datalogic25,
        Symbology::Databar14,
        Symbology::DatabarExpanded,
        Symbology::DatabarLimited,
        Symbology::Ean13,
        Symbology::Ean8,
        Symbology::Iata25,
        Symbology::Interleaved25,
        Symbology::Itf14,
        Symbology::JapanesePost,
        Symbology::Kix,
        Symbology::Matrix25,
        Symbology::Msi,
        Symbology::Planet,
        Symbology::PostalImb,
        Symbology::Postnet,
        Symbology::RoyalMail,
        Symbology::Telepen,
        Symbology::UpcA,
        Symbology::UpcE,
        Symbology::UpcE1,
        Symbology::Aztec,
        Symbology::AztecCompact,
        Symbology::Datamatrix,
        Symbology::Dotcode,
        Symbology::IdDocument,
        Symbology::MaxiCode,
        Symbology::OcrText,
        Symbology::Pdf417,
        Symbology::Pdf417Micro,
        Symbology::Qr,
        Symbology::QrMicro,
    ];

    /// The one-dimensional family.
    pub const ONE_D: &'static [Symbology] = Self::ALL.split_at(30).0;

    /// The two-dimensional family.
    pub const TWO_D: &'static [Symbology] = Self::ALL.split_at(30).1;

    /// Engine identifier, identical to the serialized form.
    pub const fn id(self) -> &'static str {
        match self {
            Symbology::AustralianPost => "australianPost",
            Symbology::Codabar => "codabar",
            Symbology::Code11 => "code11",
            Symbology::Code128 => "code128",
            Symbology::Code25 => "code25",
            Symbology::Code32 => "code32",
            Symbology::Code39 => "code39",
            Symbology::Code93 => "code93",
            Symbology::Coop25 => "coop25",
            Symbology::Datalogic25 => "datalogic25",
            Symbology::Databar14 => "databar14",
            Symbology::DatabarExpanded => "databarExpanded",
            Symbology::DatabarLimited => "databarLimited",
            Symbology::Ean13 => "ean13",
            Symbology::Ean8 => "ean8",
            Symbology::Iata25 => "iata25",
            Symbology::Interleaved25 => "interleaved25",
            Symbology::Itf14 => "itf14",
            Symbology::JapanesePost => "japanesePost",
            Symbology::Kix => "kix",
            Symbology::Matrix25 => "matrix25",
            Symbology::Msi => "msi",
            Symbology::Planet => "planet",
            Symbology::PostalImb => "postalIMB",
            Symbology::Postnet => "postnet",
            Symbology::RoyalMail => "royalMail",
            Symbology::Telepen => "telepen",
            Symbology::UpcA => "upcA",
            Symbology::UpcE => "upcE",
            Symbology::UpcE1 => "upcE1",
            Symbology::Aztec => "aztec",
            Symbology::AztecCompact => "aztecCompact",
            Symbology::Datamatrix => "datamatrix",
            Symbology::Dotcode => "dotcode",
            Symbology::IdDocument => "idDocument",
            Symbology::MaxiCode => "maxiCode",
            Symbology::OcrText => "ocrText",
            Symbology::Pdf417 => "pdf417",
            Symbology::Pdf417Micro => "pdf417Micro",
            Symbology::Qr => "qr",
            Symbology::QrMicro => "qrMicro",
        }
    }

    /// Human-readable label shown in the settings panel.
    pub const fn label(self) -> &'static str {
        match self {
            Symbology::AustralianPost => "Australian Post",
            Symbology::Codabar => "Codabar",
            Symbology::Code11 => "Code 11",
            Symbology::Code128 => "Code 128",
            Symbology::Code25 => "Code 2 of 5 Standard",
            Symbology::Code32 => "Code 32",
            Symbology::Code39 => "Code 39",
            Symbology::Code93 => "Code 93",
            Symbology::Coop25 => "COOP 25",
            Symbology::Datalogic25 => "Code 2 of 5 Datalogic",
            Symbology::Databar14 => "GS1 Databar 14",
            Symbology::DatabarExpanded => "GS1 Databar Expanded",
            Symbology::DatabarLimited => "GS1 Databar Limited",
            Symbology::Ean13 => "EAN 13",
            Symbology::Ean8 => "EAN 8",
            Symbology::Iata25 => "IATA 25",
            Symbology::Interleaved25 => "Interleaved 2 of 5",
            Symbology::Itf14 => "ITF 14",
            Symbology::JapanesePost => "Japanese Post",
            Symbology::Kix => "KIX",
            Symbology::Matrix25 => "Matrix 25",
            Symbology::Msi => "MSI",
            Symbology::Planet => "Planet",
            Symbology::PostalImb => "Postal IMB",
            Symbology::Postnet => "Postnet",
            Symbology::RoyalMail => "Royal Mail",
            Symbology::Telepen => "Telepen",
            Symbology::UpcA => "UPC-A",
            Symbology::UpcE => "UPC-E",
            Symbology::UpcE1 => "UPC-E1",
            Symbology::Aztec => "Aztec",
            Symbology::AztecCompact => "Aztec Compact",
            Symbology::Datamatrix => "Datamatrix",
            Symbology::Dotcode => "Dotcode",
            Symbology::IdDocument => "ID Document",
            Symbology::MaxiCode => "MaxiCode",
            Symbology::OcrText => "OCR Text",
            Symbology::Pdf417 => "PDF 417",
            Symbology::Pdf417Micro => "PDF 417 Micro",
            Symbology::Qr => "QR",
            Symbology::QrMicro => "QR Micro",
        }
    }

    /// Family this symbology belongs to.
    pub fn family(self) -> SymbologyFamily {
        if Self::ONE_D.contains(&self) {
            SymbologyFamily::OneD
        } else {
            SymbologyFamily::TwoD
        }
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Symbology {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Symbology::ALL
            .iter()
            .copied()
            .find(|sym| sym.id() == s)
            .ok_or_else(|| CoreError::UnknownSymbology(s.to_string()))
    }
}

// =============================================================================
// 1D Classification
// =============================================================================

/// Strips everything but ASCII letters and digits and lowercases the rest.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Whether a free-form type name reported by the engine is a 1D symbology.
///
/// Engine results carry display names such as `"Code 128"` or `"UPC-A"`,
/// while the catalog uses ids. Both sides are normalized before comparing,
/// so `"EAN-13"`, `"ean13"` and `"EAN 13"` all match.
pub fn is_one_dimensional(type_name: &str) -> bool {
    let wanted = normalize(type_name);
    if wanted.is_empty() {
        return false;
    }
    Symbology::ONE_D
        .iter()
        .any(|sym| normalize(sym.label()) == wanted || normalize(sym.id()) == wanted)
}

// =============================================================================
// Enabled Types
// =============================================================================

/// Which symbologies are switched on, covering the whole catalog.
///
/// ## Invariant
/// Every catalog member has an entry. Deserialization ignores unknown keys
/// and fills missing ones with `false`, so documents written by older builds
/// still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct EnabledTypes(BTreeMap<Symbology, bool>);

impl EnabledTypes {
    /// Builds a map by asking `f` about every catalog member.
    pub fn from_fn(mut f: impl FnMut(Symbology) -> bool) -> Self {
        EnabledTypes(Symbology::ALL.iter().map(|&sym| (sym, f(sym))).collect())
    }

    /// Every symbology switched to `enabled`.
    pub fn all(enabled: bool) -> Self {
        Self::from_fn(|_| enabled)
    }

    #[inline]
    pub fn is_enabled(&self, symbology: Symbology) -> bool {
        self.0.get(&symbology).copied().unwrap_or(false)
    }

    #[inline]
    pub fn set(&mut self, symbology: Symbology, enabled: bool) {
        self.0.insert(symbology, enabled);
    }

    /// Iterates `(symbology, enabled)` in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbology, bool)> + '_ {
        self.0.iter().map(|(&sym, &on)| (sym, on))
    }

    /// Enabled symbologies in catalog order.
    pub fn enabled(&self) -> impl Iterator<Item = Symbology> + '_ {
        self.iter().filter(|(_, on)| *on).map(|(sym, _)| sym)
    }

    pub fn enabled_count(&self) -> usize {
        self.enabled().count()
    }

    /// Labels of the enabled symbologies, joined for the settings header.
    ///
    /// ```rust
    /// use scanline_core::{EnabledTypes, Symbology};
    ///
    /// let types = EnabledTypes::from_fn(|s| matches!(s, Symbology::Ean13 | Symbology::Qr));
    /// assert_eq!(types.active_labels_summary(), "EAN 13, QR");
    /// ```
    pub fn active_labels_summary(&self) -> String {
        self.enabled()
            .map(Symbology::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for EnabledTypes {
    fn default() -> Self {
        Self::all(false)
    }
}

impl<'de> Deserialize<'de> for EnabledTypes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, bool>::deserialize(deserializer)?;
        let mut types = EnabledTypes::default();
        for (key, enabled) in raw {
            // Keys from removed symbologies are dropped.
            if let Ok(sym) = key.parse::<Symbology>() {
                types.set(sym, enabled);
            }
        }
        Ok(types)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(Symbology::ALL.len(), 41);
        assert_eq!(Symbology::ONE_D.len(), 30);
        assert_eq!(Symbology::TWO_D.len(), 11);
        assert_eq!(Symbology::ONE_D.last(), Some(&Symbology::UpcE1));
        assert_eq!(Symbology::TWO_D.first(), Some(&Symbology::Aztec));
    }

    #[test]
    fn test_id_matches_serde() {
        for &sym in Symbology::ALL {
            let json = serde_json::to_string(&sym).unwrap();
            assert_eq!(json, format!("\"{}\"", sym.id()));
            assert_eq!(sym.id().parse::<Symbology>().unwrap(), sym);
        }
    }

    #[test]
    fn test_unknown_symbology() {
        let err = "barcode9000".parse::<Symbology>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownSymbology(_)));
    }

    #[test]
    fn test_family() {
        assert_eq!(Symbology::UpcE1.family(), SymbologyFamily::OneD);
        assert_eq!(Symbology::OcrText.family(), SymbologyFamily::TwoD);
        assert!(SymbologyFamily::TwoD.members().contains(&Symbology::QrMicro));
    }

    #[test]
    fn test_is_one_dimensional() {
        assert!(is_one_dimensional("Code 128"));
        assert!(is_one_dimensional("EAN-13"));
        assert!(is_one_dimensional("upcA"));
        assert!(is_one_dimensional("GS1 Databar Expanded"));
        assert!(!is_one_dimensional("QR"));
        assert!(!is_one_dimensional("Datamatrix"));
        assert!(!is_one_dimensional(""));
    }

    #[test]
    fn test_enabled_types_lenient_deserialize() {
        let json = r#"{"qr": true, "ean13": false, "legacyType": true}"#;
        let types: EnabledTypes = serde_json::from_str(json).unwrap();

        assert!(types.is_enabled(Symbology::Qr));
        assert!(!types.is_enabled(Symbology::Ean13));
        // Missing keys become false, and every member has an entry
        assert!(!types.is_enabled(Symbology::Code39));
        assert_eq!(types.iter().count(), 41);
        assert_eq!(types.enabled_count(), 1);
    }

    #[test]
    fn test_enabled_types_serializes_ids() {
        let types = EnabledTypes::from_fn(|s| s == Symbology::PostalImb);
        let value = serde_json::to_value(&types).unwrap();
        assert_eq!(value["postalIMB"], serde_json::Value::Bool(true));
        assert_eq!(value["qr"], serde_json::Value::Bool(false));
    }

    #[test]
    fn test_active_labels_summary_catalog_order() {
        let types = EnabledTypes::from_fn(|s| {
            matches!(s, Symbology::Qr | Symbology::Code128 | Symbology::UpcA)
        });
        assert_eq!(types.active_labels_summary(), "Code 128, UPC-A, QR");
        assert_eq!(EnabledTypes::default().active_labels_summary(), "");
    }
}
