//! # CSV Export
//!
//! Formats the session's scanned items for the share sheet.
//!
//! ```text
//! Barcode,Type
//! "4006381333931","EAN 13"
//! "say ""hi""","QR"
//! ```

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::CoreResult;
use crate::types::ScannedItem;

const HEADER: &str = "Barcode,Type\n";

/// Renders `items` as CSV: a bare header row, then one fully quoted row per
/// item with embedded quotes doubled.
pub fn items_to_csv(items: &[ScannedItem]) -> CoreResult<String> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for item in items {
        writer.write_record([item.text.as_str(), item.symbology.as_str()])?;
    }

    let body = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;

    let mut out = String::with_capacity(HEADER.len() + body.len());
    out.push_str(HEADER);
    out.push_str(&String::from_utf8_lossy(&body));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_header_only() {
        assert_eq!(items_to_csv(&[]).unwrap(), "Barcode,Type\n");
    }

    #[test]
    fn test_rows_quoted() {
        let items = vec![
            ScannedItem::new("4006381333931", "EAN 13", None),
            ScannedItem::new("say \"hi\"", "QR", None),
        ];
        let csv = items_to_csv(&items).unwrap();
        assert_eq!(
            csv,
            "Barcode,Type\n\"4006381333931\",\"EAN 13\"\n\"say \"\"hi\"\"\",\"QR\"\n"
        );
    }

    #[test]
    fn test_commas_and_newlines_stay_in_field() {
        let items = vec![ScannedItem::new("a,b\nc", "Code 128", None)];
        let csv = items_to_csv(&items).unwrap();
        assert_eq!(csv, "Barcode,Type\n\"a,b\nc\",\"Code 128\"\n");
    }
}
