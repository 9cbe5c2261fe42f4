//! Symbology label inferred from the shape of a digit string.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display label for a digit string. Used for reporting only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarcodeKind {
    Ean13,
    UpcA,
    Unknown,
}

impl fmt::Display for BarcodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BarcodeKind::Ean13 => write!(f, "EAN13"),
            BarcodeKind::UpcA => write!(f, "UPC-A"),
            BarcodeKind::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Infer the kind of a code from its length and second digit
pub fn classify(data: &str) -> BarcodeKind {
    let bytes = data.as_bytes();
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return BarcodeKind::Unknown;
    }

    match bytes.len() {
        13 if bytes[1] != b'0' => BarcodeKind::Ean13,
        13 | 12 => BarcodeKind::UpcA,
        _ => BarcodeKind::Unknown,
    }
}
