//! # Decoder Module
//!
//! The seam to whatever reads barcode symbols out of image pixels.
//!
//! Decoding itself is done by an external capability; this module only
//! defines the trait, the tagged reading type, and the selection of the one
//! reading that names a photo.
//!
//! ## Implementations
//! - `ZbarDecoder` - shells out to the `zbarimg` tool
//! - `ManifestDecoder` - readings prepared ahead of time, keyed by filename

mod manifest;
mod zbar;

pub use manifest::{ManifestDecoder, ManifestSymbol};
pub use zbar::ZbarDecoder;

use crate::core::barcode::{normalize, CanonicalBarcode};
use crate::error::DecodeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Symbol types a decoder can report
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Symbology {
    Ean13,
    Ean8,
    UpcA,
    UpcE,
    Isbn10,
    Isbn13,
    Code39,
    Code93,
    Code128,
    Codabar,
    Interleaved2of5,
    DataBar,
    DataBarExpanded,
    QrCode,
    Pdf417,
    DataMatrix,
    Aztec,
    SqCode,
    Other(String),
}

impl Symbology {
    /// Parse a decoder's type tag, e.g. `EAN-13`, `QR-Code`, `I2/5`
    pub fn from_tag(tag: &str) -> Self {
        let key: String = tag
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        match key.as_str() {
            "EAN13" => Symbology::Ean13,
            "EAN8" => Symbology::Ean8,
            "UPCA" => Symbology::UpcA,
            "UPCE" => Symbology::UpcE,
            "ISBN10" => Symbology::Isbn10,
            "ISBN13" => Symbology::Isbn13,
            "CODE39" => Symbology::Code39,
            "CODE93" => Symbology::Code93,
            "CODE128" => Symbology::Code128,
            "CODABAR" => Symbology::Codabar,
            "I25" | "ITF" => Symbology::Interleaved2of5,
            "DATABAR" => Symbology::DataBar,
            "DATABAREXP" | "DATABAREXPANDED" => Symbology::DataBarExpanded,
            "QRCODE" | "QR" => Symbology::QrCode,
            "PDF417" => Symbology::Pdf417,
            "DATAMATRIX" => Symbology::DataMatrix,
            "AZTEC" => Symbology::Aztec,
            "SQCODE" => Symbology::SqCode,
            _ => Symbology::Other(tag.to_string()),
        }
    }

    /// Matrix and stacked codes never name a product photo
    pub fn is_two_dimensional(&self) -> bool {
        matches!(
            self,
            Symbology::QrCode
                | Symbology::Pdf417
                | Symbology::DataMatrix
                | Symbology::Aztec
                | Symbology::SqCode
        )
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Symbology::Ean13 => "EAN-13",
            Symbology::Ean8 => "EAN-8",
            Symbology::UpcA => "UPC-A",
            Symbology::UpcE => "UPC-E",
            Symbology::Isbn10 => "ISBN-10",
            Symbology::Isbn13 => "ISBN-13",
            Symbology::Code39 => "CODE-39",
            Symbology::Code93 => "CODE-93",
            Symbology::Code128 => "CODE-128",
            Symbology::Codabar => "Codabar",
            Symbology::Interleaved2of5 => "I2/5",
            Symbology::DataBar => "DataBar",
            Symbology::DataBarExpanded => "DataBar-Exp",
            Symbology::QrCode => "QR-Code",
            Symbology::Pdf417 => "PDF417",
            Symbology::DataMatrix => "DataMatrix",
            Symbology::Aztec => "Aztec",
            Symbology::SqCode => "SQ-Code",
            Symbology::Other(tag) => tag,
        };
        f.write_str(name)
    }
}

impl From<String> for Symbology {
    fn from(tag: String) -> Self {
        Symbology::from_tag(&tag)
    }
}

impl From<Symbology> for String {
    fn from(symbology: Symbology) -> Self {
        symbology.to_string()
    }
}

/// One symbol found in an image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reading {
    /// A linear barcode and its payload as decoded
    Barcode { digits: String, symbology: Symbology },
    /// A 2D code or other symbol that is not a product barcode
    NonBarcodeSymbol { symbology: Symbology },
}

impl Reading {
    /// Build a reading from a decoder's raw (type, data) pair
    pub fn from_symbol(symbology: Symbology, data: impl Into<String>) -> Self {
        if symbology.is_two_dimensional() {
            Reading::NonBarcodeSymbol { symbology }
        } else {
            Reading::Barcode {
                digits: data.into(),
                symbology,
            }
        }
    }
}

/// Trait for barcode decoders
///
/// Implement this trait to plug in another decoding backend (or a fake
/// for testing). An empty vector means no symbol was found.
pub trait BarcodeDecoder: Send + Sync {
    fn decode(&self, image: &Path) -> Result<Vec<Reading>, DecodeError>;
}

/// Why an image did not yield a usable barcode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UndetectedReason {
    /// The decoder found nothing at all
    NoSymbol,
    /// Only 2D codes were found
    NonBarcodeOnly,
    /// Barcodes were found but none normalized; the first offending payload
    InvalidData { data: String, error: String },
    /// The decoder itself failed
    DecodeUnavailable { message: String },
}

impl fmt::Display for UndetectedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UndetectedReason::NoSymbol => write!(f, "no symbol found"),
            UndetectedReason::NonBarcodeOnly => write!(f, "only 2D codes found"),
            UndetectedReason::InvalidData { error, .. } => write!(f, "{}", error),
            UndetectedReason::DecodeUnavailable { message } => {
                write!(f, "decoder unavailable: {}", message)
            }
        }
    }
}

/// Result of looking for a product barcode in one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    Barcode {
        barcode: CanonicalBarcode,
        raw: String,
        symbology: Symbology,
    },
    Undetected(UndetectedReason),
}

/// Decode an image and pick the first reading that normalizes.
///
/// 2D symbols are skipped, as are barcodes whose payload is not numeric or
/// does not canonicalize; the remaining readings of the same image are still
/// tried before giving up.
pub fn detect(decoder: &dyn BarcodeDecoder, image: &Path) -> Detection {
    let readings = match decoder.decode(image) {
        Ok(readings) => readings,
        Err(e) => {
            return Detection::Undetected(UndetectedReason::DecodeUnavailable {
                message: e.to_string(),
            })
        }
    };

    let mut first_invalid = None;
    let mut saw_barcode = false;

    for reading in readings.iter() {
        let Reading::Barcode { digits, symbology } = reading else {
            continue;
        };
        saw_barcode = true;

        match normalize(digits) {
            Ok(barcode) => {
                return Detection::Barcode {
                    barcode,
                    raw: digits.clone(),
                    symbology: symbology.clone(),
                }
            }
            Err(e) => {
                tracing::debug!(image = %image.display(), data = %digits, "skipping reading: {}", e);
                first_invalid.get_or_insert(UndetectedReason::InvalidData {
                    data: digits.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    let reason = match first_invalid {
        Some(reason) => reason,
        None if !saw_barcode && !readings.is_empty() => UndetectedReason::NonBarcodeOnly,
        None => UndetectedReason::NoSymbol,
    };
    Detection::Undetected(reason)
}
