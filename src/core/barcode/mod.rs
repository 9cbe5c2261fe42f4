//! # Barcode Module
//!
//! Turns raw decoder output into the 13-digit code used as a filename.
//!
//! ## Pieces
//! - `check_digit` - EAN-13 weighted checksum
//! - `normalize` - canonicalizes a raw digit string to 13 digits
//! - `classify` - labels a digit string as EAN-13, UPC-A or unknown
//!
//! ## Example
//! ```rust
//! use barcode_renamer::core::barcode::{normalize, BarcodeKind};
//!
//! let code = normalize("012345678905").unwrap();
//! assert_eq!(code.as_str(), "0001234567890");
//! assert_eq!(code.kind(), BarcodeKind::UpcA);
//! ```

mod check_digit;
mod classify;
mod normalize;

pub use check_digit::ean13_check_digit;
pub use classify::{classify, BarcodeKind};
pub use normalize::normalize;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of every canonical barcode
pub const CANONICAL_LEN: usize = 13;

/// A product code of exactly 13 ASCII digits.
///
/// Only [`normalize`] constructs these, so the length invariant always holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalBarcode(String);

impl CanonicalBarcode {
    pub(crate) fn new_unchecked(digits: String) -> Self {
        debug_assert_eq!(digits.len(), CANONICAL_LEN);
        Self(digits)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> BarcodeKind {
        classify(&self.0)
    }
}

impl fmt::Display for CanonicalBarcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalBarcode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
