//! # Pairing Module
//!
//! Assigns barcode names to (front, back) photo pairs.
//!
//! Photos are taken front first, back second, and usually only the back
//! shows a barcode. Walking a directory in its fixed order, a decoded barcode
//! names the current photo and, when it is still unidentified, the photo
//! right before it.

mod pairer;
mod types;

pub use pairer::SequencePairer;
pub use types::*;
