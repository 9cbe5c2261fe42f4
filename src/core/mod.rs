//! # Core Module
//!
//! The GUI-agnostic renaming engine.
//!
//! ## Modules
//! - `barcode` - Check digit, canonicalization and kind of product codes
//! - `decoder` - Seam to the external barcode decoder
//! - `fs` - Seam to the filesystem (real or dry run)
//! - `scanner` - Lists photos of each directory in a fixed order
//! - `pairing` - Forward pass naming (front, back) pairs
//! - `quarantine` - Moves aside photos that got no barcode name
//! - `pipeline` - Orchestrates the full run

pub mod barcode;
pub mod decoder;
pub mod fs;
pub mod pairing;
pub mod pipeline;
pub mod quarantine;
pub mod scanner;

// Re-export commonly used types
pub use barcode::{normalize, BarcodeKind, CanonicalBarcode};
pub use decoder::{BarcodeDecoder, ManifestDecoder, Reading, Symbology, ZbarDecoder};
pub use pairing::{BackNaming, DirectoryRun, FileOutcome};
pub use pipeline::{Pipeline, RunReport};
pub use scanner::{ImageFile, SortOrder};
