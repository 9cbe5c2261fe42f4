//! Decoder that serves readings prepared ahead of time.
//!
//! A manifest is a JSON object mapping image filenames to the symbols a
//! scanner found in them:
//!
//! ```json
//! {
//!   "IMG002.jpg": [{ "symbology": "EAN-13", "data": "1234567890128" }],
//!   "IMG005.jpg": [{ "symbology": "QR-Code", "data": "https://example.com" }]
//! }
//! ```
//!
//! Files missing from the manifest decode to no symbols.

use super::{BarcodeDecoder, Reading, Symbology};
use crate::error::DecodeError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One symbol entry in a manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestSymbol {
    pub symbology: String,
    pub data: String,
}

/// In-memory readings keyed by filename
#[derive(Debug, Clone, Default)]
pub struct ManifestDecoder {
    readings: HashMap<String, Vec<Reading>>,
}

impl ManifestDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a manifest from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, DecodeError> {
        let contents = fs::read_to_string(path).map_err(|e| DecodeError::Manifest {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_json(&contents).map_err(|e| DecodeError::Manifest {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, Vec<ManifestSymbol>> = serde_json::from_str(json)?;
        let readings = raw
            .into_iter()
            .map(|(name, symbols)| {
                let readings = symbols
                    .into_iter()
                    .map(|s| Reading::from_symbol(Symbology::from_tag(&s.symbology), s.data))
                    .collect();
                (name, readings)
            })
            .collect();
        Ok(Self { readings })
    }

    /// Register a linear barcode for a filename
    pub fn with_barcode(mut self, filename: &str, digits: &str) -> Self {
        self.readings
            .entry(filename.to_string())
            .or_default()
            .push(Reading::from_symbol(Symbology::Ean13, digits));
        self
    }

    /// Register an arbitrary reading for a filename
    pub fn with_reading(mut self, filename: &str, reading: Reading) -> Self {
        self.readings
            .entry(filename.to_string())
            .or_default()
            .push(reading);
        self
    }
}

impl BarcodeDecoder for ManifestDecoder {
    fn decode(&self, image: &Path) -> Result<Vec<Reading>, DecodeError> {
        let name = image
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        Ok(self.readings.get(name).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn loads_json_manifest() {
        let decoder = ManifestDecoder::from_json(
            r#"{"IMG002.jpg": [{"symbology": "EAN-13", "data": "1234567890128"}]}"#,
        )
        .unwrap();

        let readings = decoder.decode(Path::new("/photos/IMG002.jpg")).unwrap();
        assert_eq!(
            readings,
            vec![Reading::Barcode {
                digits: "1234567890128".to_string(),
                symbology: Symbology::Ean13,
            }]
        );
    }

    #[test]
    fn unknown_file_has_no_symbols() {
        let decoder = ManifestDecoder::new().with_barcode("a.jpg", "1234567890128");
        assert!(decoder.decode(Path::new("b.jpg")).unwrap().is_empty());
    }

    #[test]
    fn bad_manifest_file_is_reported_with_path() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[not a map]").unwrap();

        let err = ManifestDecoder::from_file(file.path()).unwrap_err();
        assert!(matches!(err, DecodeError::Manifest { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }
}
