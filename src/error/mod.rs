//! # Error Module
//!
//! Error types for the barcode renamer.
//!
//! ## Design Principles
//! - **Never abort a batch for one file** - per-file failures are recorded, not raised
//! - **Include context** - paths, file names, what went wrong
//! - **Only the root is fatal** - a run stops early only if the target
//!   directory cannot be read at all

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum BarcodeRenamerError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Decoder error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that occur while listing image files
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by a barcode decoder.
///
/// Any of these leaves the image undetected; none of them stop a run.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Decoder tool not found: {tool}. Install zbar or pass --zbarimg")]
    ToolNotFound { tool: PathBuf },

    #[error("Decoder failed on {path} (exit code {code:?}): {stderr}")]
    ToolFailed {
        path: PathBuf,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Failed to run decoder on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid readings manifest {path}: {reason}")]
    Manifest { path: PathBuf, reason: String },
}

/// Reasons a raw digit string cannot become a canonical barcode
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Barcode data is not numeric: {data:?}")]
    NotNumeric { data: String },

    #[error("Normalized barcode has {len} digits, expected 13")]
    WrongLength { len: usize },
}

/// Errors from rename and move operations
#[derive(Error, Debug)]
pub enum FsError {
    #[error("Destination already exists: {path}")]
    Collision { path: PathBuf },

    #[error("Source file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Filesystem error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, BarcodeRenamerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_error_includes_path() {
        let error = ScanError::DirectoryNotFound {
            path: PathBuf::from("/photos/batch-07"),
        };
        assert!(error.to_string().contains("/photos/batch-07"));
    }

    #[test]
    fn collision_error_names_destination() {
        let error = FsError::Collision {
            path: PathBuf::from("/photos/1234567890128_back.jpg"),
        };
        assert!(error.to_string().contains("1234567890128_back.jpg"));
    }

    #[test]
    fn missing_tool_suggests_recovery() {
        let error = DecodeError::ToolNotFound {
            tool: PathBuf::from("zbarimg"),
        };
        assert!(error.to_string().contains("--zbarimg"));
    }

    #[test]
    fn normalize_error_shows_offending_data() {
        let error = NormalizeError::NotNumeric {
            data: "abc123".to_string(),
        };
        assert!(error.to_string().contains("abc123"));
    }
}
