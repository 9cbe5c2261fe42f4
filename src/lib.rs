//! # Barcode Renamer
//!
//! Renames product photographs after the barcode printed on one of them.
//!
//! Product photos are shot in (front, back) pairs and usually only the back
//! shows a scannable barcode. Walking a directory in a fixed order, each
//! decoded barcode is canonicalized to 13 digits and names the back photo and
//! the unidentified photo taken just before it.
//!
//! ## Core Rules
//! - **One step of lookback** - only the immediate predecessor can be paired
//! - **Never overwrite** - a taken name is a logged, per-file failure
//! - **Never stop early** - every file gets an outcome in the report
//!
//! ## Architecture
//! - `core` - The renaming engine
//! - `events` - Event-driven progress reporting
//! - `error` - Error types

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{BarcodeRenamerError, Result};

/// Initialize tracing for the library
///
/// Honors `RUST_LOG`; `default_directive` applies when it is unset.
/// Call once from the application entry point.
pub fn init_tracing(default_directive: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already installed");
    }
}
