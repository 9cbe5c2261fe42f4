//! # Pipeline Module
//!
//! Orchestrates a full rename run over one root directory.
//!
//! ## Stages
//! 1. **Scan** - list the photos of each directory in the chosen order
//! 2. **Pair** - forward pass naming (front, back) pairs after barcodes
//! 3. **Quarantine** - move aside photos that never got a barcode name
//!
//! ## Parallelism
//! Directories share no state, so with `parallel(true)` they are processed
//! on rayon's pool. Files within one directory are always sequential.

mod executor;

pub use executor::{Pipeline, PipelineBuilder, RenameConfig, RunReport};
