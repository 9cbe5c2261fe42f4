//! # Filesystem Module
//!
//! The seam between the renaming logic and the disk.
//!
//! ## Backends
//! - `LocalFileSystem` - real renames through `std::fs`
//! - `DryRunFileSystem` - reads the disk, simulates every write

mod dry_run;
mod local;
mod traits;

pub use dry_run::{DryRunFileSystem, PlannedOperation};
pub use local::LocalFileSystem;
pub use traits::FileSystem;

use std::path::PathBuf;
use std::time::SystemTime;

/// A regular file found directly inside a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    /// Creation (birth) time, or modification time where the platform has none
    pub created: SystemTime,
}
