//! Filesystem trait definition.

use super::FileEntry;
use crate::error::FsError;
use std::path::Path;

/// Trait for filesystem backends
pub trait FileSystem: Send + Sync {
    /// List regular files directly inside `dir` (no recursion, any extension)
    fn list_entries(&self, dir: &Path) -> std::io::Result<Vec<FileEntry>>;

    /// Rename `from` to `to`.
    ///
    /// Never overwrites: fails with [`FsError::Collision`] when `to` exists.
    fn rename(&self, from: &Path, to: &Path) -> Result<(), FsError>;

    /// Create a directory (and parents) unless it already exists
    fn create_dir_if_absent(&self, path: &Path) -> Result<(), FsError>;

    /// Whether anything exists at `path`
    fn exists(&self, path: &Path) -> bool;
}
