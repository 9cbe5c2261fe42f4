//! Filesystem backend that records writes instead of performing them.

use super::{FileEntry, FileSystem, LocalFileSystem};
use crate::error::FsError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A write the dry run would have made
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PlannedOperation {
    Rename { from: PathBuf, to: PathBuf },
    CreateDir { path: PathBuf },
}

#[derive(Debug, Default)]
struct Overlay {
    added: HashSet<PathBuf>,
    removed: HashSet<PathBuf>,
    operations: Vec<PlannedOperation>,
}

/// Reads the real disk and keeps renames in a virtual namespace.
///
/// Collisions are detected against the simulated state, so a dry run fails
/// on the same files a real run would.
#[derive(Debug, Default)]
pub struct DryRunFileSystem {
    disk: LocalFileSystem,
    overlay: Mutex<Overlay>,
}

impl DryRunFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Operations recorded so far, in order
    pub fn operations(&self) -> Vec<PlannedOperation> {
        self.lock().operations.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Overlay> {
        self.overlay.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn exists_in(&self, overlay: &Overlay, path: &Path) -> bool {
        overlay.added.contains(path) || (!overlay.removed.contains(path) && self.disk.exists(path))
    }
}

impl FileSystem for DryRunFileSystem {
    fn list_entries(&self, dir: &Path) -> std::io::Result<Vec<FileEntry>> {
        self.disk.list_entries(dir)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<(), FsError> {
        let mut overlay = self.lock();

        if self.exists_in(&overlay, to) {
            return Err(FsError::Collision {
                path: to.to_path_buf(),
            });
        }
        if !self.exists_in(&overlay, from) {
            return Err(FsError::NotFound {
                path: from.to_path_buf(),
            });
        }

        overlay.added.remove(from);
        overlay.removed.insert(from.to_path_buf());
        overlay.removed.remove(to);
        overlay.added.insert(to.to_path_buf());
        overlay.operations.push(PlannedOperation::Rename {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
        Ok(())
    }

    fn create_dir_if_absent(&self, path: &Path) -> Result<(), FsError> {
        let mut overlay = self.lock();
        if !self.exists_in(&overlay, path) {
            overlay.added.insert(path.to_path_buf());
            overlay.operations.push(PlannedOperation::CreateDir {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let overlay = self.lock();
        self.exists_in(&overlay, path)
    }
}
