//! Filesystem backend using `std::fs`.

use super::{FileEntry, FileSystem};
use crate::error::FsError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::SystemTime;

/// Performs real renames on the local disk
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFileSystem {
    fn list_entries(&self, dir: &Path) -> std::io::Result<Vec<FileEntry>> {
        let mut entries = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::warn!(path = %entry.path().display(), "skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !metadata.is_file() {
                continue;
            }

            let created = metadata
                .created()
                .or_else(|_| metadata.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);

            entries.push(FileEntry {
                path: entry.path(),
                created,
            });
        }

        Ok(entries)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<(), FsError> {
        if !self.exists(from) {
            return Err(FsError::NotFound {
                path: from.to_path_buf(),
            });
        }

        // link(2) fails on an existing destination, so the check and the
        // move cannot interleave with another writer
        match fs::hard_link(from, to) {
            Ok(()) => fs::remove_file(from).map_err(|e| FsError::Io {
                path: from.to_path_buf(),
                source: e,
            }),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(FsError::Collision {
                path: to.to_path_buf(),
            }),
            Err(e) => {
                tracing::debug!(from = %from.display(), "hard link unavailable ({}), falling back to rename", e);
                if self.exists(to) {
                    return Err(FsError::Collision {
                        path: to.to_path_buf(),
                    });
                }
                fs::rename(from, to).map_err(|e| FsError::Io {
                    path: from.to_path_buf(),
                    source: e,
                })
            }
        }
    }

    fn create_dir_if_absent(&self, path: &Path) -> Result<(), FsError> {
        fs::create_dir_all(path).map_err(|e| FsError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }
}
