//! # Scanner Module
//!
//! Lists the product photos of a directory in a fixed order.
//!
//! ## Supported Formats
//! - JPEG (.jpg, .jpeg)
//! - PNG (.png)
//! - BMP (.bmp)
//!
//! ## Ordering
//! Pairing relies on adjacency meaning "front taken right before back", so
//! the order is chosen once per run with [`SortOrder`] and never mixed.
//!
//! ## Example
//! ```rust,ignore
//! use barcode_renamer::core::scanner::{DirectoryScanner, ImageScanner, ScanConfig};
//!
//! let scanner = DirectoryScanner::new(ScanConfig::default(), Arc::new(LocalFileSystem));
//! let listings = scanner.scan(Path::new("/photos/batch-07"))?;
//! ```

mod filter;
mod walker;

pub use filter::ImageFilter;
pub use walker::{DirectoryScanner, ScanConfig};

use crate::error::ScanError;
use crate::events::EventSender;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A photo inside one directory run.
///
/// `original_name` never changes and keys the renamed set; `current_name`
/// follows the file through renames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFile {
    pub directory: PathBuf,
    pub original_name: String,
    /// Extension including the dot, case preserved (e.g. `.JPG`)
    pub extension: String,
    pub current_name: String,
    pub created: SystemTime,
}

impl ImageFile {
    /// Build from a path; `None` if the name is not valid UTF-8
    pub fn from_path(path: &Path, created: SystemTime) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_string();
        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();

        Some(Self {
            directory,
            current_name: name.clone(),
            original_name: name,
            extension,
            created,
        })
    }

    /// Original filename without its extension
    pub fn original_stem(&self) -> &str {
        &self.original_name[..self.original_name.len() - self.extension.len()]
    }

    pub fn current_path(&self) -> PathBuf {
        self.directory.join(&self.current_name)
    }
}

/// Order in which files of a directory are paired
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Lexicographic by filename
    #[default]
    Name,
    /// Creation time ascending, ties broken by filename
    Created,
}

impl SortOrder {
    pub fn sort(&self, files: &mut [ImageFile]) {
        match self {
            SortOrder::Name => files.sort_by(|a, b| a.original_name.cmp(&b.original_name)),
            SortOrder::Created => files.sort_by(|a, b| {
                a.created
                    .cmp(&b.created)
                    .then_with(|| a.original_name.cmp(&b.original_name))
            }),
        }
    }
}

/// The ordered images of one directory
#[derive(Debug, Clone)]
pub struct DirectoryListing {
    pub directory: PathBuf,
    pub files: Vec<ImageFile>,
}

/// Result of a scan operation
#[derive(Debug)]
pub struct ScanResult {
    /// Directories holding at least one image, in walk order
    pub directories: Vec<DirectoryListing>,
    /// Errors that occurred below the root (non-fatal)
    pub errors: Vec<ScanError>,
}

impl ScanResult {
    pub fn total_images(&self) -> usize {
        self.directories.iter().map(|d| d.files.len()).sum()
    }
}

/// Trait for image scanners
pub trait ImageScanner: Send + Sync {
    /// Scan a root directory. Fails only if the root itself is unusable.
    fn scan(&self, root: &Path) -> Result<ScanResult, ScanError>;

    /// Scan with progress reporting via events
    fn scan_with_events(&self, root: &Path, events: &EventSender)
        -> Result<ScanResult, ScanError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn file(name: &str, secs: u64) -> ImageFile {
        ImageFile::from_path(
            &Path::new("/photos").join(name),
            SystemTime::UNIX_EPOCH + Duration::from_secs(secs),
        )
        .unwrap()
    }

    #[test]
    fn image_file_splits_name() {
        let f = file("IMG001.JPG", 0);
        assert_eq!(f.original_stem(), "IMG001");
        assert_eq!(f.extension, ".JPG");
        assert_eq!(f.current_path(), PathBuf::from("/photos/IMG001.JPG"));
    }

    #[test]
    fn stem_uses_last_dot() {
        let f = file("front.v2.png", 0);
        assert_eq!(f.original_stem(), "front.v2");
    }

    #[test]
    fn name_order_is_lexicographic() {
        let mut files = vec![file("b.jpg", 1), file("a.jpg", 2), file("B.jpg", 3)];
        SortOrder::Name.sort(&mut files);
        let names: Vec<_> = files.iter().map(|f| f.original_name.as_str()).collect();
        assert_eq!(names, vec!["B.jpg", "a.jpg", "b.jpg"]);
    }

    #[test]
    fn created_order_breaks_ties_by_name() {
        let mut files = vec![file("z.jpg", 5), file("y.jpg", 5), file("a.jpg", 9)];
        SortOrder::Created.sort(&mut files);
        let names: Vec<_> = files.iter().map(|f| f.original_name.as_str()).collect();
        assert_eq!(names, vec!["y.jpg", "z.jpg", "a.jpg"]);
    }
}
