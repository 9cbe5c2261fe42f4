//! Directory walking implementation using walkdir.

use super::{filter::ImageFilter, DirectoryListing, ImageFile, ImageScanner, ScanResult, SortOrder};
use crate::core::fs::FileSystem;
use crate::error::ScanError;
use crate::events::{Event, EventSender, ScanEvent};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// Configuration for the directory scanner
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Visit every directory below the root, each listed on its own
    pub recursive: bool,
    /// Order of files within a directory
    pub sort_order: SortOrder,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
    /// Whether to follow symbolic links while walking
    pub follow_symlinks: bool,
    /// Name of a root subfolder whose whole subtree is never scanned
    pub excluded_dir: Option<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            recursive: false,
            sort_order: SortOrder::Name,
            include_hidden: false,
            follow_symlinks: false,
            excluded_dir: None,
        }
    }
}

/// Lists images per directory through a [`FileSystem`]
pub struct DirectoryScanner {
    config: ScanConfig,
    filter: ImageFilter,
    fs: Arc<dyn FileSystem>,
}

impl DirectoryScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig, fs: Arc<dyn FileSystem>) -> Self {
        let filter = ImageFilter::new().with_hidden(config.include_hidden);
        Self { config, filter, fs }
    }

    /// Directories to list, root first
    fn directories(&self, root: &Path, events: &EventSender) -> (Vec<PathBuf>, Vec<ScanError>) {
        if !self.config.recursive {
            return (vec![root.to_path_buf()], Vec::new());
        }

        let excluded = self.config.excluded_dir.as_ref().map(|name| root.join(name));
        let include_hidden = self.config.include_hidden;

        let walker = WalkDir::new(root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if !entry.file_type().is_dir() || entry.depth() == 0 {
                    return true;
                }
                if excluded.as_deref() == Some(entry.path()) {
                    return false;
                }
                include_hidden || !entry.file_name().to_string_lossy().starts_with('.')
            });

        let mut directories = Vec::new();
        let mut errors = Vec::new();

        for entry_result in walker {
            match entry_result {
                Ok(entry) if entry.file_type().is_dir() => {
                    directories.push(entry.path().to_path_buf());
                }
                Ok(_) => {}
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    let error = match e.io_error().map(|io| io.kind()) {
                        Some(ErrorKind::PermissionDenied) => {
                            ScanError::PermissionDenied { path: path.clone() }
                        }
                        _ => ScanError::ReadDirectory {
                            path: path.clone(),
                            source: std::io::Error::new(ErrorKind::Other, e.to_string()),
                        },
                    };

                    events.send(Event::Scan(ScanEvent::Error {
                        path,
                        message: error.to_string(),
                    }));
                    errors.push(error);
                }
            }
        }

        (directories, errors)
    }

    /// List and order the images of a single directory
    fn list_directory(&self, dir: &Path) -> std::io::Result<DirectoryListing> {
        let mut files: Vec<ImageFile> = self
            .fs
            .list_entries(dir)?
            .into_iter()
            .filter(|entry| self.filter.should_include(&entry.path))
            .filter_map(|entry| {
                let file = ImageFile::from_path(&entry.path, entry.created);
                if file.is_none() {
                    tracing::warn!(path = %entry.path.display(), "skipping file with non UTF-8 name");
                }
                file
            })
            .collect();

        self.config.sort_order.sort(&mut files);

        Ok(DirectoryListing {
            directory: dir.to_path_buf(),
            files,
        })
    }
}

fn read_error(path: &Path, source: std::io::Error) -> ScanError {
    match source.kind() {
        ErrorKind::NotFound => ScanError::DirectoryNotFound {
            path: path.to_path_buf(),
        },
        ErrorKind::PermissionDenied => ScanError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => ScanError::ReadDirectory {
            path: path.to_path_buf(),
            source,
        },
    }
}

impl ImageScanner for DirectoryScanner {
    fn scan(&self, root: &Path) -> Result<ScanResult, ScanError> {
        self.scan_with_events(root, &crate::events::null_sender())
    }

    fn scan_with_events(&self, root: &Path, events: &EventSender) -> Result<ScanResult, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }

        events.send(Event::Scan(ScanEvent::Started {
            root: root.to_path_buf(),
        }));

        let (directories, mut errors) = self.directories(root, events);
        let mut listings = Vec::new();

        for dir in directories {
            match self.list_directory(&dir) {
                Ok(listing) => {
                    events.send(Event::Scan(ScanEvent::DirectoryListed {
                        path: dir.clone(),
                        images: listing.files.len(),
                    }));
                    if !listing.files.is_empty() {
                        listings.push(listing);
                    }
                }
                // The root must be readable before anything is touched
                Err(e) if dir == root => return Err(read_error(&dir, e)),
                Err(e) => {
                    let error = read_error(&dir, e);
                    events.send(Event::Scan(ScanEvent::Error {
                        path: dir.clone(),
                        message: error.to_string(),
                    }));
                    errors.push(error);
                }
            }
        }

        let result = ScanResult {
            directories: listings,
            errors,
        };

        events.send(Event::Scan(ScanEvent::Completed {
            directories: result.directories.len(),
            total_images: result.total_images(),
        }));

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fs::LocalFileSystem;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn scanner(config: ScanConfig) -> DirectoryScanner {
        DirectoryScanner::new(config, Arc::new(LocalFileSystem))
    }

    fn touch(dir: &Path, name: &str) {
        File::create(dir.join(name)).unwrap();
    }

    fn names(listing: &DirectoryListing) -> Vec<&str> {
        listing.files.iter().map(|f| f.original_name.as_str()).collect()
    }

    #[test]
    fn scan_empty_directory_returns_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let result = scanner(ScanConfig::default()).scan(temp_dir.path()).unwrap();

        assert!(result.directories.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn scan_lists_images_in_name_order() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "IMG002.jpg");
        touch(temp_dir.path(), "IMG001.JPG");
        touch(temp_dir.path(), "IMG003.bmp");
        touch(temp_dir.path(), "readme.txt");

        let result = scanner(ScanConfig::default()).scan(temp_dir.path()).unwrap();

        assert_eq!(result.directories.len(), 1);
        assert_eq!(
            names(&result.directories[0]),
            vec!["IMG001.JPG", "IMG002.jpg", "IMG003.bmp"]
        );
    }

    #[test]
    fn flat_scan_ignores_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "a.jpg");
        let nested = temp_dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        touch(&nested, "b.jpg");

        let result = scanner(ScanConfig::default()).scan(temp_dir.path()).unwrap();

        assert_eq!(result.total_images(), 1);
    }

    #[test]
    fn recursive_scan_lists_each_directory_separately() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "a.jpg");
        let nested = temp_dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        touch(&nested, "b.jpg");
        touch(&nested, "c.png");

        let config = ScanConfig {
            recursive: true,
            ..Default::default()
        };
        let result = scanner(config).scan(temp_dir.path()).unwrap();

        assert_eq!(result.directories.len(), 2);
        assert_eq!(result.directories[0].directory, temp_dir.path());
        assert_eq!(names(&result.directories[1]), vec!["b.jpg", "c.png"]);
    }

    #[test]
    fn recursive_scan_skips_excluded_subtree() {
        let temp_dir = TempDir::new().unwrap();
        let quarantine = temp_dir.path().join("Not_detectable");
        fs::create_dir_all(quarantine.join("older")).unwrap();
        touch(&quarantine, "notes.jpg");
        touch(&quarantine.join("older"), "memo.jpg");
        touch(temp_dir.path(), "a.jpg");

        let config = ScanConfig {
            recursive: true,
            excluded_dir: Some("Not_detectable".to_string()),
            ..Default::default()
        };
        let result = scanner(config).scan(temp_dir.path()).unwrap();

        assert_eq!(result.directories.len(), 1);
        assert_eq!(result.total_images(), 1);
    }

    #[test]
    fn hidden_directories_skipped_by_default() {
        let temp_dir = TempDir::new().unwrap();
        let hidden = temp_dir.path().join(".cache");
        fs::create_dir(&hidden).unwrap();
        touch(&hidden, "thumb.jpg");

        let config = ScanConfig {
            recursive: true,
            ..Default::default()
        };
        let result = scanner(config).scan(temp_dir.path()).unwrap();

        assert_eq!(result.total_images(), 0);
    }

    #[test]
    fn missing_root_is_fatal() {
        let result = scanner(ScanConfig::default()).scan(Path::new("/nonexistent/path/12345"));
        assert!(matches!(result, Err(ScanError::DirectoryNotFound { .. })));
    }
}
