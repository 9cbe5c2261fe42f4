//! # Quarantine Module
//!
//! Second pass over a directory: photos that never got a barcode name are
//! moved aside, unless their name starts with a digit (a numeric name is
//! taken to already identify the product).

use crate::core::fs::FileSystem;
use crate::core::pairing::{DirectoryRun, FileOutcome};
use crate::events::{Event, EventSender, QuarantineEvent};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Default quarantine folder name, created under the processed root
pub const DEFAULT_QUARANTINE_DIR: &str = "Not_detectable";

/// Moves undetected photos into the quarantine folder
pub struct QuarantineMover<'a> {
    fs: &'a dyn FileSystem,
    quarantine_dir: PathBuf,
    events: &'a EventSender,
}

impl<'a> QuarantineMover<'a> {
    pub fn new(fs: &'a dyn FileSystem, quarantine_dir: PathBuf, events: &'a EventSender) -> Self {
        Self {
            fs,
            quarantine_dir,
            events,
        }
    }

    /// Whether an undetected file with this name is moved aside
    pub fn should_quarantine(original_name: &str) -> bool {
        original_name
            .chars()
            .next()
            .map(char::is_alphabetic)
            .unwrap_or(false)
    }

    pub fn run(&self, run: &mut DirectoryRun) {
        let undetected = run.undetected().to_vec();
        if undetected.is_empty() {
            debug!(directory = %run.directory().display(), "all files renamed, nothing to quarantine");
            return;
        }

        let mut dir_ready = false;

        for i in undetected {
            let file = &run.files()[i];

            // renamed later as the front of a pair
            if run.is_renamed(&file.original_name) {
                continue;
            }

            let from = file.current_path();

            if !Self::should_quarantine(&file.original_name) {
                debug!(file = %file.original_name, "keeping in place, name does not start with a letter");
                self.events
                    .send(Event::Quarantine(QuarantineEvent::Kept { path: from }));
                run.set_outcome(i, FileOutcome::KeptInPlace);
                continue;
            }

            let to = self.quarantine_dir.join(&file.current_name);
            let name = file.original_name.clone();

            if !dir_ready {
                if let Err(e) = self.fs.create_dir_if_absent(&self.quarantine_dir) {
                    warn!(dir = %self.quarantine_dir.display(), "cannot create quarantine folder: {}", e);
                    self.fail(run, i, &name, from, e.to_string());
                    continue;
                }
                dir_ready = true;
            }

            match self.fs.rename(&from, &to) {
                Ok(()) => {
                    info!(file = %name, to = %to.display(), "moved to quarantine");
                    self.events.send(Event::Quarantine(QuarantineEvent::Moved {
                        from,
                        to: to.clone(),
                    }));
                    run.set_outcome(i, FileOutcome::Quarantined { to });
                }
                Err(e) => {
                    warn!(file = %name, "quarantine move failed: {}", e);
                    self.fail(run, i, &name, from, e.to_string());
                }
            }
        }
    }

    fn fail(&self, run: &mut DirectoryRun, i: usize, name: &str, path: PathBuf, message: String) {
        self.events.send(Event::Quarantine(QuarantineEvent::Failed {
            path,
            message: message.clone(),
        }));
        run.push_error(format!("{}: {}", name, message));
        run.set_outcome(i, FileOutcome::QuarantineFailed { error: message });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::decoder::ManifestDecoder;
    use crate::core::fs::{DryRunFileSystem, LocalFileSystem};
    use crate::core::pairing::{BackNaming, SequencePairer};
    use crate::core::scanner::{DirectoryScanner, ImageScanner, ScanConfig};
    use crate::events::null_sender;
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn process(root: &Path, decoder: &ManifestDecoder, fs: Arc<dyn FileSystem>) -> DirectoryRun {
        let scanner = DirectoryScanner::new(ScanConfig::default(), fs.clone());
        let listing = scanner.scan(root).unwrap().directories.remove(0);
        let events = null_sender();

        let mut run = DirectoryRun::new(listing);
        SequencePairer::new(decoder, fs.as_ref(), BackNaming::Suffix, &events).run(&mut run);
        QuarantineMover::new(fs.as_ref(), root.join(DEFAULT_QUARANTINE_DIR), &events).run(&mut run);
        run
    }

    #[test]
    fn letter_names_move_digit_names_stay() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("9999.jpg"), b"x").unwrap();
        fs::write(temp.path().join("notes.jpg"), b"x").unwrap();

        let run = process(temp.path(), &ManifestDecoder::new(), Arc::new(LocalFileSystem));

        assert!(temp.path().join("9999.jpg").exists());
        assert!(temp.path().join("Not_detectable/notes.jpg").exists());
        assert!(!temp.path().join("notes.jpg").exists());
        assert_eq!(run.outcome(0), &FileOutcome::KeptInPlace);
        assert!(matches!(run.outcome(1), FileOutcome::Quarantined { .. }));
    }

    #[test]
    fn paired_front_is_not_quarantined() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("IMG001.jpg"), b"x").unwrap();
        fs::write(temp.path().join("IMG002.jpg"), b"x").unwrap();
        let decoder = ManifestDecoder::new().with_barcode("IMG002.jpg", "1234567890128");

        process(temp.path(), &decoder, Arc::new(LocalFileSystem));

        assert!(temp.path().join("1234567890128.jpg").exists());
        assert!(temp.path().join("1234567890128_back.jpg").exists());
        assert!(!temp.path().join(DEFAULT_QUARANTINE_DIR).exists());
    }

    #[test]
    fn folder_is_created_only_when_needed() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("12.jpg"), b"x").unwrap();

        process(temp.path(), &ManifestDecoder::new(), Arc::new(LocalFileSystem));

        assert!(!temp.path().join(DEFAULT_QUARANTINE_DIR).exists());
    }

    #[test]
    fn existing_quarantined_name_is_a_soft_failure() {
        let temp = TempDir::new().unwrap();
        let quarantine = temp.path().join(DEFAULT_QUARANTINE_DIR);
        fs::create_dir(&quarantine).unwrap();
        fs::write(quarantine.join("notes.jpg"), b"older").unwrap();
        fs::write(temp.path().join("notes.jpg"), b"newer").unwrap();

        let run = process(temp.path(), &ManifestDecoder::new(), Arc::new(LocalFileSystem));

        assert!(temp.path().join("notes.jpg").exists());
        assert_eq!(fs::read(quarantine.join("notes.jpg")).unwrap(), b"older");
        assert!(matches!(run.outcome(0), FileOutcome::QuarantineFailed { .. }));
    }

    #[test]
    fn dry_run_touches_nothing() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("notes.jpg"), b"x").unwrap();
        let dry = Arc::new(DryRunFileSystem::new());

        process(temp.path(), &ManifestDecoder::new(), dry.clone());

        assert!(temp.path().join("notes.jpg").exists());
        assert!(!temp.path().join(DEFAULT_QUARANTINE_DIR).exists());
        assert_eq!(dry.operations().len(), 2);
    }

    #[test]
    fn only_alphabetic_first_characters_qualify() {
        assert!(QuarantineMover::should_quarantine("notes.jpg"));
        assert!(QuarantineMover::should_quarantine("Émile.jpg"));
        assert!(!QuarantineMover::should_quarantine("9999.jpg"));
        assert!(!QuarantineMover::should_quarantine("_scan.jpg"));
        assert!(!QuarantineMover::should_quarantine(""));
    }
}
