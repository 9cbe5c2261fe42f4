//! The forward pass: decode each photo and rename it with its predecessor.

use super::types::*;
use crate::core::barcode::{classify, CanonicalBarcode};
use crate::core::decoder::{detect, BarcodeDecoder, Detection};
use crate::core::fs::FileSystem;
use crate::events::{Event, EventSender, PairEvent, PairProgress};
use tracing::{debug, info, warn};

/// Walks a [`DirectoryRun`] once, in order, with one file of lookback.
///
/// For each file not yet renamed:
/// - no usable barcode: the file is recorded as undetected
/// - barcode on the first file: that file alone takes the barcode name
/// - predecessor already renamed, or already named after the barcode:
///   only the current file is renamed
/// - otherwise the predecessor becomes the front and the current file
///   the back of a pair
///
/// Rename failures are logged and recorded; the pass always reaches the end.
pub struct SequencePairer<'a> {
    decoder: &'a dyn BarcodeDecoder,
    fs: &'a dyn FileSystem,
    back_naming: BackNaming,
    events: &'a EventSender,
}

impl<'a> SequencePairer<'a> {
    pub fn new(
        decoder: &'a dyn BarcodeDecoder,
        fs: &'a dyn FileSystem,
        back_naming: BackNaming,
        events: &'a EventSender,
    ) -> Self {
        Self {
            decoder,
            fs,
            back_naming,
            events,
        }
    }

    pub fn run(&self, run: &mut DirectoryRun) {
        let total = run.len();
        self.events.send(Event::Pair(PairEvent::DirectoryStarted {
            directory: run.directory().to_path_buf(),
            files: total,
        }));

        for i in 0..total {
            self.step(run, i);

            self.events.send(Event::Pair(PairEvent::Progress(PairProgress {
                completed: i + 1,
                total,
                current_path: run.files()[i].current_path(),
            })));
        }
    }

    fn step(&self, run: &mut DirectoryRun, i: usize) {
        let file = &run.files()[i];
        if run.is_renamed(&file.original_name) {
            debug!(file = %file.original_name, "skipping already renamed file");
            run.set_outcome(i, FileOutcome::Skipped);
            return;
        }

        let path = file.current_path();
        let (barcode, raw, symbology) = match detect(self.decoder, &path) {
            Detection::Barcode {
                barcode,
                raw,
                symbology,
            } => (barcode, raw, symbology),
            Detection::Undetected(reason) => {
                let stem = file.original_stem();
                if matches!(stem.len(), 12 | 13) && stem.bytes().all(|b| b.is_ascii_digit()) {
                    info!(
                        file = %file.original_name,
                        inferred = %classify(stem),
                        "no barcode found ({}), name already looks like a code", reason
                    );
                } else {
                    info!(file = %file.original_name, "no barcode found: {}", reason);
                }
                self.events.send(Event::Pair(PairEvent::Undetected {
                    path,
                    reason: reason.clone(),
                }));
                run.mark_undetected(i, reason);
                return;
            }
        };

        debug!(
            file = %file.original_name,
            raw = %raw,
            barcode = %barcode,
            symbology = %symbology,
            kind = %barcode.kind(),
            "barcode decoded"
        );
        run.set_decoded(
            i,
            DecodedInfo {
                barcode: barcode.clone(),
                raw,
                symbology,
            },
        );

        if i == 0 {
            self.rename_single(run, i, &barcode);
            return;
        }

        let prev = &run.files()[i - 1];
        if run.is_renamed(&prev.original_name) || prev.original_stem() == barcode.as_str() {
            debug!(
                previous = %prev.original_name,
                barcode = %barcode,
                "previous file already identified, renaming current only"
            );
            self.rename_single(run, i, &barcode);
        } else {
            self.rename_pair(run, i, &barcode);
        }
    }

    fn rename_single(&self, run: &mut DirectoryRun, i: usize, barcode: &CanonicalBarcode) {
        let name = front_name(barcode, &run.files()[i].extension);
        self.rename(run, i, name, RenameRole::Single);
    }

    fn rename_pair(&self, run: &mut DirectoryRun, i: usize, barcode: &CanonicalBarcode) {
        let front = front_name(barcode, &run.files()[i - 1].extension);
        if !self.rename(run, i - 1, front, RenameRole::Front) {
            // a back without its front would orphan the pair
            let to = self.back_naming.back_name(barcode, &run.files()[i].extension);
            run.set_outcome(
                i,
                FileOutcome::RenameFailed {
                    to,
                    error: "front photo could not be renamed".to_string(),
                },
            );
            return;
        }

        let back = self.back_naming.back_name(barcode, &run.files()[i].extension);
        self.rename(run, i, back, RenameRole::Back);
    }

    /// Rename one file, recording the outcome. Returns whether it now
    /// carries `new_name`.
    fn rename(&self, run: &mut DirectoryRun, i: usize, new_name: String, role: RenameRole) -> bool {
        let file = &run.files()[i];

        if file.current_name == new_name {
            debug!(file = %file.current_name, "already named after its barcode");
            run.set_outcome(i, FileOutcome::AlreadyNamed);
            run.mark_renamed(i, new_name);
            return true;
        }

        let from = file.current_path();
        let to = file.directory.join(&new_name);

        match self.fs.rename(&from, &to) {
            Ok(()) => {
                info!(from = %file.current_name, to = %new_name, role = ?role, "renamed");
                self.events.send(Event::Pair(PairEvent::Renamed {
                    from,
                    to,
                }));
                run.set_outcome(
                    i,
                    FileOutcome::Renamed {
                        to: new_name.clone(),
                        role,
                    },
                );
                run.mark_renamed(i, new_name);
                true
            }
            Err(e) => {
                warn!(from = %file.current_name, to = %new_name, "rename failed: {}", e);
                let message = e.to_string();
                self.events.send(Event::Pair(PairEvent::RenameFailed {
                    from,
                    to,
                    message: message.clone(),
                }));
                let error = format!("{}: {}", file.original_name, message);
                run.push_error(error);
                run.set_outcome(
                    i,
                    FileOutcome::RenameFailed {
                        to: new_name,
                        error: message,
                    },
                );
                false
            }
        }
    }
}
