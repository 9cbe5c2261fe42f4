//! Types for the pairing module.

use crate::core::barcode::{BarcodeKind, CanonicalBarcode};
use crate::core::decoder::{Symbology, UndetectedReason};
use crate::core::scanner::{DirectoryListing, ImageFile};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// How the back photo of a pair is named
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackNaming {
    /// `<barcode>_back.<ext>`
    #[default]
    Suffix,
    /// `back_<barcode>.<ext>`
    Prefix,
}

impl BackNaming {
    pub fn back_name(&self, barcode: &CanonicalBarcode, extension: &str) -> String {
        match self {
            BackNaming::Suffix => format!("{}_back{}", barcode, extension),
            BackNaming::Prefix => format!("back_{}{}", barcode, extension),
        }
    }
}

/// Name given to a front photo, or to a barcode photo renamed on its own
pub fn front_name(barcode: &CanonicalBarcode, extension: &str) -> String {
    format!("{}{}", barcode, extension)
}

/// Which part of a pair a renamed file plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenameRole {
    /// Renamed alone, its predecessor already identified or absent
    Single,
    Front,
    Back,
}

/// What happened to one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Not decided yet
    Pending,
    Renamed { to: String, role: RenameRole },
    /// The file already carried its barcode name
    AlreadyNamed,
    /// Reached while already renamed; nothing done
    Skipped,
    RenameFailed { to: String, error: String },
    Undetected { reason: UndetectedReason },
    Quarantined { to: PathBuf },
    QuarantineFailed { error: String },
    /// Undetected, but the name does not start with a letter
    KeptInPlace,
}

/// Per-file line of a directory report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub original_name: String,
    pub current_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<CanonicalBarcode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<BarcodeKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbology: Option<Symbology>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    pub outcome: FileOutcome,
}

/// Outcome of both passes over one directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryReport {
    pub directory: PathBuf,
    pub files: Vec<FileReport>,
    pub errors: Vec<String>,
}

impl DirectoryReport {
    pub fn renamed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Renamed { .. }))
    }

    pub fn undetected(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                FileOutcome::Undetected { .. }
                    | FileOutcome::Quarantined { .. }
                    | FileOutcome::QuarantineFailed { .. }
                    | FileOutcome::KeptInPlace
            )
        })
    }

    pub fn quarantined(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Quarantined { .. }))
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.outcome)).count()
    }
}

/// Barcode facts recorded for a decoded file
#[derive(Debug, Clone)]
pub(crate) struct DecodedInfo {
    pub barcode: CanonicalBarcode,
    pub raw: String,
    pub symbology: Symbology,
}

/// State of one directory while it is processed.
///
/// Holds the ordered files, the set of original names already renamed and
/// the original-to-new name mapping. Lives for the two passes over its
/// directory and nothing else; no state crosses directories.
#[derive(Debug)]
pub struct DirectoryRun {
    directory: PathBuf,
    files: Vec<ImageFile>,
    renamed: HashSet<String>,
    new_names: HashMap<String, String>,
    undetected: Vec<usize>,
    outcomes: Vec<FileOutcome>,
    decoded: Vec<Option<DecodedInfo>>,
    errors: Vec<String>,
}

impl DirectoryRun {
    pub fn new(listing: DirectoryListing) -> Self {
        let len = listing.files.len();
        Self {
            directory: listing.directory,
            files: listing.files,
            renamed: HashSet::new(),
            new_names: HashMap::new(),
            undetected: Vec::new(),
            outcomes: vec![FileOutcome::Pending; len],
            decoded: vec![None; len],
            errors: Vec::new(),
        }
    }

    pub fn directory(&self) -> &std::path::Path {
        &self.directory
    }

    pub fn files(&self) -> &[ImageFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn is_renamed(&self, original_name: &str) -> bool {
        self.renamed.contains(original_name)
    }

    /// New name of a renamed file, keyed by its original name
    pub fn new_name(&self, original_name: &str) -> Option<&str> {
        self.new_names.get(original_name).map(String::as_str)
    }

    /// Indices of files that yielded no barcode, in list order
    pub fn undetected(&self) -> &[usize] {
        &self.undetected
    }

    pub fn outcome(&self, index: usize) -> &FileOutcome {
        &self.outcomes[index]
    }

    pub(crate) fn mark_renamed(&mut self, index: usize, new_name: String) {
        let file = &mut self.files[index];
        self.renamed.insert(file.original_name.clone());
        self.new_names
            .insert(file.original_name.clone(), new_name.clone());
        file.current_name = new_name;
    }

    pub(crate) fn mark_undetected(&mut self, index: usize, reason: UndetectedReason) {
        self.undetected.push(index);
        self.outcomes[index] = FileOutcome::Undetected { reason };
    }

    pub(crate) fn set_outcome(&mut self, index: usize, outcome: FileOutcome) {
        self.outcomes[index] = outcome;
    }

    pub(crate) fn set_decoded(&mut self, index: usize, info: DecodedInfo) {
        self.decoded[index] = Some(info);
    }

    pub(crate) fn push_error(&mut self, error: String) {
        self.errors.push(error);
    }

    /// Consume the run into its report
    pub fn into_report(self) -> DirectoryReport {
        let files = self
            .files
            .into_iter()
            .zip(self.outcomes)
            .zip(self.decoded)
            .map(|((file, outcome), decoded)| FileReport {
                kind: decoded.as_ref().map(|d| d.barcode.kind()),
                barcode: decoded.as_ref().map(|d| d.barcode.clone()),
                symbology: decoded.as_ref().map(|d| d.symbology.clone()),
                raw: decoded.map(|d| d.raw),
                original_name: file.original_name,
                current_name: file.current_name,
                outcome,
            })
            .collect();

        DirectoryReport {
            directory: self.directory,
            files,
            errors: self.errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::barcode::normalize;
    use std::path::Path;
    use std::time::SystemTime;

    fn listing(names: &[&str]) -> DirectoryListing {
        DirectoryListing {
            directory: PathBuf::from("/photos"),
            files: names
                .iter()
                .map(|n| ImageFile::from_path(&Path::new("/photos").join(n), SystemTime::UNIX_EPOCH).unwrap())
                .collect(),
        }
    }

    #[test]
    fn back_naming_styles() {
        let code = normalize("1234567890128").unwrap();
        assert_eq!(BackNaming::Suffix.back_name(&code, ".jpg"), "1234567890128_back.jpg");
        assert_eq!(BackNaming::Prefix.back_name(&code, ".JPG"), "back_1234567890128.JPG");
        assert_eq!(front_name(&code, ".png"), "1234567890128.png");
    }

    #[test]
    fn mark_renamed_tracks_original_name() {
        let mut run = DirectoryRun::new(listing(&["IMG001.jpg", "IMG002.jpg"]));
        run.mark_renamed(0, "1234567890128.jpg".to_string());

        assert!(run.is_renamed("IMG001.jpg"));
        assert!(!run.is_renamed("1234567890128.jpg"));
        assert_eq!(run.new_name("IMG001.jpg"), Some("1234567890128.jpg"));
        assert_eq!(run.files()[0].current_name, "1234567890128.jpg");
        assert_eq!(run.files()[0].original_name, "IMG001.jpg");
    }

    #[test]
    fn report_counts_outcomes() {
        let mut run = DirectoryRun::new(listing(&["a.jpg", "b.jpg", "9.jpg"]));
        run.set_outcome(
            0,
            FileOutcome::Quarantined {
                to: PathBuf::from("/photos/Not_detectable/a.jpg"),
            },
        );
        run.set_outcome(
            1,
            FileOutcome::Renamed {
                to: "1234567890128.jpg".to_string(),
                role: RenameRole::Single,
            },
        );
        run.set_outcome(2, FileOutcome::KeptInPlace);

        let report = run.into_report();
        assert_eq!(report.renamed(), 1);
        assert_eq!(report.undetected(), 2);
        assert_eq!(report.quarantined(), 1);
    }
}
