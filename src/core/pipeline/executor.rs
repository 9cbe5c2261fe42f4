//! Pipeline execution implementation.

use crate::core::decoder::{BarcodeDecoder, ZbarDecoder};
use crate::core::fs::{DryRunFileSystem, FileSystem, LocalFileSystem};
use crate::core::pairing::{BackNaming, DirectoryReport, DirectoryRun, SequencePairer};
use crate::core::quarantine::{QuarantineMover, DEFAULT_QUARANTINE_DIR};
use crate::core::scanner::{DirectoryListing, DirectoryScanner, ImageScanner, ScanConfig, SortOrder};
use crate::error::BarcodeRenamerError;
use crate::events::{null_sender, Event, EventSender, RunEvent, RunPhase, RunSummary};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use uuid::Uuid;

/// Everything a run can be told
#[derive(Debug, Clone)]
pub struct RenameConfig {
    /// Directory to process
    pub root: PathBuf,
    /// Scanner configuration (recursion, order, hidden files)
    pub scan: ScanConfig,
    /// Naming of back photos
    pub back_naming: BackNaming,
    /// Quarantine folder name under the root; `None` disables the pass
    pub quarantine_dir: Option<String>,
    /// Simulate writes instead of performing them
    pub dry_run: bool,
    /// Process independent directories concurrently
    pub parallel: bool,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            scan: ScanConfig::default(),
            back_naming: BackNaming::Suffix,
            quarantine_dir: Some(DEFAULT_QUARANTINE_DIR.to_string()),
            dry_run: false,
            parallel: false,
        }
    }
}

impl RenameConfig {
    fn validate(&self) -> Result<(), BarcodeRenamerError> {
        if let Some(name) = &self.quarantine_dir {
            let mut components = Path::new(name).components();
            let single_normal = matches!(components.next(), Some(Component::Normal(_)))
                && components.next().is_none();
            if !single_normal {
                return Err(BarcodeRenamerError::Config(format!(
                    "quarantine folder must be a plain folder name, got {:?}",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Result of a finished run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub root: PathBuf,
    pub dry_run: bool,
    pub directories: Vec<DirectoryReport>,
    /// Non-fatal errors below the root
    pub scan_errors: Vec<String>,
    pub summary: RunSummary,
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: RenameConfig,
    decoder: Option<Box<dyn BarcodeDecoder>>,
    fs: Option<Arc<dyn FileSystem>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            config: RenameConfig::default(),
            decoder: None,
            fs: None,
        }
    }

    /// Set the directory to process
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    /// Process every directory below the root, each on its own
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.config.scan.recursive = recursive;
        self
    }

    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.config.scan.sort_order = order;
        self
    }

    pub fn back_naming(mut self, naming: BackNaming) -> Self {
        self.config.back_naming = naming;
        self
    }

    /// Set the quarantine folder name, or `None` to keep undetected files in place
    pub fn quarantine_dir(mut self, name: Option<String>) -> Self {
        self.config.quarantine_dir = name;
        self
    }

    pub fn include_hidden(mut self, include: bool) -> Self {
        self.config.scan.include_hidden = include;
        self
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.config.scan.follow_symlinks = follow;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.config.dry_run = dry_run;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Set the barcode decoder (defaults to zbarimg)
    pub fn decoder(mut self, decoder: Box<dyn BarcodeDecoder>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    /// Set the filesystem backend, overriding `dry_run`
    pub fn file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = Some(fs);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        let dry_run = self.config.dry_run;
        let fs = self.fs.unwrap_or_else(|| -> Arc<dyn FileSystem> {
            if dry_run {
                Arc::new(DryRunFileSystem::new())
            } else {
                Arc::new(LocalFileSystem::new())
            }
        });

        Pipeline {
            config: self.config,
            decoder: self
                .decoder
                .unwrap_or_else(|| Box::new(ZbarDecoder::new())),
            fs,
            quarantine_lock: Mutex::new(()),
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The barcode rename pipeline
pub struct Pipeline {
    config: RenameConfig,
    decoder: Box<dyn BarcodeDecoder>,
    fs: Arc<dyn FileSystem>,
    /// Every directory moves into the same quarantine folder
    quarantine_lock: Mutex<()>,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &RenameConfig {
        &self.config
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<RunReport, BarcodeRenamerError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting
    pub fn run_with_events(&self, events: &EventSender) -> Result<RunReport, BarcodeRenamerError> {
        let start_time = Instant::now();
        let started_at = Utc::now();

        self.config.validate()?;
        events.send(Event::Run(RunEvent::Started));

        // Phase 1: Scanning
        events.send(Event::Run(RunEvent::PhaseChanged {
            phase: RunPhase::Scanning,
        }));

        let mut scan_config = self.config.scan.clone();
        scan_config.excluded_dir = self.config.quarantine_dir.clone();
        let scanner = DirectoryScanner::new(scan_config, self.fs.clone());

        let scan_result = match scanner.scan_with_events(&self.config.root, events) {
            Ok(result) => result,
            Err(e) => {
                events.send(Event::Run(RunEvent::Error {
                    message: e.to_string(),
                }));
                return Err(e.into());
            }
        };

        let total_images = scan_result.total_images();
        let scan_errors: Vec<String> = scan_result.errors.iter().map(|e| e.to_string()).collect();

        // Phase 2: Pairing and quarantine, one run per directory
        events.send(Event::Run(RunEvent::PhaseChanged {
            phase: RunPhase::Pairing,
        }));

        tracing::info!(
            root = %self.config.root.display(),
            directories = scan_result.directories.len(),
            images = total_images,
            dry_run = self.config.dry_run,
            "processing"
        );

        let directories: Vec<DirectoryReport> = if self.config.parallel {
            scan_result
                .directories
                .into_par_iter()
                .map(|listing| self.process_directory(listing, events))
                .collect()
        } else {
            scan_result
                .directories
                .into_iter()
                .map(|listing| self.process_directory(listing, events))
                .collect()
        };

        let summary = RunSummary {
            directories: directories.len(),
            total_images,
            renamed: directories.iter().map(DirectoryReport::renamed).sum(),
            undetected: directories.iter().map(DirectoryReport::undetected).sum(),
            quarantined: directories.iter().map(DirectoryReport::quarantined).sum(),
            failures: directories.iter().map(|d| d.errors.len()).sum(),
            duration_ms: start_time.elapsed().as_millis() as u64,
        };

        events.send(Event::Run(RunEvent::Completed {
            summary: summary.clone(),
        }));

        Ok(RunReport {
            id: Uuid::new_v4().to_string(),
            started_at,
            root: self.config.root.clone(),
            dry_run: self.config.dry_run,
            directories,
            scan_errors,
            summary,
        })
    }

    fn process_directory(&self, listing: DirectoryListing, events: &EventSender) -> DirectoryReport {
        let mut run = DirectoryRun::new(listing);

        SequencePairer::new(
            self.decoder.as_ref(),
            self.fs.as_ref(),
            self.config.back_naming,
            events,
        )
        .run(&mut run);

        if let Some(name) = &self.config.quarantine_dir {
            let _guard = self
                .quarantine_lock
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            QuarantineMover::new(self.fs.as_ref(), self.config.root.join(name), events)
                .run(&mut run);
        }

        run.into_report()
    }
}
