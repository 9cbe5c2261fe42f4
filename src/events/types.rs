//! Event type definitions for progress reporting.

use crate::core::decoder::UndetectedReason;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted during a rename run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Scan(ScanEvent),
    Pair(PairEvent),
    Quarantine(QuarantineEvent),
    Run(RunEvent),
}

/// Events while listing directories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    Started { root: PathBuf },
    /// One directory listed
    DirectoryListed { path: PathBuf, images: usize },
    /// An error occurred below the root but scanning continues
    Error { path: PathBuf, message: String },
    Completed { directories: usize, total_images: usize },
}

/// Events from the forward pairing pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PairEvent {
    DirectoryStarted { directory: PathBuf, files: usize },
    /// One file decided, whatever the outcome
    Progress(PairProgress),
    Renamed { from: PathBuf, to: PathBuf },
    RenameFailed { from: PathBuf, to: PathBuf, message: String },
    Undetected { path: PathBuf, reason: UndetectedReason },
}

/// Progress information during pairing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairProgress {
    /// Files decided so far in this directory
    pub completed: usize,
    /// Files in this directory
    pub total: usize,
    pub current_path: PathBuf,
}

/// Events from the quarantine pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum QuarantineEvent {
    Moved { from: PathBuf, to: PathBuf },
    /// Undetected but kept in place because its name starts with a digit
    Kept { path: PathBuf },
    Failed { path: PathBuf, message: String },
}

/// Run-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RunEvent {
    Started,
    PhaseChanged { phase: RunPhase },
    Completed { summary: RunSummary },
    /// The run could not start
    Error { message: String },
}

/// Phases of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    Scanning,
    Pairing,
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunPhase::Scanning => write!(f, "Scanning"),
            RunPhase::Pairing => write!(f, "Pairing"),
        }
    }
}

/// Totals of a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub directories: usize,
    pub total_images: usize,
    pub renamed: usize,
    pub undetected: usize,
    pub quarantined: usize,
    /// Renames and moves that failed
    pub failures: usize,
    pub duration_ms: u64,
}
