//! # CLI Module
//!
//! Command-line interface for the barcode renamer.
//!
//! ## Usage
//! ```bash
//! # Rename the photos of one shoot directory
//! barcode-rename run ~/Shoots/2024-05-02
//!
//! # Every folder below, paired in capture order, without touching anything
//! barcode-rename run ~/Shoots --recursive --order created --dry-run
//!
//! # Readings from a manifest instead of zbarimg, JSON report
//! barcode-rename run ~/Shoots/2024-05-02 --manifest readings.json --output json
//!
//! # Canonicalize codes by hand
//! barcode-rename check 012345678905 6901234567891
//! ```

use barcode_renamer::core::barcode::{classify, normalize};
use barcode_renamer::core::decoder::{BarcodeDecoder, ManifestDecoder, ZbarDecoder};
use barcode_renamer::core::pairing::{BackNaming, FileOutcome};
use barcode_renamer::core::pipeline::{Pipeline, RunReport};
use barcode_renamer::core::quarantine::DEFAULT_QUARANTINE_DIR;
use barcode_renamer::core::scanner::SortOrder;
use barcode_renamer::error::Result;
use barcode_renamer::events::{Event, EventChannel, PairEvent, RunEvent, ScanEvent};
use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::thread;

/// Barcode Renamer - name product photo pairs after their barcode
#[derive(Parser, Debug)]
#[command(name = "barcode-rename")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rename the photos of a directory after their barcodes
    Run {
        /// Directory holding the photos
        path: PathBuf,

        /// Also process every subdirectory, each on its own
        #[arg(short, long)]
        recursive: bool,

        /// Order in which photos are paired
        #[arg(long, default_value = "name")]
        order: Order,

        /// How back photos are named
        #[arg(long, default_value = "suffix")]
        back_style: BackStyle,

        /// Folder (under PATH) for photos that yielded no barcode
        #[arg(long, default_value = DEFAULT_QUARANTINE_DIR)]
        quarantine_dir: String,

        /// Leave undetected photos where they are
        #[arg(long)]
        no_quarantine: bool,

        /// Include hidden files and folders
        #[arg(long)]
        include_hidden: bool,

        /// Follow symbolic links while walking
        #[arg(long)]
        follow_symlinks: bool,

        /// Process independent folders concurrently
        #[arg(long)]
        parallel: bool,

        /// Show what would happen without renaming anything
        #[arg(long)]
        dry_run: bool,

        /// Read barcodes from a JSON manifest instead of decoding images
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Path to the zbarimg binary
        #[arg(long, default_value = "zbarimg")]
        zbarimg: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the canonical 13-digit form of raw barcode digits
    Check {
        /// Raw digit strings as read by a scanner
        #[arg(required = true)]
        codes: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Order {
    /// Filename, lexicographic
    Name,
    /// Creation time, oldest first
    Created,
}

impl From<Order> for SortOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Name => SortOrder::Name,
            Order::Created => SortOrder::Created,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackStyle {
    /// <barcode>_back.jpg
    Suffix,
    /// back_<barcode>.jpg
    Prefix,
}

impl From<BackStyle> for BackNaming {
    fn from(style: BackStyle) -> Self {
        match style {
            BackStyle::Suffix => BackNaming::Suffix,
            BackStyle::Prefix => BackNaming::Prefix,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON report for scripting
    Json,
    /// One `old -> new` line per rename or move
    Minimal,
}

/// Options of the `run` subcommand
struct RunOptions {
    path: PathBuf,
    recursive: bool,
    order: SortOrder,
    back_naming: BackNaming,
    quarantine_dir: Option<String>,
    include_hidden: bool,
    follow_symlinks: bool,
    parallel: bool,
    dry_run: bool,
    manifest: Option<PathBuf>,
    zbarimg: PathBuf,
    output: OutputFormat,
    verbose: bool,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            path,
            recursive,
            order,
            back_style,
            quarantine_dir,
            no_quarantine,
            include_hidden,
            follow_symlinks,
            parallel,
            dry_run,
            manifest,
            zbarimg,
            output,
            verbose,
        } => run_rename(RunOptions {
            path,
            recursive,
            order: order.into(),
            back_naming: back_style.into(),
            quarantine_dir: (!no_quarantine).then_some(quarantine_dir),
            include_hidden,
            follow_symlinks,
            parallel,
            dry_run,
            manifest,
            zbarimg,
            output,
            verbose,
        }),
        Commands::Check { codes } => {
            barcode_renamer::init_tracing("warn");
            run_check(&codes);
            Ok(())
        }
    }
}

fn run_rename(options: RunOptions) -> Result<()> {
    barcode_renamer::init_tracing(if options.verbose { "debug" } else { "warn" });
    let term = Term::stderr();

    if matches!(options.output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}{}",
            style("Barcode Renamer").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim(),
            if options.dry_run {
                style(" (dry run)").yellow().to_string()
            } else {
                String::new()
            }
        ))
        .ok();
        term.write_line("").ok();
    }

    let decoder: Box<dyn BarcodeDecoder> = match &options.manifest {
        Some(manifest) => Box::new(ManifestDecoder::from_file(manifest)?),
        None => Box::new(ZbarDecoder::with_program(options.zbarimg.clone())),
    };

    let pipeline = Pipeline::builder()
        .root(options.path.clone())
        .recursive(options.recursive)
        .sort_order(options.order)
        .back_naming(options.back_naming)
        .quarantine_dir(options.quarantine_dir.clone())
        .include_hidden(options.include_hidden)
        .follow_symlinks(options.follow_symlinks)
        .parallel(options.parallel)
        .dry_run(options.dry_run)
        .decoder(decoder)
        .build();

    let (sender, receiver) = EventChannel::new();

    let progress = if matches!(options.output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(0);
        if let Ok(bar_style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(bar_style.progress_chars("█▓░"));
        }
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();
    let verbose = options.verbose;

    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };
            match event {
                Event::Run(RunEvent::PhaseChanged { phase }) => {
                    pb.set_message(format!("{}", phase));
                }
                Event::Scan(ScanEvent::Completed { total_images, .. }) => {
                    pb.set_length(total_images as u64);
                }
                Event::Pair(PairEvent::Progress(p)) => {
                    pb.inc(1);
                    if verbose {
                        pb.set_message(
                            p.current_path
                                .file_name()
                                .unwrap_or_default()
                                .to_string_lossy()
                                .into_owned(),
                        );
                    }
                }
                Event::Pair(PairEvent::RenameFailed { from, message, .. }) => {
                    pb.println(format!(
                        "{} {}: {}",
                        style("!").yellow(),
                        from.display(),
                        message
                    ));
                }
                Event::Run(RunEvent::Completed { .. }) | Event::Run(RunEvent::Error { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let result = pipeline.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    let report = result?;

    match options.output {
        OutputFormat::Pretty => print_pretty_report(&term, &report, verbose),
        OutputFormat::Json => print_json_report(&report),
        OutputFormat::Minimal => print_minimal_report(&report),
    }

    Ok(())
}

fn print_pretty_report(term: &Term, report: &RunReport, verbose: bool) {
    let summary = &report.summary;

    term.write_line(&format!(
        "{} {}",
        style("✓").green().bold(),
        if report.dry_run {
            "Dry Run Complete"
        } else {
            "Rename Complete"
        }
    ))
    .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} photos in {} folders processed in {:.1}s",
        style(summary.total_images).cyan(),
        style(summary.directories).cyan(),
        summary.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!("  {} renamed", style(summary.renamed).green()))
        .ok();
    term.write_line(&format!(
        "  {} without barcode ({} quarantined)",
        style(summary.undetected).yellow(),
        summary.quarantined
    ))
    .ok();
    if summary.failures > 0 {
        term.write_line(&format!("  {} failures", style(summary.failures).red()))
            .ok();
    }
    term.write_line("").ok();

    for directory in &report.directories {
        term.write_line(&format!(
            "{}",
            style(directory.directory.display()).bold().underlined()
        ))
        .ok();

        for file in &directory.files {
            let line = match &file.outcome {
                FileOutcome::Renamed { to, .. } => Some(format!(
                    "    {} {} -> {}{}",
                    style("✓").green(),
                    file.original_name,
                    to,
                    match (&file.kind, verbose) {
                        (Some(kind), true) => format!(" ({})", kind),
                        _ => String::new(),
                    }
                )),
                FileOutcome::Quarantined { to } => Some(format!(
                    "    {} {} -> {}",
                    style("→").yellow(),
                    file.original_name,
                    to.display()
                )),
                FileOutcome::RenameFailed { to, error } => Some(format!(
                    "    {} {} -/-> {}: {}",
                    style("✗").red(),
                    file.original_name,
                    to,
                    style(error).dim()
                )),
                FileOutcome::QuarantineFailed { error } => Some(format!(
                    "    {} {}: {}",
                    style("✗").red(),
                    file.original_name,
                    style(error).dim()
                )),
                FileOutcome::KeptInPlace | FileOutcome::Undetected { .. } if verbose => {
                    Some(format!(
                        "    {} {} (no barcode)",
                        style("○").dim(),
                        file.original_name
                    ))
                }
                _ => None,
            };

            if let Some(line) = line {
                term.write_line(&line).ok();
            }
        }
        term.write_line("").ok();
    }

    for error in &report.scan_errors {
        term.write_line(&format!("{} {}", style("!").yellow(), error))
            .ok();
    }
}

fn print_json_report(report: &RunReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("failed to serialize report: {}", e),
    }
}

fn print_minimal_report(report: &RunReport) {
    for directory in &report.directories {
        for file in &directory.files {
            match &file.outcome {
                FileOutcome::Renamed { to, .. } => println!(
                    "{} -> {}",
                    directory.directory.join(&file.original_name).display(),
                    directory.directory.join(to).display()
                ),
                FileOutcome::Quarantined { to } => println!(
                    "{} -> {}",
                    directory.directory.join(&file.original_name).display(),
                    to.display()
                ),
                _ => {}
            }
        }
    }
}

fn run_check(codes: &[String]) {
    for code in codes {
        match normalize(code) {
            Ok(canonical) => println!(
                "{} -> {} ({}, read as {})",
                code,
                canonical,
                canonical.kind(),
                classify(code)
            ),
            Err(e) => println!("{} -> {}", code, e),
        }
    }
}
