//! dupesweep - Duplicate file sweeper
//!
//! Scans one flat directory (by default `~/Downloads`), finds files with
//! identical content using BLAKE3, keeps the oldest file of every set and
//! moves the others into a `duplicates` subfolder for later review.
//!
//! The library is split into:
//! - [`scanner`]: directory listing and content hashing
//! - [`duplicates`]: grouping by digest and keeper selection
//! - [`actions`]: moving files into the destination folder
//! - [`sweep`]: the whole workflow for one [`config::SweepConfig`]
//! - [`output`]: text and JSON reports

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod sweep;

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::{Cli, OutputFormat};
use crate::config::SweepConfig;
use crate::error::ExitCode;
use crate::output::{JsonOutput, TextOutput};
use crate::progress::{Progress, ProgressCallback};

/// Run the application with parsed arguments.
///
/// Prints the report to stdout and returns the process exit code. A missing
/// scan directory, a clean directory and per-file failures (including an
/// uncreatable destination folder) all end in [`ExitCode::Success`].
///
/// # Errors
///
/// Fails if the configuration cannot be resolved or the report cannot be
/// written.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let config = SweepConfig::resolve(cli.path, cli.dest, cli.dry_run)?;
    log::debug!(
        "Sweeping {} into {}",
        config.scan_dir.display(),
        config.dest_dir.display()
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.output == OutputFormat::Text {
        TextOutput::write_banner(&mut out, &config.scan_dir, chrono::Local::now())
            .context("Failed to write report")?;
        out.flush().context("Failed to write report")?;
    }

    let quiet_progress = cli.quiet || cli.output == OutputFormat::Json;
    let progress: Arc<dyn ProgressCallback> = Arc::new(Progress::new(quiet_progress));

    let report = sweep::sweep(&config, Some(progress));

    match cli.output {
        OutputFormat::Text => TextOutput::new(&report)
            .write_to(&mut out)
            .context("Failed to write report")?,
        OutputFormat::Json => JsonOutput::new(&report)
            .write_to(&mut out)
            .context("Failed to write JSON report")?,
    }

    log::debug!("Sweep finished: {}", report.outcome.status());
    Ok(ExitCode::Success)
}
