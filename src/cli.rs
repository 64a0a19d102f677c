//! Command-line interface definitions for dupesweep.
//!
//! Every argument is optional: with none, `~/Downloads` is scanned and
//! duplicates go to `~/Downloads/duplicates`.
//!
//! # Example
//!
//! ```bash
//! # Sweep ~/Downloads
//! dupesweep
//!
//! # Sweep another folder and see what would move first
//! dupesweep ~/Desktop --dry-run
//!
//! # Put duplicates outside the scanned folder, JSON report
//! dupesweep ~/Desktop --dest /mnt/backup/dupes --output json
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Move byte-identical duplicate files out of a folder.
///
/// Files are compared by BLAKE3 content hash. In every set of identical
/// files the oldest one stays put and the others are moved into a
/// duplicates folder, renamed `<name>_copyN` if needed.
#[derive(Debug, Parser)]
#[command(name = "dupesweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan (default: ~/Downloads)
    #[arg(value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Folder to move duplicates into; relative paths are inside DIR
    #[arg(short, long, value_name = "PATH")]
    pub dest: Option<PathBuf>,

    /// Show what would be moved without moving anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress log output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output fatal errors as JSON
    #[arg(long, env = "DUPESWEEP_JSON_ERRORS")]
    pub json_errors: bool,
}

/// Report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
