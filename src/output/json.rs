//! JSON output formatter for sweep results.
//!
//! Provides machine-readable output for scripting.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "scan_dir": "/home/user/Downloads",
//!   "destination": "/home/user/Downloads/duplicates",
//!   "dry_run": false,
//!   "status": "relocated",
//!   "summary": {
//!     "total_files": 12,
//!     "hashed_files": 11,
//!     "duplicate_groups": 1,
//!     "duplicate_files": 1,
//!     "reclaimable_space": 5,
//!     "moved_files": 1,
//!     "failed_moves": 0,
//!     "scan_duration_ms": 3
//!   },
//!   "groups": [
//!     {
//!       "hash": "ea8f163d...",
//!       "keeper": "/home/user/Downloads/x.txt",
//!       "moves": [
//!         { "source": "/home/user/Downloads/y.txt",
//!           "destination": "/home/user/Downloads/duplicates/y.txt",
//!           "error": null }
//!       ]
//!     }
//!   ],
//!   "errors": [
//!     { "path": "/home/user/Downloads/locked.bin", "message": "Permission denied: ..." }
//!   ]
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use crate::actions::{GroupReport, MoveOutcome};
use crate::scanner::{hash_to_hex, ScanError};
use crate::sweep::{SweepOutcome, SweepReport};

/// One attempted move in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonMove {
    /// Original location
    pub source: String,
    /// New location; `null` if the move failed
    pub destination: Option<String>,
    /// Failure message; `null` if the move succeeded
    pub error: Option<String>,
}

impl JsonMove {
    /// Convert a move outcome.
    #[must_use]
    pub fn from_outcome(outcome: &MoveOutcome) -> Self {
        match outcome {
            MoveOutcome::Moved {
                source,
                destination,
                ..
            } => Self {
                source: source.to_string_lossy().into_owned(),
                destination: Some(destination.to_string_lossy().into_owned()),
                error: None,
            },
            MoveOutcome::Failed { source, error } => Self {
                source: source.to_string_lossy().into_owned(),
                destination: None,
                error: Some(error.to_string()),
            },
        }
    }
}

/// A duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonGroup {
    /// BLAKE3 hash as hexadecimal string (64 characters)
    pub hash: String,
    /// File left in place
    pub keeper: String,
    /// Moves attempted for the other members
    pub moves: Vec<JsonMove>,
}

impl JsonGroup {
    /// Convert a group report.
    #[must_use]
    pub fn from_group_report(group: &GroupReport) -> Self {
        Self {
            hash: hash_to_hex(&group.hash),
            keeper: group.keeper.path.to_string_lossy().into_owned(),
            moves: group.outcomes.iter().map(JsonMove::from_outcome).collect(),
        }
    }
}

/// A per-file scan failure in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonError {
    /// File that could not be read
    pub path: String,
    /// Error description
    pub message: String,
}

impl JsonError {
    fn from_scan_error(err: &ScanError) -> Self {
        Self {
            path: err.path().to_string_lossy().into_owned(),
            message: err.to_string(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JsonSummary {
    pub total_files: usize,
    pub hashed_files: usize,
    pub duplicate_groups: usize,
    pub duplicate_files: usize,
    pub reclaimable_space: u64,
    pub moved_files: usize,
    pub failed_moves: usize,
    pub scan_duration_ms: u64,
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    pub scan_dir: String,
    pub destination: String,
    pub dry_run: bool,
    /// `relocated`, `no_duplicates` or `target_missing`
    pub status: String,
    /// Why the scan could not start, for `target_missing`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub summary: JsonSummary,
    pub groups: Vec<JsonGroup>,
    pub errors: Vec<JsonError>,
}

impl JsonOutput {
    /// Build the JSON document for a finished sweep.
    #[must_use]
    pub fn new(report: &SweepReport) -> Self {
        let outcome = &report.outcome;
        let mut summary = JsonSummary::default();
        let mut errors = Vec::new();

        if let Some(scan) = outcome.summary() {
            summary.total_files = scan.total_files;
            summary.hashed_files = scan.hashed_files;
            summary.duplicate_groups = scan.duplicate_groups;
            summary.duplicate_files = scan.duplicate_files;
            summary.reclaimable_space = scan.reclaimable_space;
            summary.scan_duration_ms = scan.scan_duration.as_millis() as u64;
            errors = scan.scan_errors.iter().map(JsonError::from_scan_error).collect();
        }

        let groups = match outcome.report() {
            Some(relocation) => {
                summary.moved_files = relocation.moved_count();
                summary.failed_moves = relocation.failed_count();
                relocation
                    .groups
                    .iter()
                    .map(JsonGroup::from_group_report)
                    .collect()
            }
            None => Vec::new(),
        };

        let message = match outcome {
            SweepOutcome::TargetMissing(e) => Some(e.to_string()),
            _ => None,
        };

        Self {
            scan_dir: report.config.scan_dir.to_string_lossy().into_owned(),
            destination: report.config.dest_dir.to_string_lossy().into_owned(),
            dry_run: report.config.dry_run,
            status: outcome.status().to_string(),
            message,
            summary,
            groups,
            errors,
        }
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), JsonOutputError> {
        let json = self.to_json_pretty()?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
