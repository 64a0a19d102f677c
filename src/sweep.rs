//! One complete sweep: scan, group, relocate.
//!
//! [`sweep`] runs the whole workflow for a [`SweepConfig`] and returns a
//! [`SweepReport`]. It prints nothing; rendering is left to
//! [`crate::output`].

use std::sync::Arc;

use crate::actions::{RelocateConfig, RelocationReport, Relocator};
use crate::config::SweepConfig;
use crate::duplicates::{DuplicateFinder, FinderConfig, FinderError, ScanSummary};
use crate::progress::ProgressCallback;

/// How a sweep ended.
#[derive(Debug)]
pub enum SweepOutcome {
    /// The scan directory is missing or not a directory. Nothing was done.
    TargetMissing(FinderError),
    /// The scan found no duplicate groups. Nothing was moved.
    NoDuplicates(ScanSummary),
    /// Duplicates were found and relocation was attempted.
    Relocated {
        /// Scan statistics and per-file hash failures
        summary: ScanSummary,
        /// Per-group move outcomes
        report: RelocationReport,
    },
}

impl SweepOutcome {
    /// Short machine-readable name of the outcome.
    #[must_use]
    pub fn status(&self) -> &'static str {
        match self {
            Self::TargetMissing(_) => "target_missing",
            Self::NoDuplicates(_) => "no_duplicates",
            Self::Relocated { .. } => "relocated",
        }
    }

    /// Scan statistics, if a scan happened.
    #[must_use]
    pub fn summary(&self) -> Option<&ScanSummary> {
        match self {
            Self::TargetMissing(_) => None,
            Self::NoDuplicates(summary) | Self::Relocated { summary, .. } => Some(summary),
        }
    }

    /// Relocation results, if relocation happened.
    #[must_use]
    pub fn report(&self) -> Option<&RelocationReport> {
        match self {
            Self::Relocated { report, .. } => Some(report),
            _ => None,
        }
    }

    /// Number of files moved (or that would be moved, in a dry run).
    #[must_use]
    pub fn moved_count(&self) -> usize {
        self.report().map_or(0, RelocationReport::moved_count)
    }
}

/// Configuration and outcome of one sweep.
#[derive(Debug)]
pub struct SweepReport {
    /// Paths and options the sweep ran with
    pub config: SweepConfig,
    /// What happened
    pub outcome: SweepOutcome,
}

/// Run a sweep.
///
/// A missing scan directory, an empty result and files that cannot be
/// hashed or moved are all normal outcomes recorded in the report.
pub fn sweep(config: &SweepConfig, progress: Option<Arc<dyn ProgressCallback>>) -> SweepReport {
    let mut finder_config = FinderConfig::default().with_exclude(config.dest_dir.clone());
    if let Some(cb) = progress {
        finder_config = finder_config.with_progress_callback(cb);
    }

    let finder = DuplicateFinder::new(finder_config);
    let (groups, summary) = match finder.find_duplicates(&config.scan_dir) {
        Ok(found) => found,
        Err(e) => {
            log::debug!("{}", e);
            return SweepReport {
                config: config.clone(),
                outcome: SweepOutcome::TargetMissing(e),
            };
        }
    };

    log::debug!(
        "Scanned {} file(s) ({}) in {:?}",
        summary.total_files,
        summary.total_size_display(),
        summary.scan_duration
    );

    if groups.is_empty() {
        return SweepReport {
            config: config.clone(),
            outcome: SweepOutcome::NoDuplicates(summary),
        };
    }

    let relocator = Relocator::new(
        RelocateConfig::new(config.dest_dir.clone()).with_dry_run(config.dry_run),
    );
    let report = relocator.relocate(&groups);

    SweepReport {
        config: config.clone(),
        outcome: SweepOutcome::Relocated { summary, report },
    }
}
