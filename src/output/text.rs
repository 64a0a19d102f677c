//! Human-readable console report.
//!
//! The banner is written before the scan starts; the rest of the report is
//! written once the sweep has finished:
//!
//! ```text
//! === Duplicate File Finder ===
//! Date: 2026-01-31 09:15:02
//! Checking: /home/user/Downloads
//!
//! Scanning for duplicates...
//! Found 2 duplicate file(s) in 1 group(s)
//!
//! Found 2 duplicate(s) of: invoice.pdf
//!   Moved: invoice (1).pdf -> duplicates/
//!   Moved: invoice.pdf -> duplicates/invoice_copy1.pdf
//!
//! === Summary ===
//! Moved 2 duplicate file(s) to: /home/user/Downloads/duplicates
//! Relocated: 1.2 MiB
//! You can review and delete them when ready.
//! ```
//!
//! None of this text is meant to be parsed; use the JSON output for that.

use std::io::{self, Write};
use std::path::Path;

use bytesize::ByteSize;
use chrono::{DateTime, Local};

use crate::actions::{MoveOutcome, RelocationReport};
use crate::duplicates::ScanSummary;
use crate::scanner::ScanError;
use crate::sweep::{SweepOutcome, SweepReport};

/// Renders a [`SweepReport`] as plain text.
pub struct TextOutput<'a> {
    report: &'a SweepReport,
}

impl<'a> TextOutput<'a> {
    /// Wrap a finished sweep.
    #[must_use]
    pub fn new(report: &'a SweepReport) -> Self {
        Self { report }
    }

    /// Write the banner shown before scanning begins.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_banner<W: Write>(
        writer: &mut W,
        scan_dir: &Path,
        now: DateTime<Local>,
    ) -> io::Result<()> {
        writeln!(writer, "=== Duplicate File Finder ===")?;
        writeln!(writer, "Date: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(writer, "Checking: {}", scan_dir.display())?;
        writeln!(writer)?;
        Ok(())
    }

    /// Write the body of the report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let config = &self.report.config;

        match &self.report.outcome {
            SweepOutcome::TargetMissing(e) => {
                writeln!(writer, "Error: {e}")?;
                writeln!(writer, "Nothing to do.")?;
            }
            SweepOutcome::NoDuplicates(summary) => {
                writeln!(writer, "Scanning for duplicates...")?;
                write_scan_errors(writer, summary)?;
                writeln!(
                    writer,
                    "No duplicates found! {} is clean.",
                    config.scan_dir.display()
                )?;
            }
            SweepOutcome::Relocated { summary, report } => {
                writeln!(writer, "Scanning for duplicates...")?;
                write_scan_errors(writer, summary)?;
                writeln!(
                    writer,
                    "Found {} duplicate file(s) in {} group(s)",
                    summary.duplicate_files, summary.duplicate_groups
                )?;
                write_groups(writer, report)?;
                write_summary(writer, report)?;
            }
        }
        Ok(())
    }

    /// Render the body into a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut buf = Vec::new();
        // Writing to a Vec cannot fail
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

fn write_scan_errors<W: Write>(writer: &mut W, summary: &ScanSummary) -> io::Result<()> {
    for err in &summary.scan_errors {
        let action = match err {
            ScanError::HashError(_) => "hashing",
            _ => "reading",
        };
        writeln!(writer, "Error {action} {}: {err}", err.path().display())?;
    }
    Ok(())
}

fn write_groups<W: Write>(writer: &mut W, report: &RelocationReport) -> io::Result<()> {
    let dest_label = folder_label(&report.destination);
    let verb = if report.dry_run { "Would move" } else { "Moved" };

    for group in &report.groups {
        writeln!(writer)?;
        writeln!(
            writer,
            "Found {} duplicate(s) of: {}",
            group.outcomes.len(),
            group.keeper.file_name()
        )?;

        for outcome in &group.outcomes {
            let name = display_name(outcome.source());
            match outcome {
                MoveOutcome::Moved { source, destination, .. } => {
                    if source.file_name() == destination.file_name() {
                        writeln!(writer, "  {verb}: {name} -> {dest_label}/")?;
                    } else {
                        writeln!(
                            writer,
                            "  {verb}: {name} -> {dest_label}/{}",
                            display_name(destination)
                        )?;
                    }
                }
                MoveOutcome::Failed { error, .. } => {
                    writeln!(writer, "  Error moving {name}: {error}")?;
                }
            }
        }
    }
    Ok(())
}

fn write_summary<W: Write>(writer: &mut W, report: &RelocationReport) -> io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "=== Summary ===")?;
    if report.dry_run {
        writeln!(
            writer,
            "Would move {} duplicate file(s) to: {}",
            report.moved_count(),
            report.destination.display()
        )?;
        writeln!(writer, "Would relocate: {}", ByteSize::b(report.bytes_moved()))?;
        writeln!(writer, "Dry run: nothing was moved.")?;
    } else {
        writeln!(
            writer,
            "Moved {} duplicate file(s) to: {}",
            report.moved_count(),
            report.destination.display()
        )?;
        writeln!(writer, "Relocated: {}", ByteSize::b(report.bytes_moved()))?;
        if report.failed_count() > 0 {
            writeln!(writer, "{} file(s) could not be moved.", report.failed_count())?;
        }
        writeln!(writer, "You can review and delete them when ready.")?;
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn folder_label(dest: &Path) -> String {
    dest.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dest.display().to_string())
}
