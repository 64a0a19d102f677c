//! Relocation of duplicate files into a destination folder.
//!
//! # Overview
//!
//! For every duplicate group the oldest file stays where it is and every
//! other member is moved into the destination folder:
//! - The destination folder is created on first use and reused if present
//! - A name that is already taken becomes `<stem>_copy<N><.ext>`, with the
//!   lowest free N starting at 1
//! - Moves use `rename` and fall back to copy + fsync + remove when the
//!   destination is on another filesystem
//! - A failed move is recorded and the batch carries on, including when
//!   the destination folder itself cannot be created
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::actions::relocate::{RelocateConfig, Relocator};
//! use dupesweep::duplicates::DuplicateFinder;
//! use std::path::Path;
//!
//! let root = Path::new("/home/user/Downloads");
//! let (groups, _summary) = DuplicateFinder::with_defaults().find_duplicates(root).unwrap();
//!
//! let relocator = Relocator::new(RelocateConfig::new(root.join("duplicates")));
//! let report = relocator.relocate(&groups);
//! println!("{}", report.summary());
//! ```

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use filetime::{set_file_mtime, FileTime};
use thiserror::Error;

use crate::duplicates::DigestGroup;
use crate::scanner::{FileEntry, Hash};

/// Error type for relocation operations.
#[derive(Debug, Error)]
pub enum RelocateError {
    /// Source file was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied while moving.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The destination folder could not be created.
    #[error("cannot create destination folder {path}: {source}")]
    CreateDestination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Cross-filesystem copy failed; the source was left untouched.
    #[error("copy of {path} to {dest} failed: {source}")]
    CopyFailed {
        path: PathBuf,
        dest: PathBuf,
        #[source]
        source: io::Error,
    },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RelocateError {
    /// Map an I/O error on `path` to the closest relocation error.
    #[must_use]
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }

    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) => p,
            Self::CreateDestination { path, .. }
            | Self::CopyFailed { path, .. }
            | Self::Io { path, .. } => path,
        }
    }
}

/// Result of one attempted move.
#[derive(Debug)]
pub enum MoveOutcome {
    /// The file now lives at `destination`.
    Moved {
        source: PathBuf,
        destination: PathBuf,
        size: u64,
    },
    /// The file was left in place.
    Failed {
        source: PathBuf,
        error: RelocateError,
    },
}

impl MoveOutcome {
    /// Path the file was moved from (or left at).
    #[must_use]
    pub fn source(&self) -> &Path {
        match self {
            Self::Moved { source, .. } | Self::Failed { source, .. } => source,
        }
    }

    /// Whether the move completed.
    #[must_use]
    pub fn is_moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// Outcome of relocating one duplicate group.
#[derive(Debug)]
pub struct GroupReport {
    /// Digest shared by the group
    pub hash: Hash,
    /// File left in place
    pub keeper: FileEntry,
    /// One outcome per non-keeper member, in processing order
    pub outcomes: Vec<MoveOutcome>,
}

impl GroupReport {
    /// Number of members that were moved.
    #[must_use]
    pub fn moved_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_moved()).count()
    }
}

/// Results of a relocation batch.
#[derive(Debug, Default)]
pub struct RelocationReport {
    /// Folder duplicates were moved into
    pub destination: PathBuf,
    /// Whether this was a dry run (nothing touched)
    pub dry_run: bool,
    /// Per-group results, in processing order
    pub groups: Vec<GroupReport>,
}

impl RelocationReport {
    /// All outcomes across groups, in processing order.
    pub fn outcomes(&self) -> impl Iterator<Item = &MoveOutcome> {
        self.groups.iter().flat_map(|g| g.outcomes.iter())
    }

    /// Number of successful moves.
    #[must_use]
    pub fn moved_count(&self) -> usize {
        self.outcomes().filter(|o| o.is_moved()).count()
    }

    /// Number of failed moves.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.outcomes().filter(|o| !o.is_moved()).count()
    }

    /// Total number of attempted moves.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.outcomes().count()
    }

    /// Bytes moved out of the scanned directory.
    #[must_use]
    pub fn bytes_moved(&self) -> u64 {
        self.outcomes()
            .map(|o| match o {
                MoveOutcome::Moved { size, .. } => *size,
                MoveOutcome::Failed { .. } => 0,
            })
            .sum()
    }

    /// Check if all moves succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed_count() == 0
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        let verb = if self.dry_run { "Would move" } else { "Moved" };
        if self.all_succeeded() {
            format!("{} {} file(s)", verb, self.moved_count())
        } else {
            format!(
                "{} {} file(s), {} failed",
                verb,
                self.moved_count(),
                self.failed_count()
            )
        }
    }
}

/// Configuration for relocation.
#[derive(Debug, Clone)]
pub struct RelocateConfig {
    /// Folder duplicates are moved into.
    pub dest_dir: PathBuf,
    /// Plan and name every move without touching the filesystem.
    pub dry_run: bool,
}

impl RelocateConfig {
    /// Create config that moves into `dest_dir`.
    #[must_use]
    pub fn new(dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            dest_dir: dest_dir.into(),
            dry_run: false,
        }
    }

    /// Enable/disable dry run.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Moves the non-keeper members of duplicate groups.
#[derive(Debug, Clone)]
pub struct Relocator {
    config: RelocateConfig,
}

impl Relocator {
    /// Create a relocator.
    #[must_use]
    pub fn new(config: RelocateConfig) -> Self {
        Self { config }
    }

    /// Relocate every group in order.
    ///
    /// Each group's members are moved oldest-first after the keeper. Groups
    /// with fewer than two files are skipped. The destination folder is
    /// only created when there is something to move.
    ///
    /// Nothing here aborts the batch. If the destination folder cannot be
    /// created, every planned member is recorded as
    /// [`RelocateError::CreateDestination`] and left in place.
    pub fn relocate(&self, groups: &[DigestGroup]) -> RelocationReport {
        let dest_dir = &self.config.dest_dir;
        let mut report = RelocationReport {
            destination: dest_dir.clone(),
            dry_run: self.config.dry_run,
            groups: Vec::with_capacity(groups.len()),
        };

        let plans: Vec<_> = groups
            .iter()
            .filter(|g| g.has_duplicates())
            .filter_map(DigestGroup::plan)
            .collect();

        if plans.is_empty() {
            return report;
        }

        let mut dest_error = None;
        if !self.config.dry_run {
            if let Err(e) = fs::create_dir_all(dest_dir) {
                log::warn!(
                    "Cannot create destination folder {}: {}",
                    dest_dir.display(),
                    e
                );
                dest_error = Some(e);
            }
        }

        // Names handed out during this batch; only consulted in dry runs,
        // where nothing lands on disk to be found by the existence check.
        let mut claimed: HashSet<PathBuf> = HashSet::new();

        for plan in plans {
            log::debug!(
                "Keeping {} ({} duplicate(s))",
                plan.keeper.path.display(),
                plan.to_move.len()
            );

            let mut outcomes = Vec::with_capacity(plan.to_move.len());
            for file in plan.to_move {
                let outcome = match &dest_error {
                    Some(e) => MoveOutcome::Failed {
                        source: file.path,
                        error: RelocateError::CreateDestination {
                            path: dest_dir.clone(),
                            source: io::Error::new(e.kind(), e.to_string()),
                        },
                    },
                    None => self.relocate_one(&file, &mut claimed),
                };
                outcomes.push(outcome);
            }

            report.groups.push(GroupReport {
                hash: plan.hash,
                keeper: plan.keeper,
                outcomes,
            });
        }

        log::debug!("{}", report.summary());
        report
    }

    fn relocate_one(&self, file: &FileEntry, claimed: &mut HashSet<PathBuf>) -> MoveOutcome {
        let source = file.path.clone();

        let Some(file_name) = source.file_name() else {
            return MoveOutcome::Failed {
                error: RelocateError::NotFound(source.clone()),
                source,
            };
        };

        let destination = unique_destination(&self.config.dest_dir, file_name, |p| {
            path_is_taken(p) || claimed.contains(p)
        });

        if self.config.dry_run {
            if !source.exists() {
                return MoveOutcome::Failed {
                    error: RelocateError::NotFound(source.clone()),
                    source,
                };
            }
            log::debug!(
                "Would move {} -> {}",
                source.display(),
                destination.display()
            );
            claimed.insert(destination.clone());
            return MoveOutcome::Moved {
                source,
                destination,
                size: file.size,
            };
        }

        match move_file(&source, &destination) {
            Ok(()) => {
                log::debug!("Moved {} -> {}", source.display(), destination.display());
                claimed.insert(destination.clone());
                MoveOutcome::Moved {
                    source,
                    destination,
                    size: file.size,
                }
            }
            Err(error) => {
                log::debug!("Error moving {}: {}", source.display(), error);
                MoveOutcome::Failed { source, error }
            }
        }
    }
}

/// Name used for the `n`th collision of `file_name`.
///
/// `report.pdf` becomes `report_copy1.pdf`; names without an extension,
/// including dotfiles such as `.bashrc`, get the suffix appended.
#[must_use]
pub fn copy_suffixed_name(file_name: &OsStr, n: usize) -> OsString {
    let path = Path::new(file_name);
    let stem = path.file_stem().unwrap_or(file_name);

    let mut name = stem.to_os_string();
    name.push(format!("_copy{n}"));
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    name
}

/// First free destination path for `file_name` inside `dest_dir`.
///
/// Tries the plain name first, then `_copy1`, `_copy2`, ... asking
/// `is_taken` each time.
pub fn unique_destination(
    dest_dir: &Path,
    file_name: &OsStr,
    is_taken: impl Fn(&Path) -> bool,
) -> PathBuf {
    let mut candidate = dest_dir.join(file_name);
    let mut counter = 1;
    while is_taken(&candidate) {
        candidate = dest_dir.join(copy_suffixed_name(file_name, counter));
        counter += 1;
    }
    candidate
}

/// Whether anything, including a dangling symlink, occupies `path`.
fn path_is_taken(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Whether a rename failed only because source and destination are on
/// different filesystems.
#[must_use]
pub fn is_cross_device_error(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::CrossesDevices {
        return true;
    }
    match err.raw_os_error() {
        Some(18) if cfg!(unix) => true,    // EXDEV
        Some(17) if cfg!(windows) => true, // ERROR_NOT_SAME_DEVICE
        _ => false,
    }
}

/// Move `src` to `dest`.
///
/// Tries an atomic rename first. When the destination is on another
/// filesystem, falls back to [`copy_then_remove`].
///
/// # Errors
///
/// Returns a [`RelocateError`]; on any error the source is still in place.
pub fn move_file(src: &Path, dest: &Path) -> Result<(), RelocateError> {
    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(err) if is_cross_device_error(&err) => {
            log::debug!(
                "Cross-device move for {}, copying instead",
                src.display()
            );
            copy_then_remove(src, dest)
        }
        Err(err) => Err(RelocateError::from_io(src, err)),
    }
}

/// Copy `src` to `dest`, flush the copy to disk, then remove `src`.
///
/// The copy takes over the modification time of `src`, as a rename would.
///
/// The source is only removed once the copy is complete and synced. If the
/// copy fails, the partial destination is removed. If the source cannot be
/// removed afterwards, the copy is removed so the file is not left in two
/// places.
///
/// # Errors
///
/// Returns [`RelocateError::CopyFailed`] when copying fails, or an I/O error
/// for the source when it cannot be removed.
pub fn copy_then_remove(src: &Path, dest: &Path) -> Result<(), RelocateError> {
    let copied = fs::copy(src, dest)
        .and_then(|_| fs::metadata(src))
        .and_then(|meta| {
            set_file_mtime(dest, FileTime::from_last_modification_time(&meta))
        })
        .and_then(|()| fs::File::open(dest)?.sync_all());
    if let Err(source) = copied {
        let _ = fs::remove_file(dest);
        if source.kind() == io::ErrorKind::NotFound && !src.exists() {
            return Err(RelocateError::NotFound(src.to_path_buf()));
        }
        return Err(RelocateError::CopyFailed {
            path: src.to_path_buf(),
            dest: dest.to_path_buf(),
            source,
        });
    }

    if let Err(err) = fs::remove_file(src) {
        let _ = fs::remove_file(dest);
        return Err(RelocateError::from_io(src, err));
    }

    Ok(())
}
