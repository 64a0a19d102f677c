//! Duplicate finder: listing, hashing and grouping in one pass.
//!
//! # Overview
//!
//! [`DuplicateFinder`] drives the read-only half of a sweep:
//! 1. **List**: collect the regular files of the target directory
//! 2. **Hash**: stream every file through BLAKE3
//! 3. **Group**: bucket by digest and keep the buckets with 2+ members
//!
//! Any file that cannot be listed or hashed is recorded in
//! [`ScanSummary::scan_errors`] and left out of grouping; the scan itself
//! keeps going.
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::Path;
//!
//! let root = Path::new("/home/user/Downloads");
//! let config = FinderConfig::default().with_exclude(root.join("duplicates"));
//! let finder = DuplicateFinder::new(config);
//!
//! let (groups, summary) = finder.find_duplicates(root).unwrap();
//! println!("{} groups, {} reclaimable", groups.len(), summary.reclaimable_display());
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;

use super::groups::{group_by_digest, DigestGroup};
use crate::progress::ProgressCallback;
use crate::scanner::{FileEntry, HashedEntry, Hasher, ScanError, Walker, WalkerConfig};

/// Phase name reported to progress callbacks while hashing.
pub const PHASE_HASH: &str = "hash";

/// Summary statistics of a scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Number of regular files listed
    pub total_files: usize,
    /// Total size of all listed files in bytes
    pub total_size: u64,
    /// Number of files hashed successfully
    pub hashed_files: usize,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Number of duplicate files (excluding keepers)
    pub duplicate_files: usize,
    /// Bytes that relocating every duplicate would free in the scanned directory
    pub reclaimable_space: u64,
    /// Duration of the scan
    pub scan_duration: Duration,
    /// Errors encountered during the scan
    pub scan_errors: Vec<ScanError>,
}

impl ScanSummary {
    /// Whether any file failed to list or hash.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.scan_errors.is_empty()
    }

    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Format total size as human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        ByteSize::b(self.total_size).to_string()
    }
}

/// Errors that end a scan before any file is looked at.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Configuration for the duplicate finder.
#[derive(Clone, Default)]
pub struct FinderConfig {
    /// Walker configuration for the directory listing.
    pub walker_config: WalkerConfig,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker_config", &self.walker_config)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl FinderConfig {
    /// Never list `path`, typically the destination folder.
    #[must_use]
    pub fn with_exclude(mut self, path: impl Into<PathBuf>) -> Self {
        self.walker_config = self.walker_config.with_exclude(path);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Finds byte-identical files in a flat directory.
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self {
            config,
            hasher: Hasher::new(),
        }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Use a specific hasher, e.g. one with a smaller read size.
    #[must_use]
    pub fn with_hasher(mut self, hasher: Hasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Find all duplicate files directly inside `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError`] if the path does not exist or is not a
    /// directory. Per-file failures never produce an error; they are
    /// collected in the returned summary.
    pub fn find_duplicates(
        &self,
        path: &Path,
    ) -> Result<(Vec<DigestGroup>, ScanSummary), FinderError> {
        let start_time = Instant::now();

        if !path.exists() {
            return Err(FinderError::PathNotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(FinderError::NotADirectory(path.to_path_buf()));
        }

        log::debug!("Scanning {}", path.display());

        let walker = Walker::new(path, self.config.walker_config.clone());
        let mut files = Vec::new();
        let mut listing_errors = Vec::new();
        for result in walker.walk() {
            match result {
                Ok(file) => files.push(file),
                Err(e) => {
                    log::debug!("Skipping entry: {}", e);
                    listing_errors.push(e);
                }
            }
        }

        let (groups, mut summary) = self.find_duplicates_from_files(files);

        listing_errors.append(&mut summary.scan_errors);
        summary.scan_errors = listing_errors;
        summary.scan_duration = start_time.elapsed();

        Ok((groups, summary))
    }

    /// Hash and group an already-listed set of files.
    ///
    /// The order of `files` is the listing order used for keeper ties.
    #[must_use]
    pub fn find_duplicates_from_files(
        &self,
        files: Vec<FileEntry>,
    ) -> (Vec<DigestGroup>, ScanSummary) {
        let start_time = Instant::now();
        let mut summary = ScanSummary {
            total_files: files.len(),
            total_size: files.iter().map(|f| f.size).sum(),
            ..ScanSummary::default()
        };

        let progress = self.config.progress_callback.as_deref();
        if let Some(cb) = progress {
            cb.on_phase_start(PHASE_HASH, files.len());
        }

        let mut hashed = Vec::with_capacity(files.len());
        for (i, file) in files.into_iter().enumerate() {
            if let Some(cb) = progress {
                cb.on_progress(i + 1, &file.path.to_string_lossy());
            }

            match self.hasher.full_hash(&file.path) {
                Ok(hash) => {
                    if let Some(cb) = progress {
                        cb.on_item_completed(file.size);
                    }
                    hashed.push(HashedEntry::new(file, hash));
                }
                Err(e) => {
                    log::debug!("Error hashing {}: {}", file.path.display(), e);
                    summary.scan_errors.push(ScanError::HashError(e));
                }
            }
        }

        if let Some(cb) = progress {
            cb.on_phase_end(PHASE_HASH);
        }

        summary.hashed_files = hashed.len();
        let (groups, stats) = group_by_digest(hashed);

        summary.duplicate_groups = stats.duplicate_groups;
        summary.duplicate_files = stats.duplicate_files;
        summary.reclaimable_space = stats.reclaimable_space;
        summary.scan_duration = start_time.elapsed();

        (groups, summary)
    }
}
