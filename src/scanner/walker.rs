//! Flat directory walker.
//!
//! # Overview
//!
//! [`Walker`] lists the regular files directly inside one directory. It does
//! not descend into subdirectories and it does not follow symbolic links:
//! only entries whose own file type is "regular file" are yielded.
//!
//! Entries are sorted by file name so the listing order, which decides
//! keeper ties and collision naming, is the same on every run.
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let root = Path::new("/home/user/Downloads");
//! let config = WalkerConfig::default().with_exclude(root.join("duplicates"));
//!
//! let files: Vec<_> = Walker::new(root, config).walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::fs::{self, DirEntry};
use std::path::{Path, PathBuf};

use super::{FileEntry, ScanError, WalkerConfig};

/// Directory walker for flat file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Directory to list
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Directory to list
    /// * `config` - Walker configuration options
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Directory this walker lists.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check whether `path` is one of the excluded paths.
    fn is_excluded(&self, path: &Path) -> bool {
        self.config.exclude.iter().any(|ex| {
            if ex == path {
                return true;
            }
            match (fs::canonicalize(ex), fs::canonicalize(path)) {
                (Ok(a), Ok(b)) => a == b,
                _ => false,
            }
        })
    }

    /// Turn a directory entry into a [`FileEntry`], or `None` if it is not
    /// a regular file we should look at.
    fn entry_to_file(&self, entry: &DirEntry) -> Option<Result<FileEntry, ScanError>> {
        let path = entry.path();

        let file_type = match entry.file_type() {
            Ok(ft) => ft,
            Err(e) => return Some(Err(ScanError::from_io(&path, e))),
        };

        // DirEntry::file_type does not traverse symlinks
        if !file_type.is_file() {
            log::trace!("Skipping non-regular entry: {}", path.display());
            return None;
        }

        if self.is_excluded(&path) {
            log::debug!("Skipping excluded path: {}", path.display());
            return None;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => return Some(Err(ScanError::from_io(&path, e))),
        };
        let modified = match metadata.modified() {
            Ok(t) => t,
            Err(e) => return Some(Err(ScanError::from_io(&path, e))),
        };

        Some(Ok(FileEntry::new(path, metadata.len(), modified)))
    }

    /// List the directory, yielding file entries in file-name order.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration. If the directory itself cannot be read, a single error is
    /// yielded.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        let read_dir = match fs::read_dir(&self.root) {
            Ok(rd) => rd,
            Err(e) => {
                log::debug!("Cannot read directory {}: {}", self.root.display(), e);
                return vec![Err(ScanError::from_io(&self.root, e))].into_iter();
            }
        };

        let mut entries: Vec<Result<DirEntry, ScanError>> = read_dir
            .map(|r| r.map_err(|e| ScanError::from_io(&self.root, e)))
            .collect();

        // Sort for deterministic output
        entries.sort_by(|a, b| match (a, b) {
            (Ok(a), Ok(b)) => a.file_name().cmp(&b.file_name()),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => std::cmp::Ordering::Equal,
        });

        let results: Vec<Result<FileEntry, ScanError>> = entries
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => self.entry_to_file(&entry),
                Err(e) => Some(Err(e)),
            })
            .collect();

        log::debug!(
            "Listed {} candidate entries in {}",
            results.len(),
            self.root.display()
        );

        results.into_iter()
    }
}
