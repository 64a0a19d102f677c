//! Sweep configuration.
//!
//! A sweep needs two paths: the directory to scan and the folder that
//! duplicates are moved into. Both are passed in explicitly; the
//! home-relative defaults (`~/Downloads` and `~/Downloads/duplicates`) are
//! only looked up by [`SweepConfig::from_home`].

use anyhow::{bail, Context, Result};
use directories::BaseDirs;
use std::path::{Path, PathBuf};

/// Folder under the home directory scanned by default.
pub const DEFAULT_SCAN_SUBDIR: &str = "Downloads";

/// Name of the duplicates folder created inside the scanned directory.
pub const DEFAULT_DEST_NAME: &str = "duplicates";

/// Where to scan and where to put duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    /// Directory whose files are compared.
    pub scan_dir: PathBuf,
    /// Folder that duplicates are moved into.
    pub dest_dir: PathBuf,
    /// Plan the moves without performing them.
    pub dry_run: bool,
}

impl SweepConfig {
    /// Scan `scan_dir` and move duplicates into `dest_dir`.
    #[must_use]
    pub fn new(scan_dir: impl Into<PathBuf>, dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            scan_dir: scan_dir.into(),
            dest_dir: dest_dir.into(),
            dry_run: false,
        }
    }

    /// Scan `scan_dir` and move duplicates into its `duplicates` subfolder.
    #[must_use]
    pub fn for_dir(scan_dir: impl Into<PathBuf>) -> Self {
        let scan_dir = scan_dir.into();
        let dest_dir = scan_dir.join(DEFAULT_DEST_NAME);
        Self::new(scan_dir, dest_dir)
    }

    /// Default configuration rooted at the user's home directory.
    ///
    /// # Errors
    ///
    /// Fails if no home directory can be determined for the current user.
    pub fn from_home() -> Result<Self> {
        let dirs = BaseDirs::new().context("Failed to determine the home directory")?;
        Ok(Self::for_dir(dirs.home_dir().join(DEFAULT_SCAN_SUBDIR)))
    }

    /// Build a configuration from optional overrides.
    ///
    /// `scan_dir` falls back to `~/Downloads`. A relative `dest` is taken
    /// relative to the scan directory, so `--dest dupes` means
    /// `<scan_dir>/dupes`.
    ///
    /// # Errors
    ///
    /// Fails if the home directory is needed but unknown, or if the
    /// destination is the scan directory itself.
    pub fn resolve(scan_dir: Option<PathBuf>, dest: Option<PathBuf>, dry_run: bool) -> Result<Self> {
        let mut config = match scan_dir {
            Some(dir) => Self::for_dir(dir),
            None => Self::from_home()?,
        };

        if let Some(dest) = dest {
            config.dest_dir = if dest.is_absolute() {
                dest
            } else {
                config.scan_dir.join(dest)
            };
        }
        config.dry_run = dry_run;

        config.validate()?;
        log::debug!("Resolved configuration: {:?}", config);
        Ok(config)
    }

    /// Enable/disable dry run.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Reject configurations that would move files onto themselves.
    ///
    /// # Errors
    ///
    /// Fails if the destination folder is the scan directory.
    pub fn validate(&self) -> Result<()> {
        if same_path(&self.scan_dir, &self.dest_dir) {
            bail!(
                "Destination folder must differ from the scanned directory: {}",
                self.dest_dir.display()
            );
        }
        Ok(())
    }
}

fn same_path(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
