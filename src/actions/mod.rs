//! File actions module.
//!
//! The only action is relocation: moving every non-keeper member of a
//! duplicate group into a destination folder, with collision-safe renaming
//! and a copy fallback for cross-filesystem moves.
//!
//! ```no_run
//! use dupesweep::actions::move_file;
//! use std::path::Path;
//!
//! move_file(Path::new("/tmp/a.txt"), Path::new("/mnt/usb/a.txt")).unwrap();
//! ```

pub mod relocate;

// Re-export commonly used types
pub use relocate::{
    copy_suffixed_name, copy_then_remove, is_cross_device_error, move_file, unique_destination,
    GroupReport, MoveOutcome, RelocateConfig, RelocateError, RelocationReport, Relocator,
};
