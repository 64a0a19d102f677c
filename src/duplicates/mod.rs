//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Full-content hashing of every listed file
//! - Digest grouping
//! - Keeper selection for each duplicate group

pub mod finder;
pub mod groups;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanSummary, PHASE_HASH};
pub use groups::{group_by_digest, DigestGroup, GroupingStats, RelocationPlan};
