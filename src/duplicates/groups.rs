//! Digest grouping and keeper selection.
//!
//! # Overview
//!
//! Files are bucketed by their BLAKE3 digest. A bucket with two or more
//! members is a duplicate set, and each set is turned into a
//! [`RelocationPlan`]: the oldest file stays where it is and every other
//! member is marked for relocation.
//!
//! # Example
//!
//! ```
//! use dupesweep::duplicates::group_by_digest;
//! use dupesweep::scanner::{FileEntry, HashedEntry};
//! use std::path::PathBuf;
//! use std::time::{Duration, SystemTime};
//!
//! let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
//! let t1 = t0 + Duration::from_secs(60);
//!
//! let entries = vec![
//!     HashedEntry::new(FileEntry::new(PathBuf::from("/d/y.txt"), 5, t1), [1; 32]),
//!     HashedEntry::new(FileEntry::new(PathBuf::from("/d/x.txt"), 5, t0), [1; 32]),
//!     HashedEntry::new(FileEntry::new(PathBuf::from("/d/z.txt"), 3, t0), [2; 32]),
//! ];
//!
//! let (groups, stats) = group_by_digest(entries);
//! assert_eq!(groups.len(), 1);
//! assert_eq!(stats.duplicate_files, 1);
//!
//! let plan = groups[0].plan().unwrap();
//! assert_eq!(plan.keeper.path, PathBuf::from("/d/x.txt"));
//! assert_eq!(plan.to_move.len(), 1);
//! ```

use std::collections::HashMap;

use crate::scanner::{hash_to_hex, FileEntry, Hash, HashedEntry};

/// Files sharing one content digest.
///
/// Members keep the order in which they were listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestGroup {
    /// BLAKE3 hash of the file content
    pub hash: Hash,
    /// Files with this digest, in listing order
    pub files: Vec<FileEntry>,
}

impl DigestGroup {
    /// Create a new digest group.
    #[must_use]
    pub fn new(hash: Hash, files: Vec<FileEntry>) -> Self {
        Self { hash, files }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Check if this group is a duplicate set (2+ files).
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.files.len() > 1
    }

    /// Number of duplicate copies (total - 1 keeper).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Space held by the copies beyond the first.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.files.iter().skip(1).map(|f| f.size).sum()
    }

    /// Hash as hexadecimal string.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hash_to_hex(&self.hash)
    }

    /// Choose the keeper and the members to relocate.
    ///
    /// Members are sorted by modification time, oldest first. The sort is
    /// stable, so files with equal timestamps keep their listing order and
    /// the earliest-listed one wins.
    ///
    /// Returns `None` for an empty group.
    #[must_use]
    pub fn plan(&self) -> Option<RelocationPlan> {
        let mut sorted = self.files.clone();
        sorted.sort_by_key(|f| f.modified);

        let mut members = sorted.into_iter();
        let keeper = members.next()?;

        Some(RelocationPlan {
            hash: self.hash,
            keeper,
            to_move: members.collect(),
        })
    }
}

/// Keeper and relocation candidates for one duplicate set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationPlan {
    /// Digest shared by every file in the plan
    pub hash: Hash,
    /// The file left in place
    pub keeper: FileEntry,
    /// Remaining members, in the order they will be moved
    pub to_move: Vec<FileEntry>,
}

/// Statistics from the grouping phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of hashed files processed
    pub total_files: usize,
    /// Number of distinct digests
    pub unique_digests: usize,
    /// Number of groups with 2+ files
    pub duplicate_groups: usize,
    /// Number of files beyond the first in every duplicate group
    pub duplicate_files: usize,
    /// Bytes held by those extra copies
    pub reclaimable_space: u64,
}

/// Group hashed files by digest.
///
/// Returns only groups with two or more members, in the order in which each
/// group's first member appeared in `entries`.
#[must_use]
pub fn group_by_digest(
    entries: impl IntoIterator<Item = HashedEntry>,
) -> (Vec<DigestGroup>, GroupingStats) {
    let mut index: HashMap<Hash, usize> = HashMap::new();
    let mut groups: Vec<DigestGroup> = Vec::new();
    let mut stats = GroupingStats::default();

    for HashedEntry { entry, hash } in entries {
        stats.total_files += 1;
        match index.get(&hash) {
            Some(&i) => groups[i].files.push(entry),
            None => {
                index.insert(hash, groups.len());
                groups.push(DigestGroup::new(hash, vec![entry]));
            }
        }
    }

    stats.unique_digests = groups.len();
    groups.retain(DigestGroup::has_duplicates);

    stats.duplicate_groups = groups.len();
    stats.duplicate_files = groups.iter().map(DigestGroup::duplicate_count).sum();
    stats.reclaimable_space = groups.iter().map(DigestGroup::wasted_space).sum();

    log::debug!(
        "Grouping: {} files, {} digests, {} duplicate groups",
        stats.total_files,
        stats.unique_digests,
        stats.duplicate_groups
    );

    (groups, stats)
}
