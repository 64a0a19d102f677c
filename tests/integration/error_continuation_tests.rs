use dupesweep::actions::{MoveOutcome, RelocateConfig, RelocateError, Relocator};
use dupesweep::config::SweepConfig;
use dupesweep::duplicates::{DigestGroup, DuplicateFinder};
use dupesweep::progress::ProgressCallback;
use dupesweep::scanner::{FileEntry, HashError, Hasher, ScanError};
use dupesweep::sweep::{sweep, SweepOutcome};
use filetime::{set_file_mtime, FileTime};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tempfile::tempdir;

#[test]
fn test_find_duplicates_from_files_continues_on_error() {
    let finder = DuplicateFinder::with_defaults();
    // Files that don't exist trigger hashing errors
    let file1 = FileEntry::new(PathBuf::from("nonexistent_1.txt"), 100, SystemTime::now());
    let file2 = FileEntry::new(PathBuf::from("nonexistent_2.txt"), 100, SystemTime::now());

    let (groups, summary) = finder.find_duplicates_from_files(vec![file1, file2]);

    assert!(groups.is_empty());
    assert_eq!(summary.scan_errors.len(), 2);
    assert_eq!(summary.hashed_files, 0);

    for err in &summary.scan_errors {
        match err {
            ScanError::HashError(HashError::NotFound(_)) => {}
            _ => panic!("Expected NotFound HashError, got: {:?}", err),
        }
    }
}

#[test]
fn test_unreadable_file_does_not_stop_grouping() {
    let dir = tempdir().unwrap();
    let x = dir.path().join("x.txt");
    let y = dir.path().join("y.txt");
    fs::write(&x, "pair").unwrap();
    fs::write(&y, "pair").unwrap();

    let now = SystemTime::now();
    let files = vec![
        FileEntry::new(dir.path().join("gone.txt"), 4, now),
        FileEntry::new(x.clone(), 4, now),
        FileEntry::new(y.clone(), 4, now),
    ];

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates_from_files(files);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files.len(), 2);
    assert_eq!(summary.scan_errors.len(), 1);
    assert!(summary.scan_errors[0].path().ends_with("gone.txt"));
}

#[cfg(unix)]
#[test]
fn test_permission_denied_file_is_reported() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked.bin");
    fs::write(&locked, "pair").unwrap();
    fs::write(dir.path().join("a.bin"), "pair").unwrap();
    fs::write(dir.path().join("b.bin"), "pair").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // root can still read the file; nothing to check then
    if fs::read(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
        return;
    }

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files.len(), 2);
    assert_eq!(summary.scan_errors.len(), 1);
    assert!(matches!(
        summary.scan_errors[0],
        ScanError::HashError(HashError::PermissionDenied(_))
    ));
}

#[test]
fn test_failed_move_does_not_stop_batch() {
    let dir = tempdir().unwrap();
    let keeper = dir.path().join("keeper.txt");
    let vanished = dir.path().join("vanished.txt");
    let present = dir.path().join("present.txt");
    fs::write(&keeper, "dup").unwrap();
    fs::write(&present, "dup").unwrap();
    set_file_mtime(&keeper, FileTime::from_unix_time(1_000, 0)).unwrap();

    let old = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_000);
    let newer = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(2_000);
    let group = DigestGroup::new(
        Hasher::hash_bytes(b"dup"),
        vec![
            FileEntry::new(keeper.clone(), 3, old),
            FileEntry::new(vanished.clone(), 3, newer),
            FileEntry::new(present.clone(), 3, newer),
        ],
    );

    let dest = dir.path().join("duplicates");
    let report = Relocator::new(RelocateConfig::new(&dest)).relocate(&[group]);

    assert_eq!(report.moved_count(), 1);
    assert_eq!(report.failed_count(), 1);
    assert!(keeper.exists());
    assert!(dest.join("present.txt").exists());

    let failed = report
        .outcomes()
        .find(|o| !o.is_moved())
        .expect("one failed outcome");
    match failed {
        MoveOutcome::Failed { source, error } => {
            assert_eq!(source, &vanished);
            assert!(matches!(error, RelocateError::NotFound(_)));
        }
        MoveOutcome::Moved { .. } => unreachable!(),
    }
}

/// Deletes one file just before the finder hashes it, so the file is listed
/// but can no longer be read.
struct RemoveBeforeHash {
    victim: PathBuf,
}

impl ProgressCallback for RemoveBeforeHash {
    fn on_phase_start(&self, _phase: &str, _total: usize) {}

    fn on_progress(&self, _current: usize, path: &str) {
        if Path::new(path) == self.victim {
            fs::remove_file(&self.victim).unwrap();
        }
    }

    fn on_phase_end(&self, _phase: &str) {}
}

#[test]
fn test_sweep_relocates_remaining_duplicates_after_hash_failure() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.bin");
    let b = dir.path().join("b.bin");
    let victim = dir.path().join("m.bin");
    for path in [&a, &b, &victim] {
        fs::write(path, "pair").unwrap();
    }
    set_file_mtime(&a, FileTime::from_unix_time(1_000, 0)).unwrap();
    set_file_mtime(&b, FileTime::from_unix_time(2_000, 0)).unwrap();

    let config = SweepConfig::for_dir(dir.path());
    let callback: Arc<dyn ProgressCallback> = Arc::new(RemoveBeforeHash {
        victim: victim.clone(),
    });
    let report = sweep(&config, Some(callback));

    let SweepOutcome::Relocated { summary, report } = &report.outcome else {
        panic!("expected a relocation, got {:?}", report.outcome);
    };
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.scan_errors.len(), 1);
    assert!(matches!(
        &summary.scan_errors[0],
        ScanError::HashError(HashError::NotFound(p)) if p == &victim
    ));
    assert_eq!(report.moved_count(), 1);
    assert!(report.all_succeeded());
    assert!(a.exists());
    assert!(config.dest_dir.join("b.bin").exists());
}
