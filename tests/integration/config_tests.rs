use dupesweep::config::{SweepConfig, DEFAULT_DEST_NAME};
use dupesweep::sweep::sweep;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_resolve_defaults_dest_inside_scan_dir() {
    let dir = tempdir().unwrap();
    let config = SweepConfig::resolve(Some(dir.path().to_path_buf()), None, false).unwrap();

    assert_eq!(config.scan_dir, dir.path());
    assert_eq!(config.dest_dir, dir.path().join(DEFAULT_DEST_NAME));
}

#[test]
fn test_resolve_rejects_current_dir_as_dest() {
    let dir = tempdir().unwrap();
    let result = SweepConfig::resolve(Some(dir.path().to_path_buf()), Some(".".into()), false);

    assert!(result.is_err());
}

#[test]
fn test_external_destination_receives_duplicates() {
    let scan = tempdir().unwrap();
    let elsewhere = tempdir().unwrap();
    fs::write(scan.path().join("a.txt"), "same").unwrap();
    fs::write(scan.path().join("b.txt"), "same").unwrap();

    let dest = elsewhere.path().join("dupes");
    let config = SweepConfig::new(scan.path(), &dest);
    let report = sweep(&config, None);

    assert_eq!(report.outcome.moved_count(), 1);
    assert!(dest.join("b.txt").exists());
    assert!(!scan.path().join(DEFAULT_DEST_NAME).exists());
}

#[test]
fn test_existing_destination_is_reused() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join(DEFAULT_DEST_NAME);
    fs::create_dir(&dest).unwrap();
    fs::write(dest.join("old.txt"), "from an earlier run").unwrap();
    fs::write(dir.path().join("a.txt"), "same").unwrap();
    fs::write(dir.path().join("b.txt"), "same").unwrap();

    let report = sweep(&SweepConfig::for_dir(dir.path()), None);

    assert_eq!(report.outcome.moved_count(), 1);
    assert!(dest.join("old.txt").exists());
    assert!(dest.join("b.txt").exists());
}
