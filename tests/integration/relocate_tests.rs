use dupesweep::config::SweepConfig;
use dupesweep::sweep::{sweep, SweepOutcome};
use filetime::{set_file_mtime, FileTime};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_with_mtime(path: &Path, content: &str, secs: i64) {
    fs::write(path, content).unwrap();
    set_file_mtime(path, FileTime::from_unix_time(secs, 0)).unwrap();
}

fn names_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_two_identical_files_newer_moved() {
    let dir = tempdir().unwrap();
    write_with_mtime(&dir.path().join("x.txt"), "hello", 1_000);
    write_with_mtime(&dir.path().join("y.txt"), "hello", 2_000);

    let config = SweepConfig::for_dir(dir.path());
    let report = sweep(&config, None);

    assert_eq!(report.outcome.moved_count(), 1);
    assert!(dir.path().join("x.txt").exists());
    assert!(!dir.path().join("y.txt").exists());
    assert_eq!(
        fs::read_to_string(config.dest_dir.join("y.txt")).unwrap(),
        "hello"
    );
}

#[test]
fn test_collision_in_destination_gets_copy_suffix() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("duplicates");
    fs::create_dir(&dest).unwrap();
    fs::write(dest.join("b.txt"), "older run").unwrap();

    write_with_mtime(&dir.path().join("a.txt"), "same", 1_000);
    write_with_mtime(&dir.path().join("b.txt"), "same", 2_000);

    let report = sweep(&SweepConfig::for_dir(dir.path()), None);

    assert_eq!(report.outcome.moved_count(), 1);
    assert_eq!(fs::read_to_string(dest.join("b.txt")).unwrap(), "older run");
    assert_eq!(fs::read_to_string(dest.join("b_copy1.txt")).unwrap(), "same");
}

#[test]
fn test_repeated_runs_use_increasing_copy_numbers() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("duplicates");

    for i in 0..3 {
        write_with_mtime(&dir.path().join("a.txt"), "same", 1_000);
        write_with_mtime(&dir.path().join("a (1).txt"), "same", 2_000 + i);
        let report = sweep(&SweepConfig::for_dir(dir.path()), None);
        assert_eq!(report.outcome.moved_count(), 1);
    }

    assert_eq!(
        names_in(&dest),
        vec!["a (1).txt", "a (1)_copy1.txt", "a (1)_copy2.txt"]
    );
}

#[test]
fn test_collision_skips_every_taken_suffix() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("duplicates");
    fs::create_dir(&dest).unwrap();
    fs::write(dest.join("report.pdf"), "x").unwrap();
    fs::write(dest.join("report_copy1.pdf"), "y").unwrap();

    write_with_mtime(&dir.path().join("old.pdf"), "pdf bytes", 1_000);
    write_with_mtime(&dir.path().join("report.pdf"), "pdf bytes", 2_000);

    sweep(&SweepConfig::for_dir(dir.path()), None);

    assert_eq!(
        fs::read_to_string(dest.join("report_copy2.pdf")).unwrap(),
        "pdf bytes"
    );
}

#[test]
fn test_all_distinct_leaves_no_destination() {
    let dir = tempdir().unwrap();
    for i in 0..5 {
        fs::write(dir.path().join(format!("f{i}.txt")), format!("content {i}")).unwrap();
    }

    let config = SweepConfig::for_dir(dir.path());
    let report = sweep(&config, None);

    assert!(matches!(report.outcome, SweepOutcome::NoDuplicates(_)));
    assert!(!config.dest_dir.exists());
    assert_eq!(names_in(dir.path()).len(), 5);
}

#[test]
fn test_second_run_is_a_no_op() {
    let dir = tempdir().unwrap();
    write_with_mtime(&dir.path().join("a.txt"), "same", 1_000);
    write_with_mtime(&dir.path().join("b.txt"), "same", 2_000);
    write_with_mtime(&dir.path().join("c.txt"), "same", 3_000);

    let config = SweepConfig::for_dir(dir.path());
    let first = sweep(&config, None);
    assert_eq!(first.outcome.moved_count(), 2);

    let second = sweep(&config, None);
    assert_eq!(second.outcome.moved_count(), 0);
    assert!(matches!(second.outcome, SweepOutcome::NoDuplicates(_)));
    assert_eq!(names_in(&config.dest_dir), vec!["b.txt", "c.txt"]);
}

#[test]
fn test_duplicates_folder_contents_are_not_rescanned() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("duplicates");
    fs::create_dir(&dest).unwrap();
    fs::write(dest.join("a.txt"), "same").unwrap();
    fs::write(dir.path().join("a.txt"), "same").unwrap();

    let report = sweep(&SweepConfig::for_dir(dir.path()), None);

    assert!(matches!(report.outcome, SweepOutcome::NoDuplicates(_)));
    assert!(dir.path().join("a.txt").exists());
}

#[test]
fn test_dry_run_moves_nothing() {
    let dir = tempdir().unwrap();
    write_with_mtime(&dir.path().join("a.txt"), "same", 1_000);
    write_with_mtime(&dir.path().join("b.txt"), "same", 2_000);

    let config = SweepConfig::for_dir(dir.path()).with_dry_run(true);
    let report = sweep(&config, None);

    assert_eq!(report.outcome.moved_count(), 1);
    assert!(report.outcome.report().unwrap().dry_run);
    assert!(dir.path().join("b.txt").exists());
    assert!(!config.dest_dir.exists());
}

#[test]
fn test_missing_target_is_reported_not_created() {
    let dir = tempdir().unwrap();
    let config = SweepConfig::for_dir(dir.path().join("Downloads"));

    let report = sweep(&config, None);

    assert!(matches!(report.outcome, SweepOutcome::TargetMissing(_)));
    assert!(!config.scan_dir.exists());
    assert!(!config.dest_dir.exists());
}
