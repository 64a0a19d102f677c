use dupesweep::duplicates::{DuplicateFinder, FinderConfig};
use filetime::{set_file_mtime, FileTime};
use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();

    for (name, content) in [("a.txt", "content a"), ("b.txt", "content b"), ("c.txt", "content c")] {
        File::create(dir.path().join(name))
            .unwrap()
            .write_all(content.as_bytes())
            .unwrap();
    }

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.hashed_files, 3);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_scan_duplicate_files() {
    let dir = tempdir().unwrap();

    File::create(dir.path().join("a.txt"))
        .unwrap()
        .write_all(b"duplicate")
        .unwrap();
    File::create(dir.path().join("b.txt"))
        .unwrap()
        .write_all(b"duplicate")
        .unwrap();
    File::create(dir.path().join("c.txt"))
        .unwrap()
        .write_all(b"unique")
        .unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files.len(), 2);
    assert_eq!(summary.duplicate_files, 1);
    assert_eq!(summary.reclaimable_space, 9);
}

#[test]
fn test_same_size_different_content_not_grouped() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.bin"), "abcd").unwrap();
    fs::write(dir.path().join("b.bin"), "abce").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
}

#[test]
fn test_scan_ignores_subdirectories() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("top.txt"), "same").unwrap();
    let nested = dir.path().join("nested");
    fs::create_dir(&nested).unwrap();
    fs::write(nested.join("deep.txt"), "same").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);
}

#[test]
fn test_scan_excludes_destination_folder() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "same").unwrap();
    fs::write(dir.path().join("b.txt"), "same").unwrap();

    let config = FinderConfig::default().with_exclude(dir.path().join("b.txt"));
    let finder = DuplicateFinder::new(config);
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);
}

#[test]
fn test_keeper_is_oldest_member() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    let c = dir.path().join("c.txt");
    for p in [&a, &b, &c] {
        fs::write(p, "same bytes").unwrap();
    }
    set_file_mtime(&a, FileTime::from_unix_time(3_000, 0)).unwrap();
    set_file_mtime(&b, FileTime::from_unix_time(1_000, 0)).unwrap();
    set_file_mtime(&c, FileTime::from_unix_time(2_000, 0)).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();
    let plan = groups[0].plan().unwrap();

    assert_eq!(plan.keeper.path, b);
    let moved: Vec<_> = plan.to_move.iter().map(|f| f.path.clone()).collect();
    assert_eq!(moved, vec![c, a]);
}

#[test]
fn test_keeper_tie_goes_to_listing_order() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    fs::write(&b, "tie").unwrap();
    fs::write(&a, "tie").unwrap();
    let same = FileTime::from_unix_time(5_000, 0);
    set_file_mtime(&a, same).unwrap();
    set_file_mtime(&b, same).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();
    let plan = groups[0].plan().unwrap();

    assert_eq!(plan.keeper.path, a);
    assert_eq!(plan.to_move[0].path, b);
}
