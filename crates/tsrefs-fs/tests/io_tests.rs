use std::fs;

use tempfile::TempDir;
use tsrefs_fs::{Error, NormalizedPath, io};

#[test]
fn test_write_atomic_creates_file_and_parents() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("packages/core/tsconfig.json"));

    io::write_atomic(&path, b"{}").unwrap();

    assert_eq!(fs::read_to_string(path.to_native()).unwrap(), "{}");
}

#[test]
fn test_write_text_overwrites_and_leaves_no_temp_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("tsconfig.json"));

    io::write_text(&path, "{ \"a\": 1 }").unwrap();
    io::write_text(&path, "{ \"a\": 2 }").unwrap();

    assert_eq!(io::read_text(&path).unwrap(), "{ \"a\": 2 }");
    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_failed_write_removes_staging_file() {
    let temp = TempDir::new().unwrap();
    // a directory in the way makes the final rename fail
    fs::create_dir(temp.path().join("tsconfig.json")).unwrap();
    let path = NormalizedPath::new(temp.path().join("tsconfig.json"));

    let err = io::write_text(&path, "{}").unwrap_err();
    assert!(matches!(err, Error::Io { .. }));

    let names: Vec<String> = fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["tsconfig.json".to_string()]);
}

#[test]
fn test_read_text_missing_file_reports_path() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("missing.json"));

    let err = io::read_text(&path).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
    assert!(err.to_string().contains("missing.json"));
}
