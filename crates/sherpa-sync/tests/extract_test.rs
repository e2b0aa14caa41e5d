/// Integration tests for zip extraction into a destination directory.
mod common;

use std::fs;
use std::path::PathBuf;

use common::{build_zip, Entry};
use sherpa_sync::{ArchiveExtractor, SyncError};
use tempfile::TempDir;

fn write_archive(temp: &TempDir, entries: &[Entry<'_>]) -> PathBuf {
    let path = temp.path().join("dist.zip");
    fs::write(&path, build_zip(entries)).unwrap();
    path
}

#[test]
fn test_extract_nested_tree() {
    let temp = TempDir::new().unwrap();
    let archive = write_archive(
        &temp,
        &[
            Entry::File("foo.txt", b"abcd"),
            Entry::Dir("bar/"),
            Entry::File("bar/baz.txt", b""),
        ],
    );
    let out = temp.path().join("out");
    fs::create_dir(&out).unwrap();

    let extracted = ArchiveExtractor::extract(&archive, &out).unwrap();

    assert_eq!(
        extracted,
        vec![out.join("foo.txt"), out.join("bar"), out.join("bar/baz.txt")]
    );
    assert_eq!(fs::read(out.join("foo.txt")).unwrap(), b"abcd");
    assert!(out.join("bar").is_dir());
    assert_eq!(fs::read(out.join("bar/baz.txt")).unwrap().len(), 0);
}

#[test]
fn test_extract_creates_missing_parents() {
    let temp = TempDir::new().unwrap();
    let content = vec![7u8; 100_000];
    let archive = write_archive(
        &temp,
        &[
            Entry::File("assets/img/logo.png", &content),
            Entry::File("index.html", b"<html></html>"),
        ],
    );
    let out = temp.path().join("out");

    let extracted = ArchiveExtractor::extract(&archive, &out).unwrap();

    assert_eq!(extracted.len(), 2);
    assert_eq!(fs::read(out.join("assets/img/logo.png")).unwrap(), content);
    assert_eq!(fs::read_to_string(out.join("index.html")).unwrap(), "<html></html>");
}

#[test]
fn test_extract_existing_directory_is_not_an_error() {
    let temp = TempDir::new().unwrap();
    let archive = write_archive(&temp, &[Entry::Dir("bar/"), Entry::File("bar/a.txt", b"a")]);
    let out = temp.path().join("out");
    fs::create_dir_all(out.join("bar")).unwrap();

    ArchiveExtractor::extract(&archive, &out).unwrap();
    assert_eq!(fs::read_to_string(out.join("bar/a.txt")).unwrap(), "a");
}

#[test]
fn test_extract_truncates_existing_file() {
    let temp = TempDir::new().unwrap();
    let archive = write_archive(&temp, &[Entry::File("config.json", b"{}")]);
    let out = temp.path().join("out");
    fs::create_dir(&out).unwrap();
    fs::write(out.join("config.json"), "a much longer previous content").unwrap();

    ArchiveExtractor::extract(&archive, &out).unwrap();
    assert_eq!(fs::read_to_string(out.join("config.json")).unwrap(), "{}");
}

#[test]
fn test_zip_slip_is_rejected() {
    let temp = TempDir::new().unwrap();
    let archive = write_archive(
        &temp,
        &[Entry::File("good.txt", b"ok"), Entry::File("../evil", b"pwned")],
    );
    let out = temp.path().join("out");
    fs::create_dir(&out).unwrap();

    match ArchiveExtractor::extract(&archive, &out) {
        Err(SyncError::IllegalPath { path }) => assert_eq!(path, temp.path().join("evil")),
        other => panic!("expected IllegalPath, got {:?}", other),
    }

    assert!(!temp.path().join("evil").exists());
    // Entries before the offending one are not rolled back
    assert!(out.join("good.txt").exists());
}

#[test]
fn test_nested_traversal_is_rejected() {
    let temp = TempDir::new().unwrap();
    let archive = write_archive(&temp, &[Entry::File("sub/../../escaped.txt", b"x")]);
    let out = temp.path().join("out");
    fs::create_dir(&out).unwrap();

    let result = ArchiveExtractor::extract(&archive, &out);

    assert!(matches!(result, Err(SyncError::IllegalPath { .. })));
    assert!(!temp.path().join("escaped.txt").exists());
}

#[test]
fn test_sibling_prefix_is_rejected() {
    let temp = TempDir::new().unwrap();
    let archive = write_archive(&temp, &[Entry::File("../out-evil/x.txt", b"x")]);
    let out = temp.path().join("out");
    fs::create_dir(&out).unwrap();

    let result = ArchiveExtractor::extract(&archive, &out);

    assert!(matches!(result, Err(SyncError::IllegalPath { .. })));
    assert!(!temp.path().join("out-evil").exists());
}

#[test]
fn test_inner_parent_components_stay_inside() {
    let temp = TempDir::new().unwrap();
    let archive = write_archive(&temp, &[Entry::File("a/../b.txt", b"b")]);
    let out = temp.path().join("out");

    let extracted = ArchiveExtractor::extract(&archive, &out).unwrap();

    assert_eq!(extracted, vec![out.join("b.txt")]);
    assert_eq!(fs::read_to_string(out.join("b.txt")).unwrap(), "b");
}

#[test]
fn test_invalid_archive() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("dist.zip");
    fs::write(&archive, "this is not a zip file").unwrap();

    let result = ArchiveExtractor::extract(&archive, &temp.path().join("out"));
    assert!(matches!(result, Err(SyncError::ArchiveOpen { .. })));
    assert!(!temp.path().join("out").exists());
}

#[cfg(unix)]
#[test]
fn test_extract_preserves_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let archive = write_archive(
        &temp,
        &[
            Entry::FileWithMode("bin/run.sh", b"#!/bin/sh\necho hi\n", 0o755),
            Entry::FileWithMode("data.txt", b"data", 0o640),
        ],
    );
    let out = temp.path().join("out");

    ArchiveExtractor::extract(&archive, &out).unwrap();

    let mode = fs::metadata(out.join("bin/run.sh")).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
    let mode = fs::metadata(out.join("data.txt")).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o640);
}
