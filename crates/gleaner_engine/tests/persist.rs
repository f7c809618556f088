use std::fs;

use gleaner_engine::{ensure_output_dir, ImageFileWriter, PersistError};
use tempfile::TempDir;

#[test]
fn ensure_creates_missing_directories() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("a").join("b").join("downloaded_images");

    ensure_output_dir(&target).expect("created");
    assert!(target.is_dir());

    // Idempotent on an existing directory.
    ensure_output_dir(&target).expect("still fine");
}

#[test]
fn ensure_rejects_a_file_standing_in_the_way() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("occupied");
    fs::write(&target, b"not a directory").unwrap();

    let err = ensure_output_dir(&target).unwrap_err();
    assert!(matches!(err, PersistError::OutputDir(_)));
}

#[test]
fn writer_replaces_an_existing_file_atomically() {
    let dir = TempDir::new().unwrap();
    let writer = ImageFileWriter::new(dir.path().to_path_buf());

    let first = writer.write("image_1.png", b"old").expect("first write");
    assert_eq!(fs::read(&first).unwrap(), b"old");

    let second = writer.write("image_1.png", b"new").expect("second write");
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"new");

    // No temp files left behind.
    let entries: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn writer_surfaces_io_trouble_as_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("never-created");
    let writer = ImageFileWriter::new(missing);

    let err = writer.write("image_1.png", b"body").unwrap_err();
    assert!(matches!(err, PersistError::Io(_)));
}
