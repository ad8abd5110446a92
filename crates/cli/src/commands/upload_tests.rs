// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use std::fs;
use tempfile::TempDir;
use yare::parameterized;

#[parameterized(
    pdf = { "paper.pdf", None, FileType::Document },
    upper_png = { "CAT.PNG", None, FileType::Image },
    explicit_wins = { "paper.pdf", Some(FileType::Image), FileType::Image },
    explicit_for_unknown = { "scan.bin", Some(FileType::Document), FileType::Document },
)]
fn test_resolve_file_type(name: &str, explicit: Option<FileType>, expected: FileType) {
    assert_eq!(resolve_file_type(Path::new(name), explicit).unwrap(), expected);
}

#[test]
fn test_resolve_file_type_unknown_extension() {
    let err = resolve_file_type(Path::new("notes.txt"), None).unwrap_err();
    assert!(matches!(err, Error::UnknownFileType(_)));
}

#[test]
fn test_read_batch_groups_by_type() {
    let temp = TempDir::new().unwrap();
    let pdf = temp.path().join("a.pdf");
    let png = temp.path().join("b.png");
    fs::write(&pdf, b"%PDF-1.7").unwrap();
    fs::write(&png, b"\x89PNG").unwrap();

    let batch = read_batch(&[pdf, png], None).unwrap();

    assert_eq!(batch.documents.len(), 1);
    assert_eq!(batch.documents[0].file_name, "a.pdf");
    assert_eq!(batch.documents[0].payload, b"%PDF-1.7");
    assert_eq!(batch.images.len(), 1);
    assert_eq!(batch.images[0].content_type, "image/png");
}

#[test]
fn test_read_batch_missing_file() {
    let temp = TempDir::new().unwrap();
    let err = read_batch(&[temp.path().join("nope.pdf")], None).unwrap_err();
    assert!(matches!(err, Error::FileNotFound(_)));
}

#[test]
fn test_read_batch_rejects_directories() {
    let temp = TempDir::new().unwrap();
    let err = read_batch(&[temp.path().to_path_buf()], None).unwrap_err();
    assert!(matches!(err, Error::FileNotFound(_)));
}

#[test]
fn test_groups_skip_empty_types() {
    let batch = Batch {
        documents: vec![NewUpload::new("a.pdf", vec![1])],
        images: Vec::new(),
    };
    let groups: Vec<FileType> = batch.groups().map(|(t, _)| t).collect();
    assert_eq!(groups, vec![FileType::Document]);
}
