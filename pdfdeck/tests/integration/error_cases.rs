//! Integration tests for error handling and edge cases.

use pdfdeck::config::{Command, Config, EditScript};
use pdfdeck::{DeckError, Importer, PageCollection};
use std::path::PathBuf;
use tempfile::TempDir;

use crate::common::labelled_pdf;

#[test]
fn test_error_nonexistent_input() {
    let err = Importer::new()
        .import(&PathBuf::from("/nonexistent/file.pdf"))
        .unwrap_err();
    assert!(matches!(err, DeckError::FileNotFound { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_error_corrupted_pdf() {
    let temp_dir = TempDir::new().unwrap();
    let bad = temp_dir.path().join("bad.pdf");
    std::fs::write(&bad, b"%PDF-1.4\nthis is not really a pdf").unwrap();

    let err = Importer::new().import(&bad).unwrap_err();
    assert!(matches!(
        err,
        DeckError::FailedToLoadPdf { .. } | DeckError::CorruptedPdf { .. }
    ));
    assert!(err.is_recoverable());
}

#[test]
fn test_error_undecodable_image() {
    let temp_dir = TempDir::new().unwrap();
    let bad = temp_dir.path().join("scan.jpg");
    std::fs::write(&bad, b"not a jpeg").unwrap();

    let err = Importer::new().import(&bad).unwrap_err();
    assert!(matches!(err, DeckError::ImageDecode { .. }));
}

#[test]
fn test_error_export_empty_collection() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out.pdf");

    let err = PageCollection::new().export(&output).unwrap_err();
    assert!(matches!(err, DeckError::EmptyCollection));
    assert!(!output.exists());
}

#[test]
fn test_error_export_page_out_of_range() {
    let temp_dir = TempDir::new().unwrap();
    let a = labelled_pdf(temp_dir.path(), "a", 2);

    let mut pages = PageCollection::new();
    pages.append(&a, 0);
    pages.append(&a, 2);

    let err = pages.export(&temp_dir.path().join("out.pdf")).unwrap_err();
    assert!(matches!(
        err,
        DeckError::PageOutOfRange {
            page_index: 2,
            page_count: 2,
            ..
        }
    ));
    assert!(err.to_string().contains("Page 3"));
}

#[test]
fn test_error_export_source_deleted_after_import() {
    let temp_dir = TempDir::new().unwrap();
    let a = labelled_pdf(temp_dir.path(), "a", 1);

    let mut pages = PageCollection::new();
    Importer::new().import_into(&a, &mut pages).unwrap();
    std::fs::remove_file(&a).unwrap();

    let err = pages.export(&temp_dir.path().join("out.pdf")).unwrap_err();
    assert!(matches!(err, DeckError::FileNotFound { .. }));
}

#[test]
fn test_error_export_into_missing_directory() {
    let temp_dir = TempDir::new().unwrap();
    let a = labelled_pdf(temp_dir.path(), "a", 1);

    let mut pages = PageCollection::new();
    pages.append(&a, 0);

    let err = pages
        .export(&temp_dir.path().join("missing").join("out.pdf"))
        .unwrap_err();
    assert!(matches!(err, DeckError::FailedToCreateOutput { .. }));
    assert_eq!(err.exit_code(), 5);
}

#[test]
fn test_error_remove_out_of_range() {
    let mut pages = PageCollection::new();
    pages.append("a.pdf", 0);

    assert!(matches!(
        pages.remove(1),
        Err(DeckError::IndexOutOfRange { index: 1, len: 1 })
    ));
    assert_eq!(pages.len(), 1);
}

#[test]
fn test_error_invalid_edit_script() {
    assert!(EditScript::parse("up one").is_err());
    assert!(EditScript::parse("rm 0").is_err());
}

#[test]
fn test_error_output_is_an_input() {
    let config = Config {
        inputs: vec![PathBuf::from("a.pdf")],
        command: Command::Export {
            output: PathBuf::from("a.pdf"),
        },
        ..Default::default()
    };
    assert!(config.validate().is_err());
}
