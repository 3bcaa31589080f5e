//! Splitting a collection into one file per page.

use pdfdeck::{DeckError, PageCollection};
use tempfile::TempDir;

use crate::common::{label, labelled_pdf, page_count, page_labels};

#[test]
fn test_split_writes_one_file_per_position() {
    let temp_dir = TempDir::new().unwrap();
    let a = labelled_pdf(temp_dir.path(), "a", 2);
    let b = labelled_pdf(temp_dir.path(), "b", 1);

    let mut pages = PageCollection::new();
    pages.append(&b, 0);
    pages.append(&a, 1);
    pages.append(&a, 0);

    let out_dir = temp_dir.path().join("split");
    let summary = pages.split(&out_dir).unwrap();

    assert_eq!(summary.files.len(), 3);
    let expected = [label("b", 1), label("a", 2), label("a", 1)];
    for (n, expected_label) in expected.iter().enumerate() {
        let file = out_dir.join(format!("pagina_{}.pdf", n + 1));
        assert_eq!(summary.files[n], file);
        assert_eq!(page_count(&file), 1);
        assert_eq!(&page_labels(&file)[0], expected_label);
    }
}

#[test]
fn test_split_creates_missing_directory() {
    let temp_dir = TempDir::new().unwrap();
    let a = labelled_pdf(temp_dir.path(), "a", 1);

    let mut pages = PageCollection::new();
    pages.append(&a, 0);

    let out_dir = temp_dir.path().join("nested").join("dir");
    pages.split(&out_dir).unwrap();
    assert!(out_dir.join("pagina_1.pdf").exists());
}

#[test]
fn test_split_stops_at_first_bad_page_and_keeps_earlier_files() {
    let temp_dir = TempDir::new().unwrap();
    let a = labelled_pdf(temp_dir.path(), "a", 2);

    let mut pages = PageCollection::new();
    pages.append(&a, 0);
    pages.append(&a, 7);
    pages.append(&a, 1);

    let out_dir = temp_dir.path().join("split");
    let err = pages.split(&out_dir).unwrap_err();

    assert!(matches!(err, DeckError::PageOutOfRange { page_index: 7, .. }));
    assert!(out_dir.join("pagina_1.pdf").exists());
    assert!(!out_dir.join("pagina_2.pdf").exists());
    assert!(!out_dir.join("pagina_3.pdf").exists());
}

#[test]
fn test_split_empty_collection() {
    let temp_dir = TempDir::new().unwrap();
    let err = PageCollection::new()
        .split(&temp_dir.path().join("split"))
        .unwrap_err();
    assert!(matches!(err, DeckError::EmptyCollection));
}
