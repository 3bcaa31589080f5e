//! Building a collection from several sources, rearranging it and exporting.

use pdfdeck::{Importer, PageCollection, PageReference};
use tempfile::TempDir;

use crate::common::{label, labelled_pdf, page_count, page_labels, png};

#[test]
fn test_export_follows_collection_order() {
    let temp_dir = TempDir::new().unwrap();
    let a = labelled_pdf(temp_dir.path(), "a", 3);
    let b = labelled_pdf(temp_dir.path(), "b", 2);

    let importer = Importer::new();
    let mut pages = PageCollection::new();
    importer.import_into(&a, &mut pages).unwrap();
    importer.import_into(&b, &mut pages).unwrap();
    assert_eq!(pages.len(), 5);

    // a-1 a-2 a-3 b-1 b-2 -> b-1 a-1 a-2 a-3 b-2
    for i in (1..=3).rev() {
        assert!(pages.move_up(i));
    }
    // -> b-1 a-1 a-3 b-2
    pages.remove(2).unwrap();

    let output = temp_dir.path().join("out.pdf");
    let summary = pages.export(&output).unwrap();

    assert_eq!(summary.page_count, 4);
    assert_eq!(summary.sources_read, 2);
    assert_eq!(
        page_labels(&output),
        vec![label("b", 1), label("a", 1), label("a", 3), label("b", 2)]
    );
}

#[test]
fn test_export_with_duplicate_pages() {
    let temp_dir = TempDir::new().unwrap();
    let a = labelled_pdf(temp_dir.path(), "a", 2);

    let mut pages = PageCollection::new();
    pages.append(&a, 1);
    pages.append(&a, 0);
    pages.append(&a, 1);

    let output = temp_dir.path().join("dup.pdf");
    pages.export(&output).unwrap();

    assert_eq!(
        page_labels(&output),
        vec![label("a", 2), label("a", 1), label("a", 2)]
    );
}

#[test]
fn test_export_mixes_pdf_and_image_pages() {
    let temp_dir = TempDir::new().unwrap();
    let a = labelled_pdf(temp_dir.path(), "a", 2);
    let photo = png(temp_dir.path(), "photo.png", 32, 24);

    let importer = Importer::with_conversion_dir(temp_dir.path().join("converted"));
    let mut pages = PageCollection::new();
    importer
        .import_all(&[&a, &photo], &mut pages)
        .unwrap();
    assert_eq!(pages.len(), 3);

    pages.move_up(2);

    let output = temp_dir.path().join("mixed.pdf");
    pages.export(&output).unwrap();

    let labels = page_labels(&output);
    assert_eq!(labels.len(), 3);
    assert_eq!(labels[0], label("a", 1));
    assert_eq!(labels[2], label("a", 2));
}

#[test]
fn test_export_overwrites_existing_output() {
    let temp_dir = TempDir::new().unwrap();
    let a = labelled_pdf(temp_dir.path(), "a", 4);
    let output = temp_dir.path().join("out.pdf");
    std::fs::write(&output, b"stale").unwrap();

    let pages: PageCollection = [PageReference::new(&a, 3)].into_iter().collect();
    pages.export(&output).unwrap();

    assert_eq!(page_count(&output), 1);
}

#[test]
fn test_moves_preserve_the_multiset() {
    let temp_dir = TempDir::new().unwrap();
    let a = labelled_pdf(temp_dir.path(), "a", 6);

    let mut pages = PageCollection::new();
    Importer::new().import_into(&a, &mut pages).unwrap();
    let mut before: Vec<_> = pages.iter().cloned().collect();

    for step in 0..50usize {
        let i = (step * 7) % 6;
        if step % 2 == 0 {
            pages.move_up(i);
        } else {
            pages.move_down(i);
        }
    }

    let mut after: Vec<_> = pages.iter().cloned().collect();
    before.sort_by_key(|p| p.page_index);
    after.sort_by_key(|p| p.page_index);
    assert_eq!(before, after);
}
