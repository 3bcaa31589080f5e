//! Importing PDFs, images, directories and patterns.

use pdfdeck::utils::expand_inputs;
use pdfdeck::{Importer, PageCollection, PageReference};
use tempfile::TempDir;

use crate::common::{labelled_pdf, page_count, png};

#[test]
fn test_import_pdf_appends_every_page() {
    let temp_dir = TempDir::new().unwrap();
    let a = labelled_pdf(temp_dir.path(), "a", 7);

    let mut pages = PageCollection::new();
    let added = Importer::new().import_into(&a, &mut pages).unwrap();

    assert_eq!(added, 7);
    let expected: Vec<_> = (0..7).map(|i| PageReference::new(&a, i)).collect();
    assert_eq!(pages.as_slice(), expected.as_slice());
}

#[test]
fn test_import_image_appends_one_page() {
    let temp_dir = TempDir::new().unwrap();
    let photo = png(temp_dir.path(), "photo.png", 300, 200);

    let mut pages = PageCollection::new();
    let added = Importer::new().import_into(&photo, &mut pages).unwrap();

    assert_eq!(added, 1);
    let generated = &pages.get(0).unwrap().source_path;
    assert_eq!(generated, &temp_dir.path().join("photo.png.pdf"));
    assert_eq!(page_count(generated), 1);
}

#[test]
fn test_import_same_file_twice_duplicates_pages() {
    let temp_dir = TempDir::new().unwrap();
    let a = labelled_pdf(temp_dir.path(), "a", 2);

    let mut pages = PageCollection::new();
    let importer = Importer::new();
    importer.import_into(&a, &mut pages).unwrap();
    importer.import_into(&a, &mut pages).unwrap();

    assert_eq!(pages.len(), 4);
    assert_eq!(pages.get(0), pages.get(2));
}

#[test]
fn test_directory_input_expands_to_supported_files() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("inbox");
    std::fs::create_dir(&dir).unwrap();
    labelled_pdf(&dir, "b", 2);
    labelled_pdf(&dir, "a", 1);
    png(&dir, "c.png", 8, 8);
    std::fs::write(dir.join("notes.txt"), "ignore me").unwrap();

    let inputs = expand_inputs(&[dir.clone()]).unwrap();
    assert_eq!(
        inputs,
        vec![dir.join("a.pdf"), dir.join("b.pdf"), dir.join("c.png")]
    );

    let mut pages = PageCollection::new();
    let added = Importer::with_conversion_dir(temp_dir.path().join("conv"))
        .import_all(&inputs, &mut pages)
        .unwrap();
    assert_eq!(added, 4);
}
