//! Fixtures shared by unit tests.
//!
//! Every generated page draws the text `page-<n>` (1-based), so tests can
//! tell pages apart after they have been copied around.

use lopdf::{Document, Object, Stream, dictionary};
use std::path::{Path, PathBuf};

/// Marker text drawn on page `number` (1-based) of a test document.
pub fn page_marker(number: usize) -> String {
    format!("page-{number}")
}

/// Build an in-memory PDF with `pages` pages.
///
/// `MediaBox` and `Resources` live on the `Pages` node so that copies
/// have to resolve inherited attributes.
pub fn build_test_document(pages: usize) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids = Vec::with_capacity(pages);
    for number in 1..=pages {
        let content = format!("BT /F1 24 Tf 72 720 Td ({}) Tj ET", page_marker(number));
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc
}

/// Write a `pages`-page test PDF to `dir/name` and return its path.
pub fn write_test_pdf(dir: &Path, name: &str, pages: usize) -> PathBuf {
    let path = dir.join(name);
    let mut doc = build_test_document(pages);
    doc.save(&path).unwrap();
    path
}

/// Write a solid-colour RGB PNG to `dir/name` and return its path.
pub fn write_test_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    image::RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]))
        .save(&path)
        .unwrap();
    path
}

/// Marker texts of every page of `doc`, in page order.
pub fn page_markers(doc: &Document) -> Vec<String> {
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let content = doc.get_page_content(page_id).unwrap();
            let text = String::from_utf8_lossy(&content);
            text.split(['(', ')'])
                .find(|part| part.starts_with("page-"))
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}
