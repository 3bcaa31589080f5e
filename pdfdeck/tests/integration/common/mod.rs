//! Fixtures for the integration tests.
//!
//! PDFs are generated on the fly. Page `n` of a file with stem `doc` draws
//! the label `doc-n`, so tests can check which page ended up where.

#![allow(dead_code)]

use lopdf::{Document, Object, Stream, dictionary};
use std::path::{Path, PathBuf};

/// Label drawn on page `number` (1-based) of the fixture `stem`.
pub fn label(stem: &str, number: usize) -> String {
    format!("{stem}-{number}")
}

/// Write a PDF with `pages` labelled pages to `dir/<stem>.pdf`.
pub fn labelled_pdf(dir: &Path, stem: &str, pages: usize) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let kids: Vec<Object> = (1..=pages)
        .map(|number| {
            let content = format!("BT /F1 18 Tf 50 700 Td ({}) Tj ET", label(stem, number));
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            });
            Object::Reference(page_id)
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "Resources" => resources_id,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(format!("{stem}.pdf"));
    doc.save(&path).expect("Failed to write fixture PDF");
    path
}

/// Write a solid RGB PNG to `dir/name`.
pub fn png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    image::RgbImage::from_pixel(width, height, image::Rgb([20, 120, 220]))
        .save(&path)
        .expect("Failed to write fixture PNG");
    path
}

/// Labels of every page in the PDF at `path`, in page order.
pub fn page_labels(path: &Path) -> Vec<String> {
    let doc = Document::load(path).expect("Failed to load output PDF");
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let content = doc.get_page_content(page_id).unwrap_or_default();
            let text = String::from_utf8_lossy(&content);
            text.split(['(', ')'])
                .nth(1)
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}

/// Number of pages in the PDF at `path`.
pub fn page_count(path: &Path) -> usize {
    Document::load(path)
        .expect("Failed to load output PDF")
        .get_pages()
        .len()
}
