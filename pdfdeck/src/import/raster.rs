//! Raster image to single-page PDF conversion.
//!
//! The image is flattened to 8-bit RGB (alpha is dropped) and placed on a
//! page whose size in points equals its size in pixels.

use image::RgbImage;
use lopdf::{Dictionary, Document, Object, Stream};
use std::path::Path;

use crate::error::{DeckError, Result};
use crate::io::{PdfReader, PdfWriter};

/// Resource name of the image on the generated page.
const IMAGE_RESOURCE: &str = "Im0";

/// Decode `image_path` as RGB.
///
/// # Errors
///
/// Returns [`DeckError::FileNotFound`] for a missing file and
/// [`DeckError::ImageDecode`] when the bytes are not a supported image.
pub fn decode_rgb(image_path: &Path) -> Result<RgbImage> {
    PdfReader::check_path_exists(image_path)?;

    let decoded = image::open(image_path).map_err(|e| DeckError::ImageDecode {
        path: image_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(decoded.to_rgb8())
}

/// Build a one-page document showing `rgb` at one point per pixel.
pub fn image_document(rgb: &RgbImage) -> Document {
    let (width, height) = rgb.dimensions();
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut image_dict = Dictionary::new();
    image_dict.set("Type", "XObject");
    image_dict.set("Subtype", "Image");
    image_dict.set("Width", width as i64);
    image_dict.set("Height", height as i64);
    image_dict.set("ColorSpace", "DeviceRGB");
    image_dict.set("BitsPerComponent", 8);
    let image_id = doc.add_object(Stream::new(image_dict, rgb.as_raw().clone()));

    let mut xobjects = Dictionary::new();
    xobjects.set(IMAGE_RESOURCE, image_id);
    let mut resources = Dictionary::new();
    resources.set("XObject", xobjects);

    let content = format!("q\n{width} 0 0 {height} 0 0 cm\n/{IMAGE_RESOURCE} Do\nQ\n");
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let mut page = Dictionary::new();
    page.set("Type", "Page");
    page.set("Parent", pages_id);
    page.set(
        "MediaBox",
        vec![0.into(), 0.into(), Object::from(width as i64), Object::from(height as i64)],
    );
    page.set("Resources", resources);
    page.set("Contents", content_id);
    let page_id = doc.add_object(page);

    let mut pages = Dictionary::new();
    pages.set("Type", "Pages");
    pages.set("Kids", vec![Object::Reference(page_id)]);
    pages.set("Count", 1);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::new();
    catalog.set("Type", "Catalog");
    catalog.set("Pages", pages_id);
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", catalog_id);

    doc
}

/// Convert the image at `image_path` into a single-page PDF at `output_path`.
///
/// # Errors
///
/// Returns an error if the image cannot be read or decoded, is empty, or
/// the PDF cannot be written.
pub fn convert_image(image_path: &Path, output_path: &Path, writer: &PdfWriter) -> Result<()> {
    let rgb = decode_rgb(image_path)?;

    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(DeckError::ConversionFailed {
            path: image_path.to_path_buf(),
            reason: "image has no pixels".to_string(),
        });
    }

    let mut doc = image_document(&rgb);
    writer.save(&mut doc, output_path)?;

    tracing::debug!(
        image = %image_path.display(),
        pdf = %output_path.display(),
        width = rgb.width(),
        height = rgb.height(),
        "converted image"
    );

    Ok(())
}
