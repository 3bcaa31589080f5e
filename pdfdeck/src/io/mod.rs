//! I/O operations for pdfdeck.
//!
//! This module handles loading source PDFs from disk and writing assembled
//! documents back out. All handles are scoped to a single call.

pub mod reader;
pub mod writer;

pub use reader::{DocumentCache, LoadedPdf, PdfReader};
pub use writer::{PdfWriter, WriteOptions, WriteStatistics};

use crate::error::Result;
use lopdf::Document;
use std::path::Path;

/// Load a PDF document from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid PDF.
pub fn load_pdf(path: &Path) -> Result<Document> {
    Ok(PdfReader::new().load(path)?.document)
}

/// Save a PDF document to a file with default options.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_pdf(doc: &mut Document, path: &Path) -> Result<()> {
    PdfWriter::new().save(doc, path)
}
