//! Turning input files into page references.
//!
//! A PDF yields one reference per page, in source order. A raster image is
//! first converted to a single-page PDF and yields exactly one reference to
//! page 0 of that generated file.
//!
//! The kind of a file is decided by its extension alone. Anything that is
//! not a known image extension is handed to the PDF reader.
//!
//! # Examples
//!
//! ```no_run
//! use pdfdeck::collection::PageCollection;
//! use pdfdeck::import::Importer;
//! use std::path::Path;
//!
//! # fn example() -> pdfdeck::Result<()> {
//! let importer = Importer::new();
//! let mut pages = PageCollection::new();
//!
//! importer.import_into(Path::new("report.pdf"), &mut pages)?;
//! importer.import_into(Path::new("photo.jpg"), &mut pages)?;
//! # Ok(())
//! # }
//! ```

pub mod raster;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::collection::{PageCollection, PageReference};
use crate::error::{DeckError, Result};
use crate::io::{PdfReader, PdfWriter};

pub use raster::convert_image;

/// Extensions (lowercase) treated as raster images.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// What an input file is, judged by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A PDF document (also the fallback for unknown extensions).
    Pdf,
    /// A raster image that needs conversion.
    Image,
}

impl SourceKind {
    /// Classify `path` by extension, case-insensitively.
    pub fn from_path(path: &Path) -> Self {
        let is_image = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                IMAGE_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            });

        if is_image { Self::Image } else { Self::Pdf }
    }
}

/// Import settings.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Where generated PDFs for images go.
    ///
    /// `None` writes `<image>.pdf` next to the image.
    pub conversion_dir: Option<PathBuf>,
}

/// Reads inputs and produces page references.
///
/// A PDF without pages imports as zero references rather than an error.
#[derive(Debug, Clone)]
pub struct Importer {
    reader: PdfReader,
    writer: PdfWriter,
    options: ImportOptions,
}

impl Default for Importer {
    fn default() -> Self {
        Self {
            reader: PdfReader::without_verification(),
            writer: PdfWriter::default(),
            options: ImportOptions::default(),
        }
    }
}

impl Importer {
    /// Create an importer that writes converted images next to their source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an importer with custom options.
    pub fn with_options(options: ImportOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Create an importer that writes converted images into `dir`.
    pub fn with_conversion_dir(dir: impl Into<PathBuf>) -> Self {
        Self::with_options(ImportOptions {
            conversion_dir: Some(dir.into()),
        })
    }

    /// Path the converted PDF for `image_path` would be written to.
    ///
    /// Inside a conversion directory an existing file is never reused; a
    /// numeric suffix is added until the name is free.
    pub fn converted_path(&self, image_path: &Path) -> PathBuf {
        let Some(dir) = &self.options.conversion_dir else {
            let mut path = OsString::from(image_path.as_os_str());
            path.push(".pdf");
            return PathBuf::from(path);
        };

        let name = image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        let mut candidate = dir.join(format!("{name}.pdf"));
        let mut suffix = 2;
        while candidate.exists() {
            candidate = dir.join(format!("{name}-{suffix}.pdf"));
            suffix += 1;
        }
        candidate
    }

    /// Page references for the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, is not a readable PDF or
    /// decodable image, or the converted PDF cannot be written.
    pub fn import(&self, path: &Path) -> Result<Vec<PageReference>> {
        let pages = match SourceKind::from_path(path) {
            SourceKind::Pdf => {
                let page_count = self.reader.page_count(path)?;
                (0..page_count)
                    .map(|index| PageReference::new(path, index))
                    .collect()
            }
            SourceKind::Image => {
                if let Some(dir) = &self.options.conversion_dir {
                    std::fs::create_dir_all(dir).map_err(|e| DeckError::FailedToCreateOutput {
                        path: dir.clone(),
                        source: e,
                    })?;
                }
                let pdf_path = self.converted_path(path);
                convert_image(path, &pdf_path, &self.writer)?;
                vec![PageReference::new(pdf_path, 0)]
            }
        };

        tracing::debug!(path = %path.display(), pages = pages.len(), "imported file");
        Ok(pages)
    }

    /// Import `path` and append its pages to `collection`.
    ///
    /// Returns the number of pages appended.
    pub fn import_into(&self, path: &Path, collection: &mut PageCollection) -> Result<usize> {
        let pages = self.import(path)?;
        let count = pages.len();
        collection.extend(pages);
        Ok(count)
    }

    /// Import every path in order, stopping at the first failure.
    ///
    /// Pages of files imported before the failure stay in `collection`.
    pub fn import_all<P: AsRef<Path>>(
        &self,
        paths: &[P],
        collection: &mut PageCollection,
    ) -> Result<usize> {
        let mut total = 0;
        for path in paths {
            total += self.import_into(path.as_ref(), collection)?;
        }
        Ok(total)
    }
}
