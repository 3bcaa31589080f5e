//! PDF reading and loading operations.
//!
//! Documents are loaded for the duration of one operation (import, export,
//! split) and dropped when it ends. [`DocumentCache`] keeps each source open
//! at most once within such an operation.
//!
//! # Examples
//!
//! ```no_run
//! use pdfdeck::io::reader::PdfReader;
//! use std::path::Path;
//!
//! # fn example() -> pdfdeck::Result<()> {
//! let reader = PdfReader::new();
//! let loaded = reader.load(Path::new("input.pdf"))?;
//! println!("{} pages", loaded.page_count);
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{DeckError, Result};

/// A loaded PDF document with metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Path to the source file.
    pub path: PathBuf,

    /// Number of pages in the document.
    pub page_count: usize,

    /// Time taken to load the document.
    pub load_time: Duration,

    /// File size in bytes.
    pub file_size: u64,
}

impl LoadedPdf {
    fn new(document: Document, path: PathBuf, load_time: Duration) -> Self {
        let page_count = document.get_pages().len();
        let file_size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

        Self {
            document,
            path,
            page_count,
            load_time,
            file_size,
        }
    }

    /// Fail with [`DeckError::PageOutOfRange`] unless `page_index` exists.
    pub fn check_page(&self, page_index: usize) -> Result<()> {
        if page_index >= self.page_count {
            return Err(DeckError::page_out_of_range(
                self.path.clone(),
                page_index,
                self.page_count,
            ));
        }
        Ok(())
    }
}

/// PDF reader with configurable loading behavior.
#[derive(Debug, Clone)]
pub struct PdfReader {
    /// Whether to reject documents without pages.
    verify: bool,
}

impl PdfReader {
    /// Create a new PDF reader with default settings.
    pub fn new() -> Self {
        Self { verify: true }
    }

    /// Create a reader that accepts documents without pages.
    pub fn without_verification() -> Self {
        Self { verify: false }
    }

    /// Check that `path` exists and is a regular file.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::FileNotFound`] or [`DeckError::NotAFile`].
    pub fn check_path_exists(path: &Path) -> Result<()> {
        if !path.try_exists()? {
            return Err(DeckError::file_not_found(path.to_path_buf()));
        }

        if path.is_dir() {
            return Err(DeckError::not_a_file(path.to_path_buf()));
        }

        Ok(())
    }

    /// Load a single PDF document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File does not exist or is a directory
    /// - File is not a valid PDF
    /// - PDF is encrypted
    /// - PDF has no pages (unless verification is disabled)
    pub fn load(&self, path: &Path) -> Result<LoadedPdf> {
        Self::check_path_exists(path)?;

        let path_buf = path.to_path_buf();
        let start = Instant::now();

        let document = Document::load(&path_buf).map_err(|e| {
            let err_msg = e.to_string();
            if err_msg.contains("encrypt") || err_msg.contains("password") {
                DeckError::encrypted_pdf(path_buf.clone())
            } else {
                DeckError::failed_to_load_pdf(path_buf.clone(), err_msg)
            }
        })?;

        if document.is_encrypted() {
            return Err(DeckError::encrypted_pdf(path_buf));
        }

        if self.verify && document.get_pages().is_empty() {
            return Err(DeckError::corrupted_pdf(path_buf, "PDF has no pages"));
        }

        let loaded = LoadedPdf::new(document, path_buf, start.elapsed());
        tracing::debug!(
            path = %loaded.path.display(),
            pages = loaded.page_count,
            elapsed_ms = loaded.load_time.as_millis() as u64,
            "loaded PDF"
        );

        Ok(loaded)
    }

    /// Count the pages of the PDF at `path`.
    pub fn page_count(&self, path: &Path) -> Result<usize> {
        Ok(self.load(path)?.page_count)
    }
}

impl Default for PdfReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Sources opened during a single export or split.
///
/// Each path is loaded on first use and kept until the cache is dropped.
#[derive(Debug, Default)]
pub struct DocumentCache {
    reader: PdfReader,
    loaded: HashMap<PathBuf, LoadedPdf>,
}

impl DocumentCache {
    /// Create an empty cache using `reader` for loads.
    pub fn new(reader: PdfReader) -> Self {
        Self {
            reader,
            loaded: HashMap::new(),
        }
    }

    /// Get the document at `path`, loading it if needed.
    pub fn get(&mut self, path: &Path) -> Result<&LoadedPdf> {
        if !self.loaded.contains_key(path) {
            let loaded = self.reader.load(path)?;
            self.loaded.insert(path.to_path_buf(), loaded);
        }

        self.loaded
            .get(path)
            .ok_or_else(|| DeckError::other(format!("{} vanished from cache", path.display())))
    }

    /// Number of distinct sources loaded so far.
    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    /// True when nothing has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}
