//! Saving assembled documents.
//!
//! Before serialization a document is pruned of unreachable objects,
//! renumbered densely and its streams are compressed. Writes go straight to
//! the destination unless [`WriteOptions::atomic`] is set, in which case a
//! temp file in the destination directory is persisted over the target.
//!
//! # Examples
//!
//! ```no_run
//! use pdfdeck::io::writer::PdfWriter;
//! use lopdf::Document;
//! use std::path::Path;
//!
//! # fn example(mut doc: Document) -> pdfdeck::Result<()> {
//! let stats = PdfWriter::atomic().save_with_stats(&mut doc, Path::new("output.pdf"))?;
//! println!("{} objects, {}", stats.object_count, stats.format_file_size());
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;

use crate::error::{DeckError, Result};
use crate::utils::format_file_size;

/// How documents are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Persist through a temp file so the target is never half written.
    pub atomic: bool,
    /// Compress content streams.
    pub compress: bool,
    /// Drop objects no longer reachable from the trailer.
    pub prune: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: false,
            compress: true,
            prune: true,
        }
    }
}

/// What a save produced.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Where the document ended up.
    pub output_path: PathBuf,
    /// Bytes on disk.
    pub file_size: u64,
    /// Indirect objects in the saved document.
    pub object_count: usize,
    /// Whether streams were compressed.
    pub compressed: bool,
    /// Wall time spent in the save.
    pub write_time: Duration,
}

impl WriteStatistics {
    /// File size as a human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Serializes documents to disk.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Writer with default options: direct write, pruned and compressed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Writer that persists through a temp file.
    pub fn atomic() -> Self {
        Self::with_options(WriteOptions {
            atomic: true,
            ..WriteOptions::default()
        })
    }

    /// Writer that leaves streams as they are.
    pub fn without_compression() -> Self {
        Self::with_options(WriteOptions {
            compress: false,
            ..WriteOptions::default()
        })
    }

    /// The options in effect.
    pub fn options(&self) -> WriteOptions {
        self.options
    }

    /// Save `doc` to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::FailedToCreateOutput`] when the file cannot be
    /// created (missing directory, permissions) and
    /// [`DeckError::FailedToWrite`] when serialization fails.
    pub fn save(&self, doc: &mut Document, path: &Path) -> Result<()> {
        self.save_with_stats(doc, path).map(|_| ())
    }

    /// Save `doc` to `path` and report what was written.
    pub fn save_with_stats(&self, doc: &mut Document, path: &Path) -> Result<WriteStatistics> {
        let start = Instant::now();
        self.prepare(doc);

        if self.options.atomic {
            write_atomic(doc, path)?;
        } else {
            let file = File::create(path).map_err(|e| DeckError::FailedToCreateOutput {
                path: path.to_path_buf(),
                source: e,
            })?;
            write_document(doc, file, path)?;
        }

        let file_size = std::fs::metadata(path)?.len();

        Ok(WriteStatistics {
            output_path: path.to_path_buf(),
            file_size,
            object_count: doc.objects.len(),
            compressed: self.options.compress,
            write_time: start.elapsed(),
        })
    }

    fn prepare(&self, doc: &mut Document) {
        if self.options.prune {
            let pruned = doc.prune_objects();
            if !pruned.is_empty() {
                tracing::trace!(count = pruned.len(), "pruned unreachable objects");
            }
        }
        doc.renumber_objects();
        if self.options.compress {
            doc.compress();
        }
    }
}

fn write_document(doc: &mut Document, file: File, path: &Path) -> Result<()> {
    let failed = |source: io::Error| DeckError::FailedToWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = BufWriter::new(file);
    doc.save_to(&mut writer).map_err(|e| failed(io::Error::other(e)))?;
    writer.flush().map_err(failed)
}

fn write_atomic(doc: &mut Document, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let temp = NamedTempFile::new_in(dir).map_err(|e| DeckError::FailedToCreateOutput {
        path: path.to_path_buf(),
        source: e,
    })?;
    let file = temp.reopen().map_err(|e| DeckError::FailedToCreateOutput {
        path: temp.path().to_path_buf(),
        source: e,
    })?;
    write_document(doc, file, path)?;

    temp.persist(path).map_err(|e| DeckError::FailedToWrite {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}
