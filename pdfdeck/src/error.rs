//! Error types for pdfdeck.
//!
//! Every fallible operation in the crate returns [`DeckError`]. Messages are
//! written for the person running the tool: they name the file or position
//! involved and, where it helps, what to do about it.
//!
//! # Error Categories
//!
//! - **I/O Errors**: file not found, permission denied, disk full
//! - **Document Errors**: unreadable, corrupted or encrypted sources
//! - **Collection Errors**: positions or page indices out of range
//! - **Configuration Errors**: invalid arguments or edit scripts

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfdeck operations.
pub type Result<T> = std::result::Result<T, DeckError>;

/// Main error type for pdfdeck operations.
#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    /// Input file was not found.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input path exists but is not a regular file.
    #[error("Not a file: {}", path.display())]
    NotAFile {
        /// Offending path.
        path: PathBuf,
    },

    /// Failed to load a PDF file.
    #[error("Failed to load PDF: {}\n  Reason: {reason}", path.display())]
    FailedToLoadPdf {
        /// Path to the PDF file.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// PDF file is corrupted or has an invalid structure.
    #[error("Corrupted or invalid PDF: {}\n  Details: {details}", path.display())]
    CorruptedPdf {
        /// Path to the corrupted PDF.
        path: PathBuf,
        /// Details about the corruption.
        details: String,
    },

    /// PDF file is encrypted and cannot be processed.
    #[error(
        "PDF is encrypted and cannot be processed: {}\n  \
         Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools",
        path.display()
    )]
    EncryptedPdf {
        /// Path to the encrypted PDF.
        path: PathBuf,
    },

    /// A page reference points past the end of its source document.
    #[error(
        "Page {} does not exist in {}\n  Document has {page_count} page(s)",
        page_index + 1,
        path.display()
    )]
    PageOutOfRange {
        /// Source document.
        path: PathBuf,
        /// Zero-based page index that was requested.
        page_index: usize,
        /// Number of pages the document actually has.
        page_count: usize,
    },

    /// A collection position is out of range.
    #[error("Position {} is out of range (collection has {len} page(s))", index + 1)]
    IndexOutOfRange {
        /// Zero-based position that was requested.
        index: usize,
        /// Current collection length.
        len: usize,
    },

    /// Nothing to export or split.
    #[error("The page collection is empty")]
    EmptyCollection,

    /// Raster image could not be decoded.
    #[error("Failed to read image: {}\n  Reason: {reason}", path.display())]
    ImageDecode {
        /// Path to the image.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// An image could not be turned into a single-page PDF.
    #[error("Failed to convert image to PDF: {}\n  Reason: {reason}", path.display())]
    ConversionFailed {
        /// Path to the image.
        path: PathBuf,
        /// Details about the failure.
        reason: String,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  \
         Use --force to overwrite or choose a different output path",
        path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to create an output file or directory.
    #[error("Failed to create output: {}\n  Reason: {source}", path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to write to an output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Rasterizing a page failed.
    #[error("Failed to render page {} of {}\n  Reason: {reason}", page_index + 1, path.display())]
    RenderFailed {
        /// Source document.
        path: PathBuf,
        /// Zero-based page index.
        page_index: usize,
        /// Renderer message.
        reason: String,
    },

    /// The Pdfium library could not be loaded.
    #[error(
        "Pdfium library not available: {reason}\n  \
         Hint: install it system-wide, place it next to the executable, \
         or set PDFDECK_PDFIUM_LIB"
    )]
    PdfiumUnavailable {
        /// Loader message.
        reason: String,
    },

    /// Edit script could not be parsed.
    #[error("Invalid edit script: {message}")]
    InvalidEditScript {
        /// Parser message.
        message: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<lopdf::Error> for DeckError {
    fn from(err: lopdf::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl DeckError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            path,
            reason: reason.into(),
        }
    }

    /// Create a CorruptedPdf error.
    pub fn corrupted_pdf(path: PathBuf, details: impl Into<String>) -> Self {
        Self::CorruptedPdf {
            path,
            details: details.into(),
        }
    }

    /// Create an EncryptedPdf error.
    pub fn encrypted_pdf(path: PathBuf) -> Self {
        Self::EncryptedPdf { path }
    }

    /// Create a PageOutOfRange error.
    pub fn page_out_of_range(path: PathBuf, page_index: usize, page_count: usize) -> Self {
        Self::PageOutOfRange {
            path,
            page_index,
            page_count,
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create a RenderFailed error.
    pub fn render_failed(path: PathBuf, page_index: usize, reason: impl Into<String>) -> Self {
        Self::RenderFailed {
            path,
            page_index,
            reason: reason.into(),
        }
    }

    /// Create an InvalidEditScript error.
    pub fn invalid_edit_script(message: impl Into<String>) -> Self {
        Self::InvalidEditScript {
            message: message.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if this error only concerns a single page or source.
    ///
    /// A front end may keep the session alive after these, e.g. by showing
    /// a placeholder instead of a thumbnail.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::FailedToLoadPdf { .. }
                | Self::CorruptedPdf { .. }
                | Self::EncryptedPdf { .. }
                | Self::PageOutOfRange { .. }
                | Self::ImageDecode { .. }
                | Self::RenderFailed { .. }
                | Self::PdfiumUnavailable { .. }
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } | Self::NotAFile { .. } => 2,
            Self::FailedToLoadPdf { .. }
            | Self::CorruptedPdf { .. }
            | Self::EncryptedPdf { .. }
            | Self::ImageDecode { .. } => 3,
            Self::OutputExists { .. } => 4,
            Self::FailedToCreateOutput { .. } | Self::FailedToWrite { .. } | Self::Io { .. } => 5,
            Self::ConversionFailed { .. } | Self::RenderFailed { .. } => 6,
            Self::PdfiumUnavailable { .. } => 7,
            Self::PageOutOfRange { .. }
            | Self::IndexOutOfRange { .. }
            | Self::EmptyCollection
            | Self::InvalidEditScript { .. }
            | Self::InvalidConfig { .. }
            | Self::Other { .. } => 1,
            Self::Cancelled => 130, // Standard exit code for SIGINT
        }
    }
}
