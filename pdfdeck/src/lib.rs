//! pdfdeck - Reorder, split and merge pages from PDF and image files.
//!
//! The center of the library is [`PageCollection`]: an ordered list of page
//! references (source file + page index). Files are imported into it, the
//! list is rearranged, and the result is exported as one PDF or split into
//! one PDF per page.
//!
//! - [`import`]: PDFs and raster images to page references
//! - [`collection`]: the ordered list and its edits
//! - [`export`]: page copying into new documents
//! - [`render`]: page previews through Pdfium
//!
//! # Examples
//!
//! ```no_run
//! use pdfdeck::{Importer, PageCollection};
//! use std::path::Path;
//!
//! # fn example() -> pdfdeck::Result<()> {
//! let importer = Importer::new();
//! let mut pages = PageCollection::new();
//! importer.import_into(Path::new("contract.pdf"), &mut pages)?;
//! importer.import_into(Path::new("signature.png"), &mut pages)?;
//!
//! // Put the signature page first and drop the old cover.
//! let last = pages.len() - 1;
//! for i in (1..=last).rev() {
//!     pages.move_up(i);
//! }
//! pages.remove(1)?;
//!
//! pages.export(Path::new("signed.pdf"))?;
//! pages.split(Path::new("pages/"))?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod io;
pub mod output;
pub mod render;
pub mod utils;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use collection::{PageCollection, PageReference};
pub use config::{Config, EditOp, EditScript, OverwriteMode};
pub use error::{DeckError, Result};
pub use export::{ExportSummary, PageAssembler, SplitSummary};
pub use import::{ImportOptions, Importer, SourceKind};
pub use render::{PageRenderer, PdfiumRenderer, RenderTarget};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
