//! Writing page collections out as PDF files.
//!
//! # Examples
//!
//! ```no_run
//! use pdfdeck::collection::PageReference;
//! use pdfdeck::export::PageAssembler;
//! use std::path::Path;
//!
//! # fn example() -> pdfdeck::Result<()> {
//! let pages = vec![
//!     PageReference::new("b.pdf", 0),
//!     PageReference::new("a.pdf", 2),
//! ];
//!
//! let summary = PageAssembler::new().export(&pages, Path::new("out.pdf"))?;
//! println!("{} pages, {}", summary.page_count, summary.format_file_size());
//! # Ok(())
//! # }
//! ```

pub mod assembler;

pub use assembler::{ExportSummary, PageAssembler, SPLIT_FILE_PREFIX, SplitSummary, split_file_name};
