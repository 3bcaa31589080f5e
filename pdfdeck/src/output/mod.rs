//! Output formatting and display for pdfdeck.
//!
//! This module handles all user-facing output including:
//! - Formatted status messages
//! - Collection listings (plain and JSON)
//! - Export and split summaries
//!
//! # Examples
//!
//! ```no_run
//! use pdfdeck::output::{OutputFormatter, display_collection};
//! use pdfdeck::collection::PageCollection;
//!
//! # fn example(pages: PageCollection) {
//! let formatter = OutputFormatter::new(false, false);
//! display_collection(&formatter, &pages);
//! formatter.success("Done");
//! # }
//! ```

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use serde::Serialize;
use std::path::Path;

use crate::collection::{PageCollection, PageReference};
use crate::export::{ExportSummary, SplitSummary};

/// One row of a JSON listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingEntry<'a> {
    /// 1-based position in the collection.
    pub position: usize,
    /// 1-based page number in the source.
    pub page_number: usize,
    /// The underlying reference.
    #[serde(flatten)]
    pub page: &'a PageReference,
}

/// Build the JSON listing entries for `collection`.
pub fn listing_entries(collection: &PageCollection) -> Vec<ListingEntry<'_>> {
    collection
        .iter()
        .enumerate()
        .map(|(i, page)| ListingEntry {
            position: i + 1,
            page_number: page.page_number(),
            page,
        })
        .collect()
}

/// Serialize `collection` as a pretty-printed JSON array.
pub fn collection_json(collection: &PageCollection) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&listing_entries(collection))
}

/// Print the collection as a numbered list.
pub fn display_collection(formatter: &OutputFormatter, collection: &PageCollection) {
    if collection.is_empty() {
        formatter.info("The collection is empty");
        return;
    }

    for (i, page) in collection.iter().enumerate() {
        formatter.list_item(i + 1, &page.to_string());
        formatter.detail("Source", &page.source_path.display().to_string());
    }
}

/// Report a finished export.
pub fn display_export_summary(formatter: &OutputFormatter, summary: &ExportSummary) {
    formatter.success(&format!(
        "Exported {} page(s) to {} ({})",
        summary.page_count,
        summary.output_path.display(),
        summary.format_file_size()
    ));
    formatter.detail("Sources read", &summary.sources_read.to_string());
    formatter.detail("Time", &format!("{:.2}s", summary.elapsed.as_secs_f64()));
}

/// Report a finished split.
pub fn display_split_summary(formatter: &OutputFormatter, summary: &SplitSummary) {
    formatter.success(&format!(
        "Wrote {} file(s) to {}",
        summary.files.len(),
        summary.output_dir.display()
    ));
    for file in &summary.files {
        formatter.debug(&file_label(file));
    }
    formatter.detail("Time", &format!("{:.2}s", summary.elapsed.as_secs_f64()));
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
