//! The ordered page collection.
//!
//! A [`PageCollection`] is a list of [`PageReference`]s. Its order is the
//! output order for [`export`](PageCollection::export) and
//! [`split`](PageCollection::split). References are plain values (a path and
//! an index); no document is kept open between operations.
//!
//! # Examples
//!
//! ```no_run
//! use pdfdeck::collection::PageCollection;
//! use std::path::Path;
//!
//! # fn example() -> pdfdeck::Result<()> {
//! let mut pages = PageCollection::new();
//! pages.append("report.pdf", 0);
//! pages.append("report.pdf", 1);
//! pages.append("scan.png.pdf", 0);
//!
//! pages.move_up(2);
//! pages.remove(0)?;
//!
//! pages.export(Path::new("assembled.pdf"))?;
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{DeckError, Result};
use crate::export::{ExportSummary, PageAssembler, SplitSummary};

/// Longest file name shown by [`PageReference::short_name`].
const SHORT_NAME_LIMIT: usize = 30;

/// One page of one source document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageReference {
    /// The originating document (a PDF, or the PDF generated for an image).
    pub source_path: PathBuf,

    /// Zero-based page index into `source_path`.
    pub page_index: usize,
}

impl PageReference {
    /// Create a reference to page `page_index` of `source_path`.
    pub fn new(source_path: impl Into<PathBuf>, page_index: usize) -> Self {
        Self {
            source_path: source_path.into(),
            page_index,
        }
    }

    /// One-based page number, as shown to users.
    pub fn page_number(&self) -> usize {
        self.page_index + 1
    }

    /// File name of the source, shortened to at most 30 characters.
    pub fn short_name(&self) -> String {
        let name = self
            .source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source_path.display().to_string());

        if name.chars().count() > SHORT_NAME_LIMIT {
            let head: String = name.chars().take(SHORT_NAME_LIMIT - 3).collect();
            format!("{head}...")
        } else {
            name
        }
    }
}

impl fmt::Display for PageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, page {}", self.short_name(), self.page_number())
    }
}

/// Ordered, mutable list of page references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCollection {
    items: Vec<PageReference>,
}

impl PageCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reference at the end.
    ///
    /// The index is not checked here; it is the caller's job to pass indices
    /// obtained from the importer. Bad indices surface on export or render.
    pub fn append(&mut self, source_path: impl Into<PathBuf>, page_index: usize) {
        self.items.push(PageReference::new(source_path, page_index));
    }

    /// Append references in order.
    pub fn extend<I>(&mut self, pages: I)
    where
        I: IntoIterator<Item = PageReference>,
    {
        self.items.extend(pages);
    }

    /// Swap the item at `index` with the one before it.
    ///
    /// Returns `false` (and changes nothing) for the first item or an
    /// out-of-range index.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.items.len() {
            return false;
        }
        self.items.swap(index, index - 1);
        true
    }

    /// Swap the item at `index` with the one after it.
    ///
    /// Returns `false` (and changes nothing) for the last item or an
    /// out-of-range index.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index >= self.items.len().saturating_sub(1) {
            return false;
        }
        self.items.swap(index, index + 1);
        true
    }

    /// Delete the item at `index`; later items shift down by one.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::IndexOutOfRange`] if there is no such item.
    pub fn remove(&mut self, index: usize) -> Result<PageReference> {
        if index >= self.items.len() {
            return Err(DeckError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of references.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when there are no references.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Reference at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&PageReference> {
        self.items.get(index)
    }

    /// Iterate over references in output order.
    pub fn iter(&self) -> std::slice::Iter<'_, PageReference> {
        self.items.iter()
    }

    /// All references in output order.
    pub fn as_slice(&self) -> &[PageReference] {
        &self.items
    }

    /// Copy every referenced page, in order, into one new PDF at `output_path`.
    ///
    /// Stops at the first page that cannot be copied. A file that was being
    /// written when a failure happened is not removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection is empty, a source cannot be read,
    /// a page index is out of range, or the output cannot be written.
    pub fn export(&self, output_path: &Path) -> Result<ExportSummary> {
        PageAssembler::new().export(&self.items, output_path)
    }

    /// Write one single-page PDF per item into `output_dir`.
    ///
    /// Files are named `pagina_<n>.pdf` after their 1-based position. The
    /// first failure stops the loop; files already written stay in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection is empty, the directory cannot be
    /// created, or any page cannot be copied or written.
    pub fn split(&self, output_dir: &Path) -> Result<SplitSummary> {
        PageAssembler::new().split(&self.items, output_dir)
    }
}

impl<'a> IntoIterator for &'a PageCollection {
    type Item = &'a PageReference;
    type IntoIter = std::slice::Iter<'a, PageReference>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<PageReference> for PageCollection {
    fn from_iter<I: IntoIterator<Item = PageReference>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
