//! Builds new documents out of page references.
//!
//! Each referenced page becomes a fresh page object in the output, so one
//! source page may appear any number of times. Only objects reachable from
//! the selected pages are copied; the rest of each source is left behind.

use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::collection::PageReference;
use crate::error::{DeckError, Result};
use crate::io::{DocumentCache, PdfReader, PdfWriter};
use crate::utils::format_file_size;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains in broken files.
const MAX_TREE_DEPTH: usize = 64;

/// File name prefix used by [`PageAssembler::split`].
pub const SPLIT_FILE_PREFIX: &str = "pagina_";

/// Name of the split output for the page at 1-based `position`.
pub fn split_file_name(position: usize) -> String {
    format!("{SPLIT_FILE_PREFIX}{position}.pdf")
}

/// Outcome of an export.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Where the document was written.
    pub output_path: PathBuf,

    /// Pages in the written document.
    pub page_count: usize,

    /// Distinct source documents that were read.
    pub sources_read: usize,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Wall time for assembling and writing.
    pub elapsed: Duration,
}

impl ExportSummary {
    /// Format output size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Outcome of a split.
#[derive(Debug, Clone)]
pub struct SplitSummary {
    /// Directory the pages were written to.
    pub output_dir: PathBuf,

    /// Written files in collection order.
    pub files: Vec<PathBuf>,

    /// Distinct source documents that were read.
    pub sources_read: usize,

    /// Wall time for the whole split.
    pub elapsed: Duration,
}

/// A source document renumbered so its object ids fit into the output.
struct PreparedSource {
    document: Document,
    page_ids: Vec<ObjectId>,
}

/// Every distinct source of a page list, renumbered into disjoint id ranges.
///
/// Built once per export or split and shared by every document assembled
/// from it.
struct PreparedSources<'a> {
    by_path: HashMap<&'a Path, PreparedSource>,
    max_id: u32,
}

impl<'a> PreparedSources<'a> {
    fn prepare(pages: &'a [PageReference], cache: &mut DocumentCache) -> Result<Self> {
        let mut by_path: HashMap<&Path, PreparedSource> = HashMap::new();
        let mut max_id = 0;

        for page in pages {
            let path = page.source_path.as_path();
            if by_path.contains_key(path) {
                continue;
            }

            let loaded = cache.get(path)?;
            let mut document = loaded.document.clone();
            document.renumber_objects_with(max_id + 1);
            max_id = document.max_id;

            let page_ids = document.get_pages().into_values().collect();
            by_path.insert(path, PreparedSource { document, page_ids });
        }

        Ok(Self { by_path, max_id })
    }

    fn len(&self) -> usize {
        self.by_path.len()
    }

    fn locate(&self, page: &PageReference) -> Result<(&PreparedSource, ObjectId)> {
        let source = self
            .by_path
            .get(page.source_path.as_path())
            .ok_or_else(|| DeckError::file_not_found(page.source_path.clone()))?;
        let page_id = *source.page_ids.get(page.page_index).ok_or_else(|| {
            DeckError::page_out_of_range(
                page.source_path.clone(),
                page.page_index,
                source.page_ids.len(),
            )
        })?;
        Ok((source, page_id))
    }
}

/// Copies referenced pages into new PDF documents.
#[derive(Debug, Clone, Default)]
pub struct PageAssembler {
    reader: PdfReader,
    writer: PdfWriter,
}

impl PageAssembler {
    /// Create an assembler with the default reader and writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `writer` for every file this assembler produces.
    pub fn with_writer(mut self, writer: PdfWriter) -> Self {
        self.writer = writer;
        self
    }

    /// Build an in-memory document containing `pages` in order.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::EmptyCollection`] for an empty slice, or the
    /// first load or page lookup error encountered.
    pub fn assemble(&self, pages: &[PageReference]) -> Result<Document> {
        if pages.is_empty() {
            return Err(DeckError::EmptyCollection);
        }
        let mut cache = DocumentCache::new(self.reader.clone());
        let sources = PreparedSources::prepare(pages, &mut cache)?;
        assemble_from(&sources, pages)
    }

    /// Copy `pages`, in order, into one new PDF at `output_path`.
    ///
    /// # Errors
    ///
    /// Returns the first load, lookup or write error. A partially written
    /// output file is left as it is.
    pub fn export(&self, pages: &[PageReference], output_path: &Path) -> Result<ExportSummary> {
        if pages.is_empty() {
            return Err(DeckError::EmptyCollection);
        }

        let start = Instant::now();
        let mut cache = DocumentCache::new(self.reader.clone());
        let sources = PreparedSources::prepare(pages, &mut cache)?;

        let mut document = assemble_from(&sources, pages)?;
        let stats = self.writer.save_with_stats(&mut document, output_path)?;

        let summary = ExportSummary {
            output_path: stats.output_path,
            page_count: pages.len(),
            sources_read: sources.len(),
            file_size: stats.file_size,
            elapsed: start.elapsed(),
        };

        tracing::info!(
            output = %summary.output_path.display(),
            pages = summary.page_count,
            sources = summary.sources_read,
            "exported document"
        );

        Ok(summary)
    }

    /// Write one single-page PDF per reference into `output_dir`.
    ///
    /// The file for the page at 1-based position `n` is `pagina_<n>.pdf`.
    /// The directory is created if needed. Every source is loaded before
    /// the first file is written.
    ///
    /// # Errors
    ///
    /// Stops at the first failing page. Files written before it remain.
    pub fn split(&self, pages: &[PageReference], output_dir: &Path) -> Result<SplitSummary> {
        if pages.is_empty() {
            return Err(DeckError::EmptyCollection);
        }

        let start = Instant::now();
        std::fs::create_dir_all(output_dir).map_err(|e| DeckError::FailedToCreateOutput {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

        let mut cache = DocumentCache::new(self.reader.clone());
        let sources = PreparedSources::prepare(pages, &mut cache)?;
        let mut files = Vec::with_capacity(pages.len());

        for (position, page) in (1..).zip(pages) {
            let mut document = assemble_from(&sources, std::slice::from_ref(page))?;
            let path = output_dir.join(split_file_name(position));
            self.writer.save(&mut document, &path)?;

            tracing::debug!(page = %page, file = %path.display(), "wrote split page");
            files.push(path);
        }

        tracing::info!(
            dir = %output_dir.display(),
            files = files.len(),
            sources = sources.len(),
            "split collection"
        );

        Ok(SplitSummary {
            output_dir: output_dir.to_path_buf(),
            files,
            sources_read: sources.len(),
            elapsed: start.elapsed(),
        })
    }
}

/// Build a document holding `pages` out of already prepared sources.
///
/// References between pages are carried over when both ends are selected.
/// A reference to a page that is not part of `pages` becomes `null`. When a
/// page is selected more than once, references to it point at its first
/// copy.
fn assemble_from(sources: &PreparedSources<'_>, pages: &[PageReference]) -> Result<Document> {
    let mut output = Document::with_version("1.5");
    // Everything allocated here lands above the ids copied from sources.
    output.max_id = sources.max_id;
    let pages_id = output.new_object_id();

    let mut placed = Vec::with_capacity(pages.len());
    let mut page_map: HashMap<ObjectId, ObjectId> = HashMap::new();
    for page in pages {
        let (source, page_id) = sources.locate(page)?;
        let new_id = output.new_object_id();
        page_map.entry(page_id).or_insert(new_id);
        placed.push((page, source, page_id, new_id));
    }

    let mut kids = Vec::with_capacity(pages.len());
    for (page, source, page_id, new_id) in placed {
        let dict = resolve_page(&source.document, page_id).map_err(|e| {
            DeckError::corrupted_pdf(
                page.source_path.clone(),
                format!("page {}: {e}", page.page_number()),
            )
        })?;

        let mut object = Object::Dictionary(dict);
        copy_references(&mut output, &source.document, &object, &page_map);
        retarget_page_links(&mut object, &source.document, &page_map);

        if let Object::Dictionary(dict) = &mut object {
            dict.set("Parent", pages_id);
        }
        output.objects.insert(new_id, object);
        kids.push(Object::Reference(new_id));

        tracing::debug!(page = %page, "copied page");
    }

    let mut tree = Dictionary::new();
    tree.set("Type", "Pages");
    tree.set("Count", kids.len() as i64);
    tree.set("Kids", kids);
    output.objects.insert(pages_id, Object::Dictionary(tree));

    let mut catalog = Dictionary::new();
    catalog.set("Type", "Catalog");
    catalog.set("Pages", pages_id);
    let catalog_id = output.add_object(catalog);
    output.trailer.set("Root", catalog_id);

    Ok(output)
}

/// Clone a page dictionary with inherited attributes made explicit.
///
/// The returned dictionary has no `Parent` entry.
fn resolve_page(source: &Document, page_id: ObjectId) -> lopdf::Result<Dictionary> {
    let mut dict = source.get_dictionary(page_id)?.clone();
    let mut parent = dict.get(b"Parent").and_then(Object::as_reference).ok();

    for _ in 0..MAX_TREE_DEPTH {
        let Some(node_id) = parent else {
            break;
        };
        let node = source.get_dictionary(node_id)?;

        for key in INHERITABLE_KEYS {
            if !dict.has(key)
                && let Ok(value) = node.get(key)
            {
                dict.set(key.to_vec(), value.clone());
            }
        }

        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    dict.remove(b"Parent");
    Ok(dict)
}

fn is_page_node(obj: &Object) -> bool {
    matches!(obj.type_name(), Ok(b"Page") | Ok(b"Pages"))
}

/// Copy every object reachable from `obj` out of `source` into `target`.
///
/// Page and page-tree nodes are never followed, so back-references such as
/// an annotation's `/P` do not drag the rest of the source along. Copies
/// have their page references rewritten through `page_map`.
fn copy_references(
    target: &mut Document,
    source: &Document,
    obj: &Object,
    page_map: &HashMap<ObjectId, ObjectId>,
) {
    match obj {
        Object::Reference(ref_id) => {
            if target.objects.contains_key(ref_id) {
                return;
            }
            let Ok(referenced) = source.get_object(*ref_id) else {
                return;
            };
            if is_page_node(referenced) {
                return;
            }
            let mut copy = referenced.clone();
            retarget_page_links(&mut copy, source, page_map);
            target.objects.insert(*ref_id, copy);
            copy_references(target, source, referenced, page_map);
        }
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter() {
                copy_references(target, source, value, page_map);
            }
        }
        Object::Array(arr) => {
            for item in arr {
                copy_references(target, source, item, page_map);
            }
        }
        Object::Stream(stream) => {
            for (_, value) in stream.dict.iter() {
                copy_references(target, source, value, page_map);
            }
        }
        _ => {}
    }
}

/// Point references to selected pages at their copies and null out
/// references to page-tree nodes that stay behind.
///
/// Only direct values inside `obj` are touched; referenced objects are
/// rewritten when they are copied.
fn retarget_page_links(
    obj: &mut Object,
    source: &Document,
    page_map: &HashMap<ObjectId, ObjectId>,
) {
    match obj {
        Object::Reference(ref_id) => {
            let id = *ref_id;
            if let Some(new_id) = page_map.get(&id) {
                *obj = Object::Reference(*new_id);
            } else if source.get_object(id).is_ok_and(is_page_node) {
                *obj = Object::Null;
            }
        }
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter_mut() {
                retarget_page_links(value, source, page_map);
            }
        }
        Object::Array(arr) => {
            for item in arr.iter_mut() {
                retarget_page_links(item, source, page_map);
            }
        }
        Object::Stream(stream) => {
            for (_, value) in stream.dict.iter_mut() {
                retarget_page_links(value, source, page_map);
            }
        }
        _ => {}
    }
}
