//! Utilities for input path collection and size formatting.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::{Result, error::DeckError};

/// File patterns accepted as inputs when a directory is expanded.
pub const SUPPORTED_PATTERNS: [&str; 4] = ["*.pdf", "*.png", "*.jpg", "*.jpeg"];

/// Expand multiple glob patterns into filesystem paths.
///
/// Accepts anything iterable with items that convert to `&str`, e.g.:
/// `&[&str]`, `Vec<String>`, or `Vec<&str>`.
///
/// Errors:
/// - Propagates `glob` parse errors.
/// - Propagates filesystem errors from glob iterator.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns {
        resolved_paths.extend(collect_paths_for_pattern(pattern)?);
    }

    Ok(resolved_paths)
}

fn collect_paths_for_pattern<P: AsRef<str>>(pattern: P) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern.as_ref())
        .map_err(|err| DeckError::invalid_config(err.to_string()))?;

    paths
        .map(|entry| entry.map_err(|err| DeckError::other(err.to_string())))
        .collect()
}

/// Build the case-insensitive matcher for [`SUPPORTED_PATTERNS`].
pub fn supported_files_matcher() -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in SUPPORTED_PATTERNS {
        let glob = GlobBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|err| DeckError::other(err.to_string()))?;
        builder.add(glob);
    }
    builder.build().map_err(|err| DeckError::other(err.to_string()))
}

/// Supported files below `dir`, sorted by path.
pub fn collect_supported_files(dir: &Path, matcher: &GlobSet) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|err| DeckError::other(err.to_string()))?;
        if entry.file_type().is_file() && matcher.is_match(entry.file_name()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn has_glob_meta(s: &str) -> bool {
    s.contains(['*', '?', '['])
}

/// Resolve user-supplied inputs into an ordered list of files.
///
/// - A directory contributes its supported files, sorted by path.
/// - A path containing glob characters that does not exist literally is
///   expanded as a pattern.
/// - Anything else is kept as given, so a missing file is reported by the
///   importer.
///
/// Order of `inputs` is preserved.
pub fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let matcher = supported_files_matcher()?;
    let mut resolved = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let files = collect_supported_files(input, &matcher)?;
            tracing::debug!(dir = %input.display(), files = files.len(), "expanded directory");
            resolved.extend(files);
            continue;
        }

        let text = input.to_string_lossy();
        if !input.exists() && has_glob_meta(&text) {
            let mut matches = collect_paths_for_patterns([text.as_ref()])?;
            matches.retain(|p| p.is_file());
            if matches.is_empty() {
                return Err(DeckError::invalid_config(format!(
                    "Pattern matched no files: {text}"
                )));
            }
            resolved.extend(matches);
            continue;
        }

        resolved.push(input.clone());
    }

    Ok(resolved)
}

/// Format a byte count for humans.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
