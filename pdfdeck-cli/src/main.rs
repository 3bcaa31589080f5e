//! pdfdeck - Reorder, split and merge pages from PDF and image files.
//!
//! Imports every input into one page collection, applies the edit script,
//! then lists, exports, splits or renders the result.

mod cli;

use clap::Parser;
use std::path::Path;
use std::process;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use pdfdeck::collection::PageCollection;
use pdfdeck::config::{Command, Config, OverwriteMode};
use pdfdeck::error::{DeckError, Result};
use pdfdeck::import::Importer;
use pdfdeck::output::{
    OutputFormatter, collection_json, display_collection, display_export_summary,
    display_split_summary,
};
use pdfdeck::render::{
    PageRenderer, PdfiumRenderer, RenderTarget, preview_file_name, save_png, thumbnail,
};
use pdfdeck::utils::expand_inputs;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "PDFDECK_LOG";

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Log to stderr, filtered by `PDFDECK_LOG`, then `RUST_LOG`.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic.
fn run(cli: Cli) -> Result<()> {
    cli.validate()?;
    let config = cli.to_config()?;
    let formatter = OutputFormatter::from_config(&config);
    tracing::debug!(command = ?config.command, edits = config.edits.ops().len(), "starting");

    if formatter.should_print() && !matches!(config.command, Command::List { .. }) {
        formatter.section(&format!("{} v{}", pdfdeck::NAME, pdfdeck::VERSION));
        formatter.blank_line();
    }

    let inputs = expand_inputs(config.inputs())?;

    // Converted images must outlive every command that reads them.
    let scratch;
    let importer = match &config.conversion_dir {
        Some(dir) => Importer::with_conversion_dir(dir),
        None => {
            scratch = TempDir::new()?;
            Importer::with_conversion_dir(scratch.path())
        }
    };

    let mut pages = PageCollection::new();
    let total = inputs.len();
    for (n, path) in (1..).zip(&inputs) {
        let added = importer.import_into(path, &mut pages)?;
        formatter.debug(&format!(
            "[{n}/{total}] {}: {added} page(s)",
            path.display()
        ));
    }
    if !matches!(config.command, Command::List { json: true }) {
        formatter.info(&format!(
            "Imported {} page(s) from {total} file(s)",
            pages.len()
        ));
    }

    if !config.edits.is_empty() {
        apply_edits(&config, &formatter, &mut pages)?;
    }

    match &config.command {
        Command::List { json: true } => {
            let json = collection_json(&pages).map_err(|e| DeckError::other(e.to_string()))?;
            println!("{json}");
        }
        Command::List { json: false } => {
            formatter.blank_line();
            display_collection(&formatter, &pages);
        }
        Command::Export { output } => {
            handle_output_overwrite(&config, output, &formatter)?;
            formatter.info(&format!("Writing to: {}", output.display()));
            let summary = pages.export(output)?;
            formatter.blank_line();
            display_export_summary(&formatter, &summary);
        }
        Command::Split { output_dir } => {
            formatter.info(&format!("Splitting into: {}", output_dir.display()));
            let summary = pages.split(output_dir)?;
            formatter.blank_line();
            display_split_summary(&formatter, &summary);
        }
        Command::Render {
            output_dir,
            target,
            page,
        } => {
            render_pages(&config, &formatter, &pages, output_dir, *target, *page)?;
        }
    }

    Ok(())
}

/// Apply the configured edits, asking before each removal.
fn apply_edits(
    config: &Config,
    formatter: &OutputFormatter,
    pages: &mut PageCollection,
) -> Result<()> {
    check_removals_allowed(config, formatter)?;

    let outcome = config.edits.apply(pages, |index, page| {
        if config.assume_yes {
            return true;
        }
        let question = format!("Remove page {} ({page})?", index + 1);
        formatter.confirm(&question).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "could not read answer, keeping page");
            false
        })
    })?;

    formatter.debug(&format!(
        "Applied {} edit(s), skipped {}",
        outcome.applied, outcome.skipped
    ));
    if outcome.skipped > 0 {
        formatter.info(&format!("{} edit(s) had no effect", outcome.skipped));
    }

    Ok(())
}

/// Removals need an answer; in quiet mode only `--yes` can give one.
fn check_removals_allowed(config: &Config, formatter: &OutputFormatter) -> Result<()> {
    if config.edits.removes_pages() && !config.assume_yes && formatter.is_quiet() {
        return Err(DeckError::invalid_config(
            "Removing pages in quiet mode requires --yes",
        ));
    }
    Ok(())
}

/// Handle output file overwrite scenarios.
fn handle_output_overwrite(
    config: &Config,
    output: &Path,
    formatter: &OutputFormatter,
) -> Result<()> {
    if !output.exists() {
        return Ok(());
    }

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(DeckError::output_exists(output.to_path_buf())),
        OverwriteMode::Prompt => {
            // In quiet mode, treat as no-clobber
            if formatter.is_quiet() {
                return Err(DeckError::output_exists(output.to_path_buf()));
            }

            formatter.warning(&format!(
                "Output file already exists: {}",
                output.display()
            ));

            let confirmed = formatter
                .confirm("Overwrite?")
                .map_err(|err| DeckError::other(format!("Failed to read input: {err}")))?;

            if confirmed {
                Ok(())
            } else {
                Err(DeckError::Cancelled)
            }
        }
    }
}

/// Render the selected pages to `page_<n>.png` files.
///
/// Width targets are thumbnails: a page that fails is reported and skipped.
/// Fit targets stop at the first failure.
fn render_pages(
    config: &Config,
    formatter: &OutputFormatter,
    pages: &PageCollection,
    output_dir: &Path,
    target: RenderTarget,
    page: Option<usize>,
) -> Result<()> {
    if pages.is_empty() {
        return Err(DeckError::EmptyCollection);
    }

    let selected = match page {
        Some(position) => {
            let reference = pages
                .get(position - 1)
                .ok_or(DeckError::IndexOutOfRange {
                    index: position - 1,
                    len: pages.len(),
                })?;
            vec![(position, reference)]
        }
        None => (1..).zip(pages.iter()).collect(),
    };

    let renderer = PdfiumRenderer::with_library(config.pdfium_library.as_deref())?;
    std::fs::create_dir_all(output_dir).map_err(|e| DeckError::FailedToCreateOutput {
        path: output_dir.to_path_buf(),
        source: e,
    })?;

    let total = selected.len();
    let mut written = 0;
    for (n, (position, reference)) in (1..).zip(selected) {
        formatter.progress(n, total, Some(&reference.short_name()));

        let image = match target {
            RenderTarget::Width(width) => match thumbnail(&renderer, reference, width) {
                Some(image) => image,
                None => {
                    formatter.warning(&format!("Skipped {reference}: could not be rendered"));
                    continue;
                }
            },
            RenderTarget::Fit { .. } => renderer.render(reference, target)?,
        };

        save_png(&image, &output_dir.join(preview_file_name(position)))?;
        written += 1;
    }

    formatter.success(&format!(
        "Rendered {written} of {total} page(s) to {}",
        output_dir.display()
    ));
    Ok(())
}
