//! Configuration module for pdfdeck.
//!
//! This module holds the validated configuration that drives one run of the
//! tool, plus the edit script language used to rearrange the page
//! collection from the command line:
//!
//! ```text
//! up 3; down 1, remove 5; rm 2; clear
//! ```
//!
//! Commands are separated by `;` or `,`. Positions are 1-based, as printed
//! by the `list` command, and refer to the collection as it is when the
//! command runs.

use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use std::str::FromStr;

use crate::collection::{PageCollection, PageReference};
use crate::error::DeckError;
use crate::render::{RenderTarget, THUMBNAIL_WIDTH};

/// One edit applied to the page collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    /// Move the page at this 1-based position one place up.
    MoveUp(usize),
    /// Move the page at this 1-based position one place down.
    MoveDown(usize),
    /// Remove the page at this 1-based position.
    Remove(usize),
    /// Remove every page.
    Clear,
}

impl EditOp {
    /// 1-based position the op refers to, if any.
    pub fn position(&self) -> Option<usize> {
        match *self {
            Self::MoveUp(p) | Self::MoveDown(p) | Self::Remove(p) => Some(p),
            Self::Clear => None,
        }
    }
}

impl FromStr for EditOp {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut words = s.split_whitespace();
        let Some(verb) = words.next() else {
            bail!("Empty edit command");
        };
        let verb = verb.to_lowercase();

        if verb == "clear" {
            if let Some(extra) = words.next() {
                bail!("'clear' takes no position, found '{extra}'");
            }
            return Ok(Self::Clear);
        }

        let Some(arg) = words.next() else {
            bail!("Missing position in '{s}'. Expected e.g. '{verb} 2'");
        };
        if words.next().is_some() {
            bail!("Too many arguments in '{s}'");
        }

        let position: usize = arg
            .parse()
            .with_context(|| format!("Invalid position: {arg}"))?;
        if position == 0 {
            bail!("Positions start at 1");
        }

        match verb.as_str() {
            "up" => Ok(Self::MoveUp(position)),
            "down" => Ok(Self::MoveDown(position)),
            "remove" | "rm" => Ok(Self::Remove(position)),
            other => bail!("Unknown edit command '{other}'. Expected up, down, remove or clear"),
        }
    }
}

/// Counts reported after applying an [`EditScript`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditOutcome {
    /// Ops that changed the collection.
    pub applied: usize,
    /// Moves at a boundary and declined removals.
    pub skipped: usize,
}

/// Ordered list of edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditScript {
    ops: Vec<EditOp>,
}

impl EditScript {
    /// Parse an edit script.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first command that cannot be parsed.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfdeck::config::{EditOp, EditScript};
    ///
    /// let script = EditScript::parse("up 3; rm 1").unwrap();
    /// assert_eq!(script.ops(), &[EditOp::MoveUp(3), EditOp::Remove(1)]);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let ops = s
            .split([';', ','])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<EditOp>()
                    .with_context(|| format!("In edit '{part}'"))
            })
            .collect::<Result<Vec<EditOp>>>()?;

        Ok(Self { ops })
    }

    /// Parse and concatenate several scripts, in order.
    pub fn parse_all<T>(scripts: T) -> Result<Self>
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        let mut ops = Vec::new();
        for script in scripts {
            ops.extend(Self::parse(script.as_ref())?.ops);
        }
        Ok(Self { ops })
    }

    /// The parsed ops.
    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }

    /// True when there is nothing to apply.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// True when the script removes pages.
    pub fn removes_pages(&self) -> bool {
        self.ops
            .iter()
            .any(|op| matches!(op, EditOp::Remove(_) | EditOp::Clear))
    }

    /// Apply every op to `collection`, in order.
    ///
    /// `confirm_remove` is asked before each removal with the 0-based index
    /// and the page; returning `false` leaves the page in place.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::IndexOutOfRange`] for a position past the end of
    /// the collection. Ops before it have already been applied.
    pub fn apply<F>(
        &self,
        collection: &mut PageCollection,
        mut confirm_remove: F,
    ) -> crate::Result<EditOutcome>
    where
        F: FnMut(usize, &PageReference) -> bool,
    {
        let mut outcome = EditOutcome::default();

        for op in &self.ops {
            if let Some(position) = op.position()
                && position > collection.len()
            {
                return Err(DeckError::IndexOutOfRange {
                    index: position - 1,
                    len: collection.len(),
                });
            }

            let changed = match *op {
                EditOp::MoveUp(p) => collection.move_up(p - 1),
                EditOp::MoveDown(p) => collection.move_down(p - 1),
                EditOp::Remove(p) => {
                    let index = p - 1;
                    let confirmed = collection
                        .get(index)
                        .is_some_and(|page| confirm_remove(index, page));
                    if confirmed {
                        let removed = collection.remove(index)?;
                        tracing::debug!(page = %removed, position = p, "removed page");
                    }
                    confirmed
                }
                EditOp::Clear => {
                    collection.clear();
                    true
                }
            };

            if changed {
                outcome.applied += 1;
            } else {
                tracing::debug!(?op, "edit had no effect");
                outcome.skipped += 1;
            }
        }

        Ok(outcome)
    }
}

/// Parse a `WIDTHxHEIGHT` box such as `1280x800`.
pub fn parse_size(s: &str) -> Result<(u32, u32)> {
    let Some((w, h)) = s.trim().split_once(['x', 'X']) else {
        bail!("Invalid size: {s}. Expected format like '1280x800'");
    };

    let width: u32 = w
        .trim()
        .parse()
        .with_context(|| format!("Invalid width: {w}"))?;
    let height: u32 = h
        .trim()
        .parse()
        .with_context(|| format!("Invalid height: {h}"))?;

    if width == 0 || height == 0 {
        bail!("Size must be positive, got {width}x{height}");
    }

    Ok((width, height))
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// What to do with the collection once it is built and edited.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the collection.
    List {
        /// Emit JSON instead of a numbered list.
        json: bool,
    },

    /// Write all pages into one PDF.
    Export {
        /// Output PDF path.
        output: PathBuf,
    },

    /// Write one PDF per page.
    Split {
        /// Directory receiving `pagina_<n>.pdf` files.
        output_dir: PathBuf,
    },

    /// Rasterize pages to PNG files.
    Render {
        /// Directory receiving `page_<n>.png` files.
        output_dir: PathBuf,
        /// Size of each image.
        target: RenderTarget,
        /// Only this 1-based position; all pages when `None`.
        page: Option<usize>,
    },
}

impl Default for Command {
    fn default() -> Self {
        Self::List { json: false }
    }
}

/// Complete configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input files, directories or glob patterns, in import order.
    pub inputs: Vec<PathBuf>,

    /// Edits applied after import.
    pub edits: EditScript,

    /// What to produce.
    pub command: Command,

    /// Answer yes to removal prompts.
    pub assume_yes: bool,

    /// File overwrite behavior for export.
    pub overwrite_mode: OverwriteMode,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Where converted images go (`None` = next to the image).
    pub conversion_dir: Option<PathBuf>,

    /// Pdfium library to bind for rendering.
    pub pdfium_library: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            edits: EditScript::default(),
            command: Command::default(),
            assume_yes: false,
            overwrite_mode: OverwriteMode::Prompt,
            verbose: false,
            quiet: false,
            conversion_dir: None,
            pdfium_library: None,
        }
    }
}

impl Config {
    /// Returns a reference to inputs.
    pub fn inputs(&self) -> &[PathBuf] {
        self.inputs.as_ref()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No input files are specified
    /// - Verbose and quiet modes are both enabled
    /// - The export output is also an input
    /// - A render size or page position is zero
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            bail!("No input files specified");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        match &self.command {
            Command::Export { output } => {
                if self.inputs.iter().any(|input| input == output) {
                    bail!(
                        "Output file cannot be the same as an input file: {}",
                        output.display()
                    );
                }
            }
            Command::Render { target, page, .. } => {
                let zero_size = match *target {
                    RenderTarget::Width(w) => w == 0,
                    RenderTarget::Fit { width, height } => width == 0 || height == 0,
                };
                if zero_size {
                    bail!("Render size must be positive");
                }
                if *page == Some(0) {
                    bail!("Page positions start at 1");
                }
            }
            Command::List { .. } | Command::Split { .. } => {}
        }

        Ok(())
    }

    /// Check if regular output should be displayed.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }

    /// Render target used when none is configured.
    pub fn default_render_target() -> RenderTarget {
        RenderTarget::Width(THUMBNAIL_WIDTH)
    }
}
