//! CLI argument parsing for pdfdeck.
//!
//! This module defines the command-line interface structure using `clap`.
//! Inputs, edits and general flags are shared by every subcommand; the
//! subcommand decides what happens to the finished collection.
//!
//! # Examples
//!
//! ```text
//! pdfdeck scan.pdf photo.jpg --edit "up 3; rm 1" export -o out.pdf
//! pdfdeck chapters/ split -d pages/
//! pdfdeck report.pdf render --fit 1280x800 --page 2 -o previews/
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use pdfdeck::config::{Command, Config, EditScript, OverwriteMode, parse_size};
use pdfdeck::error::{DeckError, Result};
use pdfdeck::render::RenderTarget;

/// Reorder, split and merge pages from PDF and image files.
///
/// Every input is imported into one page collection: a PDF adds all of its
/// pages, an image adds one page. Edits rearrange the collection, then the
/// subcommand lists, exports, splits or renders it.
#[derive(Parser, Debug)]
#[command(name = "pdfdeck")]
#[command(version)]
#[command(about = "Reorder, split and merge pages from PDF and image files", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
#[command(subcommand_precedence_over_arg = true)]
pub struct Cli {
    /// Input PDF or image files, directories or glob patterns (in order)
    ///
    /// Directories contribute their .pdf, .png, .jpg and .jpeg files,
    /// sorted by name. A file named like a subcommand needs a path
    /// prefix, e.g. ./list.
    ///
    /// Examples:
    ///   pdfdeck cover.png report.pdf export -o out.pdf
    ///   pdfdeck "scans/*.jpg" split -d pages/
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<PathBuf>,

    /// Edit the collection before running the command
    ///
    /// Commands are separated by ';' or ','. Positions are 1-based,
    /// as printed by 'list', and refer to the collection as it is
    /// when the command runs. May be given several times.
    ///
    ///   up N       move page N one place up
    ///   down N     move page N one place down
    ///   remove N   remove page N (alias: rm)
    ///   clear      remove every page
    #[arg(short, long = "edit", value_name = "SCRIPT", global = true)]
    pub edits: Vec<String>,

    /// Remove pages without asking for confirmation
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Verbose output - show sources, timings and per-file details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all non-error output
    ///
    /// Removals must then be confirmed with --yes.
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    pub quiet: bool,

    /// Directory for PDFs generated from image inputs
    ///
    /// By default a temporary directory is used and removed on exit.
    #[arg(long, value_name = "DIR", global = true)]
    pub convert_dir: Option<PathBuf>,

    /// Pdfium shared library used by 'render'
    #[arg(long, value_name = "FILE", env = "PDFDECK_PDFIUM_LIB", global = true)]
    pub pdfium_lib: Option<PathBuf>,

    /// What to do with the collection
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Print the collection (default)
    List {
        /// Print JSON instead of a numbered list
        #[arg(long)]
        json: bool,
    },

    /// Write every page into one PDF
    Export(ExportArgs),

    /// Write one PDF per page (pagina_1.pdf, pagina_2.pdf, ...)
    Split {
        /// Output directory, created if missing
        #[arg(short = 'd', long, value_name = "DIR", default_value = ".")]
        output_dir: PathBuf,
    },

    /// Render pages to PNG files (page_1.png, page_2.png, ...)
    Render(RenderArgs),
}

/// Arguments of `export`.
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Output PDF file path
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Force overwrite of existing output file without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite existing output file
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,
}

/// Arguments of `render`.
#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Output directory, created if missing
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Only render the page at this 1-based position
    #[arg(short, long, value_name = "N")]
    pub page: Option<usize>,

    /// Thumbnail width in pixels (default 140)
    ///
    /// Pages that fail to render are reported and skipped.
    #[arg(long, value_name = "PIXELS", conflicts_with = "fit")]
    pub width: Option<u32>,

    /// Fit each page inside a WIDTHxHEIGHT box, e.g. 1280x800
    ///
    /// Any page that fails to render stops the run.
    #[arg(long, value_name = "WxH")]
    pub fit: Option<String>,
}

impl RenderArgs {
    fn target(&self) -> Result<RenderTarget> {
        if let Some(ref fit) = self.fit {
            let (width, height) =
                parse_size(fit).map_err(|e| DeckError::invalid_config(e.to_string()))?;
            return Ok(RenderTarget::Fit { width, height });
        }

        Ok(self
            .width
            .map(RenderTarget::Width)
            .unwrap_or_else(Config::default_render_target))
    }
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An edit script cannot be parsed
    /// - A render size is malformed
    /// - Configuration validation fails
    pub fn to_config(&self) -> Result<Config> {
        let edits = EditScript::parse_all(&self.edits)
            .map_err(|e| DeckError::invalid_edit_script(format!("{e:#}")))?;

        let (command, overwrite_mode) = match self.command.clone() {
            None => (Command::default(), OverwriteMode::Prompt),
            Some(CliCommand::List { json }) => (Command::List { json }, OverwriteMode::Prompt),
            Some(CliCommand::Export(args)) => {
                let overwrite_mode = if args.force {
                    OverwriteMode::Force
                } else if args.no_clobber {
                    OverwriteMode::NoClobber
                } else {
                    OverwriteMode::Prompt
                };
                (
                    Command::Export {
                        output: args.output,
                    },
                    overwrite_mode,
                )
            }
            Some(CliCommand::Split { output_dir }) => {
                (Command::Split { output_dir }, OverwriteMode::Force)
            }
            Some(CliCommand::Render(args)) => (
                Command::Render {
                    target: args.target()?,
                    page: args.page,
                    output_dir: args.output_dir,
                },
                OverwriteMode::Force,
            ),
        };

        let config = Config {
            inputs: self.inputs.clone(),
            edits,
            command,
            assume_yes: self.yes,
            overwrite_mode,
            verbose: self.verbose,
            quiet: self.quiet,
            conversion_dir: self.convert_dir.clone(),
            pdfium_library: self.pdfium_lib.clone(),
        };

        config.validate().map_err(|e| {
            DeckError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }

    /// Validate CLI arguments before processing.
    ///
    /// Performs early validation that doesn't require file I/O.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(DeckError::invalid_config("No input files specified"));
        }

        if let Some(CliCommand::Render(ref args)) = self.command {
            if args.width == Some(0) {
                return Err(DeckError::invalid_config("Width must be at least 1 pixel"));
            }
            if args.page == Some(0) {
                return Err(DeckError::invalid_config("Page positions start at 1"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfdeck::config::EditOp;
    use rstest::rstest;

    fn create_test_cli(inputs: Vec<&str>, command: Option<CliCommand>) -> Cli {
        Cli {
            inputs: inputs.iter().map(PathBuf::from).collect(),
            edits: Vec::new(),
            yes: false,
            verbose: false,
            quiet: false,
            convert_dir: None,
            pdfium_lib: None,
            command,
        }
    }

    fn export(output: &str) -> CliCommand {
        CliCommand::Export(ExportArgs {
            output: PathBuf::from(output),
            force: false,
            no_clobber: false,
        })
    }

    fn render(width: Option<u32>, fit: Option<&str>, page: Option<usize>) -> CliCommand {
        CliCommand::Render(RenderArgs {
            output_dir: PathBuf::from("previews"),
            page,
            width,
            fit: fit.map(str::to_string),
        })
    }

    #[test]
    fn test_parse_from_args() {
        let cli = Cli::try_parse_from([
            "pdfdeck", "a.pdf", "b.png", "--edit", "up 2", "-e", "rm 1", "export", "-o",
            "out.pdf", "--force",
        ])
        .unwrap();

        assert_eq!(cli.inputs, vec![PathBuf::from("a.pdf"), PathBuf::from("b.png")]);
        assert_eq!(cli.edits, vec!["up 2", "rm 1"]);
        assert!(matches!(cli.command, Some(CliCommand::Export(ref a)) if a.force));
    }

    #[test]
    fn test_subcommand_directly_after_inputs() {
        let cli = Cli::try_parse_from(["pdfdeck", "a.pdf", "export", "-o", "out.pdf"]).unwrap();
        assert_eq!(cli.inputs, vec![PathBuf::from("a.pdf")]);
        let Some(CliCommand::Export(args)) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(args.output, PathBuf::from("out.pdf"));

        let cli =
            Cli::try_parse_from(["pdfdeck", "a.pdf", "b.pdf", "split", "-d", "pages"]).unwrap();
        assert_eq!(cli.inputs, vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]);
        let Some(CliCommand::Split { output_dir }) = cli.command else {
            panic!("expected split");
        };
        assert_eq!(output_dir, PathBuf::from("pages"));

        let cli = Cli::try_parse_from(["pdfdeck", "a.pdf", "./list"]).unwrap();
        assert_eq!(cli.inputs, vec![PathBuf::from("a.pdf"), PathBuf::from("./list")]);
        assert!(cli.command.is_none());
    }

    #[rstest]
    #[case(&["pdfdeck", "a.pdf", "list"], 1, false)]
    #[case(&["pdfdeck", "a.pdf", "b.png", "list", "--json"], 2, true)]
    #[case(&["pdfdeck", "a.pdf", "-q", "list", "--json"], 1, true)]
    fn test_list_after_inputs(
        #[case] args: &[&str],
        #[case] input_count: usize,
        #[case] json: bool,
    ) {
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.inputs.len(), input_count);
        assert_eq!(cli.to_config().unwrap().command, Command::List { json });
    }

    #[rstest]
    #[case(&["pdfdeck", "a.pdf", "render", "--fit", "1280x800", "--page", "2"], 2)]
    #[case(&["pdfdeck", "a.pdf", "b.pdf", "render", "-o", "previews", "-p", "1"], 1)]
    fn test_render_after_inputs(#[case] args: &[&str], #[case] expected_page: usize) {
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Render { page, .. } = cli.to_config().unwrap().command else {
            panic!("expected render");
        };
        assert_eq!(page, Some(expected_page));
    }

    #[rstest]
    #[case(&["pdfdeck", "a.pdf", "export", "-o", "out.pdf", "--force", "--no-clobber"])]
    #[case(&["pdfdeck", "a.pdf", "render", "--width", "100", "--fit", "100x100"])]
    #[case(&["pdfdeck", "a.pdf", "-v", "-q"])]
    #[case(&["pdfdeck", "a.pdf", "export"])]
    #[case(&["pdfdeck", "export", "-o", "out.pdf"])]
    fn test_rejected_argument_combinations(#[case] args: &[&str]) {
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_default_command_is_list() {
        let cli = create_test_cli(vec!["a.pdf"], None);
        let config = cli.to_config().unwrap();
        assert_eq!(config.command, Command::List { json: false });
    }

    #[test]
    fn test_edits_are_concatenated() {
        let mut cli = create_test_cli(vec!["a.pdf"], None);
        cli.edits = vec!["up 2; down 1".to_string(), "rm 3".to_string()];

        let config = cli.to_config().unwrap();
        assert_eq!(
            config.edits.ops(),
            &[EditOp::MoveUp(2), EditOp::MoveDown(1), EditOp::Remove(3)]
        );
    }

    #[test]
    fn test_invalid_edit_script() {
        let mut cli = create_test_cli(vec!["a.pdf"], None);
        cli.edits = vec!["sideways 2".to_string()];

        let err = cli.to_config().unwrap_err();
        assert!(matches!(err, DeckError::InvalidEditScript { .. }));
        assert!(err.to_string().contains("sideways"));
    }

    #[test]
    fn test_cli_overwrite_modes() {
        let mut cli = create_test_cli(vec!["a.pdf"], Some(export("out.pdf")));

        let config = cli.to_config().unwrap();
        assert_eq!(config.overwrite_mode, OverwriteMode::Prompt);

        cli.command = Some(CliCommand::Export(ExportArgs {
            output: PathBuf::from("out.pdf"),
            force: true,
            no_clobber: false,
        }));
        let config = cli.to_config().unwrap();
        assert_eq!(config.overwrite_mode, OverwriteMode::Force);

        cli.command = Some(CliCommand::Export(ExportArgs {
            output: PathBuf::from("out.pdf"),
            force: false,
            no_clobber: true,
        }));
        let config = cli.to_config().unwrap();
        assert_eq!(config.overwrite_mode, OverwriteMode::NoClobber);
    }

    #[test]
    fn test_export_to_input_is_rejected() {
        let cli = create_test_cli(vec!["a.pdf"], Some(export("a.pdf")));
        assert!(matches!(
            cli.to_config().unwrap_err(),
            DeckError::InvalidConfig { .. }
        ));
    }

    #[test]
    fn test_render_targets() {
        let cli = create_test_cli(vec!["a.pdf"], Some(render(None, None, None)));
        let Command::Render { target, .. } = cli.to_config().unwrap().command else {
            panic!("expected render");
        };
        assert_eq!(target, RenderTarget::Width(140));

        let cli = create_test_cli(vec!["a.pdf"], Some(render(Some(300), None, Some(2))));
        let Command::Render { target, page, .. } = cli.to_config().unwrap().command else {
            panic!("expected render");
        };
        assert_eq!(target, RenderTarget::Width(300));
        assert_eq!(page, Some(2));

        let cli = create_test_cli(vec!["a.pdf"], Some(render(None, Some("1280x800"), None)));
        let Command::Render { target, .. } = cli.to_config().unwrap().command else {
            panic!("expected render");
        };
        assert_eq!(
            target,
            RenderTarget::Fit {
                width: 1280,
                height: 800
            }
        );
    }

    #[test]
    fn test_render_invalid_fit() {
        let cli = create_test_cli(vec!["a.pdf"], Some(render(None, Some("wide"), None)));
        assert!(cli.to_config().is_err());
    }

    #[test]
    fn test_cli_validate_no_inputs() {
        let cli = create_test_cli(vec![], None);
        assert!(cli.validate().is_err());
    }

    #[rstest]
    #[case(Some(0), None)]
    #[case(None, Some(0))]
    fn test_cli_validate_render_zero(#[case] width: Option<u32>, #[case] page: Option<usize>) {
        let cli = create_test_cli(vec!["a.pdf"], Some(render(width, None, page)));
        assert!(cli.validate().is_err());
    }
}
