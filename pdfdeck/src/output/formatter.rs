//! Terminal messages for the command-line front end.
//!
//! Regular output goes to stdout and is silenced by `--quiet`; warnings and
//! errors go to stderr and are always shown. Colour is used only when
//! stdout is a terminal.
//!
//! # Examples
//!
//! ```
//! use pdfdeck::output::formatter::OutputFormatter;
//!
//! let formatter = OutputFormatter::new(false, false);
//! formatter.info("Importing 3 file(s)");
//! formatter.success("Exported 12 page(s)");
//! formatter.error("report.pdf is encrypted");
//! ```

use std::io::{self, IsTerminal, Write};

use crate::config::Config;

/// Kind of message, which decides prefix, colour and stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Plain progress text.
    Info,
    /// A finished step.
    Success,
    /// Something was skipped or degraded.
    Warning,
    /// The run failed.
    Error,
    /// Verbose-only detail.
    Debug,
}

impl MessageLevel {
    fn prefix(self) -> &'static str {
        match self {
            Self::Info => "",
            Self::Success => "✓ ",
            Self::Warning => "⚠ ",
            Self::Error => "✗ ",
            Self::Debug => "→ ",
        }
    }

    fn color(self) -> Option<&'static str> {
        match self {
            Self::Info => None,
            Self::Success => Some("32"),
            Self::Warning => Some("33"),
            Self::Error => Some("31"),
            Self::Debug => Some("36"),
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Self::Warning | Self::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

/// Prints user-facing messages at the configured verbosity.
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    verbosity: Verbosity,
    colored: bool,
}

impl OutputFormatter {
    /// Create a formatter. `quiet` wins over `verbose`.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        let verbosity = match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        };
        Self {
            verbosity,
            colored: io::stdout().is_terminal() && std::env::var_os("TERM").is_some(),
        }
    }

    /// Formatter matching the run configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.quiet, config.verbose)
    }

    /// Only warnings and errors.
    pub fn quiet() -> Self {
        Self::new(true, false)
    }

    /// Everything, including details.
    pub fn verbose() -> Self {
        Self::new(false, true)
    }

    /// Suppressed in quiet mode.
    pub fn info(&self, message: &str) {
        self.emit(MessageLevel::Info, message);
    }

    /// Suppressed in quiet mode.
    pub fn success(&self, message: &str) {
        self.emit(MessageLevel::Success, message);
    }

    /// Always shown, on stderr.
    pub fn warning(&self, message: &str) {
        self.emit(MessageLevel::Warning, message);
    }

    /// Always shown, on stderr.
    pub fn error(&self, message: &str) {
        self.emit(MessageLevel::Error, message);
    }

    /// Shown only in verbose mode.
    pub fn debug(&self, message: &str) {
        self.emit(MessageLevel::Debug, message);
    }

    /// `message` with its level prefix and no colour.
    pub fn render_plain(level: MessageLevel, message: &str) -> String {
        format!("{}{message}", level.prefix())
    }

    fn shows(&self, level: MessageLevel) -> bool {
        match level {
            MessageLevel::Warning | MessageLevel::Error => true,
            MessageLevel::Debug => self.verbosity == Verbosity::Verbose,
            MessageLevel::Info | MessageLevel::Success => self.verbosity > Verbosity::Quiet,
        }
    }

    fn emit(&self, level: MessageLevel, message: &str) {
        if !self.shows(level) {
            return;
        }

        let plain = Self::render_plain(level, message);
        let line = match level.color() {
            Some(code) if self.colored => format!("\x1b[{code}m{plain}\x1b[0m"),
            _ => plain,
        };

        if level.to_stderr() {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    /// Heading preceded by an empty line.
    pub fn section(&self, title: &str) {
        if self.should_print() {
            println!("\n{title}");
        }
    }

    /// Indented `label: value` line, verbose mode only.
    pub fn detail(&self, label: &str, value: &str) {
        if self.is_verbose() {
            println!("  {label}: {value}");
        }
    }

    /// Rewrite the current line with `[current/total] message`.
    ///
    /// The line is finished once `current` reaches `total`.
    pub fn progress(&self, current: usize, total: usize, message: Option<&str>) {
        if !self.should_print() {
            return;
        }

        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "\r  [{current}/{total}] {}", message.unwrap_or(""));
        if current >= total {
            let _ = writeln!(stdout);
        }
        let _ = stdout.flush();
    }

    /// Empty line, suppressed in quiet mode.
    pub fn blank_line(&self) {
        if self.should_print() {
            println!();
        }
    }

    /// `  <index>. message`, with a 1-based index.
    pub fn list_item(&self, index: usize, message: &str) {
        if self.should_print() {
            println!("  {index}. {message}");
        }
    }

    /// Ask `question` and read a yes/no answer from stdin.
    ///
    /// The prompt is printed even in quiet mode; callers decide whether
    /// asking is allowed. Anything but `y`/`yes` is a no.
    pub fn confirm(&self, question: &str) -> io::Result<bool> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{question} [y/N]: ")?;
        stdout.flush()?;
        drop(stdout);

        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        Ok(is_yes(&answer))
    }

    /// False in quiet mode.
    pub fn should_print(&self) -> bool {
        self.verbosity > Verbosity::Quiet
    }

    /// True in verbose mode.
    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// True in quiet mode.
    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(false, false)
    }
}

/// Whether a prompt answer means yes.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
