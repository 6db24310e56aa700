//! Terminal output for the release CLI.
//!
//! Progress and results for the person running the release go through
//! [`OutputManager`]; diagnostics go through `log`.

use owo_colors::{OwoColorize, Stream};
use std::io::{self, Write};

pub mod symbols {
    pub const SUCCESS: &str = "✓";
    pub const WARNING: &str = "⚠";
    pub const ARROW: &str = "→";
    pub const INFO: &str = "•";
}

/// Colored, verbosity-aware printer.
#[derive(Debug, Clone, Copy)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    /// Printed only with `--verbose`.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.is_verbose() {
            return Ok(());
        }
        writeln!(
            io::stdout(),
            "{} {}",
            symbols::INFO.if_supports_color(Stream::Stdout, |s| s.dimmed()),
            message.if_supports_color(Stream::Stdout, |s| s.dimmed())
        )
    }

    pub fn progress(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(
            io::stdout(),
            "{} {}",
            symbols::ARROW.if_supports_color(Stream::Stdout, |s| s.cyan()),
            message
        )
    }

    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(
            io::stdout(),
            "{} {}",
            symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
            message
        )
    }

    /// Warnings go to stderr and are printed even with `--quiet`.
    pub fn warn(&self, message: &str) -> io::Result<()> {
        writeln!(
            io::stderr(),
            "{} {}",
            symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
            message.if_supports_color(Stream::Stderr, |s| s.yellow())
        )
    }

    pub fn section(&self, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(
            io::stdout(),
            "\n{}",
            format!("=== {title} ===").if_supports_color(Stream::Stdout, |s| s.bold())
        )
    }

    pub fn indent(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(io::stdout(), "  {message}")
    }

    /// Command results (e.g. the source id) are printed regardless of `--quiet`.
    pub fn result(&self, value: &str) -> io::Result<()> {
        let mut stdout = io::stdout();
        write!(stdout, "{value}")?;
        stdout.flush()
    }
}
