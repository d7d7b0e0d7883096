//! Terminal output with color and verbosity control.

use colored::Colorize;
use std::io::{self, Write};

/// Writes user-facing progress to stdout and problems to stderr.
///
/// Quiet mode suppresses everything except errors; verbose mode adds
/// detail lines.
#[derive(Debug, Clone, Copy)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    /// Creates an output manager.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Prints a detail line in verbose mode.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if self.verbose && !self.quiet {
            writeln!(io::stdout(), "{}", message.dimmed())?;
        }
        Ok(())
    }

    /// Prints a progress step.
    pub fn progress(&self, message: &str) -> io::Result<()> {
        if !self.quiet {
            writeln!(io::stdout(), "{} {}", ">>".cyan().bold(), message)?;
        }
        Ok(())
    }

    /// Prints a success line.
    pub fn success(&self, message: &str) -> io::Result<()> {
        if !self.quiet {
            writeln!(io::stdout(), "{} {}", "OK".green().bold(), message)?;
        }
        Ok(())
    }

    /// Prints a warning to stderr.
    pub fn warn(&self, message: &str) -> io::Result<()> {
        if !self.quiet {
            writeln!(io::stderr(), "{}: {}", "warning".yellow().bold(), message)?;
        }
        Ok(())
    }

    /// Prints an error to stderr, even in quiet mode.
    pub fn error(&self, message: &str) -> io::Result<()> {
        writeln!(io::stderr(), "{}: {}", "error".red().bold(), message)
    }

    /// Prints a section header.
    pub fn section(&self, title: &str) -> io::Result<()> {
        if !self.quiet {
            writeln!(io::stdout())?;
            writeln!(io::stdout(), "{}", title.bold().underline())?;
        }
        Ok(())
    }

    /// Prints an indented line.
    pub fn indent(&self, message: &str) -> io::Result<()> {
        if !self.quiet {
            writeln!(io::stdout(), "  {}", message)?;
        }
        Ok(())
    }

    /// Prints an indented line to stderr, even in quiet mode.
    pub fn indent_error(&self, message: &str) -> io::Result<()> {
        writeln!(io::stderr(), "  {}", message)
    }
}
