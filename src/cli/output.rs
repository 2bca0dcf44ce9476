//! Terminal output for CLI commands.
//!
//! Errors always go to stderr; everything else goes to stdout and is
//! suppressed in quiet mode.

use std::io;

use console::{Style, Term};

use crate::validation::{ValidationItem, ValidationResult};

/// Styled terminal writer honoring `--quiet`.
#[derive(Debug, Clone)]
pub struct OutputManager {
    quiet: bool,
    stdout: Term,
    stderr: Term,
}

impl OutputManager {
    /// Creates an output manager
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            stdout: Term::stdout(),
            stderr: Term::stderr(),
        }
    }

    fn line(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.stdout.write_line(text)
    }

    /// Print section header
    pub fn section(&self, title: &str) -> io::Result<()> {
        self.line(&Style::new().bold().apply_to(title).to_string())
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> io::Result<()> {
        self.line(&format!("{} {}", Style::new().cyan().apply_to("→"), message))
    }

    /// Print success message
    pub fn success(&self, message: &str) -> io::Result<()> {
        self.line(&format!("{} {}", Style::new().green().apply_to("✓"), message))
    }

    /// Print warning message
    pub fn warn(&self, message: &str) -> io::Result<()> {
        self.line(&format!("{} {}", Style::new().yellow().apply_to("⚠"), message))
    }

    /// Print error message (never suppressed)
    pub fn error(&self, message: &str) -> io::Result<()> {
        self.stderr
            .write_line(&format!("{} {}", Style::new().red().apply_to("✗"), message))
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> io::Result<()> {
        self.line(&format!("  {message}"))
    }

    /// Print every error and warning of a validation result
    pub fn validation(&self, result: &ValidationResult) -> io::Result<()> {
        for item in &result.errors {
            self.error(&format_item(item))?;
            if let Some(suggestion) = &item.suggestion {
                self.stderr.write_line(&format!(
                    "    {}",
                    Style::new().dim().apply_to(suggestion)
                ))?;
            }
        }
        for item in &result.warnings {
            self.warn(&format_item(item))?;
            if let Some(suggestion) = &item.suggestion {
                self.line(&format!("    {}", Style::new().dim().apply_to(suggestion)))?;
            }
        }
        Ok(())
    }
}

/// `[CODE] message (file)`
fn format_item(item: &ValidationItem) -> String {
    match &item.file {
        Some(file) => format!("[{}] {} ({})", item.code, item.message, file.display()),
        None => format!("[{}] {}", item.code, item.message),
    }
}
