//! CLI console utilities

use colored::*;

/// Status output for the CLI; answers go to stdout, everything else to stderr
pub struct CliConsole;

impl CliConsole {
    /// Print a success message
    pub fn success(message: &str) {
        eprintln!("{} {}", "✓".green().bold(), message.green());
    }

    /// Print a warning message
    pub fn warn(message: &str) {
        eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    }
}
