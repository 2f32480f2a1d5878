//! CLI module for the Adorad front end
//!
//! This module provides the command-line interface.
//!
//! ## Commands
//!
//! - `check <file>...` - Parse files and report diagnostics
//! - `fmt <file|dir>` - Format Adorad source files
//! - `vocab [--output <file>]` - Print the vocabulary reference generated from the registries
//! - `--lex <file>` / `--parse <file>` - Dump tokens or the AST (debug)
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;
pub mod vocab;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// The Adorad programming language front end
#[derive(Parser, Debug)]
#[command(name = "adorad")]
#[command(version = VERSION)]
#[command(about = "Lexer, parser and formatter for the Adorad programming language", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// File to check (default action when no subcommand given)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    // Debug/development flags
    /// Tokenize only (debug)
    #[arg(long = "lex", value_name = "FILE", conflicts_with = "file")]
    pub lex_file: Option<PathBuf>,

    /// Parse only and print the AST (debug)
    #[arg(long = "parse", value_name = "FILE", conflicts_with = "file")]
    pub parse_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse source files and report diagnostics
    Check {
        /// Source files to check
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },

    /// Format Adorad source files
    Fmt {
        /// File or directory to format
        #[arg(value_name = "PATH", default_value = ".")]
        path: PathBuf,
        /// Check formatting without modifying files
        #[arg(long)]
        check: bool,
        /// Show diff of formatting changes
        #[arg(long)]
        diff: bool,
    },

    /// Print the keyword, operator, punctuation and attribute reference as Markdown
    Vocab {
        /// Write the reference to this file instead of stdout
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code != ExitCode::SUCCESS {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    // Handle debug flags first
    if let Some(file) = cli.lex_file {
        return commands::lex_file(&file);
    }
    if let Some(file) = cli.parse_file {
        return commands::parse_file(&file);
    }

    match cli.command {
        Some(Command::Check { files }) => commands::check_files(&files),
        Some(Command::Fmt { path, check, diff }) => commands::format_files(&path, check, diff),
        Some(Command::Vocab { output }) => vocab::vocab_command(output.as_deref()),
        None => match cli.file {
            Some(file) => commands::check_files(&[file]),
            // No command and no file - show help
            None => Err(CliError::failure("Usage: adorad [FILE] | adorad <check|fmt|vocab> ... (see --help)")),
        },
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::try_parse_from(["adorad", "check", "a.ad", "b.ad"]).unwrap();
        match cli.command {
            Some(Command::Check { files }) => assert_eq!(files.len(), 2),
            other => panic!("Expected Check command, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_check_requires_a_file() {
        assert!(Cli::try_parse_from(["adorad", "check"]).is_err());
    }

    #[test]
    fn test_cli_parse_fmt() {
        let cli = Cli::try_parse_from(["adorad", "fmt", "src/", "--check"]).unwrap();
        if let Some(Command::Fmt { check, diff, path }) = cli.command {
            assert!(check);
            assert!(!diff);
            assert_eq!(path, PathBuf::from("src/"));
        } else {
            panic!("Expected Fmt command");
        }
    }

    #[test]
    fn test_cli_parse_vocab() {
        let cli = Cli::try_parse_from(["adorad", "vocab"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Vocab { output: None })));

        let cli = Cli::try_parse_from(["adorad", "vocab", "-o", "docs/vocab.md"]).unwrap();
        match cli.command {
            Some(Command::Vocab { output }) => assert_eq!(output, Some(PathBuf::from("docs/vocab.md"))),
            other => panic!("Expected Vocab command, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_debug_flags() {
        let cli = Cli::try_parse_from(["adorad", "--lex", "test.ad"]).unwrap();
        assert!(cli.lex_file.is_some());

        let cli = Cli::try_parse_from(["adorad", "--parse", "test.ad"]).unwrap();
        assert!(cli.parse_file.is_some());

        assert!(Cli::try_parse_from(["adorad", "--lex", "a.ad", "b.ad"]).is_err());
    }

    #[test]
    fn test_execute_without_input_fails() {
        let cli = Cli::try_parse_from(["adorad"]).unwrap();
        let err = execute(cli).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
    }
}
