//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use crate::diagnostics::{self, Diagnostic};
use crate::format::{format_diff, format_source};
use crate::report::Reporter;
use crate::{lexer, parser};

use super::{CliError, CliResult, ExitCode};

/// File extension of Adorad sources.
pub const SOURCE_EXTENSION: &str = "ad";

/// Maximum source file size (100 MB)
///
/// Files larger than this are rejected to prevent out-of-memory conditions.
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// Read a source file, rejecting anything over `MAX_SOURCE_SIZE`.
///
/// ## Errors
///
/// Returns an error if the file cannot be accessed or read, or is too large.
pub fn read_source(file_path: &Path) -> CliResult<String> {
    let display = file_path.display();
    let metadata =
        fs::metadata(file_path).map_err(|e| CliError::failure(format!("Cannot access file '{display}': {e}")))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{display}' is too large ({} bytes, max {MAX_SOURCE_SIZE} bytes)",
            metadata.len(),
        )));
    }

    fs::read_to_string(file_path).map_err(|e| CliError::failure(format!("Error reading file '{display}': {e}")))
}

/// Print diagnostics for one file to stderr.
fn report(file_path: &Path, source: &str, diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    let name = file_path.display().to_string();
    let reporter = Reporter::new(&name, source, std::io::stderr().is_terminal());
    eprint!("{}", reporter.render_all(diagnostics));
}

/// Lex and display tokens.
pub fn lex_file(file_path: &Path) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let (tokens, diagnostics) = lexer::lex(&source);

    for tok in &tokens {
        println!("{:>4}:{:<4} {}", tok.span.line, tok.span.column, tok.describe());
    }
    report(file_path, &source, &diagnostics);

    if diagnostics::has_errors(&diagnostics) {
        return Err(CliError::failure(format!("{} lexical error(s)", diagnostics.len())));
    }
    Ok(ExitCode::SUCCESS)
}

/// Parse and display AST.
pub fn parse_file(file_path: &Path) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let output = parser::parse_with_diagnostics(&source);

    println!("{:#?}", output.program);
    report(file_path, &source, &output.diagnostics);

    if output.has_errors() {
        return Err(CliError::failure("parse failed"));
    }
    Ok(ExitCode::SUCCESS)
}

/// Parse every file and report its diagnostics. Fails if any file has an error.
pub fn check_files(files: &[PathBuf]) -> CliResult<ExitCode> {
    let mut error_count = 0;
    let mut warning_count = 0;

    for file_path in files {
        let source = read_source(file_path)?;
        let output = parser::parse_with_diagnostics(&source);
        tracing::debug!(file = %file_path.display(), diagnostics = output.diagnostics.len(), "checked");

        report(file_path, &source, &output.diagnostics);
        let errors = output.diagnostics.iter().filter(|d| d.is_error()).count();
        error_count += errors;
        warning_count += output.diagnostics.len() - errors;
    }

    if error_count > 0 {
        return Err(CliError::failure(format!(
            "\n{error_count} error(s), {warning_count} warning(s) in {} file(s)",
            files.len()
        )));
    }

    println!("✓ {} file(s) checked, {warning_count} warning(s)", files.len());
    Ok(ExitCode::SUCCESS)
}

/// Format Adorad source files.
pub fn format_files(path: &Path, check_mode: bool, diff_mode: bool) -> CliResult<ExitCode> {
    let files = collect_source_files(path);

    if files.is_empty() {
        return Err(CliError::failure(format!("No .{SOURCE_EXTENSION} files found")));
    }

    let mut needs_formatting = false;
    let mut formatted_count = 0;
    let mut error_count = 0;

    for file_path in &files {
        let source = match fs::read_to_string(file_path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error reading {}: {e}", file_path.display());
                error_count += 1;
                continue;
            }
        };

        match format_source(&source) {
            Ok(formatted) => {
                let changed = source != formatted;

                if diff_mode && changed {
                    println!("--- {}", file_path.display());
                    if let Ok(Some(diff)) = format_diff(&source) {
                        print!("{diff}");
                    }
                    println!();
                }

                if check_mode || diff_mode {
                    if changed {
                        if check_mode {
                            println!("Would reformat: {}", file_path.display());
                        }
                        needs_formatting = true;
                    }
                } else if changed {
                    if let Err(e) = fs::write(file_path, &formatted) {
                        eprintln!("Error writing {}: {e}", file_path.display());
                        error_count += 1;
                    } else {
                        println!("Formatted: {}", file_path.display());
                        formatted_count += 1;
                    }
                }
            }
            Err(e) => {
                eprintln!("Error formatting {}: {e}", file_path.display());
                report(file_path, &source, e.diagnostics());
                error_count += 1;
            }
        }
    }

    if check_mode || diff_mode {
        if needs_formatting {
            let msg = if diff_mode { "need formatting" } else { "would be reformatted" };
            return Err(CliError::failure(format!("\nsome of {} file(s) {msg}", files.len())));
        }
        println!("✓ {} file(s) already formatted", files.len());
    } else {
        println!("\n✓ {formatted_count} file(s) formatted, {error_count} error(s)");
    }

    if error_count > 0 {
        return Err(CliError::new("", ExitCode::FAILURE));
    }

    Ok(ExitCode::SUCCESS)
}

/// Source files under `path`, sorted. Hidden directories and `target` are skipped.
pub fn collect_source_files(path: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if path.is_file() {
        if path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION) {
            files.push(path.to_path_buf());
        }
    } else if path.is_dir() {
        if let Ok(entries) = fs::read_dir(path) {
            for entry in entries.flatten() {
                let entry_path = entry.path();
                if entry_path.is_dir() {
                    let name = entry_path.file_name().and_then(|n| n.to_str()).unwrap_or("");
                    if !name.starts_with('.') && name != "target" {
                        files.extend(collect_source_files(&entry_path));
                    }
                } else if entry_path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION) {
                    files.push(entry_path);
                }
            }
        }
    }

    files.sort();
    files
}
