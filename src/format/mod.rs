//! Adorad Code Formatter
//!
//! This module renders an AST back to canonical Adorad source:
//! - 4-space indentation (configurable)
//! - one blank line between top-level declarations, none between consecutive imports
//! - every block braced, one statement per line
//!
//! Formatting a program and parsing the result yields the same tree, spans ignored.

mod config;
mod formatter;
mod writer;

pub use config::FormatConfig;
pub use formatter::Formatter;

use crate::diagnostics::Diagnostic;
use crate::parser;

/// Formatting refuses source that does not parse cleanly.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("cannot format source with {error_count} error(s)")]
    Invalid {
        error_count: usize,
        /// Every diagnostic from the failed parse, warnings included.
        diagnostics: Vec<Diagnostic>,
    },
}

impl FormatError {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            FormatError::Invalid { diagnostics, .. } => diagnostics,
        }
    }
}

/// Format Adorad source code with default settings
pub fn format_source(source: &str) -> Result<String, FormatError> {
    format_source_with_config(source, FormatConfig::default())
}

/// Format Adorad source code with custom configuration
pub fn format_source_with_config(source: &str, config: FormatConfig) -> Result<String, FormatError> {
    let program = parser::parse(source).map_err(|diagnostics| FormatError::Invalid {
        error_count: diagnostics.iter().filter(|d| d.is_error()).count(),
        diagnostics,
    })?;

    let formatter = Formatter::new(config);
    Ok(formatter.format(&program))
}

/// Check if source code is already formatted
pub fn check_formatted(source: &str) -> Result<bool, FormatError> {
    let formatted = format_source(source)?;
    Ok(source == formatted)
}

/// Line-by-line diff between `source` and its formatted form, or `None` if nothing changes.
pub fn format_diff(source: &str) -> Result<Option<String>, FormatError> {
    let formatted = format_source(source)?;

    if source == formatted {
        return Ok(None);
    }

    let mut diff = String::new();
    let original_lines: Vec<&str> = source.lines().collect();
    let formatted_lines: Vec<&str> = formatted.lines().collect();

    let max_lines = original_lines.len().max(formatted_lines.len());

    for i in 0..max_lines {
        let orig = original_lines.get(i).copied();
        let fmt = formatted_lines.get(i).copied();

        if orig != fmt {
            if let Some(orig) = orig {
                diff.push_str(&format!("-{:4} | {}\n", i + 1, orig));
            }
            if let Some(fmt) = fmt {
                diff.push_str(&format!("+{:4} | {}\n", i + 1, fmt));
            }
        }
    }

    Ok(Some(diff))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSY: &str = "func   add(a:u32,b:u32)->u32{return a+b}";
    const CLEAN: &str = "func add(a: u32, b: u32) -> u32 {\n    return a + b\n}\n";

    #[test]
    fn test_format_source_normalizes_layout() {
        assert_eq!(format_source(MESSY).unwrap(), CLEAN);
    }

    #[test]
    fn test_format_source_empty() {
        assert_eq!(format_source("").unwrap(), "");
    }

    #[test]
    fn test_format_source_invalid_syntax() {
        let err = format_source("func foo(").unwrap_err();
        let FormatError::Invalid { error_count, .. } = &err;
        assert_eq!(*error_count, 1);
        assert!(err.diagnostics().iter().any(|d| d.is_error()));
    }

    #[test]
    fn test_format_source_with_custom_config() {
        let config = FormatConfig::new().with_indent_width(2);
        let formatted = format_source_with_config(MESSY, config).unwrap();
        assert!(formatted.contains("\n  return a + b\n"));
    }

    #[test]
    fn test_check_formatted() {
        assert!(check_formatted(CLEAN).unwrap());
        assert!(!check_formatted(MESSY).unwrap());
        assert!(check_formatted("func foo(").is_err());
    }

    #[test]
    fn test_format_diff() {
        assert_eq!(format_diff(CLEAN).unwrap(), None);
        let diff = format_diff(MESSY).unwrap().expect("a diff");
        assert!(diff.starts_with("-   1 | func   add"));
        assert!(diff.contains("+   2 |     return a + b"));
    }
}
