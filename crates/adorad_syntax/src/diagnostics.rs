//! Structured diagnostics produced by the lexer and parser.
//!
//! A [`Diagnostic`] carries a severity, a taxonomy [`DiagnosticKind`], a message, the offending [`Span`] and an
//! optional recovery hint. Rendering to a terminal is left to the caller; [`Diagnostic::to_miette`] bridges to
//! `miette` for that.
//!
//! ## Notes
//! - Lex and syntax diagnostics are errors and block a successful parse.
//! - Semantic diagnostics (duplicate globals, unknown or repeated modifiers) are warnings and never do.

use std::fmt;

use miette::{LabeledSpan, MietteDiagnostic};

use crate::ast::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Where a diagnostic came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Unrecognized input, unterminated literal or comment.
    Lex,
    /// Unexpected or missing token, malformed generic/where clause, misplaced `default` arm.
    Syntax,
    /// Duplicate global name, unknown or duplicate modifier.
    Semantic,
}

impl DiagnosticKind {
    /// Stable diagnostic code, e.g. `adorad::syntax`.
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::Lex => "adorad::lex",
            DiagnosticKind::Syntax => "adorad::syntax",
            DiagnosticKind::Semantic => "adorad::semantic",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::Lex | DiagnosticKind::Syntax => Severity::Error,
            DiagnosticKind::Semantic => Severity::Warning,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Lex => write!(f, "lexical error"),
            DiagnosticKind::Syntax => write!(f, "syntax error"),
            DiagnosticKind::Semantic => write!(f, "warning"),
        }
    }
}

/// A located message from the front end.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{severity}: {message}")]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Span,
    pub hint: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: kind.severity(),
            kind,
            message: message.into(),
            span,
            hint: None,
        }
    }

    pub fn lex(message: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::Lex, message, span)
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::Syntax, message, span)
    }

    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::Semantic, message, span)
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Convert into a `miette` diagnostic labelled at this diagnostic's span.
    pub fn to_miette(&self) -> MietteDiagnostic {
        let severity = match self.severity {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
        };
        let label = LabeledSpan::at(self.span.start..self.span.end, self.kind.to_string());
        let diag = MietteDiagnostic::new(self.message.clone())
            .with_code(self.kind.code())
            .with_severity(severity)
            .with_label(label);
        match &self.hint {
            Some(hint) => diag.with_help(hint.clone()),
            None => diag,
        }
    }

    /// One-line `line:col: severity: message` rendering without source context.
    pub fn short(&self) -> String {
        format!("{}:{}: {}: {}", self.span.line, self.span.column, self.severity, self.message)
    }
}

impl From<&Diagnostic> for MietteDiagnostic {
    fn from(diag: &Diagnostic) -> Self {
        diag.to_miette()
    }
}

/// Return `true` if any diagnostic is error-severity.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

/// Order by source position. Stable, so diagnostics at the same offset keep emission order.
pub fn sort_by_position(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by_key(|d| (d.span.start, d.span.end));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_drives_severity() {
        let span = Span::new(0, 1, 1, 1);
        assert!(Diagnostic::lex("bad byte", span).is_error());
        assert!(Diagnostic::syntax("bad token", span).is_error());
        assert!(!Diagnostic::warning("dup", span).is_error());
    }

    #[test]
    fn test_display_and_short_form() {
        let diag = Diagnostic::syntax("expected `}`", Span::new(10, 11, 3, 7)).with_hint("close the block");
        assert_eq!(diag.to_string(), "error: expected `}`");
        assert_eq!(diag.short(), "3:7: error: expected `}`");
        assert_eq!(diag.hint.as_deref(), Some("close the block"));
    }

    #[test]
    fn test_sort_is_stable_by_position() {
        let mut diags = vec![
            Diagnostic::warning("second", Span::new(5, 6, 1, 6)),
            Diagnostic::syntax("first", Span::new(1, 2, 1, 2)),
            Diagnostic::syntax("third", Span::new(5, 6, 1, 6)),
        ];
        sort_by_position(&mut diags);
        let order: Vec<&str> = diags.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(order, ["first", "second", "third"]);
        assert!(has_errors(&diags));
    }

    #[test]
    fn test_miette_conversion_keeps_code_and_help() {
        use miette::Diagnostic as _;

        let diag = Diagnostic::warning("duplicate global `x`", Span::new(4, 5, 1, 5)).with_hint("first wins");
        let converted = diag.to_miette();
        assert_eq!(converted.code().map(|c| c.to_string()).as_deref(), Some("adorad::semantic"));
        assert_eq!(converted.help().map(|h| h.to_string()).as_deref(), Some("first wins"));
        assert_eq!(converted.severity(), Some(miette::Severity::Warning));
    }
}
