//! Diagnostic reporting with source context
//!
//! Diagnostics are rendered through `miette`'s graphical handler. If rendering fails, the plain
//! `file:line:col: severity: message` form is used instead.

use miette::{GraphicalReportHandler, GraphicalTheme, NamedSource, Report};

use crate::diagnostics::Diagnostic;

/// Renders diagnostics for one source file.
pub struct Reporter<'a> {
    file_name: &'a str,
    source: &'a str,
    handler: GraphicalReportHandler,
}

impl<'a> Reporter<'a> {
    /// `colored` selects the ANSI theme; plain unicode otherwise.
    pub fn new(file_name: &'a str, source: &'a str, colored: bool) -> Self {
        let theme = if colored {
            GraphicalTheme::unicode()
        } else {
            GraphicalTheme::unicode_nocolor()
        };
        Self {
            file_name,
            source,
            handler: GraphicalReportHandler::new_themed(theme),
        }
    }

    /// Render one diagnostic with a snippet of the offending source.
    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let report = Report::new(diagnostic.to_miette())
            .with_source_code(NamedSource::new(self.file_name, self.source.to_string()));

        let mut out = String::new();
        match self.handler.render_report(&mut out, &*report) {
            Ok(()) => out,
            Err(_) => {
                tracing::debug!(file = self.file_name, "graphical rendering failed, using short form");
                format!("{}\n", self.short(diagnostic))
            }
        }
    }

    /// Render every diagnostic, in order, separated by blank lines.
    pub fn render_all(&self, diagnostics: &[Diagnostic]) -> String {
        diagnostics
            .iter()
            .map(|d| self.render(d))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// `file:line:col: severity: message`
    pub fn short(&self, diagnostic: &Diagnostic) -> String {
        format!("{}:{}", self.file_name, diagnostic.short())
    }
}
