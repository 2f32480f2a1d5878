/// Everything one parse produced: the (possibly partial) program and all diagnostics in source order.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutput {
    /// Return `true` if any diagnostic is error-severity.
    pub fn has_errors(&self) -> bool {
        diagnostics::has_errors(&self.diagnostics)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    /// `Ok` with the program unless an error was recorded. Warnings are dropped on success.
    pub fn into_result(self) -> Result<Program, Vec<Diagnostic>> {
        if self.has_errors() {
            Err(self.diagnostics)
        } else {
            Ok(self.program)
        }
    }
}

/// Parse source text into an AST [`Program`].
///
/// This is the main public entrypoint for parsing.
///
/// ## Errors
/// Returns every diagnostic (warnings included), ordered by position, if any of them is an error.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn parse(source: &str) -> Result<Program, Vec<Diagnostic>> {
    parse_with_diagnostics(source).into_result()
}

/// Parse source text, keeping the partial program and warnings even when errors occurred.
pub fn parse_with_diagnostics(source: &str) -> ParseOutput {
    let (program, diagnostics) = parse_program(Cursor::new(source));
    tracing::debug!(
        declarations = program.declarations.len(),
        diagnostics = diagnostics.len(),
        "parsed source"
    );
    ParseOutput { program, diagnostics }
}

/// Parse every declaration reachable from `cursor`.
pub fn parse_program(cursor: Cursor<'_>) -> (Program, Vec<Diagnostic>) {
    Parser::from_cursor(cursor).parse()
}
