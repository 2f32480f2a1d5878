/// Parser core types and entrypoint.
///
/// This chunk defines the [`Parser`] type and its top-level `parse()` loop, plus the small internal types shared
/// across the other parser chunks.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module while avoiding a single “god file”.
type ParseResult<T> = Result<T, Diagnostic>;

/// Cursor position plus diagnostic count, restored together when a speculative parse fails.
#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    mark: Mark,
    diagnostics_len: usize,
}

/// States of the `match` arm loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchState {
    /// Before an arm, or before the closing `}`.
    ExpectArms,
    /// On a `when` arm.
    InArm,
    /// On a `default` arm; only `}` may follow it.
    ExpectDefaultOrEnd,
    Done,
}

/// Parser state.
///
/// ## Notes
/// - Single pass. Recovers at declaration boundaries and, inside blocks, at statement boundaries.
/// - Parser diagnostics are kept apart from the lexer's until the end, so a rollback never drops a lexical error.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    diagnostics: Vec<Diagnostic>,
    /// First binding of each global name, program-wide.
    globals_seen: HashMap<Ident, Span>,
}

impl<'a> Parser<'a> {
    /// Create a parser reading tokens from `cursor`.
    pub fn from_cursor(cursor: Cursor<'a>) -> Self {
        Self {
            cursor,
            diagnostics: Vec::new(),
            globals_seen: HashMap::new(),
        }
    }

    /// Parse every top-level declaration.
    ///
    /// ## Returns
    /// - The program built from every declaration that parsed, and all lexer and parser diagnostics ordered by
    ///   source position.
    pub fn parse(mut self) -> (Program, Vec<Diagnostic>) {
        let mut declarations = Vec::new();

        loop {
            while self.match_punct(PunctuationId::Semicolon) {}
            if self.is_at_end() {
                break;
            }
            let start = self.cursor.mark();
            match self.declaration() {
                Ok(decl) => declarations.push(decl),
                Err(err) => {
                    self.report(err);
                    self.synchronize_declaration(start);
                }
            }
        }

        let Parser {
            cursor,
            diagnostics: mut parser_diagnostics,
            ..
        } = self;
        let mut diagnostics = cursor.into_diagnostics();
        diagnostics.append(&mut parser_diagnostics);
        diagnostics::sort_by_position(&mut diagnostics);

        (Program { declarations }, diagnostics)
    }
}
