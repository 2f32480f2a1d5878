//! Lexer for the Adorad programming language
//!
//! Handles tokenization including:
//! - Keywords and ASCII identifiers
//! - Integer (decimal/hex/binary/octal), float, char and string literals
//! - Interpolated `f"...{expr}..."` strings, emitted as section tokens around the embedded expression tokens
//! - Longest-match operators and punctuation (`==>` before `==` before `=`)
//! - `//` line comments, `/* */` block comments, a leading BOM and a `#!` first line
//!
//! The lexer is lazy: [`Lexer`] is an iterator and scans one token per `next()`. It never fails; rejected input
//! becomes a zero-width [`TokenKind::Invalid`] token plus a recorded diagnostic, and every step consumes at least one
//! byte, so iteration always ends with a single [`TokenKind::Eof`].
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token, StringPart)
//! - `strings` - String, char and f-string scanning
//! - `numbers` - Numeric literal scanning

mod numbers;
mod strings;
pub mod tokens;

pub use tokens::{PartPosition, StringPart, Token, TokenKind, keyword_id};

use std::iter::{FusedIterator, Peekable};
use std::str::CharIndices;

use crate::ast::Span;
use crate::diagnostics::Diagnostic;
use adorad_core::lang::operators::OperatorId;
use adorad_core::lang::punctuation::PunctuationId;

// ============================================================================
// LEXER STATE
// ----------------------------------------------------------------------------
// Interpolation stack (simplified):
//
// f"a {x + g({y})} b"
//   Head "a "  → push { depth 0 }
//   x + g ( {  → depth 1
//   y }        → depth 0
//   ) }        → depth 0 closes: pop, resume string → Tail " b"
// ============================================================================

/// Where a token being scanned begins.
#[derive(Debug, Clone, Copy)]
struct Position {
    offset: usize,
    line: u32,
    column: u32,
}

/// An open `{` inside an f-string, waiting for its matching `}`.
#[derive(Debug, Clone, Copy)]
struct Interpolation {
    brace_depth: usize,
    opened_at: Position,
}

/// Lexer for Adorad source code.
pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    current_pos: usize,
    line: u32,
    line_start: usize,
    interpolations: Vec<Interpolation>,
    diagnostics: Vec<Diagnostic>,
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        let mut lexer = Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            line: 1,
            line_start: 0,
            interpolations: Vec::new(),
            diagnostics: Vec::new(),
            finished: false,
        };
        lexer.skip_preamble();
        lexer
    }

    /// Diagnostics recorded so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    /// Character after the one [`Self::peek`] returns.
    fn peek_next(&self) -> Option<char> {
        let mut rest = self.source[self.current_pos..].chars();
        rest.next();
        rest.next()
    }

    fn advance(&mut self) -> Option<char> {
        let (idx, c) = self.chars.next()?;
        self.current_pos = idx + c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.line_start = self.current_pos;
        }
        Some(c)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn here(&self) -> Position {
        Position {
            offset: self.current_pos,
            line: self.line,
            column: (self.current_pos - self.line_start) as u32 + 1,
        }
    }

    fn span_from(&self, start: Position) -> Span {
        Span::new(start.offset, self.current_pos, start.line, start.column)
    }

    // ========================================================================
    // Token constructors
    // ========================================================================

    fn token(&self, kind: TokenKind, start: Position) -> Token {
        Token::new(kind, self.span_from(start))
    }

    fn op(&self, id: OperatorId, start: Position) -> Token {
        self.token(TokenKind::Operator(id), start)
    }

    fn punct(&self, id: PunctuationId, start: Position) -> Token {
        self.token(TokenKind::Punctuation(id), start)
    }

    /// Record a lex error covering `start..current` and return the zero-width marker token.
    fn invalid(&mut self, start: Position, message: impl Into<String>) -> Token {
        let span = self.span_from(start);
        self.diagnostics.push(Diagnostic::lex(message, span));
        self.invalid_marker(start)
    }

    /// Zero-width `Invalid` token for input whose diagnostic was already recorded.
    fn invalid_marker(&self, start: Position) -> Token {
        Token::new(
            TokenKind::Invalid,
            Span::new(start.offset, start.offset, start.line, start.column),
        )
    }

    /// Single-char operator, or a two-char one if the next char is listed in `compound`.
    fn operator(&mut self, start: Position, simple: OperatorId, compound: &[(char, OperatorId)]) -> Token {
        for &(next, id) in compound {
            if self.match_char(next) {
                return self.op(id, start);
            }
        }
        self.op(simple, start)
    }

    // ========================================================================
    // Trivia
    // ========================================================================

    fn skip_preamble(&mut self) {
        if self.peek() == Some('\u{feff}') {
            self.advance();
            self.line_start = self.current_pos;
        }
        if self.source[self.current_pos..].starts_with("#!") {
            while self.peek().is_some_and(|c| c != '\n') {
                self.advance();
            }
        }
    }

    /// Skip whitespace and comments. Returns an `Invalid` token for an unterminated block comment.
    fn skip_trivia(&mut self) -> Option<Token> {
        loop {
            match self.peek() {
                Some(c) if c.is_ascii_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_next() == Some('/') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                Some('/') if self.peek_next() == Some('*') => {
                    let start = self.here();
                    self.advance();
                    self.advance();
                    loop {
                        match self.advance() {
                            Some('*') if self.peek() == Some('/') => {
                                self.advance();
                                break;
                            }
                            Some(_) => {}
                            None => return Some(self.invalid(start, "unterminated block comment")),
                        }
                    }
                }
                _ => return None,
            }
        }
    }

    // ========================================================================
    // Token scanning
    // ========================================================================

    fn scan_token(&mut self) -> Token {
        let start = self.here();
        let Some(c) = self.advance() else {
            return self.token(TokenKind::Eof, start);
        };

        match c {
            '(' => self.punct(PunctuationId::LParen, start),
            ')' => self.punct(PunctuationId::RParen, start),
            '[' => self.punct(PunctuationId::LBracket, start),
            ']' => self.punct(PunctuationId::RBracket, start),
            '{' => {
                if let Some(open) = self.interpolations.last_mut() {
                    open.brace_depth += 1;
                }
                self.punct(PunctuationId::LBrace, start)
            }
            '}' => self.close_brace(start),
            ',' => self.punct(PunctuationId::Comma, start),
            ';' => self.punct(PunctuationId::Semicolon, start),
            '?' => self.punct(PunctuationId::Question, start),
            '@' => self.punct(PunctuationId::At, start),
            '.' => {
                if self.peek() == Some('.') && self.peek_next() == Some('.') {
                    self.advance();
                    self.advance();
                    self.punct(PunctuationId::Ellipsis, start)
                } else {
                    self.punct(PunctuationId::Dot, start)
                }
            }
            ':' => {
                if self.match_char(':') {
                    self.punct(PunctuationId::ColonColon, start)
                } else if self.match_char('=') {
                    self.op(OperatorId::ColonEq, start)
                } else {
                    self.punct(PunctuationId::Colon, start)
                }
            }
            '=' => {
                if self.match_char('=') {
                    if self.match_char('>') {
                        self.punct(PunctuationId::MatchArrow, start)
                    } else {
                        self.op(OperatorId::EqEq, start)
                    }
                } else if self.match_char('>') {
                    self.punct(PunctuationId::FatArrow, start)
                } else {
                    self.op(OperatorId::Eq, start)
                }
            }
            '-' => {
                if self.match_char('>') {
                    self.punct(PunctuationId::Arrow, start)
                } else {
                    self.operator(start, OperatorId::Minus, &[('=', OperatorId::MinusEq)])
                }
            }
            '!' => self.operator(start, OperatorId::Bang, &[('=', OperatorId::NotEq)]),
            '<' => {
                if self.match_char('<') {
                    self.operator(start, OperatorId::Shl, &[('=', OperatorId::ShlEq)])
                } else {
                    self.operator(start, OperatorId::Lt, &[('=', OperatorId::LtEq)])
                }
            }
            // `>>` and `>>=` are left to the parser so `List<Map<K, V>>` closes cleanly.
            '>' => self.operator(start, OperatorId::Gt, &[('=', OperatorId::GtEq)]),
            '+' => self.operator(start, OperatorId::Plus, &[('=', OperatorId::PlusEq)]),
            '*' => self.operator(
                start,
                OperatorId::Star,
                &[('*', OperatorId::StarStar), ('=', OperatorId::StarEq)],
            ),
            '/' => self.operator(start, OperatorId::Slash, &[('=', OperatorId::SlashEq)]),
            '%' => self.operator(start, OperatorId::Percent, &[('=', OperatorId::PercentEq)]),
            '&' => self.operator(
                start,
                OperatorId::Amp,
                &[('&', OperatorId::AndAnd), ('=', OperatorId::AmpEq)],
            ),
            '|' => self.operator(
                start,
                OperatorId::Pipe,
                &[('|', OperatorId::OrOr), ('=', OperatorId::PipeEq)],
            ),
            '^' => self.operator(start, OperatorId::Caret, &[('=', OperatorId::CaretEq)]),
            '~' => self.op(OperatorId::Tilde, start),
            '"' => self.scan_string(start),
            '\'' => self.scan_char(start),
            'f' if self.peek() == Some('"') => {
                self.advance();
                self.scan_fstring_section(start, false)
            }
            c if c.is_ascii_digit() => self.scan_number(start, c),
            c if is_ident_start(c) => self.scan_identifier(start),
            c if c.is_alphabetic() => {
                self.skip_word();
                self.invalid(start, "identifiers must be ASCII")
            }
            c => self.invalid(start, format!("unexpected character `{}`", c.escape_default())),
        }
    }

    /// `}` either closes an ordinary brace or ends the innermost f-string interpolation.
    fn close_brace(&mut self, start: Position) -> Token {
        match self.interpolations.last_mut() {
            Some(open) if open.brace_depth == 0 => {
                self.interpolations.pop();
                self.scan_fstring_section(start, true)
            }
            Some(open) => {
                open.brace_depth -= 1;
                self.punct(PunctuationId::RBrace, start)
            }
            None => self.punct(PunctuationId::RBrace, start),
        }
    }

    fn scan_identifier(&mut self, start: Position) -> Token {
        while self.peek().is_some_and(is_ident_continue) {
            self.advance();
        }
        if self.peek().is_some_and(char::is_alphanumeric) {
            self.skip_word();
            return self.invalid(start, "identifiers must be ASCII");
        }

        let text = &self.source[start.offset..self.current_pos];
        let kind = match keyword_id(text) {
            Some(id) => TokenKind::Keyword(id),
            None => TokenKind::Ident(text.to_string()),
        };
        self.token(kind, start)
    }

    /// Consume the rest of a word, including non-ASCII letters.
    fn skip_word(&mut self) {
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.advance();
        }
    }

    fn unterminated_interpolation(&mut self) -> Option<Token> {
        let outermost = *self.interpolations.first()?;
        self.interpolations.clear();
        let span = self.span_from(outermost.opened_at);
        self.diagnostics.push(
            Diagnostic::lex("unterminated interpolation in f-string", span)
                .with_hint("close the embedded expression with `}` and the string with `\"`"),
        );
        Some(self.invalid_marker(self.here()))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        if let Some(invalid) = self.skip_trivia() {
            return Some(invalid);
        }
        if self.is_at_end() {
            if let Some(invalid) = self.unterminated_interpolation() {
                return Some(invalid);
            }
            self.finished = true;
            let start = self.here();
            return Some(self.token(TokenKind::Eof, start));
        }
        Some(self.scan_token())
    }
}

impl FusedIterator for Lexer<'_> {}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Lazily tokenize `source`. The returned iterator ends with exactly one `Eof` token.
pub fn tokenize(source: &str) -> Lexer<'_> {
    Lexer::new(source)
}

/// Tokenize `source` eagerly.
///
/// ## Returns
/// - All tokens (ending with `Eof`) and the lexical diagnostics recorded along the way.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut lexer = Lexer::new(source);
    let tokens: Vec<Token> = lexer.by_ref().collect();
    let diagnostics = lexer.into_diagnostics();
    tracing::debug!(tokens = tokens.len(), diagnostics = diagnostics.len(), "lexed source");
    (tokens, diagnostics)
}
