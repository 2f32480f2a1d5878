//! Buffered token cursor over the lazy lexer.
//!
//! The parser needs unbounded lookahead and backtracking for exactly one construct (telling `f<T>(x)` apart from
//! `a < b`). Tokens are pulled from the lexer on demand and kept in a buffer, so a [`Mark`] can rewind to any earlier
//! position without re-lexing.
//!
//! ## Notes
//! - The buffer always holds the token at the current position. Once `Eof` has been buffered, peeking past it keeps
//!   returning `Eof`.
//! - Lexer diagnostics live in the lexer and are unaffected by rewinding.

use crate::diagnostics::Diagnostic;
use crate::lexer::{Lexer, Token, TokenKind};

/// A saved cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Mark(usize);

pub struct Cursor<'a> {
    lexer: Lexer<'a>,
    buffer: Vec<Token>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut cursor = Self {
            lexer: Lexer::new(source),
            buffer: Vec::new(),
            pos: 0,
        };
        cursor.fill(0);
        cursor
    }

    /// Make sure the buffer reaches index `index`, or ends with `Eof`.
    fn fill(&mut self, index: usize) {
        while self.buffer.len() <= index {
            if self.buffer.last().is_some_and(|t| t.kind.is_eof()) {
                return;
            }
            match self.lexer.next() {
                Some(token) => self.buffer.push(token),
                None => {
                    let span = self.buffer.last().map(|t| t.span.collapsed()).unwrap_or_default();
                    self.buffer.push(Token::new(TokenKind::Eof, span));
                }
            }
        }
    }

    /// The token at the current position.
    pub fn current(&self) -> &Token {
        &self.buffer[self.pos]
    }

    /// The token `k` positions ahead; `peek(0)` is the current token.
    pub fn peek(&mut self, k: usize) -> &Token {
        let index = self.pos + k;
        self.fill(index);
        let index = index.min(self.buffer.len() - 1);
        &self.buffer[index]
    }

    /// Move past the current token and return it. Never moves past `Eof`.
    pub fn advance(&mut self) -> &Token {
        let index = self.pos;
        if !self.buffer[index].kind.is_eof() {
            self.pos += 1;
            self.fill(self.pos);
        }
        &self.buffer[index]
    }

    /// The most recently consumed token, or the current one if nothing was consumed yet.
    pub fn previous(&self) -> &Token {
        if self.pos == 0 { self.current() } else { &self.buffer[self.pos - 1] }
    }

    pub fn mark(&self) -> Mark {
        Mark(self.pos)
    }

    /// Rewind (or fast-forward) to a position previously returned by [`Self::mark`].
    pub fn reset(&mut self, mark: Mark) {
        self.pos = mark.0.min(self.buffer.len() - 1);
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Tokens consumed since `mark`.
    pub fn since(&self, mark: Mark) -> &[Token] {
        let start = mark.0.min(self.pos);
        &self.buffer[start..self.pos]
    }

    pub fn lexer_diagnostics(&self) -> &[Diagnostic] {
        self.lexer.diagnostics()
    }

    /// Drain the rest of the input and return the lexer's diagnostics.
    pub fn into_diagnostics(mut self) -> Vec<Diagnostic> {
        self.lexer.by_ref().for_each(drop);
        self.lexer.into_diagnostics()
    }
}
