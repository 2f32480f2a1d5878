//! String, char and f-string scanning.
//!
//! Plain strings and chars are scanned in one call. An f-string is scanned one *section* at a time: the lexer
//! returns to code mode at each `{` and comes back here when the matching `}` closes the interpolation.

use super::{Interpolation, Lexer, PartPosition, Position, StringPart, Token, TokenKind};
use crate::diagnostics::Diagnostic;

/// Outcome of scanning the character(s) after a backslash.
pub(super) enum EscapeResult {
    /// A recognized escape, already cooked.
    Char(char),
    /// Unknown escape: kept verbatim as backslash plus this character.
    Unknown(char),
    /// Malformed escape, e.g. `\xZZ`.
    Invalid(String),
    /// Hit end of input or end of line.
    Eof,
}

impl<'a> Lexer<'a> {
    /// Scan the character(s) after a backslash. The backslash has already been consumed.
    pub(super) fn scan_escape(&mut self) -> EscapeResult {
        match self.advance() {
            Some('n') => EscapeResult::Char('\n'),
            Some('t') => EscapeResult::Char('\t'),
            Some('r') => EscapeResult::Char('\r'),
            Some('0') => EscapeResult::Char('\0'),
            Some('\\') => EscapeResult::Char('\\'),
            Some('\'') => EscapeResult::Char('\''),
            Some('"') => EscapeResult::Char('"'),
            Some('?') => EscapeResult::Char('?'),
            Some('a') => EscapeResult::Char('\x07'),
            Some('b') => EscapeResult::Char('\x08'),
            Some('e') => EscapeResult::Char('\x1b'),
            Some('f') => EscapeResult::Char('\x0c'),
            Some('v') => EscapeResult::Char('\x0b'),
            Some('x') => self.scan_hex_escape(),
            Some('\n') | None => EscapeResult::Eof,
            Some(c) => EscapeResult::Unknown(c),
        }
    }

    /// `\xNN`: exactly two hex digits, at most `0x7F`.
    fn scan_hex_escape(&mut self) -> EscapeResult {
        let mut value: u32 = 0;
        for _ in 0..2 {
            match self.peek().and_then(|c| c.to_digit(16)) {
                Some(digit) => {
                    self.advance();
                    value = value * 16 + digit;
                }
                None => return EscapeResult::Invalid("`\\x` escape needs exactly two hex digits".to_string()),
            }
        }
        match u8::try_from(value) {
            Ok(byte) if byte.is_ascii() => EscapeResult::Char(char::from(byte)),
            _ => EscapeResult::Invalid(format!("`\\x{value:02X}` is out of range; `\\x` escapes stop at `\\x7F`")),
        }
    }

    /// Handle one escape inside a quoted literal, appending its cooked form to `text`.
    ///
    /// ## Returns
    /// - `Ok(true)` if the escape was malformed (a diagnostic has been recorded)
    /// - `Err(())` if input ended inside the escape
    fn push_escape(&mut self, text: &mut String) -> Result<bool, ()> {
        let escape_start = self.here();
        self.advance();
        match self.scan_escape() {
            EscapeResult::Char(c) => text.push(c),
            EscapeResult::Unknown(c) => {
                text.push('\\');
                text.push(c);
            }
            EscapeResult::Invalid(message) => {
                let span = self.span_from(escape_start);
                self.diagnostics.push(Diagnostic::lex(message, span));
                return Ok(true);
            }
            EscapeResult::Eof => return Err(()),
        }
        Ok(false)
    }

    /// Scan the body of a `"..."` or `'...'` literal up to and including `quote`.
    fn scan_quoted(&mut self, start: Position, quote: char, what: &str) -> Result<String, Token> {
        let mut text = String::new();
        let mut malformed = false;
        loop {
            match self.peek() {
                None | Some('\n') => return Err(self.invalid(start, format!("unterminated {what}"))),
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('\\') => match self.push_escape(&mut text) {
                    Ok(bad) => malformed |= bad,
                    Err(()) => return Err(self.invalid(start, format!("unterminated {what}"))),
                },
                Some(c) => {
                    self.advance();
                    text.push(c);
                }
            }
        }
        if malformed { Err(self.invalid_marker(start)) } else { Ok(text) }
    }

    /// Scan a string literal. The opening quote has already been consumed.
    pub(super) fn scan_string(&mut self, start: Position) -> Token {
        match self.scan_quoted(start, '"', "string literal") {
            Ok(text) => self.token(TokenKind::String(text), start),
            Err(invalid) => invalid,
        }
    }

    /// Scan a char literal. The opening quote has already been consumed.
    pub(super) fn scan_char(&mut self, start: Position) -> Token {
        let text = match self.scan_quoted(start, '\'', "char literal") {
            Ok(text) => text,
            Err(invalid) => return invalid,
        };
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.token(TokenKind::Char(c), start),
            (None, _) => self.invalid(start, "empty char literal"),
            _ => self.invalid(start, "char literal must contain exactly one character"),
        }
    }

    /// Scan one f-string section: from just after `f"` (or the `}` closing an interpolation) up to the next `{` or
    /// the closing `"`.
    pub(super) fn scan_fstring_section(&mut self, start: Position, resumed: bool) -> Token {
        let mut text = String::new();
        let mut malformed = false;
        let position = loop {
            match self.peek() {
                None | Some('\n') => return self.invalid(start, "unterminated interpolated string"),
                Some('"') => {
                    self.advance();
                    break if resumed { PartPosition::Tail } else { PartPosition::Whole };
                }
                Some('{') => {
                    let opened_at = self.here();
                    self.advance();
                    self.interpolations.push(Interpolation {
                        brace_depth: 0,
                        opened_at,
                    });
                    break if resumed { PartPosition::Middle } else { PartPosition::Head };
                }
                Some('\\') => match self.push_escape(&mut text) {
                    Ok(bad) => malformed |= bad,
                    Err(()) => return self.invalid(start, "unterminated interpolated string"),
                },
                Some(c) => {
                    self.advance();
                    text.push(c);
                }
            }
        };

        if malformed {
            return self.invalid_marker(start);
        }
        self.token(TokenKind::InterpolatedStringPart(StringPart { text, position }), start)
    }
}
