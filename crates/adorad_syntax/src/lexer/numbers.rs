//! Numeric literal scanning.
//!
//! Integers are decimal or carry a `0x`/`0b`/`0o` prefix, with `_` allowed as a digit separator. Floats are decimal
//! only and need a digit on both sides of the `.`; an exponent alone (`1e100`) also makes a float.

use super::{Lexer, Position, Token, TokenKind};

impl<'a> Lexer<'a> {
    /// Scan a number literal. `first` (an ASCII digit) has already been consumed.
    pub(super) fn scan_number(&mut self, start: Position, first: char) -> Token {
        if first == '0' {
            let radix = match self.peek() {
                Some('x' | 'X') => Some(16),
                Some('b' | 'B') => Some(2),
                Some('o' | 'O') => Some(8),
                _ => None,
            };
            if let Some(radix) = radix {
                self.advance();
                return self.scan_radix_int(start, radix);
            }
        }

        let mut digits = String::from(first);
        self.take_digits(&mut digits, 10);

        let mut is_float = false;
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.advance();
            digits.push('.');
            self.take_digits(&mut digits, 10);
        }

        if matches!(self.peek(), Some('e' | 'E')) && self.exponent_follows() {
            is_float = true;
            self.advance();
            digits.push('e');
            if let Some(sign @ ('+' | '-')) = self.peek() {
                self.advance();
                digits.push(sign);
            }
            self.take_digits(&mut digits, 10);
        }

        if let Some(invalid) = self.reject_suffix(start) {
            return invalid;
        }

        if is_float {
            match digits.parse::<f64>() {
                Ok(value) if value.is_finite() => self.token(TokenKind::Float(value), start),
                _ => self.invalid(start, "float literal is out of range"),
            }
        } else {
            match digits.parse::<u64>() {
                Ok(value) => self.token(TokenKind::Int(value), start),
                Err(_) => self.invalid(start, "integer literal does not fit in 64 bits"),
            }
        }
    }

    fn scan_radix_int(&mut self, start: Position, radix: u32) -> Token {
        let mut digits = String::new();
        self.take_digits(&mut digits, radix);
        if let Some(invalid) = self.reject_suffix(start) {
            return invalid;
        }
        if digits.is_empty() {
            return self.invalid(start, "expected digits after the radix prefix");
        }
        match u64::from_str_radix(&digits, radix) {
            Ok(value) => self.token(TokenKind::Int(value), start),
            Err(_) => self.invalid(start, "integer literal does not fit in 64 bits"),
        }
    }

    /// Append digits of `radix` to `out`, skipping `_` separators.
    fn take_digits(&mut self, out: &mut String, radix: u32) {
        while let Some(c) = self.peek() {
            if c == '_' {
                self.advance();
            } else if c.is_digit(radix) {
                self.advance();
                out.push(c);
            } else {
                break;
            }
        }
    }

    /// With the cursor on `e`/`E`: is this the start of an exponent?
    fn exponent_follows(&self) -> bool {
        let mut rest = self.source[self.current_pos..].chars().skip(1);
        match rest.next() {
            Some(c) if c.is_ascii_digit() => true,
            Some('+' | '-') => rest.next().is_some_and(|c| c.is_ascii_digit()),
            _ => false,
        }
    }

    /// A number glued to letters (`12abc`, `0b102`) is one invalid literal rather than two tokens.
    fn reject_suffix(&mut self, start: Position) -> Option<Token> {
        if !self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            return None;
        }
        self.skip_word();
        let literal = self.source[start.offset..self.current_pos].to_string();
        Some(self.invalid(start, format!("invalid numeric literal `{literal}`")))
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::{TokenKind, lex};

    fn single(source: &str) -> TokenKind {
        let (tokens, diagnostics) = lex(source);
        assert!(diagnostics.is_empty(), "unexpected diagnostics for {source}: {diagnostics:?}");
        tokens[0].kind.clone()
    }

    fn rejected(source: &str) -> String {
        let (tokens, diagnostics) = lex(source);
        assert_eq!(tokens[0].kind, TokenKind::Invalid, "{source}");
        assert_eq!(diagnostics.len(), 1, "{source}");
        diagnostics[0].message.clone()
    }

    #[test]
    fn test_integers() {
        assert_eq!(single("42"), TokenKind::Int(42));
        assert_eq!(single("1_000_000"), TokenKind::Int(1_000_000));
        assert_eq!(single("0xFF"), TokenKind::Int(255));
        assert_eq!(single("0b1010"), TokenKind::Int(10));
        assert_eq!(single("0o17"), TokenKind::Int(15));
        assert_eq!(single("18446744073709551615"), TokenKind::Int(u64::MAX));
    }

    #[test]
    fn test_floats() {
        assert_eq!(single("3.25"), TokenKind::Float(3.25));
        assert_eq!(single("1e3"), TokenKind::Float(1000.0));
        assert_eq!(single("2.5e-1"), TokenKind::Float(0.25));
        assert_eq!(single("1e100"), TokenKind::Float(1e100));
    }

    #[test]
    fn test_dot_without_fraction_is_field_access() {
        let (tokens, _) = lex("1.x");
        assert_eq!(tokens[0].kind, TokenKind::Int(1));
        assert_eq!(tokens[2].kind, TokenKind::Ident("x".into()));
    }

    #[test]
    fn test_rejected_numbers() {
        assert!(rejected("18446744073709551616").contains("64 bits"));
        assert!(rejected("0x").contains("radix prefix"));
        assert!(rejected("12abc").contains("12abc"));
        assert!(rejected("0b102").contains("0b102"));
        assert!(rejected("1e400").contains("out of range"));
    }
}
