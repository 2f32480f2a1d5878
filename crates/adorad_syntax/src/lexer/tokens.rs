//! Token types for the Adorad lexer.
//!
//! The lexer uses **registry-backed IDs** for language vocabulary:
//! - `Keyword(KeywordId)` for reserved words
//! - `Operator(OperatorId)` for operators
//! - `Punctuation(PunctuationId)` for punctuation tokens
//!
//! ## Notes
//! - Literal payloads are already cooked: escapes are resolved and numbers are parsed.
//! - The raw lexeme is always recoverable from the source via [`Token::lexeme`].

use crate::ast::Span;
use adorad_core::lang::keywords::{self, KeywordId};
use adorad_core::lang::operators::OperatorId;
use adorad_core::lang::punctuation::PunctuationId;

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ========== Keyword / operator / punctuation (ID-based) ==========
    Keyword(KeywordId),
    Operator(OperatorId),
    Punctuation(PunctuationId),

    // ========== Identifiers and Literals ==========
    Ident(String),
    Int(u64),
    Float(f64),
    String(String),
    Char(char),
    /// One text section of an `f"..."` string. Embedded expressions arrive as ordinary tokens in between.
    InterpolatedStringPart(StringPart),

    // ========== Special ==========
    /// Zero-width marker left where the lexer rejected input; a diagnostic has already been recorded.
    Invalid,
    Eof,
}

/// Cooked text of one f-string section plus where it sits in the string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringPart {
    pub text: String,
    pub position: PartPosition,
}

/// Position of an f-string section relative to its interpolations.
///
/// ```text
/// f"Hello {name}, {msg}!"
///  └Head─┘    └Mid┘  └Tail┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartPosition {
    /// `f"..."` with no interpolation.
    Whole,
    /// `f"...{`: an expression follows.
    Head,
    /// `}...{`: between two expressions.
    Middle,
    /// `}..."`: closes the string.
    Tail,
}

impl PartPosition {
    /// `true` if an embedded expression follows this section.
    pub fn opens_interpolation(self) -> bool {
        matches!(self, PartPosition::Head | PartPosition::Middle)
    }

    /// `true` if this section continues a string after an embedded expression.
    pub fn is_continuation(self) -> bool {
        matches!(self, PartPosition::Middle | PartPosition::Tail)
    }
}

/// A token with its kind and source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Source text this token was scanned from.
    pub fn lexeme<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.span.start..self.span.end).unwrap_or("")
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}
