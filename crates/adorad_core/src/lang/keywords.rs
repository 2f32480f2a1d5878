//! Reserved keyword vocabulary.
//!
//! A stable identifier ([`KeywordId`]) plus a const metadata table ([`KEYWORDS`]) recording the spelling, category and
//! provenance of every reserved word.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive** and exact: the lexer scans a whole identifier first and only then
//!   asks this registry whether it is reserved.
//!
//! ## Examples
//! ```rust
//! use adorad_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("alias"), Some(KeywordId::Alias));
//! assert_eq!(keywords::from_str("Alias"), None);
//! ```

use super::registry::{Since, Stability};

/// Stable identifier for every reserved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Declarations
    Func,
    Global,
    Enum,
    Alias,
    Export,
    Where,

    // Imports
    Import,
    From,
    As,

    // Control flow
    If,
    Else,
    Loop,
    Match,
    When,
    Default,
    Return,
    Break,
    Continue,

    // Literals
    Nil,
    True,
    False,
}

/// High-level grouping for documentation and tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Declaration,
    Import,
    ControlFlow,
    Literal,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
    /// `true` if the keyword may begin a top-level declaration (used by error recovery).
    pub starts_declaration: bool,
    pub since: Since,
    pub stability: Stability,
}

/// Registry of all keywords, grouped for readability.
pub const KEYWORDS: &[KeywordInfo] = &[
    // Declarations
    info(KeywordId::Func, "func", KeywordCategory::Declaration, true),
    info(KeywordId::Global, "global", KeywordCategory::Declaration, true),
    info(KeywordId::Enum, "enum", KeywordCategory::Declaration, false),
    info(KeywordId::Alias, "alias", KeywordCategory::Declaration, true),
    info(KeywordId::Export, "export", KeywordCategory::Declaration, true),
    info(KeywordId::Where, "where", KeywordCategory::Declaration, false),
    // Imports
    info(KeywordId::Import, "import", KeywordCategory::Import, true),
    info(KeywordId::From, "from", KeywordCategory::Import, true),
    info(KeywordId::As, "as", KeywordCategory::Import, false),
    // Control flow
    info(KeywordId::If, "if", KeywordCategory::ControlFlow, false),
    info(KeywordId::Else, "else", KeywordCategory::ControlFlow, false),
    info(KeywordId::Loop, "loop", KeywordCategory::ControlFlow, false),
    info(KeywordId::Match, "match", KeywordCategory::ControlFlow, false),
    info(KeywordId::When, "when", KeywordCategory::ControlFlow, false),
    info(KeywordId::Default, "default", KeywordCategory::ControlFlow, false),
    info(KeywordId::Return, "return", KeywordCategory::ControlFlow, false),
    info(KeywordId::Break, "break", KeywordCategory::ControlFlow, false),
    info(KeywordId::Continue, "continue", KeywordCategory::ControlFlow, false),
    // Literals
    info(KeywordId::Nil, "nil", KeywordCategory::Literal, false),
    info(KeywordId::True, "true", KeywordCategory::Literal, false),
    info(KeywordId::False, "false", KeywordCategory::Literal, false),
];

/// Canonical spelling.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Category.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Return `true` if `id` can begin a top-level declaration.
pub fn starts_declaration(id: KeywordId) -> bool {
    info_for(id).starts_declaration
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS.iter().find(|k| k.id == id).expect("keyword info missing")
}

/// Lookup by exact spelling.
///
/// ## Returns
/// - `Some(KeywordId)` if `s` is reserved, `None` otherwise.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == s).map(|k| k.id)
}

const fn info(id: KeywordId, canonical: &'static str, category: KeywordCategory, starts_declaration: bool) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category,
        starts_declaration,
        since: Since(0, 1),
        stability: Stability::Stable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_exact() {
        assert_eq!(from_str("func"), Some(KeywordId::Func));
        assert_eq!(from_str("funcs"), None);
        assert_eq!(from_str("FUNC"), None);
        assert_eq!(from_str(""), None);
    }

    #[test]
    fn test_declaration_starters() {
        assert!(starts_declaration(KeywordId::Import));
        assert!(starts_declaration(KeywordId::Export));
        assert!(!starts_declaration(KeywordId::Enum));
        assert!(!starts_declaration(KeywordId::Return));
    }
}
