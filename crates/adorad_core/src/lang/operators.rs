//! Operator vocabulary.
//!
//! Defines the canonical operator set along with precedence, associativity and fixity. The parser's precedence
//! climbing and the formatter's parenthesisation both read from [`OPERATORS`], so the two always agree.
//!
//! ## Notes
//! - `precedence` is relative: higher binds tighter. Assignment operators carry `0` and are never climbed over; the
//!   parser handles them at statement level.
//! - `>>` and `>>=` have entries but are never produced by the lexer, which emits `>` alone so nested generic
//!   argument lists close cleanly. The parser joins a `>` with a touching `>` or `>=`.
//!
//! ## Examples
//! ```rust
//! use adorad_core::lang::operators::{self, OperatorId};
//!
//! assert_eq!(operators::from_str("+"), Some(OperatorId::Plus));
//! assert!(operators::info_for(OperatorId::Star).precedence > operators::info_for(OperatorId::Plus).precedence);
//! ```

use super::registry::{Since, Stability};

/// Define how operators associate when chained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
}

/// Define whether an operator is infix (binary) or prefix (unary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    Infix,
    Prefix,
    /// Infix, but also accepted in prefix position (`-`).
    Both,
    /// Statement-level assignment forms.
    Assignment,
}

/// Stable identifier for every operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Arithmetic
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,

    // Bitwise
    Amp,
    Pipe,
    Caret,
    Tilde,
    Shl,
    Shr,

    // Logical
    AndAnd,
    OrOr,
    Bang,

    // Comparison
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Assignment
    Eq,
    ColonEq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    ShlEq,
    ShrEq,
}

/// Binding power of every prefix operator. Tighter than any infix operator.
pub const PREFIX_PRECEDENCE: u8 = 90;

/// Metadata for an operator.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub spelling: &'static str,
    pub precedence: u8,
    pub associativity: Associativity,
    pub fixity: Fixity,
    pub since: Since,
    pub stability: Stability,
}

/// Registry of all operators.
pub const OPERATORS: &[OperatorInfo] = &[
    // Arithmetic
    op(OperatorId::Plus, "+", 60, Associativity::Left, Fixity::Infix),
    op(OperatorId::Minus, "-", 60, Associativity::Left, Fixity::Both),
    op(OperatorId::Star, "*", 70, Associativity::Left, Fixity::Infix),
    op(OperatorId::StarStar, "**", 80, Associativity::Right, Fixity::Infix),
    op(OperatorId::Slash, "/", 70, Associativity::Left, Fixity::Infix),
    op(OperatorId::Percent, "%", 70, Associativity::Left, Fixity::Infix),
    // Bitwise
    op(OperatorId::Amp, "&", 50, Associativity::Left, Fixity::Infix),
    op(OperatorId::Pipe, "|", 40, Associativity::Left, Fixity::Infix),
    op(OperatorId::Caret, "^", 45, Associativity::Left, Fixity::Infix),
    op(OperatorId::Tilde, "~", PREFIX_PRECEDENCE, Associativity::Right, Fixity::Prefix),
    op(OperatorId::Shl, "<<", 55, Associativity::Left, Fixity::Infix),
    op(OperatorId::Shr, ">>", 55, Associativity::Left, Fixity::Infix),
    // Logical
    op(OperatorId::AndAnd, "&&", 20, Associativity::Left, Fixity::Infix),
    op(OperatorId::OrOr, "||", 10, Associativity::Left, Fixity::Infix),
    op(OperatorId::Bang, "!", PREFIX_PRECEDENCE, Associativity::Right, Fixity::Prefix),
    // Comparison
    op(OperatorId::EqEq, "==", 30, Associativity::Left, Fixity::Infix),
    op(OperatorId::NotEq, "!=", 30, Associativity::Left, Fixity::Infix),
    op(OperatorId::Lt, "<", 30, Associativity::Left, Fixity::Infix),
    op(OperatorId::LtEq, "<=", 30, Associativity::Left, Fixity::Infix),
    op(OperatorId::Gt, ">", 30, Associativity::Left, Fixity::Infix),
    op(OperatorId::GtEq, ">=", 30, Associativity::Left, Fixity::Infix),
    // Assignment
    op(OperatorId::Eq, "=", 0, Associativity::Right, Fixity::Assignment),
    op(OperatorId::ColonEq, ":=", 0, Associativity::Right, Fixity::Assignment),
    op(OperatorId::PlusEq, "+=", 0, Associativity::Right, Fixity::Assignment),
    op(OperatorId::MinusEq, "-=", 0, Associativity::Right, Fixity::Assignment),
    op(OperatorId::StarEq, "*=", 0, Associativity::Right, Fixity::Assignment),
    op(OperatorId::SlashEq, "/=", 0, Associativity::Right, Fixity::Assignment),
    op(OperatorId::PercentEq, "%=", 0, Associativity::Right, Fixity::Assignment),
    op(OperatorId::AmpEq, "&=", 0, Associativity::Right, Fixity::Assignment),
    op(OperatorId::PipeEq, "|=", 0, Associativity::Right, Fixity::Assignment),
    op(OperatorId::CaretEq, "^=", 0, Associativity::Right, Fixity::Assignment),
    op(OperatorId::ShlEq, "<<=", 0, Associativity::Right, Fixity::Assignment),
    op(OperatorId::ShrEq, ">>=", 0, Associativity::Right, Fixity::Assignment),
];

/// Return the full metadata entry for an operator.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    OPERATORS.iter().find(|o| o.id == id).expect("operator info missing")
}

/// Canonical spelling.
pub fn as_str(id: OperatorId) -> &'static str {
    info_for(id).spelling
}

/// Resolve an operator spelling to its identifier.
pub fn from_str(spelling: &str) -> Option<OperatorId> {
    OPERATORS.iter().find(|o| o.spelling == spelling).map(|o| o.id)
}

/// Precedence and associativity for `id` when used as a binary operator.
///
/// ## Returns
/// - `None` for prefix-only and assignment operators.
pub fn binary_binding(id: OperatorId) -> Option<(u8, Associativity)> {
    let info = info_for(id);
    match info.fixity {
        Fixity::Infix | Fixity::Both => Some((info.precedence, info.associativity)),
        Fixity::Prefix | Fixity::Assignment => None,
    }
}

/// Return `true` if `id` may appear in prefix position.
pub fn is_prefix(id: OperatorId) -> bool {
    matches!(info_for(id).fixity, Fixity::Prefix | Fixity::Both)
}

/// Return `true` for `==`, `!=`, `<`, `<=`, `>`, `>=`.
pub fn is_comparison(id: OperatorId) -> bool {
    matches!(
        id,
        OperatorId::EqEq | OperatorId::NotEq | OperatorId::Lt | OperatorId::LtEq | OperatorId::Gt | OperatorId::GtEq
    )
}

// --- helpers -----------------------------------------------------------------

const fn op(
    id: OperatorId,
    spelling: &'static str,
    precedence: u8,
    associativity: Associativity,
    fixity: Fixity,
) -> OperatorInfo {
    OperatorInfo {
        id,
        spelling,
        precedence,
        associativity,
        fixity,
        since: Since(0, 1),
        stability: Stability::Stable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_ladder() {
        let order = [
            OperatorId::OrOr,
            OperatorId::AndAnd,
            OperatorId::EqEq,
            OperatorId::Pipe,
            OperatorId::Caret,
            OperatorId::Amp,
            OperatorId::Shl,
            OperatorId::Plus,
            OperatorId::Star,
            OperatorId::StarStar,
        ];
        for pair in order.windows(2) {
            assert!(
                info_for(pair[0]).precedence < info_for(pair[1]).precedence,
                "{:?} should bind looser than {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_binary_binding_excludes_assignment_and_prefix() {
        assert_eq!(binary_binding(OperatorId::Eq), None);
        assert_eq!(binary_binding(OperatorId::Bang), None);
        assert_eq!(binary_binding(OperatorId::StarStar), Some((80, Associativity::Right)));
        assert!(is_prefix(OperatorId::Minus));
        assert!(!is_prefix(OperatorId::Plus));
    }

    #[test]
    fn test_bitwise_compound_assignments() {
        for (spelling, id) in [
            ("&=", OperatorId::AmpEq),
            ("|=", OperatorId::PipeEq),
            ("^=", OperatorId::CaretEq),
            ("<<=", OperatorId::ShlEq),
            (">>=", OperatorId::ShrEq),
        ] {
            assert_eq!(from_str(spelling), Some(id));
            assert_eq!(info_for(id).fixity, Fixity::Assignment);
            assert_eq!(binary_binding(id), None);
        }
    }

    #[test]
    fn test_every_operator_has_one_entry() {
        for entry in OPERATORS {
            assert_eq!(OPERATORS.iter().filter(|o| o.id == entry.id).count(), 1, "{:?}", entry.id);
            assert_eq!(from_str(entry.spelling), Some(entry.id));
        }
    }
}
