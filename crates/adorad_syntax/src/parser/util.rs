/// Miscellaneous parser utilities.
///
/// Small shared helpers that don't cleanly fit into “decl”, “stmt”, “expr”, or “types”: token-class predicates used by
/// recovery and brace counting.
impl<'a> Parser<'a> {
    // ========================================================================
    // Utilities
    // ========================================================================

    /// Can the current token begin an expression?
    fn at_expression_start(&self) -> bool {
        match &self.peek().kind {
            TokenKind::Ident(_)
            | TokenKind::Int(_)
            | TokenKind::Float(_)
            | TokenKind::String(_)
            | TokenKind::Char(_) => true,
            TokenKind::InterpolatedStringPart(part) => !part.position.is_continuation(),
            TokenKind::Keyword(id) => matches!(
                id,
                KeywordId::True | KeywordId::False | KeywordId::Nil | KeywordId::Match
            ),
            TokenKind::Operator(id) => operators::is_prefix(*id),
            TokenKind::Punctuation(id) => matches!(id, PunctuationId::LParen | PunctuationId::At),
            TokenKind::Invalid | TokenKind::Eof => false,
        }
    }

    /// Can the current token begin a statement?
    fn at_statement_start(&self) -> bool {
        self.at_expression_start()
            || self.check_punct(PunctuationId::Ellipsis)
            || matches!(
                self.peek().kind.keyword_id(),
                Some(KeywordId::Return | KeywordId::If | KeywordId::Loop | KeywordId::Break | KeywordId::Continue)
            )
    }

    /// Can the current token begin a top-level declaration?
    fn at_declaration_start(&mut self) -> bool {
        if self.peek().kind.is_ident() {
            return self.peek_nth(1).kind.is_operator(OperatorId::Eq)
                && self.peek_nth(2).kind.is_keyword(KeywordId::Enum);
        }
        match self.peek().kind {
            TokenKind::Keyword(id) => keywords::starts_declaration(id),
            TokenKind::Punctuation(PunctuationId::LBracket) => true,
            _ => false,
        }
    }
}

/// Only identifiers, field accesses and index expressions can be assigned to.
fn is_assignable(expr: &Expr) -> bool {
    matches!(expr, Expr::Ident(_) | Expr::Field(..) | Expr::Index(..))
}

/// `+1` for `{`, `-1` for `}`, `0` otherwise.
fn brace_delta(token: &Token) -> i32 {
    match token.punctuation_id() {
        Some(PunctuationId::LBrace) => 1,
        Some(PunctuationId::RBrace) => -1,
        _ => 0,
    }
}

/// Net braces opened by `tokens`.
fn brace_balance(tokens: &[Token]) -> i32 {
    tokens.iter().map(brace_delta).sum()
}

/// Append literal text, merging with a preceding text part. Empty text is dropped.
fn push_text(parts: &mut Vec<InterpolatedPart>, text: String) {
    if text.is_empty() {
        return;
    }
    match parts.last_mut() {
        Some(InterpolatedPart::Text(previous)) => previous.push_str(&text),
        _ => parts.push(InterpolatedPart::Text(text)),
    }
}
