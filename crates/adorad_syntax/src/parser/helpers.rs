/// Token-stream helpers and error recovery.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming tokens (`peek`, `advance`)
/// - Matching / expecting keywords, operators, and punctuation
/// - Recording diagnostics and speculative checkpoints
/// - Error recovery (`synchronize_declaration`, `synchronize_statement`)
impl<'a> Parser<'a> {
    // ========================================================================
    // Helpers
    // ========================================================================

    /// Return `true` if the current token is [`TokenKind::Eof`].
    fn is_at_end(&self) -> bool {
        self.peek().kind.is_eof()
    }

    /// Return the current token without consuming it.
    fn peek(&self) -> &Token {
        self.cursor.current()
    }

    /// Return the token `k` positions ahead without consuming anything.
    fn peek_nth(&mut self, k: usize) -> &Token {
        self.cursor.peek(k)
    }

    /// Advance to the next token and return the token we just consumed.
    fn advance(&mut self) -> &Token {
        self.cursor.advance()
    }

    fn check_keyword(&self, id: KeywordId) -> bool {
        self.peek().kind.is_keyword(id)
    }

    fn check_punct(&self, id: PunctuationId) -> bool {
        self.peek().kind.is_punctuation(id)
    }

    fn check_op(&self, id: OperatorId) -> bool {
        self.peek().kind.is_operator(id)
    }

    fn match_keyword(&mut self, id: KeywordId) -> bool {
        if self.check_keyword(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_op(&mut self, id: OperatorId) -> bool {
        if self.check_op(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, id: KeywordId, msg: &str) -> ParseResult<Span> {
        if self.check_keyword(id) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected(msg))
        }
    }

    fn expect_punct(&mut self, id: PunctuationId, msg: &str) -> ParseResult<Span> {
        if self.check_punct(id) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected(msg))
        }
    }

    fn expect_op(&mut self, id: OperatorId, msg: &str) -> ParseResult<Span> {
        if self.check_op(id) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected(msg))
        }
    }

    fn expect_ident(&mut self, msg: &str) -> ParseResult<(Ident, Span)> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                let span = self.advance().span;
                Ok((name, span))
            }
            _ => Err(self.unexpected(msg)),
        }
    }

    /// Syntax error at the current token: "{msg}, found {token}".
    fn unexpected(&self, msg: &str) -> Diagnostic {
        let token = self.peek();
        Diagnostic::syntax(format!("{msg}, found {}", token.describe()), token.span)
    }

    /// Span from `start` through the last consumed token.
    fn span_from(&self, start: Span) -> Span {
        start.merge(self.cursor.previous().span)
    }

    /// Is the current token on the same line as the last consumed one?
    fn same_line(&self) -> bool {
        self.peek().span.line == self.cursor.previous().span.line
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Record a diagnostic that does not interrupt parsing.
    fn record(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Record an error that aborted a declaration or statement.
    ///
    /// The lexer has already reported an `Invalid` token, so an error caused by one is dropped. So is an error at end
    /// of input right after one: an unterminated comment or literal there swallowed whatever was missing.
    ///
    /// An error starting where the last recorded error starts is dropped too. Each enclosing block or declaration
    /// that an error unwinds through fails at the same token, typically end of input.
    fn report(&mut self, err: Diagnostic) {
        let at_invalid = self.peek().kind.is_invalid()
            || (self.is_at_end() && self.cursor.previous().kind.is_invalid());
        if at_invalid {
            tracing::debug!(message = %err.message, "suppressed error at invalid token");
            return;
        }
        let repeats_last = self
            .diagnostics
            .last()
            .is_some_and(|last| last.is_error() && last.span.start == err.span.start);
        if repeats_last {
            tracing::debug!(message = %err.message, offset = err.span.start, "suppressed repeated error");
            return;
        }
        self.diagnostics.push(err);
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            mark: self.cursor.mark(),
            diagnostics_len: self.diagnostics.len(),
        }
    }

    fn rollback(&mut self, checkpoint: Checkpoint) {
        self.cursor.reset(checkpoint.mark);
        self.diagnostics.truncate(checkpoint.diagnostics_len);
    }

    // ========================================================================
    // Recovery
    // ========================================================================

    /// Skip to the next top-level declaration after a failed one that began at `start`.
    ///
    /// Stops before a declaration start once braces opened since `start` are balanced, or right after the `}` that
    /// balances them.
    fn synchronize_declaration(&mut self, start: Mark) {
        let mut depth = brace_balance(self.cursor.since(start));
        let mut skipped = 0usize;

        if self.cursor.since(start).is_empty() && !self.is_at_end() {
            depth += brace_delta(self.advance());
            skipped += 1;
        }

        while !self.is_at_end() {
            if depth <= 0 && self.at_declaration_start() {
                break;
            }
            let delta = brace_delta(self.advance());
            skipped += 1;
            if delta < 0 && depth == 1 {
                break;
            }
            depth = (depth + delta).max(0);
        }

        tracing::debug!(skipped, "recovered at declaration boundary");
    }

    /// Skip to the next statement inside the current block after a failed one that began at `start`.
    ///
    /// At balanced depth, stops before the block's closing `}`, after a `;`, or before a statement start on a line
    /// after `error_line`.
    fn synchronize_statement(&mut self, start: Mark, error_line: u32) {
        let mut depth = brace_balance(self.cursor.since(start));
        let mut skipped = 0usize;

        if self.cursor.since(start).is_empty() {
            if self.check_punct(PunctuationId::RBrace) || self.is_at_end() {
                return;
            }
            depth += brace_delta(self.advance());
            skipped += 1;
        }

        while !self.is_at_end() {
            if depth <= 0 {
                if self.check_punct(PunctuationId::RBrace) {
                    break;
                }
                if self.match_punct(PunctuationId::Semicolon) {
                    skipped += 1;
                    break;
                }
                if self.peek().span.line > error_line && self.at_statement_start() {
                    break;
                }
            }
            let delta = brace_delta(self.advance());
            skipped += 1;
            if delta < 0 && depth == 1 {
                break;
            }
            depth = (depth + delta).max(0);
        }

        tracing::debug!(skipped, "recovered at statement boundary");
    }
}
