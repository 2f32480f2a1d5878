/// Statement and block parsing.
///
/// Blocks recover per statement: a malformed statement is reported and skipped, and the rest of the block still
/// parses. `:=` and `=` are told apart here by one token of lookahead after an identifier.
impl<'a> Parser<'a> {
    // ========================================================================
    // Blocks
    // ========================================================================

    fn block(&mut self) -> ParseResult<Spanned<Block>> {
        let start = self.expect_punct(PunctuationId::LBrace, "expected `{` to open block")?;
        let mut statements = Vec::new();

        loop {
            while self.match_punct(PunctuationId::Semicolon) {}
            if self.check_punct(PunctuationId::RBrace) || self.is_at_end() {
                break;
            }
            let mark = self.cursor.mark();
            match self.statement() {
                Ok(stmt) => statements.push(stmt),
                Err(err) => {
                    let error_line = err.span.line;
                    self.report(err);
                    self.synchronize_statement(mark, error_line);
                }
            }
        }

        self.expect_punct(PunctuationId::RBrace, "expected `}` to close block")?;
        Ok(Spanned::new(Block { statements }, self.span_from(start)))
    }

    /// `if`/`else` body: a braced block, or a single statement wrapped as one.
    fn branch_body(&mut self) -> ParseResult<Spanned<Block>> {
        if self.check_punct(PunctuationId::LBrace) {
            return self.block();
        }
        let stmt = self.statement()?;
        let span = stmt.span;
        Ok(Spanned::new(Block { statements: vec![stmt] }, span))
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn statement(&mut self) -> ParseResult<Spanned<Statement>> {
        let start = self.peek().span;

        let stmt = match self.peek().kind.keyword_id() {
            Some(KeywordId::Return) => self.return_stmt()?,
            Some(KeywordId::If) => Statement::If(self.if_stmt()?.node),
            Some(KeywordId::Loop) => {
                self.advance();
                Statement::Loop(LoopStmt { body: self.block()? })
            }
            Some(KeywordId::Break) => {
                self.advance();
                Statement::Break
            }
            Some(KeywordId::Continue) => {
                self.advance();
                Statement::Continue
            }
            _ if self.check_punct(PunctuationId::Ellipsis) => {
                self.advance();
                Statement::Placeholder
            }
            _ => self.simple_statement()?,
        };

        let span = self.span_from(start);
        self.match_punct(PunctuationId::Semicolon);
        Ok(Spanned::new(stmt, span))
    }

    /// `return [expr]`; the value must start on the `return` line.
    fn return_stmt(&mut self) -> ParseResult<Statement> {
        self.expect_keyword(KeywordId::Return, "expected `return`")?;
        if self.same_line() && self.at_expression_start() {
            Ok(Statement::Return(Some(self.expression()?)))
        } else {
            Ok(Statement::Return(None))
        }
    }

    fn if_stmt(&mut self) -> ParseResult<Spanned<IfStmt>> {
        let start = self.expect_keyword(KeywordId::If, "expected `if`")?;
        let condition = self.expression()?;
        let then_block = self.branch_body()?;

        let else_branch = if self.match_keyword(KeywordId::Else) {
            if self.check_keyword(KeywordId::If) {
                Some(ElseBranch::If(Box::new(self.if_stmt()?)))
            } else {
                Some(ElseBranch::Block(self.branch_body()?))
            }
        } else {
            None
        };

        Ok(Spanned::new(
            IfStmt {
                condition,
                then_block,
                else_branch,
            },
            self.span_from(start),
        ))
    }

    /// Declarations, assignments and expression statements.
    ///
    /// ```text
    /// x := e        DeclareAssign
    /// x: T = e      DeclareAssign (typed)
    /// target = e    Assign
    /// target += e   Assign
    /// e             Expr
    /// ```
    fn simple_statement(&mut self) -> ParseResult<Statement> {
        if let TokenKind::Ident(name) = &self.peek().kind {
            let name = name.clone();
            let next = self.peek_nth(1).kind.clone();

            if next.is_operator(OperatorId::ColonEq) {
                self.advance();
                self.advance();
                let value = self.expression()?;
                return Ok(Statement::DeclareAssign(DeclareAssignStmt { name, ty: None, value }));
            }
            if next.is_punctuation(PunctuationId::Colon) {
                self.advance();
                self.advance();
                let ty = self.parse_type()?;
                self.expect_op(OperatorId::Eq, "expected `=` after the declared type")?;
                let value = self.expression()?;
                return Ok(Statement::DeclareAssign(DeclareAssignStmt {
                    name,
                    ty: Some(ty),
                    value,
                }));
            }
        }

        let target = self.expression()?;

        if let Some((op, width)) = self.peek_assign_op() {
            if !is_assignable(&target.node) {
                return Err(Diagnostic::syntax("invalid assignment target", target.span)
                    .with_hint("only identifiers, fields and index expressions can be assigned to"));
            }
            for _ in 0..width {
                self.advance();
            }
            let value = self.expression()?;
            return Ok(Statement::Assign(AssignStmt { target, op, value }));
        }

        if self.check_op(OperatorId::ColonEq) {
            return Err(self
                .unexpected("`:=` can only declare a plain identifier")
                .with_hint("use `=` to assign to an existing field or element"));
        }

        Ok(Statement::Expr(target))
    }

    /// Assignment operator at the cursor and the number of tokens spelling it. A `>` touching `>=` is `>>=`.
    fn peek_assign_op(&mut self) -> Option<(AssignOp, usize)> {
        let id = self.peek().operator_id()?;
        if id == OperatorId::Gt {
            return (self.joined_greater_than() == Some(OperatorId::GtEq)).then_some((AssignOp::Shr, 2));
        }
        AssignOp::from_operator(id).map(|op| (op, 1))
    }
}
