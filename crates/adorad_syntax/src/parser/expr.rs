/// Expression parsing.
///
/// Binary operators use precedence climbing driven by `adorad_core::lang::operators`. Postfix forms (`.field`,
/// `(args)`, `[index]`, `<T>(args)`) bind tighter than any prefix or binary operator.
///
/// ## Notes
/// - `(` and `[` only continue an expression on the line it ended on; on a new line they start something else.
/// - `f<T>(x)` versus `a < b` is decided by a speculative parse of the type arguments, rolled back unless `>` is
///   followed by `(` on the same line.
impl<'a> Parser<'a> {
    // ========================================================================
    // Expressions
    // ========================================================================

    fn expression(&mut self) -> ParseResult<Spanned<Expr>> {
        self.binary_expr(1)
    }

    fn binary_expr(&mut self, min_prec: u8) -> ParseResult<Spanned<Expr>> {
        let mut lhs = self.unary_expr()?;

        while let Some((op, width)) = self.peek_binary_op() {
            let Some((prec, assoc)) = operators::binary_binding(op.operator_id()) else {
                break;
            };
            if prec < min_prec {
                break;
            }
            for _ in 0..width {
                self.advance();
            }
            let next_min = match assoc {
                Associativity::Left => prec + 1,
                Associativity::Right => prec,
            };
            let rhs = self.binary_expr(next_min)?;
            let span = lhs.span.merge(rhs.span);
            lhs = Spanned::new(
                Expr::Binary(BinaryExpr {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                }),
                span,
            );
        }

        Ok(lhs)
    }

    /// Binary operator at the cursor and the number of tokens spelling it. Two touching `>` tokens are `>>`; a `>`
    /// touching `>=` is the `>>=` assignment and ends the expression.
    fn peek_binary_op(&mut self) -> Option<(BinaryOp, usize)> {
        let id = self.peek().operator_id()?;
        if id == OperatorId::Gt {
            match self.joined_greater_than() {
                Some(OperatorId::Gt) => return Some((BinaryOp::Shr, 2)),
                Some(_) => return None,
                None => {}
            }
        }
        BinaryOp::from_operator(id).map(|op| (op, 1))
    }

    /// Operator of the token touching the `>` at the cursor, if it is `>` or `>=`.
    fn joined_greater_than(&mut self) -> Option<OperatorId> {
        let end = self.peek().span.end;
        let next = self.peek_nth(1);
        if next.span.start != end {
            return None;
        }
        next.operator_id().filter(|id| matches!(id, OperatorId::Gt | OperatorId::GtEq))
    }

    fn unary_expr(&mut self) -> ParseResult<Spanned<Expr>> {
        if let Some(op) = self.peek().operator_id().and_then(UnaryOp::from_operator) {
            let start = self.advance().span;
            let operand = self.unary_expr()?;
            let span = start.merge(operand.span);
            return Ok(Spanned::new(Expr::Unary(op, Box::new(operand)), span));
        }
        self.postfix_expr()
    }

    fn postfix_expr(&mut self) -> ParseResult<Spanned<Expr>> {
        let mut expr = self.primary()?;

        loop {
            if self.match_punct(PunctuationId::Dot) {
                let (field, _) = self.expect_ident("expected field name after `.`")?;
                let span = self.span_from(expr.span);
                expr = Spanned::new(Expr::Field(Box::new(expr), field), span);
            } else if self.check_punct(PunctuationId::LParen) && self.same_line() {
                self.advance();
                let args = self.arguments()?;
                expr = self.finish_call(expr, Vec::new(), args);
            } else if self.check_punct(PunctuationId::LBracket) && self.same_line() {
                self.advance();
                let index = self.expression()?;
                self.expect_punct(PunctuationId::RBracket, "expected `]` to close index")?;
                let span = self.span_from(expr.span);
                expr = Spanned::new(Expr::Index(Box::new(expr), Box::new(index)), span);
            } else if self.check_op(OperatorId::Lt) && self.same_line() && self.may_take_type_args(&expr) {
                let Some(type_args) = self.speculate_type_args() else {
                    break;
                };
                let args = self.arguments()?;
                expr = self.finish_call(expr, type_args, args);
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Only a bare name or field access, written without parentheses, can take `<T>` call arguments.
    fn may_take_type_args(&self, callee: &Spanned<Expr>) -> bool {
        matches!(callee.node, Expr::Ident(_) | Expr::Field(..)) && self.cursor.previous().kind.is_ident()
    }

    /// Try `<T, ...>(`; on success the cursor is just past `(`. On failure nothing is consumed.
    fn speculate_type_args(&mut self) -> Option<Vec<Spanned<Type>>> {
        let checkpoint = self.checkpoint();
        match self.generic_call_args() {
            Ok(type_args) => Some(type_args),
            Err(err) => {
                tracing::trace!(reason = %err.message, "not a generic call, rolling back");
                self.rollback(checkpoint);
                None
            }
        }
    }

    fn generic_call_args(&mut self) -> ParseResult<Vec<Spanned<Type>>> {
        self.expect_op(OperatorId::Lt, "expected `<`")?;
        let type_args = self.type_list()?;
        self.expect_op(OperatorId::Gt, "expected `>` to close type arguments")?;
        if !(self.check_punct(PunctuationId::LParen) && self.same_line()) {
            return Err(self.unexpected("expected `(` after type arguments"));
        }
        self.advance();
        Ok(type_args)
    }

    fn finish_call(
        &self,
        callee: Spanned<Expr>,
        type_args: Vec<Spanned<Type>>,
        args: Vec<Spanned<Expr>>,
    ) -> Spanned<Expr> {
        let span = self.span_from(callee.span);
        Spanned::new(
            Expr::Call(CallExpr {
                callee: Box::new(callee),
                type_args,
                args,
            }),
            span,
        )
    }

    /// Argument list; the opening `(` has been consumed. A trailing comma is allowed.
    fn arguments(&mut self) -> ParseResult<Vec<Spanned<Expr>>> {
        let mut args = Vec::new();
        while !self.check_punct(PunctuationId::RParen) {
            args.push(self.expression()?);
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_punct(PunctuationId::RParen, "expected `,` or `)` in argument list")?;
        Ok(args)
    }

    // ========================================================================
    // Primary expressions
    // ========================================================================

    fn primary(&mut self) -> ParseResult<Spanned<Expr>> {
        let token = self.peek().clone();

        let literal = match &token.kind {
            TokenKind::Int(value) => Some(Literal::Int(*value)),
            TokenKind::Float(value) => Some(Literal::Float(*value)),
            TokenKind::String(value) => Some(Literal::String(value.clone())),
            TokenKind::Char(value) => Some(Literal::Char(*value)),
            TokenKind::Keyword(KeywordId::True) => Some(Literal::Bool(true)),
            TokenKind::Keyword(KeywordId::False) => Some(Literal::Bool(false)),
            TokenKind::Keyword(KeywordId::Nil) => Some(Literal::Nil),
            _ => None,
        };
        if let Some(literal) = literal {
            self.advance();
            return Ok(Spanned::new(Expr::Literal(literal), token.span));
        }

        match token.kind {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Spanned::new(Expr::Ident(name), token.span))
            }
            TokenKind::InterpolatedStringPart(part) if !part.position.is_continuation() => self.interpolated_string(),
            TokenKind::Punctuation(PunctuationId::LParen) => {
                self.advance();
                let inner = self.expression()?;
                self.expect_punct(PunctuationId::RParen, "expected `)` to close parenthesised expression")?;
                Ok(Spanned::new(inner.node, self.span_from(token.span)))
            }
            TokenKind::Punctuation(PunctuationId::At) => self.builtin_call(),
            TokenKind::Keyword(KeywordId::Match) => self.match_expr(),
            _ => Err(self.unexpected("expected expression")),
        }
    }

    /// `f"text {expr} text"`, from its `Head`/`Whole` section to its `Tail`.
    fn interpolated_string(&mut self) -> ParseResult<Spanned<Expr>> {
        let start = self.peek().span;
        let mut parts: Vec<InterpolatedPart> = Vec::new();

        loop {
            let token = self.advance().clone();
            let TokenKind::InterpolatedStringPart(StringPart { text, position }) = token.kind else {
                return Err(Diagnostic::syntax(
                    format!("expected interpolated string, found {}", token.describe()),
                    token.span,
                ));
            };
            push_text(&mut parts, text);
            if !position.opens_interpolation() {
                break;
            }

            if let TokenKind::InterpolatedStringPart(next) = &self.peek().kind {
                if next.position.is_continuation() {
                    let span = token.span.merge(self.peek().span);
                    self.record(
                        Diagnostic::syntax("empty interpolation in f-string", span)
                            .with_hint("put an expression between `{` and `}`"),
                    );
                    continue;
                }
            }

            parts.push(InterpolatedPart::Expr(self.expression()?));

            let closes = matches!(
                &self.peek().kind,
                TokenKind::InterpolatedStringPart(next) if next.position.is_continuation()
            );
            if !closes {
                return Err(self.unexpected("expected `}` to close interpolation"));
            }
        }

        Ok(Spanned::new(Expr::InterpolatedString(parts), self.span_from(start)))
    }

    /// `@cast(Type, expr)` or `@name(args)`.
    fn builtin_call(&mut self) -> ParseResult<Spanned<Expr>> {
        let start = self.expect_punct(PunctuationId::At, "expected `@`")?;
        let (name, _) = self.expect_ident("expected builtin name after `@`")?;
        self.expect_punct(PunctuationId::LParen, "expected `(` after builtin name")?;

        if name == "cast" {
            let ty = self.parse_type()?;
            self.expect_punct(PunctuationId::Comma, "expected `,` after the target type of `@cast`")?;
            let expr = self.expression()?;
            self.match_punct(PunctuationId::Comma);
            self.expect_punct(PunctuationId::RParen, "expected `)` to close `@cast`")?;
            return Ok(Spanned::new(
                Expr::Cast(CastExpr {
                    ty,
                    expr: Box::new(expr),
                }),
                self.span_from(start),
            ));
        }

        let args = self.arguments()?;
        Ok(Spanned::new(Expr::Builtin(BuiltinCall { name, args }), self.span_from(start)))
    }

    // ========================================================================
    // Match
    // ========================================================================
    //
    // ExpectArms --`when`-->    InArm              --arm--> ExpectArms
    // ExpectArms --`default`--> ExpectDefaultOrEnd --arm--> Done (`}` next)
    // ExpectArms --`}`-->       Done
    //
    // A `default` arm followed by another arm is reported and the loop returns to ExpectArms. Anything else after it
    // is a missing `}`.

    fn match_expr(&mut self) -> ParseResult<Spanned<Expr>> {
        let start = self.expect_keyword(KeywordId::Match, "expected `match`")?;
        let subject = self.expression()?;
        self.expect_punct(PunctuationId::LBrace, "expected `{` after match subject")?;

        let mut arms: Vec<Spanned<MatchArm>> = Vec::new();
        let mut state = MatchState::ExpectArms;

        while state != MatchState::Done {
            state = match state {
                MatchState::ExpectArms => {
                    if self.match_punct(PunctuationId::RBrace) {
                        MatchState::Done
                    } else if self.check_keyword(KeywordId::When) {
                        MatchState::InArm
                    } else if self.check_keyword(KeywordId::Default) {
                        MatchState::ExpectDefaultOrEnd
                    } else {
                        return Err(self.unexpected("expected `when`, `default` or `}` in match"));
                    }
                }
                MatchState::InArm => {
                    arms.push(self.match_arm()?);
                    self.match_punct(PunctuationId::Comma);
                    MatchState::ExpectArms
                }
                MatchState::ExpectDefaultOrEnd => {
                    let arm = self.match_arm()?;
                    let arm_span = arm.span;
                    arms.push(arm);
                    self.match_punct(PunctuationId::Comma);
                    if self.match_punct(PunctuationId::RBrace) {
                        MatchState::Done
                    } else if self.check_keyword(KeywordId::When) || self.check_keyword(KeywordId::Default) {
                        self.record(
                            Diagnostic::syntax("`default` arm must be the last arm of a match", arm_span)
                                .with_hint("move the `default` arm after every `when` arm"),
                        );
                        MatchState::ExpectArms
                    } else {
                        return Err(self.unexpected("expected `}` after the `default` arm"));
                    }
                }
                MatchState::Done => MatchState::Done,
            };
        }

        Ok(Spanned::new(
            Expr::Match(MatchExpr {
                subject: Box::new(subject),
                arms,
            }),
            self.span_from(start),
        ))
    }

    /// `when pattern ==> body` or `default ==> body`
    fn match_arm(&mut self) -> ParseResult<Spanned<MatchArm>> {
        let start = self.peek().span;
        let pattern = if self.match_keyword(KeywordId::Default) {
            None
        } else {
            self.expect_keyword(KeywordId::When, "expected `when`")?;
            Some(self.expression()?)
        };
        self.expect_punct(PunctuationId::MatchArrow, "expected `==>` after match pattern")?;
        let body = self.arm_body()?;

        Ok(Spanned::new(
            MatchArm {
                is_default: pattern.is_none(),
                pattern,
                body,
            },
            self.span_from(start),
        ))
    }

    fn arm_body(&mut self) -> ParseResult<ArmBody> {
        if self.match_punct(PunctuationId::Ellipsis) {
            return Ok(ArmBody::Placeholder);
        }
        if self.check_punct(PunctuationId::LBrace) {
            return Ok(ArmBody::Block(self.block()?));
        }
        Ok(ArmBody::Statement(Box::new(self.statement()?)))
    }
}
