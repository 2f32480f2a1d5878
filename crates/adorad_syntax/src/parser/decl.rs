/// Declaration parsing.
///
/// This chunk parses top-level declarations:
/// - imports (`import a::b [as c]`, `from a::b import x, y as z`)
/// - functions, including `[attribute]` modifiers, `export`, generics and `where` clauses
/// - `global { ... }` blocks
/// - enums (`Name = enum { A, B }`)
/// - aliases (`alias Target as Name`)
impl<'a> Parser<'a> {
    // ========================================================================
    // Declarations
    // ========================================================================

    fn declaration(&mut self) -> ParseResult<Spanned<Declaration>> {
        let start = self.peek().span;
        let kind = self.peek().kind.clone();

        let decl = match kind {
            TokenKind::Keyword(KeywordId::Import | KeywordId::From) => Declaration::Import(self.import_decl()?),
            TokenKind::Keyword(KeywordId::Func | KeywordId::Export)
            | TokenKind::Punctuation(PunctuationId::LBracket) => Declaration::Function(self.function_decl()?),
            TokenKind::Keyword(KeywordId::Global) => Declaration::Global(self.global_block()?),
            TokenKind::Keyword(KeywordId::Alias) => Declaration::Alias(self.alias_decl()?),
            TokenKind::Ident(_) if self.peek_nth(1).kind.is_operator(OperatorId::Eq) => {
                Declaration::Enum(self.enum_decl()?)
            }
            _ => return Err(self.unexpected("expected a declaration")),
        };

        Ok(Spanned::new(decl, self.span_from(start)))
    }

    // ---- imports ----

    fn import_decl(&mut self) -> ParseResult<ImportDecl> {
        if self.match_keyword(KeywordId::From) {
            let module = self.import_path()?;
            self.expect_keyword(KeywordId::Import, "expected `import` after module path")?;
            let mut items = vec![self.import_item()?];
            while self.match_punct(PunctuationId::Comma) {
                items.push(self.import_item()?);
            }
            return Ok(ImportDecl {
                kind: ImportKind::From { module, items },
            });
        }

        self.expect_keyword(KeywordId::Import, "expected `import`")?;
        let path = self.import_path()?;
        let alias = if self.match_keyword(KeywordId::As) {
            Some(self.expect_ident("expected a name after `as`")?.0)
        } else {
            None
        };
        Ok(ImportDecl {
            kind: ImportKind::Module { path, alias },
        })
    }

    fn import_path(&mut self) -> ParseResult<ImportPath> {
        let mut segments = vec![self.expect_ident("expected module path")?.0];
        while self.match_punct(PunctuationId::ColonColon) {
            segments.push(self.expect_ident("expected module name after `::`")?.0);
        }
        Ok(ImportPath { segments })
    }

    fn import_item(&mut self) -> ParseResult<ImportItem> {
        let (name, _) = self.expect_ident("expected name to import")?;
        let alias = if self.match_keyword(KeywordId::As) {
            Some(self.expect_ident("expected a name after `as`")?.0)
        } else {
            None
        };
        Ok(ImportItem { name, alias })
    }

    // ---- functions ----

    fn function_decl(&mut self) -> ParseResult<FunctionDecl> {
        let mut modifiers = ModifierSet::new();
        while self.check_punct(PunctuationId::LBracket) {
            self.attribute(&mut modifiers)?;
        }
        if self.match_keyword(KeywordId::Export) {
            modifiers.insert(Modifier::Export);
        }
        let func_msg = if modifiers.is_empty() {
            "expected `func`"
        } else {
            "expected `func` after function modifiers"
        };
        self.expect_keyword(KeywordId::Func, func_msg)?;

        let (name, _) = self.expect_ident("expected function name")?;
        let generics = if self.check_op(OperatorId::Lt) {
            self.generic_params()?
        } else {
            Vec::new()
        };
        self.expect_punct(PunctuationId::LParen, "expected `(` after function name")?;
        let params = self.params()?;
        let return_type = if self.match_punct(PunctuationId::Arrow) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let where_clause = if self.check_keyword(KeywordId::Where) {
            Some(self.where_clause(&generics)?)
        } else {
            None
        };
        let body = self.block()?;

        Ok(FunctionDecl {
            modifiers,
            name,
            generics,
            params,
            return_type,
            where_clause,
            body,
        })
    }

    /// `[name]`. Unknown and repeated attributes are warnings; the function still parses.
    fn attribute(&mut self, modifiers: &mut ModifierSet) -> ParseResult<()> {
        let open = self.expect_punct(PunctuationId::LBracket, "expected `[`")?;
        let (name, _) = self.expect_ident("expected attribute name after `[`")?;
        self.expect_punct(PunctuationId::RBracket, "expected `]` to close attribute")?;
        let span = self.span_from(open);

        match attributes::from_str(&name) {
            Some(id) => {
                if !modifiers.insert(Modifier::Attribute(id)) {
                    self.record(
                        Diagnostic::warning(format!("duplicate attribute `[{name}]`"), span)
                            .with_hint("remove the repeated attribute"),
                    );
                }
            }
            None => {
                let known = attributes::ATTRIBUTES
                    .iter()
                    .map(|a| format!("`{}`", a.canonical))
                    .collect::<Vec<_>>()
                    .join(", ");
                self.record(
                    Diagnostic::warning(format!("unknown attribute `[{name}]`"), span)
                        .with_hint(format!("known attributes are {known}")),
                );
            }
        }
        Ok(())
    }

    fn generic_params(&mut self) -> ParseResult<Vec<Spanned<GenericParam>>> {
        self.expect_op(OperatorId::Lt, "expected `<`")?;
        let mut generics: Vec<Spanned<GenericParam>> = Vec::new();
        loop {
            let (name, span) = self.expect_ident("expected generic parameter name")?;
            match generics.iter().find(|g| g.node.name == name) {
                Some(first) => {
                    let hint = format!("`{name}` is already declared on line {}", first.span.line);
                    self.record(
                        Diagnostic::syntax(format!("duplicate generic parameter `{name}`"), span).with_hint(hint),
                    );
                }
                None => generics.push(Spanned::new(GenericParam { name }, span)),
            }
            if !self.match_punct(PunctuationId::Comma) || self.check_op(OperatorId::Gt) {
                break;
            }
        }
        self.expect_op(OperatorId::Gt, "expected `>` to close generic parameters")?;
        Ok(generics)
    }

    /// Parameter list; the opening `(` has been consumed.
    fn params(&mut self) -> ParseResult<Vec<Spanned<Param>>> {
        let mut params = Vec::new();
        while !self.check_punct(PunctuationId::RParen) {
            let (name, start) = self.expect_ident("expected parameter name")?;
            self.expect_punct(PunctuationId::Colon, "expected `:` after parameter name")?;
            let ty = self.parse_type()?;
            params.push(Spanned::new(Param { name, ty }, self.span_from(start)));
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_punct(PunctuationId::RParen, "expected `,` or `)` in parameter list")?;
        Ok(params)
    }

    /// `where T: {a, b}, U: {c}`
    ///
    /// ## Notes
    /// - A predicate on a name that is not one of `generics` is reported and dropped.
    /// - A parameter constrained twice has its bounds merged into the first predicate.
    fn where_clause(&mut self, generics: &[Spanned<GenericParam>]) -> ParseResult<Spanned<WhereClause>> {
        let start = self.expect_keyword(KeywordId::Where, "expected `where`")?;
        let mut predicates: Vec<Spanned<WherePredicate>> = Vec::new();

        loop {
            let (param, param_span) = self.expect_ident("expected generic parameter name in `where` clause")?;
            self.expect_punct(PunctuationId::Colon, "expected `:` after constrained parameter")?;
            let bounds = self.bound_set()?;
            let span = self.span_from(param_span);

            if !generics.iter().any(|g| g.node.name == param) {
                self.record(
                    Diagnostic::syntax(format!("`{param}` is not a generic parameter of this function"), param_span)
                        .with_hint(format!("declare it in the function's `<...>` list, e.g. `<{param}>`")),
                );
            } else if let Some(first) = predicates.iter_mut().find(|p| p.node.param == param) {
                first.node.bounds.extend(bounds);
                self.record(
                    Diagnostic::warning(format!("`{param}` is constrained more than once"), span)
                        .with_hint("its bounds were merged into the first predicate"),
                );
            } else {
                predicates.push(Spanned::new(WherePredicate { param, bounds }, span));
            }

            if !self.match_punct(PunctuationId::Comma) || self.check_punct(PunctuationId::LBrace) {
                break;
            }
        }

        Ok(Spanned::new(WhereClause { predicates }, self.span_from(start)))
    }

    /// `{a, b}`; may be empty.
    fn bound_set(&mut self) -> ParseResult<BTreeSet<Ident>> {
        self.expect_punct(PunctuationId::LBrace, "expected `{` to open bound set")?;
        let mut bounds = BTreeSet::new();
        while !self.check_punct(PunctuationId::RBrace) {
            bounds.insert(self.expect_ident("expected bound name")?.0);
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_punct(PunctuationId::RBrace, "expected `,` or `}` in bound set")?;
        Ok(bounds)
    }

    // ---- globals ----

    fn global_block(&mut self) -> ParseResult<GlobalBlock> {
        self.expect_keyword(KeywordId::Global, "expected `global`")?;
        self.expect_punct(PunctuationId::LBrace, "expected `{` after `global`")?;

        let mut bindings = Vec::new();
        loop {
            while self.match_punct(PunctuationId::Semicolon) {}
            if self.check_punct(PunctuationId::RBrace) || self.is_at_end() {
                break;
            }
            let binding = self.global_binding()?;
            self.note_global(&binding);
            bindings.push(binding);
        }

        self.expect_punct(PunctuationId::RBrace, "expected `}` to close `global` block")?;
        Ok(GlobalBlock { bindings })
    }

    /// `name: T = expr` or `name := expr`
    fn global_binding(&mut self) -> ParseResult<Spanned<GlobalVarDecl>> {
        let (name, start) = self.expect_ident("expected global name")?;
        let ty = if self.match_op(OperatorId::ColonEq) {
            None
        } else {
            self.expect_punct(PunctuationId::Colon, "expected `:` or `:=` after global name")?;
            let ty = self.parse_type()?;
            self.expect_op(OperatorId::Eq, "expected `=` after global type")?;
            Some(ty)
        };
        let value = self.expression()?;
        Ok(Spanned::new(GlobalVarDecl { name, ty, value }, self.span_from(start)))
    }

    /// Warn on a global name already bound anywhere earlier in the program.
    fn note_global(&mut self, binding: &Spanned<GlobalVarDecl>) {
        let name = &binding.node.name;
        match self.globals_seen.get(name).copied() {
            Some(first) => self.record(
                Diagnostic::warning(format!("duplicate global `{name}`; the first declaration wins"), binding.span)
                    .with_hint(format!("`{name}` was first declared on line {}", first.line)),
            ),
            None => {
                self.globals_seen.insert(name.clone(), binding.span);
            }
        }
    }

    // ---- enums and aliases ----

    fn enum_decl(&mut self) -> ParseResult<EnumDecl> {
        let (name, _) = self.expect_ident("expected enum name")?;
        self.expect_op(OperatorId::Eq, "expected `=` after enum name")?;
        self.expect_keyword(KeywordId::Enum, "expected `enum` after `=`")?;
        self.expect_punct(PunctuationId::LBrace, "expected `{` to open enum body")?;

        let mut variants: Vec<Spanned<EnumVariant>> = Vec::new();
        while !self.check_punct(PunctuationId::RBrace) {
            let (variant, span) = self.expect_ident("expected enum variant name")?;
            match variants.iter().find(|v| v.node.name == variant) {
                Some(first) => {
                    let hint = format!("`{variant}` is already declared on line {}", first.span.line);
                    self.record(
                        Diagnostic::syntax(format!("duplicate enum variant `{variant}`"), span).with_hint(hint),
                    );
                }
                None => variants.push(Spanned::new(EnumVariant { name: variant }, span)),
            }
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }

        self.expect_punct(PunctuationId::RBrace, "expected `,` or `}` after enum variant")?;
        Ok(EnumDecl { name, variants })
    }

    /// `alias Target as Name`: `Name` becomes another name for `Target`.
    fn alias_decl(&mut self) -> ParseResult<AliasDecl> {
        self.expect_keyword(KeywordId::Alias, "expected `alias`")?;
        let (target, _) = self.expect_ident("expected the name to alias")?;
        self.expect_keyword(KeywordId::As, "expected `as` after alias target")?;
        let (name, _) = self.expect_ident("expected the new name after `as`")?;
        Ok(AliasDecl { name, target })
    }
}
