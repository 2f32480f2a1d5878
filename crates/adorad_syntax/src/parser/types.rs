/// Type parsing.
///
/// Types are a `::`-separated path with optional `<...>` arguments: `u32`, `std::string::String`, `Map<K, List<V>>`.
/// The lexer never joins `>>`, so nested argument lists close one `>` at a time.
impl<'a> Parser<'a> {
    fn parse_type(&mut self) -> ParseResult<Spanned<Type>> {
        let (first, start) = self.expect_ident("expected type")?;
        let mut path = vec![first];
        while self.match_punct(PunctuationId::ColonColon) {
            path.push(self.expect_ident("expected type name after `::`")?.0);
        }

        let mut args = Vec::new();
        if self.match_op(OperatorId::Lt) {
            args = self.type_list()?;
            self.expect_op(OperatorId::Gt, "expected `>` to close type arguments")?;
        }

        Ok(Spanned::new(Type { path, args }, self.span_from(start)))
    }

    /// One or more comma-separated types.
    fn type_list(&mut self) -> ParseResult<Vec<Spanned<Type>>> {
        let mut types = vec![self.parse_type()?];
        while self.match_punct(PunctuationId::Comma) {
            types.push(self.parse_type()?);
        }
        Ok(types)
    }
}
