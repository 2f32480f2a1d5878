#[cfg(test)]
/// Parser unit tests.
///
/// These tests focus on correctness of specific syntactic forms and on the parser’s
/// error recovery behavior (avoiding cascaded errors).
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use adorad_core::lang::attributes::AttributeId;

    fn parse_ok(source: &str) -> Program {
        parse(source).unwrap_or_else(|diagnostics| panic!("unexpected diagnostics: {diagnostics:#?}"))
    }

    fn errors(output: &ParseOutput) -> Vec<&Diagnostic> {
        output.diagnostics.iter().filter(|d| d.is_error()).collect()
    }

    fn function(program: &Program, index: usize) -> &FunctionDecl {
        match &program.declarations[index].node {
            Declaration::Function(f) => f,
            other => panic!("Expected function, got {other:?}"),
        }
    }

    /// Statements of `func f() { <body> }`.
    fn body(source: &str) -> Vec<Statement> {
        let program = parse_ok(&format!("func f() {{\n{source}\n}}\n"));
        function(&program, 0)
            .body
            .node
            .statements
            .iter()
            .map(|s| s.node.clone())
            .collect()
    }

    /// The value of `x := <source>`.
    fn expr(source: &str) -> Expr {
        match body(&format!("x := {source}")).remove(0) {
            Statement::DeclareAssign(decl) => decl.value.node,
            other => panic!("Expected declare-assign, got {other:?}"),
        }
    }

    fn node(expr: Expr) -> Spanned<Expr> {
        Spanned::new(expr, Span::default())
    }

    fn ident(name: &str) -> Spanned<Expr> {
        node(Expr::Ident(name.to_string()))
    }

    fn int(value: u64) -> Spanned<Expr> {
        node(Expr::Literal(Literal::Int(value)))
    }

    fn binary(op: BinaryOp, lhs: Spanned<Expr>, rhs: Spanned<Expr>) -> Spanned<Expr> {
        node(Expr::Binary(BinaryExpr {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }))
    }

    // ---- declare vs assign ----

    #[test]
    fn test_declare_assign_and_assign_are_distinct() {
        let stmts = body("x := 1\nx = 1\nx += 2");
        match &stmts[0] {
            Statement::DeclareAssign(decl) => {
                assert_eq!(decl.name, "x");
                assert!(decl.ty.is_none());
                assert_eq!(decl.value, int(1));
            }
            other => panic!("Expected declare-assign, got {other:?}"),
        }
        match &stmts[1] {
            Statement::Assign(assign) => {
                assert_eq!(assign.op, AssignOp::Assign);
                assert_eq!(assign.target, ident("x"));
            }
            other => panic!("Expected assign, got {other:?}"),
        }
        match &stmts[2] {
            Statement::Assign(assign) => assert_eq!(assign.op, AssignOp::Add),
            other => panic!("Expected compound assign, got {other:?}"),
        }
    }

    #[test]
    fn test_bitwise_compound_assignments() {
        let ops: Vec<AssignOp> = body("x &= 1\nx |= 2\nx ^= 3\nx <<= 4\nx >>= 5\nx[0] >>= y")
            .into_iter()
            .map(|stmt| match stmt {
                Statement::Assign(assign) => assign.op,
                other => panic!("Expected assign, got {other:?}"),
            })
            .collect();
        assert_eq!(
            ops,
            [
                AssignOp::BitAnd,
                AssignOp::BitOr,
                AssignOp::BitXor,
                AssignOp::Shl,
                AssignOp::Shr,
                AssignOp::Shr
            ]
        );
        match &body("x >>= a >> 1")[0] {
            Statement::Assign(assign) => {
                assert_eq!(assign.target, ident("x"));
                assert_eq!(assign.value, binary(BinaryOp::Shr, ident("a"), int(1)));
            }
            other => panic!("Expected assign, got {other:?}"),
        }
    }

    #[test]
    fn test_separated_greater_than_is_not_shift_assign() {
        let output = parse_with_diagnostics("func f() {\n    x > >= 1\n}\n");
        assert_eq!(errors(&output).len(), 1);
        assert_eq!(errors(&output)[0].message, "expected expression, found `>=`");
    }

    #[test]
    fn test_typed_declaration() {
        match &body("limit: u32 = 5")[0] {
            Statement::DeclareAssign(decl) => {
                assert_eq!(decl.name, "limit");
                assert_eq!(decl.ty.as_ref().map(|t| t.node.clone()), Some(Type::simple("u32")));
            }
            other => panic!("Expected typed declare-assign, got {other:?}"),
        }
    }

    // ---- functions ----

    #[test]
    fn test_comptime_function_with_cast() {
        let program = parse_ok("[comptime] func add(a: i8, b: u32) -> u32 { return @cast(u32, a) + b }");
        let f = function(&program, 0);
        assert_eq!(f.name, "add");
        assert_eq!(f.modifiers, ModifierSet::from([Modifier::Attribute(AttributeId::Comptime)]));
        assert_eq!(f.params.len(), 2);
        assert_eq!(f.params[0].node.ty.node, Type::simple("i8"));
        assert_eq!(f.return_type.as_ref().map(|t| t.node.name()), Some("u32"));

        let Statement::Return(Some(value)) = &f.body.node.statements[0].node else {
            panic!("Expected return with a value");
        };
        let Expr::Binary(sum) = &value.node else {
            panic!("Expected binary expression, got {:?}", value.node);
        };
        assert_eq!(sum.op, BinaryOp::Add);
        assert_eq!(*sum.rhs, ident("b"));
        match &sum.lhs.node {
            Expr::Cast(cast) => {
                assert_eq!(cast.ty.node, Type::simple("u32"));
                assert_eq!(*cast.expr, ident("a"));
            }
            other => panic!("Expected cast, got {other:?}"),
        }
    }

    #[test]
    fn test_generic_function_with_where_clause() {
        let source = "export func hash<T, U>(value: T, seed: U) -> u64\nwhere T: {hash, eq}, U: {}\n{\n    return 0\n}\n";
        let program = parse_ok(source);
        let f = function(&program, 0);
        assert!(f.is_export());
        let generics: Vec<&str> = f.generics.iter().map(|g| g.node.name.as_str()).collect();
        assert_eq!(generics, ["T", "U"]);

        let clause = &f.where_clause.as_ref().expect("where clause").node;
        let t_bounds: Vec<&str> = clause.bounds_for("T").expect("T bounds").iter().map(String::as_str).collect();
        assert_eq!(t_bounds, ["eq", "hash"]);
        assert!(clause.bounds_for("U").expect("U bounds").is_empty());
    }

    #[test]
    fn test_function_without_return_type_and_trailing_commas() {
        let program = parse_ok("func main(a: u32, b: List<Map<K, V>>,) { x := 1; y := 2; }");
        let f = function(&program, 0);
        assert!(f.return_type.is_none());
        assert_eq!(f.params.len(), 2);
        assert_eq!(f.params[1].node.ty.node.to_string(), "List<Map<K, V>>");
        assert_eq!(f.body.node.statements.len(), 2);
    }

    #[test]
    fn test_unknown_and_duplicate_attributes_are_warnings() {
        let output = parse_with_diagnostics("[fast] [inline] [inline] func f() {}");
        assert!(!output.has_errors());
        let warnings: Vec<&Diagnostic> = output.warnings().collect();
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].message, "unknown attribute `[fast]`");
        assert!(warnings[0].hint.as_deref().unwrap_or_default().contains("`comptime`"));
        assert_eq!(warnings[1].message, "duplicate attribute `[inline]`");

        let f = function(&output.program, 0);
        assert_eq!(f.modifiers, ModifierSet::from([Modifier::Attribute(AttributeId::Inline)]));
    }

    #[test]
    fn test_branch_hint_attributes() {
        let program = parse_ok("[likely] func hot() {}\n[unlikely] [noinline] func cold() {}\n");
        assert!(function(&program, 0).has_attribute(AttributeId::Likely));
        let cold = function(&program, 1);
        assert_eq!(
            cold.modifiers,
            ModifierSet::from([
                Modifier::Attribute(AttributeId::NoInline),
                Modifier::Attribute(AttributeId::Unlikely),
            ])
        );
    }

    #[test]
    fn test_attribute_must_precede_function() {
        let output = parse_with_diagnostics("[inline] global { x := 1 }");
        let errors = errors(&output);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.starts_with("expected `func` after function modifiers"));
    }

    #[test]
    fn test_duplicate_generic_parameter() {
        let output = parse_with_diagnostics("func f<T, T>(a: T) {}");
        let errors = errors(&output);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "duplicate generic parameter `T`");
        assert_eq!(function(&output.program, 0).generics.len(), 1);
    }

    #[test]
    fn test_where_clause_on_unknown_parameter() {
        let output = parse_with_diagnostics("func f<T>(a: T) where U: {eq} {}");
        let errors = errors(&output);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("`U` is not a generic parameter"));
        let f = function(&output.program, 0);
        assert!(f.where_clause.as_ref().expect("where clause").node.predicates.is_empty());
    }

    #[test]
    fn test_repeated_where_predicate_merges_bounds() {
        let output = parse_with_diagnostics("func f<T>(a: T) where T: {eq}, T: {hash} {}");
        assert!(!output.has_errors());
        assert_eq!(output.warnings().count(), 1);
        let f = function(&output.program, 0);
        let clause = &f.where_clause.as_ref().expect("where clause").node;
        assert_eq!(clause.predicates.len(), 1);
        assert_eq!(clause.bounds_for("T").map(|b| b.len()), Some(2));
    }

    // ---- globals, enums, aliases, imports ----

    #[test]
    fn test_global_blocks_and_duplicate_names() {
        let source = "global {\n    a: u32 = 1\n    b := 2\n}\nglobal {\n    a := 3\n}\n";
        let output = parse_with_diagnostics(source);
        assert!(!output.has_errors());

        let warnings: Vec<&Diagnostic> = output.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("duplicate global `a`"));
        assert!(warnings[0].hint.as_deref().unwrap_or_default().contains("line 2"));
        assert_eq!(warnings[0].span.line, 6);

        match &output.program.declarations[0].node {
            Declaration::Global(block) => {
                let names: Vec<&str> = block.bindings.iter().map(|b| b.node.name.as_str()).collect();
                assert_eq!(names, ["a", "b"]);
                assert!(block.bindings[0].node.ty.is_some());
                assert!(block.bindings[1].node.ty.is_none());
            }
            other => panic!("Expected global block, got {other:?}"),
        }
    }

    #[test]
    fn test_enum_with_trailing_comma() {
        let program = parse_ok("Color = enum { Red, Green, }");
        match &program.declarations[0].node {
            Declaration::Enum(e) => {
                assert_eq!(e.name, "Color");
                let variants: Vec<&str> = e.variants.iter().map(|v| v.node.name.as_str()).collect();
                assert_eq!(variants, ["Red", "Green"]);
            }
            other => panic!("Expected enum, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_enum_reports_once_and_recovers() {
        let source = "Fruits = enum { Apple Mango }\nalias Fruits as DeliciousFruits\nfunc main() {}\n";
        let output = parse_with_diagnostics(source);
        let errors = errors(&output);
        assert_eq!(errors.len(), 1, "{errors:#?}");
        assert_eq!(
            errors[0].message,
            "expected `,` or `}` after enum variant, found identifier `Mango`"
        );
        assert_eq!(output.program.declarations.len(), 2);
        assert!(matches!(output.program.declarations[0].node, Declaration::Alias(_)));
        assert!(matches!(output.program.declarations[1].node, Declaration::Function(_)));
    }

    #[test]
    fn test_alias_direction() {
        let program = parse_ok("alias Fruits as DeliciousFruits");
        match &program.declarations[0].node {
            Declaration::Alias(alias) => {
                assert_eq!(alias.name, "DeliciousFruits");
                assert_eq!(alias.target, "Fruits");
            }
            other => panic!("Expected alias, got {other:?}"),
        }
        assert_eq!(program.declarations[0].span, Span::new(0, 31, 1, 1));
    }

    #[test]
    fn test_import_forms() {
        let program = parse_ok("import std::hash\nimport std::string as str\nfrom std::io import read, write as put\n");
        let kinds: Vec<&ImportKind> = program
            .declarations
            .iter()
            .map(|d| match &d.node {
                Declaration::Import(import) => &import.kind,
                other => panic!("Expected import, got {other:?}"),
            })
            .collect();

        match kinds[0] {
            ImportKind::Module { path, alias } => {
                assert_eq!(path.to_string(), "std::hash");
                assert!(alias.is_none());
            }
            other => panic!("Expected module import, got {other:?}"),
        }
        match kinds[1] {
            ImportKind::Module { alias, .. } => assert_eq!(alias.as_deref(), Some("str")),
            other => panic!("Expected module import, got {other:?}"),
        }
        match kinds[2] {
            ImportKind::From { module, items } => {
                assert_eq!(module.to_string(), "std::io");
                assert_eq!(items.len(), 2);
                assert_eq!(items[1].alias.as_deref(), Some("put"));
            }
            other => panic!("Expected from-import, got {other:?}"),
        }
    }

    // ---- match ----

    #[test]
    fn test_match_with_default_and_placeholders() {
        let source = r"
func next() {
    match parser.curr_tok {
        when '\n' ==> ...
        when '\v' ==> ...
        default ==> ...
    }
}
";
        let program = parse_ok(source);
        let f = function(&program, 0);
        let Statement::Expr(value) = &f.body.node.statements[0].node else {
            panic!("Expected expression statement");
        };
        let Expr::Match(m) = &value.node else {
            panic!("Expected match, got {:?}", value.node);
        };

        assert_eq!(*m.subject, node(Expr::Field(Box::new(ident("parser")), "curr_tok".to_string())));
        assert_eq!(m.arms.len(), 3);
        assert_eq!(m.arms[0].node.pattern, Some(node(Expr::Literal(Literal::Char('\n')))));
        assert_eq!(m.arms[1].node.pattern, Some(node(Expr::Literal(Literal::Char('\x0b')))));
        assert!(!m.arms[0].node.is_default);
        assert!(m.arms[2].node.is_default);
        assert!(m.arms[2].node.pattern.is_none());
        assert!(m.arms.iter().all(|arm| arm.node.body == ArmBody::Placeholder));
    }

    #[test]
    fn test_match_arm_bodies() {
        let stmts = body("y := match x {\n    when 1 ==> return 2,\n    when 2 ==> { z := 1 }\n    default ==> ...\n}");
        let Statement::DeclareAssign(decl) = &stmts[0] else {
            panic!("Expected declare-assign");
        };
        let Expr::Match(m) = &decl.value.node else {
            panic!("Expected match");
        };
        assert!(matches!(&m.arms[0].node.body, ArmBody::Statement(s) if matches!(s.node, Statement::Return(Some(_)))));
        assert!(matches!(&m.arms[1].node.body, ArmBody::Block(b) if b.node.statements.len() == 1));
    }

    #[test]
    fn test_misplaced_default_is_reported_and_kept() {
        let source = "func f() {\n    match x {\n        default ==> ...\n        when 1 ==> ...\n    }\n}\n";
        let output = parse_with_diagnostics(source);
        let errors = errors(&output);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "`default` arm must be the last arm of a match");
        assert_eq!(errors[0].span.line, 3);

        let f = function(&output.program, 0);
        let Statement::Expr(value) = &f.body.node.statements[0].node else {
            panic!("Expected expression statement");
        };
        let Expr::Match(m) = &value.node else {
            panic!("Expected match");
        };
        assert_eq!(m.arms.len(), 2);
        assert!(m.arms[0].node.is_default);
        assert!(!m.arms[1].node.is_default);
    }

    // ---- expressions ----

    #[test]
    fn test_precedence_and_associativity() {
        assert_eq!(
            node(expr("1 + 2 * 3")),
            binary(BinaryOp::Add, int(1), binary(BinaryOp::Mul, int(2), int(3)))
        );
        assert_eq!(
            node(expr("2 ** 3 ** 2")),
            binary(BinaryOp::Pow, int(2), binary(BinaryOp::Pow, int(3), int(2)))
        );
        assert_eq!(
            node(expr("a - b - c")),
            binary(BinaryOp::Sub, binary(BinaryOp::Sub, ident("a"), ident("b")), ident("c"))
        );
        assert_eq!(
            node(expr("(1 + 2) * 3")),
            binary(BinaryOp::Mul, binary(BinaryOp::Add, int(1), int(2)), int(3))
        );
        assert_eq!(node(expr("a >> 2")), binary(BinaryOp::Shr, ident("a"), int(2)));
        assert_eq!(
            node(expr("-a.b")),
            node(Expr::Unary(
                UnaryOp::Neg,
                Box::new(node(Expr::Field(Box::new(ident("a")), "b".into())))
            ))
        );
    }

    #[test]
    fn test_generic_call_versus_comparison() {
        match expr("max<u32>(x, y)") {
            Expr::Call(call) => {
                assert_eq!(*call.callee, ident("max"));
                assert_eq!(call.type_args.len(), 1);
                assert_eq!(call.type_args[0].node, Type::simple("u32"));
                assert_eq!(call.args, vec![ident("x"), ident("y")]);
            }
            other => panic!("Expected generic call, got {other:?}"),
        }
        assert_eq!(node(expr("x < y")), binary(BinaryOp::Lt, ident("x"), ident("y")));
        assert_eq!(
            node(expr("x < y && y > z")),
            binary(
                BinaryOp::And,
                binary(BinaryOp::Lt, ident("x"), ident("y")),
                binary(BinaryOp::Gt, ident("y"), ident("z"))
            )
        );
    }

    #[test]
    fn test_nested_generic_and_method_calls() {
        match expr("parser.make<Map<K, List<V>>>()") {
            Expr::Call(call) => {
                assert!(matches!(call.callee.node, Expr::Field(..)));
                assert_eq!(call.type_args[0].node.to_string(), "Map<K, List<V>>");
                assert!(call.args.is_empty());
            }
            other => panic!("Expected generic call, got {other:?}"),
        }
    }

    #[test]
    fn test_call_and_index_need_same_line() {
        let stmts = body("x := f\n(y)\nz := a\n[0]");
        assert_eq!(stmts.len(), 3);
        assert!(matches!(&stmts[1], Statement::Expr(e) if e.node == Expr::Ident("y".into())));
        assert_eq!(body("x := f(y)[0]").len(), 1);
    }

    #[test]
    fn test_interpolated_string_parts() {
        match expr("f\"Hello {name}, you are {age + 1}!\"") {
            Expr::InterpolatedString(parts) => {
                assert_eq!(parts.len(), 5);
                assert_eq!(parts[0], InterpolatedPart::Text("Hello ".into()));
                assert_eq!(parts[1], InterpolatedPart::Expr(ident("name")));
                assert_eq!(parts[2], InterpolatedPart::Text(", you are ".into()));
                assert!(matches!(&parts[3], InterpolatedPart::Expr(e) if matches!(e.node, Expr::Binary(_))));
                assert_eq!(parts[4], InterpolatedPart::Text("!".into()));
            }
            other => panic!("Expected interpolated string, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_interpolation_is_an_error() {
        let output = parse_with_diagnostics("func f() {\n    s := f\"a{}b\"\n}\n");
        let errors = errors(&output);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "empty interpolation in f-string");

        let f = function(&output.program, 0);
        match &f.body.node.statements[0].node {
            Statement::DeclareAssign(decl) => {
                assert_eq!(decl.value.node, Expr::InterpolatedString(vec![InterpolatedPart::Text("ab".into())]));
            }
            other => panic!("Expected declare-assign, got {other:?}"),
        }
    }

    #[test]
    fn test_builtin_call() {
        assert_eq!(
            expr("@sizeof(u32)"),
            Expr::Builtin(BuiltinCall {
                name: "sizeof".into(),
                args: vec![ident("u32")],
            })
        );
    }

    // ---- statements ----

    #[test]
    fn test_return_value_must_be_on_the_same_line() {
        let stmts = body("return\nx := 1");
        assert_eq!(stmts[0], Statement::Return(None));
        assert!(matches!(stmts[1], Statement::DeclareAssign(_)));
        assert_eq!(body("return x")[0], Statement::Return(Some(ident("x"))));
    }

    #[test]
    fn test_if_else_chain_with_unbraced_bodies() {
        let stmts = body("if a < b return a\nelse if a == b { return 0 } else return b");
        let Statement::If(stmt) = &stmts[0] else {
            panic!("Expected if");
        };
        assert_eq!(stmt.condition, binary(BinaryOp::Lt, ident("a"), ident("b")));
        assert_eq!(stmt.then_block.node.statements.len(), 1);
        let Some(ElseBranch::If(nested)) = &stmt.else_branch else {
            panic!("Expected else-if");
        };
        assert!(matches!(&nested.node.else_branch, Some(ElseBranch::Block(b)) if b.node.statements.len() == 1));
    }

    #[test]
    fn test_loop_break_continue_placeholder() {
        let stmts = body("loop {\n    break\n    continue\n    ...\n}");
        let Statement::Loop(looped) = &stmts[0] else {
            panic!("Expected loop");
        };
        let inner: Vec<&Statement> = looped.body.node.statements.iter().map(|s| &s.node).collect();
        assert_eq!(inner, [&Statement::Break, &Statement::Continue, &Statement::Placeholder]);
    }

    #[test]
    fn test_statement_spans_nest_inside_body() {
        let program = parse_ok("func f() {\n    x := g(1, 2)\n    return x\n}\n");
        let f = function(&program, 0);
        assert!(program.declarations[0].span.contains(&f.body.span));
        for stmt in &f.body.node.statements {
            assert!(f.body.span.contains(&stmt.span));
        }
        assert_eq!(f.body.node.statements[0].span.line, 2);
        assert_eq!(f.body.node.statements[0].span.column, 5);
    }

    // ---- recovery ----

    #[test]
    fn test_invalid_assignment_target() {
        let output = parse_with_diagnostics("func f() {\n    g() = 1\n}\n");
        let errors = errors(&output);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "invalid assignment target");
    }

    #[test]
    fn test_colon_eq_after_field_is_an_error() {
        let output = parse_with_diagnostics("func f() {\n    a.b := 1\n}\n");
        let errors = errors(&output);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.starts_with("`:=` can only declare a plain identifier"));
    }

    #[test]
    fn test_statement_recovery_continues_in_block() {
        let source = "func f() {\n    x := )\n    y := 2\n    z = (\n}\nfunc g() {}\n";
        let output = parse_with_diagnostics(source);
        let errors = errors(&output);
        assert_eq!(errors.len(), 2, "{errors:#?}");
        assert_eq!(errors[0].message, "expected expression, found `)`");
        assert_eq!(errors[1].message, "expected expression, found `}`");

        assert_eq!(output.program.declarations.len(), 2);
        let f = function(&output.program, 0);
        assert_eq!(f.body.node.statements.len(), 1);
    }

    #[test]
    fn test_top_level_garbage_recovers_at_next_declaration() {
        let output = parse_with_diagnostics("x = 5\nfunc f() {}\n");
        let errors = errors(&output);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "expected a declaration, found identifier `x`");
        assert_eq!(output.program.declarations.len(), 1);
    }

    #[test]
    fn test_unclosed_block_reports_end_of_file() {
        let output = parse_with_diagnostics("func f() {\n    x := 1\n");
        let errors = errors(&output);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "expected `}` to close block, found end of file");
    }

    #[test]
    fn test_unclosed_nested_blocks_report_once() {
        for source in [
            "func f() {\n if x {\n y := 1\n",
            "func f() {\n loop {\n",
            "func f() {\n if a {\n loop {\n",
        ] {
            let output = parse_with_diagnostics(source);
            let errors = errors(&output);
            assert_eq!(errors.len(), 1, "{source:?}: {errors:#?}");
            assert_eq!(errors[0].message, "expected `}` to close block, found end of file");
            assert_eq!(errors[0].span.start, source.len());
        }
    }

    #[test]
    fn test_unclosed_call_in_block_reports_once() {
        let output = parse_with_diagnostics("func f() {\n x := g(\n");
        let errors = errors(&output);
        assert_eq!(errors.len(), 1, "{errors:#?}");
        assert_eq!(errors[0].message, "expected expression, found end of file");
        assert_eq!(output.program.declarations.len(), 1);
    }

    #[test]
    fn test_unclosed_match_after_default_arm() {
        let output = parse_with_diagnostics("func f() {\n match x {\n default ==> ...\n");
        let errors = errors(&output);
        assert_eq!(errors.len(), 1, "{errors:#?}");
        assert_eq!(errors[0].message, "expected `}` after the `default` arm, found end of file");
    }

    #[test]
    fn test_distinct_errors_at_different_tokens_are_kept() {
        let output = parse_with_diagnostics("func f() {\n    x := )\n    y := (\n");
        let messages: Vec<&str> = errors(&output).iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            ["expected expression, found `)`", "expected expression, found end of file"]
        );
    }

    #[test]
    fn test_invalid_token_error_is_not_duplicated() {
        let output = parse_with_diagnostics("func f() {\n    x := $\n    y := 2\n}\n");
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].kind, DiagnosticKind::Lex);
        assert_eq!(function(&output.program, 0).body.node.statements.len(), 1);
    }

    #[test]
    fn test_lexer_errors_survive_speculative_rollback() {
        let output = parse_with_diagnostics("func f() {\n    x := a < $ > (b)\n}\n");
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].kind, DiagnosticKind::Lex);
    }

    #[test]
    fn test_diagnostics_are_ordered_by_position() {
        let source = "func f() {\n    x := )\n}\nglobal { a := 1 }\nglobal { a := 2 }\nFruits = enum { A B }\n";
        let output = parse_with_diagnostics(source);
        let starts: Vec<usize> = output.diagnostics.iter().map(|d| d.span.start).collect();
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        assert_eq!(starts, sorted);
        assert_eq!(output.diagnostics.len(), 3);
        assert!(output.has_errors());
    }

    #[test]
    fn test_parse_program_from_peeked_cursor() {
        let mut cursor = Cursor::new("alias A as B\nimport std::io\n");
        assert_eq!(cursor.peek(1).kind, TokenKind::Ident("A".into()));
        let (program, diagnostics) = parse_program(cursor);
        assert!(diagnostics.is_empty(), "{diagnostics:#?}");
        assert_eq!(program.declarations.len(), 2);
    }

    #[test]
    fn test_parse_result_ok_with_only_warnings() {
        assert!(parse("[unknown] func f() {}").is_ok());
        assert!(parse("func f() { x := }").is_err());
    }
}
