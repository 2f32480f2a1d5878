//! Core formatting logic for Adorad source code
//!
//! Walks the AST and emits canonical source. The output is built to read back as the same tree:
//! - parentheses appear only where precedence or associativity needs them, except around nested comparisons and
//!   around `<` comparisons in argument lists, where the parser could otherwise see a generic call
//! - string, char and f-string text is re-escaped so the lexer cooks it back to the same value
//! - every block is braced, including single-statement `if` bodies

use std::fmt::Write as _;

use super::config::FormatConfig;
use super::writer::FormatWriter;
use crate::ast::*;
use crate::lang::operators::Associativity;

/// Formatter that transforms AST back to formatted source code
pub struct Formatter {
    writer: FormatWriter,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(FormatConfig::default())
    }
}

impl Formatter {
    pub fn new(config: FormatConfig) -> Self {
        Self {
            writer: FormatWriter::new(config),
        }
    }

    /// Format a program and return the formatted source
    pub fn format(mut self, program: &Program) -> String {
        self.format_program(program);
        self.writer.finish()
    }

    // ========================================================================
    // Program
    // ========================================================================

    fn format_program(&mut self, program: &Program) {
        let blank_lines = self.writer.config().blank_lines_top_level;
        let mut previous: Option<&Declaration> = None;

        for decl in &program.declarations {
            if let Some(prev) = previous {
                // Consecutive imports stay together
                let import_run = matches!(prev, Declaration::Import(_)) && matches!(decl.node, Declaration::Import(_));
                if !import_run {
                    self.writer.blank_lines(blank_lines);
                }
            }
            self.format_declaration(&decl.node);
            previous = Some(&decl.node);
        }
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn format_declaration(&mut self, decl: &Declaration) {
        match decl {
            Declaration::Import(import) => self.format_import(import),
            Declaration::Function(func) => self.format_function(func),
            Declaration::Global(global) => self.format_global(global),
            Declaration::Enum(en) => self.format_enum(en),
            Declaration::Alias(alias) => {
                self.writer.writeln(&format!("alias {} as {}", alias.target, alias.name));
            }
        }
    }

    fn format_import(&mut self, import: &ImportDecl) {
        match &import.kind {
            ImportKind::Module { path, alias } => {
                self.writer.write(&format!("import {path}"));
                if let Some(alias) = alias {
                    self.writer.write(" as ");
                    self.writer.write(alias);
                }
            }
            ImportKind::From { module, items } => {
                self.writer.write(&format!("from {module} import "));
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.writer.write(", ");
                    }
                    self.writer.write(&item.name);
                    if let Some(alias) = &item.alias {
                        self.writer.write(" as ");
                        self.writer.write(alias);
                    }
                }
            }
        }
        self.writer.newline();
    }

    fn format_function(&mut self, func: &FunctionDecl) {
        // Attributes must precede `export`
        for modifier in &func.modifiers {
            if let Modifier::Attribute(_) = modifier {
                self.writer.write(&format!("{modifier} "));
            }
        }
        if func.is_export() {
            self.writer.write("export ");
        }

        self.writer.write("func ");
        self.writer.write(&func.name);
        if !func.generics.is_empty() {
            let names: Vec<&str> = func.generics.iter().map(|g| g.node.name.as_str()).collect();
            self.writer.write(&format!("<{}>", names.join(", ")));
        }

        let params: Vec<String> = func
            .params
            .iter()
            .map(|p| format!("{}: {}", p.node.name, p.node.ty.node))
            .collect();
        self.writer.write(&format!("({})", params.join(", ")));

        if let Some(ret) = &func.return_type {
            self.writer.write(&format!(" -> {}", ret.node));
        }

        match &func.where_clause {
            Some(clause) if !clause.node.predicates.is_empty() => {
                self.writer.newline();
                self.writer.writeln("where");
                self.writer.indent();
                let count = clause.node.predicates.len();
                for (i, predicate) in clause.node.predicates.iter().enumerate() {
                    let bounds: Vec<&str> = predicate.node.bounds.iter().map(String::as_str).collect();
                    self.writer
                        .write(&format!("{}: {{{}}}", predicate.node.param, bounds.join(", ")));
                    if i + 1 < count {
                        self.writer.write(",");
                    }
                    self.writer.newline();
                }
                self.writer.dedent();
            }
            _ => self.writer.write(" "),
        }

        self.format_block(&func.body.node);
        self.writer.newline();
    }

    fn format_global(&mut self, global: &GlobalBlock) {
        if global.bindings.is_empty() {
            self.writer.writeln("global {}");
            return;
        }

        self.writer.writeln("global {");
        self.writer.indent();
        for binding in &global.bindings {
            let binding = &binding.node;
            self.format_binding(&binding.name, binding.ty.as_ref(), &binding.value.node);
            self.writer.newline();
        }
        self.writer.dedent();
        self.writer.writeln("}");
    }

    fn format_enum(&mut self, en: &EnumDecl) {
        if en.variants.is_empty() {
            self.writer.writeln(&format!("{} = enum {{}}", en.name));
            return;
        }
        let variants: Vec<&str> = en.variants.iter().map(|v| v.node.name.as_str()).collect();
        self.writer
            .writeln(&format!("{} = enum {{ {} }}", en.name, variants.join(", ")));
    }

    // ========================================================================
    // Blocks and statements
    // ========================================================================

    /// Writes `{ ... }` and leaves the cursor just after `}`.
    fn format_block(&mut self, block: &Block) {
        if block.statements.is_empty() {
            self.writer.write("{}");
            return;
        }

        self.writer.write("{");
        self.writer.newline();
        self.writer.indent();
        for stmt in &block.statements {
            self.format_statement(&stmt.node);
            self.writer.newline();
        }
        self.writer.dedent();
        self.writer.write("}");
    }

    fn format_binding(&mut self, name: &str, ty: Option<&Spanned<Type>>, value: &Expr) {
        self.writer.write(name);
        match ty {
            Some(ty) => self.writer.write(&format!(": {} = ", ty.node)),
            None => self.writer.write(" := "),
        }
        self.format_expr(value);
    }

    fn format_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::DeclareAssign(decl) => self.format_binding(&decl.name, decl.ty.as_ref(), &decl.value.node),
            Statement::Assign(assign) => {
                self.format_expr(&assign.target.node);
                self.writer.write(&format!(" {} ", assign.op));
                self.format_expr(&assign.value.node);
            }
            Statement::Return(None) => self.writer.write("return"),
            Statement::Return(Some(value)) => {
                self.writer.write("return ");
                self.format_expr(&value.node);
            }
            Statement::If(stmt) => self.format_if(stmt),
            Statement::Loop(looped) => {
                self.writer.write("loop ");
                self.format_block(&looped.body.node);
            }
            Statement::Break => self.writer.write("break"),
            Statement::Continue => self.writer.write("continue"),
            Statement::Placeholder => self.writer.write("..."),
            // A leading `-` on a new line would continue the previous statement as a subtraction
            Statement::Expr(expr) if starts_with_minus(&expr.node) => self.format_parenthesized(&expr.node),
            Statement::Expr(expr) => self.format_expr(&expr.node),
        }
    }

    fn format_if(&mut self, stmt: &IfStmt) {
        self.writer.write("if ");
        self.format_expr(&stmt.condition.node);
        self.writer.write(" ");
        self.format_block(&stmt.then_block.node);

        match &stmt.else_branch {
            None => {}
            Some(ElseBranch::Block(block)) => {
                self.writer.write(" else ");
                self.format_block(&block.node);
            }
            Some(ElseBranch::If(nested)) => {
                self.writer.write(" else ");
                self.format_if(&nested.node);
            }
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn format_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(name) => self.writer.write(name),
            Expr::Literal(lit) => self.writer.write(&render_literal(lit)),
            Expr::InterpolatedString(parts) => self.format_interpolated(parts),
            Expr::Unary(op, operand) => {
                self.writer.write(&op.to_string());
                if matches!(operand.node, Expr::Binary(_)) {
                    self.format_parenthesized(&operand.node);
                } else {
                    self.format_expr(&operand.node);
                }
            }
            Expr::Binary(binary) => self.format_binary(binary),
            Expr::Call(call) => {
                self.format_postfix_base(&call.callee.node);
                if !call.type_args.is_empty() {
                    let types: Vec<String> = call.type_args.iter().map(|t| t.node.to_string()).collect();
                    self.writer.write(&format!("<{}>", types.join(", ")));
                }
                self.format_args(&call.args);
            }
            Expr::Cast(cast) => {
                self.writer.write(&format!("@cast({}, ", cast.ty.node));
                self.format_expr(&cast.expr.node);
                self.writer.write(")");
            }
            Expr::Builtin(builtin) => {
                self.writer.write(&format!("@{}", builtin.name));
                self.format_args(&builtin.args);
            }
            Expr::Field(base, field) => {
                self.format_postfix_base(&base.node);
                self.writer.write(&format!(".{field}"));
            }
            Expr::Index(base, index) => {
                self.format_postfix_base(&base.node);
                self.writer.write("[");
                self.format_expr(&index.node);
                self.writer.write("]");
            }
            Expr::Match(m) => self.format_match(m),
        }
    }

    fn format_parenthesized(&mut self, expr: &Expr) {
        self.writer.write("(");
        self.format_expr(expr);
        self.writer.write(")");
    }

    fn format_binary(&mut self, binary: &BinaryExpr) {
        let op = binary.op;
        self.format_operand(op, &binary.lhs.node, Associativity::Left);
        self.writer.write(&format!(" {op} "));
        self.format_operand(op, &binary.rhs.node, Associativity::Right);
    }

    fn format_operand(&mut self, parent: BinaryOp, operand: &Expr, side: Associativity) {
        if operand_needs_parens(parent, operand, side) {
            self.format_parenthesized(operand);
        } else {
            self.format_expr(operand);
        }
    }

    /// Postfix operators bind tighter than any prefix or binary operator.
    fn format_postfix_base(&mut self, base: &Expr) {
        if matches!(base, Expr::Binary(_) | Expr::Unary(..)) {
            self.format_parenthesized(base);
        } else {
            self.format_expr(base);
        }
    }

    fn format_args(&mut self, args: &[Spanned<Expr>]) {
        self.writer.write("(");
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            // `f(a < b, c > (d))` would otherwise read back as `f(a<b, c>(d))`
            if contains_less_than(&arg.node) {
                self.format_parenthesized(&arg.node);
            } else {
                self.format_expr(&arg.node);
            }
        }
        self.writer.write(")");
    }

    fn format_interpolated(&mut self, parts: &[InterpolatedPart]) {
        self.writer.write("f\"");
        for part in parts {
            match part {
                InterpolatedPart::Text(text) => self.writer.write(&escape_fstring_text(text)),
                InterpolatedPart::Expr(expr) => {
                    self.writer.write("{");
                    self.format_expr(&expr.node);
                    self.writer.write("}");
                }
            }
        }
        self.writer.write("\"");
    }

    fn format_match(&mut self, m: &MatchExpr) {
        self.writer.write("match ");
        self.format_expr(&m.subject.node);
        if m.arms.is_empty() {
            self.writer.write(" {}");
            return;
        }

        self.writer.write(" {");
        self.writer.newline();
        self.writer.indent();
        for arm in &m.arms {
            let arm = &arm.node;
            match &arm.pattern {
                Some(pattern) if !arm.is_default => {
                    self.writer.write("when ");
                    self.format_expr(&pattern.node);
                }
                _ => self.writer.write("default"),
            }
            self.writer.write(" ==> ");
            match &arm.body {
                ArmBody::Placeholder => self.writer.write("..."),
                ArmBody::Block(block) => self.format_block(&block.node),
                ArmBody::Statement(stmt) => self.format_statement(&stmt.node),
            }
            self.writer.newline();
        }
        self.writer.dedent();
        self.writer.write("}");
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Does `operand`, on `side` of `parent`, need parentheses to keep its grouping?
fn operand_needs_parens(parent: BinaryOp, operand: &Expr, side: Associativity) -> bool {
    let Expr::Binary(inner) = operand else {
        return false;
    };
    if parent.is_comparison() && inner.op.is_comparison() {
        return true;
    }
    let (outer, nested) = (parent.precedence(), inner.op.precedence());
    if nested != outer {
        return nested < outer;
    }
    parent.associativity() != side
}

/// Would the rendered expression begin with `-`?
fn starts_with_minus(expr: &Expr) -> bool {
    match expr {
        Expr::Unary(UnaryOp::Neg, _) => true,
        Expr::Binary(binary) => {
            !operand_needs_parens(binary.op, &binary.lhs.node, Associativity::Left) && starts_with_minus(&binary.lhs.node)
        }
        _ => false,
    }
}

/// Is there a `<` comparison outside any brackets?
fn contains_less_than(expr: &Expr) -> bool {
    match expr {
        Expr::Binary(binary) => {
            binary.op == BinaryOp::Lt || contains_less_than(&binary.lhs.node) || contains_less_than(&binary.rhs.node)
        }
        _ => false,
    }
}

fn render_literal(lit: &Literal) -> String {
    match lit {
        Literal::Int(value) => value.to_string(),
        // `{:?}` always keeps a `.` or an exponent
        Literal::Float(value) => format!("{value:?}"),
        Literal::String(text) => {
            let mut out = String::from("\"");
            for c in text.chars() {
                push_escaped(&mut out, c, '"');
            }
            out.push('"');
            out
        }
        Literal::Char(c) => {
            let mut out = String::from("'");
            push_escaped(&mut out, *c, '\'');
            out.push('\'');
            out
        }
        Literal::Bool(value) => value.to_string(),
        Literal::Nil => "nil".to_string(),
    }
}

fn push_escaped(out: &mut String, c: char, quote: char) {
    match c {
        '\\' => out.push_str("\\\\"),
        '\n' => out.push_str("\\n"),
        '\t' => out.push_str("\\t"),
        '\r' => out.push_str("\\r"),
        '\0' => out.push_str("\\0"),
        c if c == quote => {
            out.push('\\');
            out.push(c);
        }
        c if c.is_ascii_control() => {
            let _ = write!(out, "\\x{:02X}", u32::from(c));
        }
        c => out.push(c),
    }
}

/// Text between interpolations. A literal `{` can only come from the `\{` escape, which the lexer keeps verbatim.
fn escape_fstring_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push_str("\\{");
            }
            '{' => out.push_str("\\{"),
            c => push_escaped(&mut out, c, '"'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn render(source: &str) -> String {
        let program = parser::parse(source).expect("source should parse");
        Formatter::default().format(&program)
    }

    fn render_expr(expr: &str) -> String {
        let rendered = render(&format!("func f() {{\n    x := {expr}\n}}\n"));
        rendered
            .lines()
            .nth(1)
            .and_then(|line| line.trim().strip_prefix("x := "))
            .expect("declaration line")
            .to_string()
    }

    #[test]
    fn test_redundant_parentheses_are_dropped() {
        assert_eq!(render_expr("(1 + (2 * 3))"), "1 + 2 * 3");
        assert_eq!(render_expr("((a))"), "a");
    }

    #[test]
    fn test_required_parentheses_are_kept() {
        assert_eq!(render_expr("(1 + 2) * 3"), "(1 + 2) * 3");
        assert_eq!(render_expr("a - (b - c)"), "a - (b - c)");
        assert_eq!(render_expr("(a ** b) ** c"), "(a ** b) ** c");
        assert_eq!(render_expr("a ** b ** c"), "a ** b ** c");
        assert_eq!(render_expr("-(a + b)"), "-(a + b)");
        assert_eq!(render_expr("(a + b).c"), "(a + b).c");
    }

    #[test]
    fn test_nested_comparisons_are_parenthesized() {
        assert_eq!(render_expr("a < b == c"), "(a < b) == c");
    }

    #[test]
    fn test_less_than_arguments_are_parenthesized() {
        assert_eq!(render_expr("f(a < b, c > d)"), "f((a < b), c > d)");
        assert_eq!(render_expr("f<u32>(a)"), "f<u32>(a)");
    }

    #[test]
    fn test_literals_are_reescaped() {
        assert_eq!(render_expr(r#""tab\there \"q\" \\""#), r#""tab\there \"q\" \\""#);
        assert_eq!(render_expr(r"'\v'"), r"'\x0B'");
        assert_eq!(render_expr(r"'\''"), r"'\''");
        assert_eq!(render_expr("2.5e10"), "25000000000.0");
        assert_eq!(render_expr("0xff"), "255");
    }

    #[test]
    fn test_fstring_text_keeps_escaped_braces() {
        assert_eq!(render_expr(r#"f"\{literal} {x + 1}!""#), r#"f"\{literal} {x + 1}!""#);
    }

    #[test]
    fn test_leading_minus_statement_is_wrapped() {
        let source = "func f() {\n    x := a\n    (-b)\n}\n";
        assert_eq!(render(source), source);
        assert_eq!(render("func f() {\n    x := a\n    -b\n}\n"), "func f() {\n    x := a - b\n}\n");
    }

    #[test]
    fn test_compound_assignments_render_with_spaces() {
        let rendered = render("func f() {\n    x<<=1\n    x>>=a>>1\n    m[i]&=0xf\n    y ^=  z|w\n}\n");
        assert_eq!(
            rendered,
            "func f() {\n    x <<= 1\n    x >>= a >> 1\n    m[i] &= 15\n    y ^= z | w\n}\n"
        );
    }

    #[test]
    fn test_blank_lines_between_declarations() {
        let rendered = render("import a\nimport b\nalias X as Y\nalias Y as Z\n");
        assert_eq!(rendered, "import a\nimport b\n\nalias X as Y\n\nalias Y as Z\n");
    }

    #[test]
    fn test_custom_indent_width() {
        let program = parser::parse("func f() { return 1 }").expect("source should parse");
        let rendered = Formatter::new(FormatConfig::new().with_indent_width(2)).format(&program);
        assert_eq!(rendered, "func f() {\n  return 1\n}\n");
    }
}
