//! Abstract Syntax Tree definitions for Adorad
//!
//! Every node is owned exclusively by its parent and carries a source [`Span`] through the [`Spanned`] wrapper. The
//! tree is a closed set of enums; consumers match exhaustively.
//!
//! ## Notes
//! - Equality on [`Spanned`] ignores spans, so two programs compare equal when they have the same structure even if
//!   they were parsed from differently formatted source.

use std::collections::BTreeSet;
use std::fmt;

use adorad_core::lang::attributes::{self, AttributeId};
use adorad_core::lang::operators::{self, Associativity, OperatorId};

/// Source location span: byte offsets plus the 1-based line and column of `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Zero-width span at `self.start`.
    pub fn collapsed(self) -> Span {
        Span { end: self.start, ..self }
    }

    /// Smallest span covering both inputs. Line and column follow whichever starts first.
    pub fn merge(self, other: Span) -> Span {
        let first = if other.start < self.start { other } else { self };
        Span {
            start: first.start,
            end: self.end.max(other.end),
            line: first.line,
            column: first.column,
        }
    }

    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A node with source location
#[derive(Debug, Clone)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Structural equality: spans are not compared.
impl<T: PartialEq> PartialEq for Spanned<T> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

/// Identifier (ASCII only; see the lexer)
pub type Ident = String;

/// A program is a sequence of top-level declarations in source order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub declarations: Vec<Spanned<Declaration>>,
}

impl Program {
    /// Span from the first to the last declaration, if any.
    pub fn span(&self) -> Option<Span> {
        let first = self.declarations.first()?;
        let last = self.declarations.last()?;
        Some(first.span.merge(last.span))
    }
}

/// Top-level declarations
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Import(ImportDecl),
    Function(FunctionDecl),
    Global(GlobalBlock),
    Enum(EnumDecl),
    Alias(AliasDecl),
}

// ============================================================================
// Imports
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub kind: ImportKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportKind {
    /// `import std::hash` or `import std::hash as hash`
    Module { path: ImportPath, alias: Option<Ident> },
    /// `from std::hash import a, b as c`
    From { module: ImportPath, items: Vec<ImportItem> },
}

/// `::`-separated module path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPath {
    pub segments: Vec<Ident>,
}

impl fmt::Display for ImportPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("::"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportItem {
    pub name: Ident,
    pub alias: Option<Ident>,
}

// ============================================================================
// Functions
// ============================================================================

/// A modifier on a function declaration.
///
/// `Export` sorts before attributes, so a [`ModifierSet`] iterates as `export`, then attributes in registry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modifier {
    Export,
    Attribute(AttributeId),
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::Export => write!(f, "export"),
            Modifier::Attribute(id) => write!(f, "[{}]", attributes::as_str(*id)),
        }
    }
}

/// Set of modifiers; duplicates are impossible by construction
pub type ModifierSet = BTreeSet<Modifier>;

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub modifiers: ModifierSet,
    pub name: Ident,
    pub generics: Vec<Spanned<GenericParam>>,
    pub params: Vec<Spanned<Param>>,
    /// `None` means the function returns unit.
    pub return_type: Option<Spanned<Type>>,
    pub where_clause: Option<Spanned<WhereClause>>,
    pub body: Spanned<Block>,
}

impl FunctionDecl {
    pub fn is_export(&self) -> bool {
        self.modifiers.contains(&Modifier::Export)
    }

    pub fn has_attribute(&self, id: AttributeId) -> bool {
        self.modifiers.contains(&Modifier::Attribute(id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericParam {
    pub name: Ident,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Ident,
    pub ty: Spanned<Type>,
}

/// `where T: {string}, U: {hash, eq}`
///
/// Every predicate names a generic parameter declared on the same function, and each parameter appears at most once.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WhereClause {
    pub predicates: Vec<Spanned<WherePredicate>>,
}

impl WhereClause {
    /// Required bounds for `param`, if it is constrained.
    pub fn bounds_for(&self, param: &str) -> Option<&BTreeSet<Ident>> {
        self.predicates
            .iter()
            .find(|p| p.node.param == param)
            .map(|p| &p.node.bounds)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WherePredicate {
    pub param: Ident,
    pub bounds: BTreeSet<Ident>,
}

/// Type reference: `u32`, `std::string::String`, `Map<K, List<V>>`
#[derive(Debug, Clone, PartialEq)]
pub struct Type {
    pub path: Vec<Ident>,
    pub args: Vec<Spanned<Type>>,
}

impl Type {
    pub fn simple(name: impl Into<Ident>) -> Self {
        Self {
            path: vec![name.into()],
            args: Vec::new(),
        }
    }

    /// Last path segment.
    pub fn name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.join("::"))?;
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg.node)?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

// ============================================================================
// Globals, enums, aliases
// ============================================================================

/// `global { ... }`; binding order is source order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlobalBlock {
    pub bindings: Vec<Spanned<GlobalVarDecl>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlobalVarDecl {
    pub name: Ident,
    /// `None` for `name := expr`.
    pub ty: Option<Spanned<Type>>,
    pub value: Spanned<Expr>,
}

/// `Name = enum { A, B, C }`
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: Ident,
    pub variants: Vec<Spanned<EnumVariant>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumVariant {
    pub name: Ident,
}

/// `alias Target as Name`: `name` is the new name, `target` the existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasDecl {
    pub name: Ident,
    pub target: Ident,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Spanned<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `x := e` or `x: T = e`: introduces a new binding
    DeclareAssign(DeclareAssignStmt),
    /// `target = e` or `target += e`: mutates an existing binding
    Assign(AssignStmt),
    Return(Option<Spanned<Expr>>),
    If(IfStmt),
    Loop(LoopStmt),
    Break,
    Continue,
    /// `...`
    Placeholder,
    Expr(Spanned<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclareAssignStmt {
    pub name: Ident,
    pub ty: Option<Spanned<Type>>,
    pub value: Spanned<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub target: Spanned<Expr>,
    pub op: AssignOp,
    pub value: Spanned<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl AssignOp {
    pub fn from_operator(id: OperatorId) -> Option<Self> {
        Some(match id {
            OperatorId::Eq => AssignOp::Assign,
            OperatorId::PlusEq => AssignOp::Add,
            OperatorId::MinusEq => AssignOp::Sub,
            OperatorId::StarEq => AssignOp::Mul,
            OperatorId::SlashEq => AssignOp::Div,
            OperatorId::PercentEq => AssignOp::Rem,
            OperatorId::AmpEq => AssignOp::BitAnd,
            OperatorId::PipeEq => AssignOp::BitOr,
            OperatorId::CaretEq => AssignOp::BitXor,
            OperatorId::ShlEq => AssignOp::Shl,
            OperatorId::ShrEq => AssignOp::Shr,
            _ => return None,
        })
    }

    pub fn operator_id(self) -> OperatorId {
        match self {
            AssignOp::Assign => OperatorId::Eq,
            AssignOp::Add => OperatorId::PlusEq,
            AssignOp::Sub => OperatorId::MinusEq,
            AssignOp::Mul => OperatorId::StarEq,
            AssignOp::Div => OperatorId::SlashEq,
            AssignOp::Rem => OperatorId::PercentEq,
            AssignOp::BitAnd => OperatorId::AmpEq,
            AssignOp::BitOr => OperatorId::PipeEq,
            AssignOp::BitXor => OperatorId::CaretEq,
            AssignOp::Shl => OperatorId::ShlEq,
            AssignOp::Shr => OperatorId::ShrEq,
        }
    }
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", operators::as_str(self.operator_id()))
    }
}

/// `if cond body [else body]`; an unbraced body is stored as a one-statement block
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Spanned<Expr>,
    pub then_block: Spanned<Block>,
    pub else_branch: Option<ElseBranch>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElseBranch {
    Block(Spanned<Block>),
    If(Box<Spanned<IfStmt>>),
}

/// `loop { ... }`: runs until `break` or `return`
#[derive(Debug, Clone, PartialEq)]
pub struct LoopStmt {
    pub body: Spanned<Block>,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(Ident),
    Literal(Literal),
    /// `f"Hello {name}!"`: never holds two adjacent text parts or an empty text part
    InterpolatedString(Vec<InterpolatedPart>),
    Unary(UnaryOp, Box<Spanned<Expr>>),
    Binary(BinaryExpr),
    Call(CallExpr),
    /// `@cast(Type, expr)`
    Cast(CastExpr),
    /// `@name(args)` for builtins other than `cast`
    Builtin(BuiltinCall),
    Field(Box<Spanned<Expr>>, Ident),
    Index(Box<Spanned<Expr>>, Box<Spanned<Expr>>),
    Match(MatchExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(u64),
    Float(f64),
    String(String),
    Char(char),
    Bool(bool),
    Nil,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InterpolatedPart {
    Text(String),
    Expr(Spanned<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
    BitNot,
}

impl UnaryOp {
    pub fn from_operator(id: OperatorId) -> Option<Self> {
        match id {
            OperatorId::Minus => Some(UnaryOp::Neg),
            OperatorId::Bang => Some(UnaryOp::Not),
            OperatorId::Tilde => Some(UnaryOp::BitNot),
            _ => None,
        }
    }

    pub fn operator_id(self) -> OperatorId {
        match self {
            UnaryOp::Neg => OperatorId::Minus,
            UnaryOp::Not => OperatorId::Bang,
            UnaryOp::BitNot => OperatorId::Tilde,
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", operators::as_str(self.operator_id()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub lhs: Box<Spanned<Expr>>,
    pub rhs: Box<Spanned<Expr>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    // Logical
    And,
    Or,
    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl BinaryOp {
    pub fn from_operator(id: OperatorId) -> Option<Self> {
        Some(match id {
            OperatorId::Plus => BinaryOp::Add,
            OperatorId::Minus => BinaryOp::Sub,
            OperatorId::Star => BinaryOp::Mul,
            OperatorId::Slash => BinaryOp::Div,
            OperatorId::Percent => BinaryOp::Rem,
            OperatorId::StarStar => BinaryOp::Pow,
            OperatorId::Amp => BinaryOp::BitAnd,
            OperatorId::Pipe => BinaryOp::BitOr,
            OperatorId::Caret => BinaryOp::BitXor,
            OperatorId::Shl => BinaryOp::Shl,
            OperatorId::Shr => BinaryOp::Shr,
            OperatorId::AndAnd => BinaryOp::And,
            OperatorId::OrOr => BinaryOp::Or,
            OperatorId::EqEq => BinaryOp::Eq,
            OperatorId::NotEq => BinaryOp::NotEq,
            OperatorId::Lt => BinaryOp::Lt,
            OperatorId::LtEq => BinaryOp::LtEq,
            OperatorId::Gt => BinaryOp::Gt,
            OperatorId::GtEq => BinaryOp::GtEq,
            _ => return None,
        })
    }

    pub fn operator_id(self) -> OperatorId {
        match self {
            BinaryOp::Add => OperatorId::Plus,
            BinaryOp::Sub => OperatorId::Minus,
            BinaryOp::Mul => OperatorId::Star,
            BinaryOp::Div => OperatorId::Slash,
            BinaryOp::Rem => OperatorId::Percent,
            BinaryOp::Pow => OperatorId::StarStar,
            BinaryOp::BitAnd => OperatorId::Amp,
            BinaryOp::BitOr => OperatorId::Pipe,
            BinaryOp::BitXor => OperatorId::Caret,
            BinaryOp::Shl => OperatorId::Shl,
            BinaryOp::Shr => OperatorId::Shr,
            BinaryOp::And => OperatorId::AndAnd,
            BinaryOp::Or => OperatorId::OrOr,
            BinaryOp::Eq => OperatorId::EqEq,
            BinaryOp::NotEq => OperatorId::NotEq,
            BinaryOp::Lt => OperatorId::Lt,
            BinaryOp::LtEq => OperatorId::LtEq,
            BinaryOp::Gt => OperatorId::Gt,
            BinaryOp::GtEq => OperatorId::GtEq,
        }
    }

    /// Binding power from the operator registry; higher binds tighter.
    pub fn precedence(self) -> u8 {
        operators::info_for(self.operator_id()).precedence
    }

    pub fn associativity(self) -> Associativity {
        operators::info_for(self.operator_id()).associativity
    }

    pub fn is_comparison(self) -> bool {
        operators::is_comparison(self.operator_id())
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", operators::as_str(self.operator_id()))
    }
}

/// `callee(args)` or `callee<T, U>(args)`
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Spanned<Expr>>,
    /// Explicit generic arguments; empty for an ordinary call.
    pub type_args: Vec<Spanned<Type>>,
    pub args: Vec<Spanned<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CastExpr {
    pub ty: Spanned<Type>,
    pub expr: Box<Spanned<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinCall {
    pub name: Ident,
    pub args: Vec<Spanned<Expr>>,
}

/// `match subject { when p ==> body ... default ==> body }`
#[derive(Debug, Clone, PartialEq)]
pub struct MatchExpr {
    pub subject: Box<Spanned<Expr>>,
    /// Source order; evaluation order is arm order.
    pub arms: Vec<Spanned<MatchArm>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchArm {
    /// `None` exactly when `is_default` is set.
    pub pattern: Option<Spanned<Expr>>,
    pub is_default: bool,
    pub body: ArmBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArmBody {
    /// `...`: no-op
    Placeholder,
    Block(Spanned<Block>),
    Statement(Box<Spanned<Statement>>),
}
