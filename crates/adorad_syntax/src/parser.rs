//! Parser for the Adorad programming language
//!
//! Converts the token stream of one source buffer into an AST [`Program`], collecting diagnostics instead of stopping
//! at the first error. Declarations and statements are parsed by recursive descent; binary expressions by precedence
//! climbing over the `adorad_core` operator registry.
//!
//! ## Examples
//!
//! ```rust
//! use adorad_syntax::parser;
//!
//! let source = "func main() {\n    x := 42\n}\n";
//! let program = parser::parse(source).unwrap();
//! assert_eq!(program.declarations.len(), 1);
//! ```

use std::collections::{BTreeSet, HashMap};

use crate::ast::*;
use crate::cursor::{Cursor, Mark};
use crate::diagnostics::{self, Diagnostic};
use crate::lexer::{StringPart, Token, TokenKind};
use adorad_core::lang::attributes;
use adorad_core::lang::keywords::{self, KeywordId};
use adorad_core::lang::operators::{self, Associativity, OperatorId};
use adorad_core::lang::punctuation::PunctuationId;

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/decl.rs");
include!("parser/types.rs");
include!("parser/stmts.rs");
include!("parser/expr.rs");
include!("parser/util.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
