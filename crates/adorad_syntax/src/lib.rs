//! Syntax front end for the Adorad language: lexer, token cursor, parser, AST, diagnostics.
//!
//! Given one source buffer, this crate produces either a well-formed [`ast::Program`] or a precise, position-ordered
//! list of [`diagnostics::Diagnostic`]s. It is dependency-light and shared by the CLI, the formatter and the fuzz
//! target.
//!
//! ## Notes
//! - This crate is "syntax-only": no name resolution, no type checking, no evaluation of `[comptime]` functions.
//! - Vocabulary identity (keywords/operators/punctuation/attributes) comes from `adorad_core::lang` registries.
//! - Each parse owns its lexer, cursor and diagnostic list; concurrent parses share nothing.
//!
//! ## Examples
//! ```rust
//! use adorad_syntax::ast::Declaration;
//! use adorad_syntax::parser;
//!
//! let program = parser::parse("alias Fruits as DeliciousFruits\n").unwrap();
//! match &program.declarations[0].node {
//!     Declaration::Alias(alias) => assert_eq!(alias.name, "DeliciousFruits"),
//!     other => panic!("unexpected declaration: {other:?}"),
//! }
//! ```
//!
//! ## See also
//! - `adorad_core::lang` for the registry-backed vocabulary.

pub mod ast;
pub mod cursor;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod token_helpers;
