#![forbid(unsafe_code)]
//! Adorad Programming Language Front End
//!
//! This crate bundles the Adorad syntax front end with its tooling: a command-line driver, a canonical source
//! formatter and a miette-based diagnostic reporter. Lexing and parsing live in `adorad_syntax`; the shared vocabulary
//! lives in `adorad_core`.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a front-end bug (logic error), use `.expect("INVARIANT: reason")` with a
//!   clear explanation.

pub mod cli;
pub mod format;
pub mod report;

pub use adorad_core::lang;
pub use adorad_syntax::{ast, cursor, diagnostics, lexer, parser};

pub use format::{FormatConfig, FormatError, check_formatted, format_diff, format_source, format_source_with_config};
