//! Canonical language vocabulary for Adorad.
//!
//! This crate is intentionally small and dependency-free. It holds the registry tables that the lexer, parser, and
//! formatter share, so none of them hard-code spellings of keywords, operators, punctuation or attributes.
//!
//! ## Notes
//!
//! - This is a "vocabulary" crate: **no IO**, no global state, and no AST types.

pub mod lang;
