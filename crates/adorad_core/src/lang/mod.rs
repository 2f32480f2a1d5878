//! Adorad language vocabulary registries.
//!
//! Callers work with **stable IDs** (e.g. `KeywordId`, `OperatorId`) and look up spellings and metadata via const
//! registry tables instead of comparing strings.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no AST types, no IO, no side effects.
//! - The lexer/parser enforce syntax; registries provide spellings and metadata for diagnostics and formatting.
//!
//! ## Examples
//! ```rust
//! use adorad_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("func"), Some(KeywordId::Func));
//! assert_eq!(keywords::as_str(KeywordId::Func), "func");
//! ```

pub mod attributes;
pub mod keywords;
pub mod operators;
pub mod punctuation;
pub mod registry;
