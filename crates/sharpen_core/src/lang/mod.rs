//! C# language vocabulary registries.
//!
//! This module is the “front door” for language-level vocabulary: reserved and contextual keywords, operators and
//! punctuation.
//!
//! The design goal is to avoid stringly-typed checks scattered across the lexer and parser. Callers work with
//! **stable IDs** (e.g. `KeywordId`, `OperatorId`) and look up spellings/metadata via registry tables.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no AST types, no IO, no side effects.
//! - The lexer/parser enforce syntax; registries provide spellings and metadata for shared use (diagnostics,
//!   formatting, highlighting).
//!
//! ## Examples
//! ```rust
//! use sharpen_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("foreach"), Some(KeywordId::Foreach));
//! assert_eq!(keywords::as_str(KeywordId::Foreach), "foreach");
//! ```

pub mod keywords;
pub mod operators;
pub mod punctuation;
pub mod registry;
