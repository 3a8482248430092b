//! Syntax frontend for C# source: lexer, parser, AST, diagnostics and a read-only visitor.
//!
//! The parser is a hand-written recursive-descent parser. Places where the grammar is locally ambiguous (casts,
//! generic argument lists, lambdas, declarations vs. expressions) are resolved with a bounded, memoised speculation
//! protocol instead of unbounded backtracking.
//!
//! ## Notes
//! - This crate is intentionally “syntax-only”: it does not do name resolution, type checking, or lowering.
//! - Vocabulary identity (keywords/operators/punctuation) comes from `sharpen_core::lang` registries.
//!
//! ## Examples
//! ```rust
//! use sharpen_syntax::{lexer, parser};
//!
//! let tokens = lexer::lex("class C { int x = (int)y; }").unwrap();
//! let unit = parser::parse(&tokens).unwrap();
//! assert_eq!(unit.members.len(), 1);
//! ```
//!
//! ## See also
//! - `sharpen_core::lang` for registry-backed language vocabulary (keywords/operators/punctuation).

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod token_helpers;
pub mod visit;
