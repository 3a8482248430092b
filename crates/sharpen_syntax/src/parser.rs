//! Parser for C# source.
//!
//! Converts a token stream into an AST [`CompilationUnit`] by recursive descent. Locally ambiguous decisions go
//! through a single speculation primitive (try a candidate under a saved cursor position, commit only on clean
//! success) whose failures are memoised per rule and position, so nested ambiguity stays linear.
//!
//! ## Examples
//!
//! ```rust
//! use sharpen_syntax::ast::{Expr, Statement};
//! use sharpen_syntax::{lexer, parser};
//!
//! let tokens = lexer::lex("(Foo)x;").unwrap();
//! let stmt = parser::parse_statement(&tokens).unwrap();
//! match stmt.node {
//!     Statement::Expression(e) => assert!(matches!(e.node, Expr::Cast { .. })),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

use std::borrow::Cow;
use std::collections::HashSet;

use crate::ast::*;
use crate::diagnostics::{Diagnostics, ErrorKind, SyntaxError};
use crate::lexer::{InterpolationPart, Token, TokenKind};
use sharpen_core::lang::keywords::{self, KeywordCategory, KeywordId};
use sharpen_core::lang::operators::OperatorId;
use sharpen_core::lang::punctuation::PunctuationId;

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/cursor.rs");
include!("parser/helpers.rs");
include!("parser/speculate.rs");
include!("parser/types.rs");
include!("parser/expr.rs");
include!("parser/patterns.rs");
include!("parser/query.rs");
include!("parser/stmts.rs");
include!("parser/decl.rs");
include!("parser/util.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
