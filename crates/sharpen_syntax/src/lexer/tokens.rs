//! Token types for the C# lexer.
//!
//! The lexer uses **registry-backed IDs** for language vocabulary:
//! - `Keyword(KeywordId)` for reserved words
//! - `Operator(OperatorId)` for operators
//! - `Punctuation(PunctuationId)` for punctuation tokens
//!
//! ## Notes
//! - Contextual keywords (`var`, `async`, `where`, ...) are `Ident` tokens; the parser recognises them by spelling.
//! - Literal payloads are the raw source spelling so nothing is lost before the parser sees them.
//! - Use `crate::token_helpers` for ergonomic token matching at call sites.

use crate::ast::Span;
use sharpen_core::lang::keywords::{self, KeywordId};
use sharpen_core::lang::operators::OperatorId;
use sharpen_core::lang::punctuation::PunctuationId;

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ========== Keyword / operator / punctuation (ID-based) ==========
    Keyword(KeywordId),
    Operator(OperatorId),
    Punctuation(PunctuationId),

    // ========== Identifiers and Literals ==========
    Ident(String),
    Int(String),
    Real(String),
    Char(String),
    String(String),
    VerbatimString(String),
    InterpolatedString {
        verbatim: bool,
        parts: Vec<InterpolationPart>,
    },

    // ========== Special ==========
    Eof,
}

/// Part of an interpolated string.
#[derive(Debug, Clone, PartialEq)]
pub enum InterpolationPart {
    /// Raw text between holes, escapes and doubled braces kept as written.
    Text(String),
    Hole(Hole),
}

/// A `{expr,alignment:format}` hole. The parser re-lexes `source` and shifts spans by `offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct Hole {
    pub source: String,
    /// Byte offset of `source` in the original file.
    pub offset: usize,
    /// Raw alignment expression and its offset.
    pub alignment: Option<(String, usize)>,
    pub format: Option<String>,
}

/// A token with its kind and source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::reserved_from_str(name)
}
