//! Punctuation vocabulary.
//!
//! This module defines the canonical set of non-operator punctuation tokens used by the lexer/parser: delimiters,
//! separators, access/path markers, the lambda arrow and the `?` marker (conditional operator and nullable types).
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - This module is vocabulary only (spellings + metadata). It does not tokenize source text.
//!
//! ## Examples
//! ```rust
//! use sharpen_core::lang::punctuation::{self, PunctuationId};
//!
//! assert_eq!(punctuation::from_str("::"), Some(PunctuationId::ColonColon));
//! assert_eq!(punctuation::as_str(PunctuationId::FatArrow), "=>");
//! ```

use super::registry::Since;

/// Broad syntactic grouping for punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationCategory {
    /// Brackets and braces.
    Delimiter,
    /// Separators like `,`, `;` and `:`.
    Separator,
    /// Access/path markers like `.`, `?.`, `::` and `->`.
    Access,
    /// The lambda arrow `=>`.
    Arrow,
    /// `?`.
    Marker,
}

/// Stable identifier for punctuation tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationId {
    // Delimiter
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    // Separator
    Comma,
    Semicolon,
    Colon,

    // Access
    Dot,
    QuestionDot,
    ColonColon,
    Arrow,

    // Arrow
    FatArrow,

    // Marker
    Question,
}

/// Metadata for a punctuation token.
#[derive(Debug, Clone, Copy)]
pub struct PunctuationInfo {
    pub id: PunctuationId,
    pub canonical: &'static str,
    pub category: PunctuationCategory,
    pub since: Since,
}

/// Registry of all punctuation tokens.
pub const PUNCTUATION: &[PunctuationInfo] = &[
    info(PunctuationId::LParen, "(", PunctuationCategory::Delimiter, Since(1, 0)),
    info(PunctuationId::RParen, ")", PunctuationCategory::Delimiter, Since(1, 0)),
    info(PunctuationId::LBracket, "[", PunctuationCategory::Delimiter, Since(1, 0)),
    info(PunctuationId::RBracket, "]", PunctuationCategory::Delimiter, Since(1, 0)),
    info(PunctuationId::LBrace, "{", PunctuationCategory::Delimiter, Since(1, 0)),
    info(PunctuationId::RBrace, "}", PunctuationCategory::Delimiter, Since(1, 0)),
    info(PunctuationId::Comma, ",", PunctuationCategory::Separator, Since(1, 0)),
    info(PunctuationId::Semicolon, ";", PunctuationCategory::Separator, Since(1, 0)),
    info(PunctuationId::Colon, ":", PunctuationCategory::Separator, Since(1, 0)),
    info(PunctuationId::Dot, ".", PunctuationCategory::Access, Since(1, 0)),
    info(PunctuationId::QuestionDot, "?.", PunctuationCategory::Access, Since(6, 0)),
    info(PunctuationId::ColonColon, "::", PunctuationCategory::Access, Since(2, 0)),
    info(PunctuationId::Arrow, "->", PunctuationCategory::Access, Since(1, 0)),
    info(PunctuationId::FatArrow, "=>", PunctuationCategory::Arrow, Since(3, 0)),
    info(PunctuationId::Question, "?", PunctuationCategory::Marker, Since(1, 0)),
];

/// Return the canonical spelling for a punctuation token.
pub fn as_str(id: PunctuationId) -> &'static str {
    info_for(id).canonical
}

/// Return the category for a punctuation token.
pub fn category(id: PunctuationId) -> PunctuationCategory {
    info_for(id).category
}

/// Return the full metadata entry for a punctuation token.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: PunctuationId) -> &'static PunctuationInfo {
    PUNCTUATION
        .iter()
        .find(|p| p.id == id)
        .expect("punctuation info missing")
}

/// Resolve a punctuation spelling to its identifier.
///
/// ## Notes
/// - Matching is **case-sensitive**.
pub fn from_str(s: &str) -> Option<PunctuationId> {
    PUNCTUATION.iter().find(|p| p.canonical == s).map(|p| p.id)
}

const fn info(id: PunctuationId, canonical: &'static str, category: PunctuationCategory, since: Since) -> PunctuationInfo {
    PunctuationInfo {
        id,
        canonical,
        category,
        since,
    }
}
