//! Small helper APIs for working with `Token` / `TokenKind`.
//!
//! These helpers exist to reduce repetitive `matches!(...)` at call sites and to make it easy
//! to work with ID-based tokens and contextual keywords.

use crate::lexer::{Token, TokenKind};
use sharpen_core::lang::keywords::{self, KeywordId};
use sharpen_core::lang::operators::{self, OperatorId};
use sharpen_core::lang::punctuation::{self, PunctuationId};

impl TokenKind {
    /// Return the keyword id, if this is a keyword token.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        match self {
            TokenKind::Keyword(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given keyword.
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == id)
    }

    /// Return `true` if this is an identifier spelled like the given contextual keyword.
    pub fn is_contextual(&self, id: KeywordId) -> bool {
        matches!(self, TokenKind::Ident(name) if name == keywords::as_str(id))
    }

    /// Return the operator id, if this is an operator token.
    pub fn operator_id(&self) -> Option<OperatorId> {
        match self {
            TokenKind::Operator(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given operator.
    pub fn is_operator(&self, id: OperatorId) -> bool {
        matches!(self, TokenKind::Operator(o) if *o == id)
    }

    /// Return the punctuation id, if this is a punctuation token.
    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        match self {
            TokenKind::Punctuation(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given punctuation.
    pub fn is_punctuation(&self, id: PunctuationId) -> bool {
        matches!(self, TokenKind::Punctuation(p) if *p == id)
    }

    /// Return `true` for literal tokens (numbers, characters, strings).
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::Int(_)
                | TokenKind::Real(_)
                | TokenKind::Char(_)
                | TokenKind::String(_)
                | TokenKind::VerbatimString(_)
                | TokenKind::InterpolatedString { .. }
        )
    }

    /// Short description used in "expected X, found Y" diagnostics.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Keyword(id) => format!("keyword `{}`", keywords::as_str(*id)),
            TokenKind::Operator(id) => format!("`{}`", operators::as_str(*id)),
            TokenKind::Punctuation(id) => format!("`{}`", punctuation::as_str(*id)),
            TokenKind::Ident(name) => format!("identifier `{name}`"),
            TokenKind::Int(_) | TokenKind::Real(_) => "number literal".to_string(),
            TokenKind::Char(_) => "character literal".to_string(),
            TokenKind::String(_) | TokenKind::VerbatimString(_) => "string literal".to_string(),
            TokenKind::InterpolatedString { .. } => "interpolated string".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

impl Token {
    /// Convenience wrapper for `self.kind.keyword_id()`.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        self.kind.keyword_id()
    }

    /// Convenience wrapper for `self.kind.operator_id()`.
    pub fn operator_id(&self) -> Option<OperatorId> {
        self.kind.operator_id()
    }

    /// Convenience wrapper for `self.kind.punctuation_id()`.
    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        self.kind.punctuation_id()
    }

    /// Return the identifier spelling, if this is an identifier.
    pub fn ident(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Ident(name) => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::lex;

    #[test]
    fn test_describe_tokens() {
        let described: Vec<String> = lex("class x 1 \"s\" ; +")
            .unwrap()
            .iter()
            .map(|t| t.kind.describe())
            .collect();
        insta::assert_snapshot!(described.join("\n"), @r"
        keyword `class`
        identifier `x`
        number literal
        string literal
        `;`
        `+`
        end of input
        ");
    }
}
