//! Lexer for C# source text.
//!
//! Handles tokenization including:
//! - Reserved keywords (contextual keywords stay identifiers)
//! - Identifiers, including `@`-prefixed verbatim identifiers
//! - Numeric, character, string, verbatim and interpolated string literals
//! - Operators and punctuation (`>>` / `>>=` stay single tokens; the parser splits them)
//!
//! Whitespace, comments, a leading byte-order mark and whole preprocessor lines (`#if`, `#region`, ...) are skipped.
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token, InterpolationPart)
//! - `strings` - String, character and interpolated-string scanning
//! - `numbers` - Numeric literal scanning

mod numbers;
mod strings;
pub mod tokens;

pub use tokens::{Hole, InterpolationPart, Token, TokenKind, keyword_id};

use crate::ast::Span;
use crate::diagnostics::SyntaxError;
use sharpen_core::lang::operators::OperatorId;
use sharpen_core::lang::punctuation::PunctuationId;

// ============================================================================
// LEXER STATE
// ============================================================================

/// Lexer for C# source code.
///
/// Converts source text into a stream of tokens terminated by a single `Eof` token.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    /// Only whitespace seen since the last newline (preprocessor lines must start a line).
    at_line_start: bool,
    tokens: Vec<Token>,
    errors: Vec<SyntaxError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            at_line_start: true,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source code.
    ///
    /// Returns a vector of tokens on success, or a vector of errors on failure.
    /// The token stream always ends with an `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Vec<SyntaxError>> {
        while !self.is_at_end() {
            self.scan_token();
        }

        self.tokens.push(Token::new(
            TokenKind::Eof,
            Span::new(self.current_pos, self.current_pos),
        ));

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.current_pos..].chars();
        iter.next(); // skip current
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((pos, c)) = self.chars.next() {
            self.current_pos = pos + c.len_utf8();
            Some(c)
        } else {
            None
        }
    }

    fn error(&mut self, message: impl Into<String>, start: usize) {
        self.errors
            .push(SyntaxError::lexical(message, Span::new(start, self.current_pos)));
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        let start = self.current_pos;

        let Some(c) = self.advance() else {
            return;
        };

        if c == '\n' {
            self.at_line_start = true;
            return;
        }
        if c.is_whitespace() || c == '\u{feff}' {
            return;
        }
        if c == '#' && self.at_line_start {
            self.skip_line();
            return;
        }
        self.at_line_start = false;

        match c {
            // Comments and division
            '/' => {
                if self.match_char('/') {
                    self.skip_line();
                    self.at_line_start = true;
                } else if self.match_char('*') {
                    self.skip_block_comment(start);
                } else if self.match_char('=') {
                    self.add_op(OperatorId::SlashEq, start);
                } else {
                    self.add_op(OperatorId::Slash, start);
                }
            }

            // Operators and punctuation
            '+' => self.operator(
                start,
                OperatorId::Plus,
                &[('+', OperatorId::PlusPlus), ('=', OperatorId::PlusEq)],
            ),
            '-' => {
                if self.match_char('>') {
                    self.add_punct(PunctuationId::Arrow, start);
                } else {
                    self.operator(
                        start,
                        OperatorId::Minus,
                        &[('-', OperatorId::MinusMinus), ('=', OperatorId::MinusEq)],
                    );
                }
            }
            '*' => self.operator(start, OperatorId::Star, &[('=', OperatorId::StarEq)]),
            '%' => self.operator(start, OperatorId::Percent, &[('=', OperatorId::PercentEq)]),
            '&' => self.operator(
                start,
                OperatorId::Amp,
                &[('&', OperatorId::AmpAmp), ('=', OperatorId::AmpEq)],
            ),
            '|' => self.operator(
                start,
                OperatorId::Pipe,
                &[('|', OperatorId::PipePipe), ('=', OperatorId::PipeEq)],
            ),
            '^' => self.operator(start, OperatorId::Caret, &[('=', OperatorId::CaretEq)]),
            '!' => self.operator(start, OperatorId::Bang, &[('=', OperatorId::NotEq)]),
            '~' => self.add_op(OperatorId::Tilde, start),
            '=' => {
                if self.match_char('=') {
                    self.add_op(OperatorId::EqEq, start);
                } else if self.match_char('>') {
                    self.add_punct(PunctuationId::FatArrow, start);
                } else {
                    self.add_op(OperatorId::Eq, start);
                }
            }
            '<' => {
                if self.match_char('<') {
                    self.operator(start, OperatorId::Shl, &[('=', OperatorId::ShlEq)]);
                } else {
                    self.operator(start, OperatorId::Lt, &[('=', OperatorId::LtEq)]);
                }
            }
            '>' => {
                if self.match_char('>') {
                    self.operator(start, OperatorId::Shr, &[('=', OperatorId::ShrEq)]);
                } else {
                    self.operator(start, OperatorId::Gt, &[('=', OperatorId::GtEq)]);
                }
            }
            '?' => {
                if self.match_char('?') {
                    self.operator(
                        start,
                        OperatorId::QuestionQuestion,
                        &[('=', OperatorId::QuestionQuestionEq)],
                    );
                } else if self.peek() == Some('.') && !self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                    self.add_punct(PunctuationId::QuestionDot, start);
                } else {
                    self.add_punct(PunctuationId::Question, start);
                }
            }
            '.' => {
                if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.scan_number(start, c);
                } else if self.match_char('.') {
                    self.add_op(OperatorId::DotDot, start);
                } else {
                    self.add_punct(PunctuationId::Dot, start);
                }
            }
            ':' => {
                if self.match_char(':') {
                    self.add_punct(PunctuationId::ColonColon, start);
                } else {
                    self.add_punct(PunctuationId::Colon, start);
                }
            }
            ';' => self.add_punct(PunctuationId::Semicolon, start),
            ',' => self.add_punct(PunctuationId::Comma, start),
            '(' => self.add_punct(PunctuationId::LParen, start),
            ')' => self.add_punct(PunctuationId::RParen, start),
            '[' => self.add_punct(PunctuationId::LBracket, start),
            ']' => self.add_punct(PunctuationId::RBracket, start),
            '{' => self.add_punct(PunctuationId::LBrace, start),
            '}' => self.add_punct(PunctuationId::RBrace, start),

            // Strings and characters
            '"' => self.scan_string(start),
            '\'' => self.scan_char(start),
            '@' => self.scan_at(start),
            '$' => {
                if self.match_char('"') {
                    self.scan_interpolated(start, false);
                } else if self.peek() == Some('@') && self.peek_next() == Some('"') {
                    self.advance();
                    self.advance();
                    self.scan_interpolated(start, true);
                } else {
                    self.error("Unexpected character '$'", start);
                }
            }

            // Numbers
            '0'..='9' => self.scan_number(start, c),

            // Identifiers and keywords
            _ if is_ident_start(c) => self.scan_identifier(start, false),

            _ => self.error(format!("Unexpected character '{}'", c), start),
        }
    }

    // ========================================================================
    // Trivia
    // ========================================================================

    /// Skip to (not past) the end of the current line.
    fn skip_line(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn skip_block_comment(&mut self, start: usize) {
        loop {
            match self.advance() {
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    return;
                }
                Some(_) => {}
                None => {
                    self.error("Unterminated block comment", start);
                    return;
                }
            }
        }
    }

    // ========================================================================
    // Operator helpers
    // ========================================================================

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn add_token(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(Token::new(kind, Span::new(start, self.current_pos)));
    }

    fn add_op(&mut self, id: OperatorId, start: usize) {
        self.add_token(TokenKind::Operator(id), start);
    }

    fn add_punct(&mut self, id: PunctuationId, start: usize) {
        self.add_token(TokenKind::Punctuation(id), start);
    }

    /// Try to match compound operator, fallback to simple.
    fn operator(&mut self, start: usize, simple: OperatorId, compounds: &[(char, OperatorId)]) {
        for (c, id) in compounds {
            if self.match_char(*c) {
                self.add_op(*id, start);
                return;
            }
        }
        self.add_op(simple, start);
    }

    // ========================================================================
    // Identifier scanning
    // ========================================================================

    /// `@` starts a verbatim string, a verbatim interpolated string, or a verbatim identifier.
    fn scan_at(&mut self, start: usize) {
        if self.match_char('"') {
            self.scan_verbatim_string(start);
        } else if self.peek() == Some('$') && self.peek_next() == Some('"') {
            self.advance();
            self.advance();
            self.scan_interpolated(start, true);
        } else if self.peek().is_some_and(is_ident_start) {
            self.advance();
            self.scan_identifier(start, true);
        } else {
            self.error("Unexpected character '@'", start);
        }
    }

    fn scan_identifier(&mut self, start: usize, verbatim: bool) {
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }

        if verbatim {
            let spelling = &self.source[start + 1..self.current_pos];
            self.add_token(TokenKind::Ident(spelling.to_string()), start);
            return;
        }

        let spelling = &self.source[start..self.current_pos];

        // Look up identifier spelling in the reserved-word registry (no allocation for keywords).
        if let Some(id) = keyword_id(spelling) {
            self.add_token(TokenKind::Keyword(id), start);
        } else {
            self.add_token(TokenKind::Ident(spelling.to_string()), start);
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Check if a character can start an identifier.
fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Check if a character can continue an identifier.
fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Convenience function to lex a source string.
///
/// This is a shorthand for `Lexer::new(source).tokenize()`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<SyntaxError>> {
    Lexer::new(source).tokenize()
}

// ============================================================================
// TESTS
// ============================================================================
