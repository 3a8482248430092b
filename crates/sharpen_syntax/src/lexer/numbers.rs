//! Number scanning for the C# lexer
//!
//! Handles integer (decimal, hex, binary) and real literals. The token keeps the raw spelling, including digit
//! separators and type suffixes.

use super::Lexer;
use super::tokens::TokenKind;

impl<'a> Lexer<'a> {
    pub(super) fn scan_number(&mut self, start: usize, first: char) {
        let mut is_real = first == '.';

        if first == '0' && matches!(self.peek(), Some('x' | 'X' | 'b' | 'B')) {
            let radix_char = self.advance().unwrap_or('x');
            let is_digit: fn(char) -> bool = if radix_char.eq_ignore_ascii_case(&'x') {
                |c| c.is_ascii_hexdigit()
            } else {
                |c| c == '0' || c == '1'
            };
            let mut digits = 0usize;
            while let Some(c) = self.peek() {
                if is_digit(c) {
                    digits += 1;
                    self.advance();
                } else if c == '_' {
                    self.advance();
                } else {
                    break;
                }
            }
            if digits == 0 {
                self.error("Invalid numeric literal: missing digits after radix prefix", start);
                return;
            }
            self.scan_integer_suffix();
            self.finish_number(start, false);
            return;
        }

        // Integer part (or fraction, when the literal started with `.`)
        self.scan_digits();

        // Decimal part
        if !is_real && self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            is_real = true;
            self.advance(); // consume .
            self.scan_digits();
        }

        // Exponent part
        if matches!(self.peek(), Some('e' | 'E')) {
            let sign_or_digit = self.peek_next();
            if sign_or_digit.is_some_and(|c| c.is_ascii_digit() || c == '+' || c == '-') {
                is_real = true;
                self.advance();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.advance();
                }
                if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.error("Invalid numeric literal: missing exponent digits", start);
                    return;
                }
                self.scan_digits();
            }
        }

        // Suffix
        match self.peek() {
            Some('f' | 'F' | 'd' | 'D' | 'm' | 'M') => {
                self.advance();
                is_real = true;
            }
            _ if !is_real => self.scan_integer_suffix(),
            _ => {}
        }

        self.finish_number(start, is_real);
    }

    fn scan_digits(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// `u`, `l`, `ul`, `lu` in any case.
    fn scan_integer_suffix(&mut self) {
        match self.peek() {
            Some('u' | 'U') => {
                self.advance();
                if matches!(self.peek(), Some('l' | 'L')) {
                    self.advance();
                }
            }
            Some('l' | 'L') => {
                self.advance();
                if matches!(self.peek(), Some('u' | 'U')) {
                    self.advance();
                }
            }
            _ => {}
        }
    }

    fn finish_number(&mut self, start: usize, is_real: bool) {
        if self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
                self.advance();
            }
            let spelling = &self.source[start..self.current_pos];
            self.error(format!("Invalid numeric literal: {}", spelling), start);
            return;
        }
        let spelling = self.source[start..self.current_pos].to_string();
        if is_real {
            self.add_token(TokenKind::Real(spelling), start);
        } else {
            self.add_token(TokenKind::Int(spelling), start);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::{TokenKind, lex};

    fn single(source: &str) -> TokenKind {
        let tokens = lex(source).unwrap_or_else(|errs| panic!("lex({:?}) failed: {:?}", source, errs));
        assert_eq!(tokens.len(), 2, "{:?}", tokens);
        tokens[0].kind.clone()
    }

    #[test]
    fn test_integer_forms_keep_spelling() {
        assert_eq!(single("42"), TokenKind::Int("42".into()));
        assert_eq!(single("1_000_000"), TokenKind::Int("1_000_000".into()));
        assert_eq!(single("0xFF_FFu"), TokenKind::Int("0xFF_FFu".into()));
        assert_eq!(single("0b1010"), TokenKind::Int("0b1010".into()));
        assert_eq!(single("10UL"), TokenKind::Int("10UL".into()));
    }

    #[test]
    fn test_real_forms() {
        assert_eq!(single("3.14"), TokenKind::Real("3.14".into()));
        assert_eq!(single("1e10"), TokenKind::Real("1e10".into()));
        assert_eq!(single("2.5e-3"), TokenKind::Real("2.5e-3".into()));
        assert_eq!(single("1f"), TokenKind::Real("1f".into()));
        assert_eq!(single("9.99m"), TokenKind::Real("9.99m".into()));
        assert_eq!(single(".5"), TokenKind::Real(".5".into()));
    }

    #[test]
    fn test_member_access_on_integer_is_not_real() {
        let tokens = lex("1.ToString()").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Int("1".into()));
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(lex("0x").is_err());
        assert!(lex("12abc").is_err());
        assert!(lex("1e+").is_err());
    }
}
