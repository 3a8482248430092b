//! String scanning for the C# lexer
//!
//! Handles regular and verbatim strings, character literals, and interpolated strings. Regular/verbatim/character
//! tokens keep their raw spelling (quotes and escapes included); interpolated strings are split into text parts and
//! holes whose expression source the parser lexes again.

use super::Lexer;
use super::tokens::{Hole, InterpolationPart, TokenKind};

// ============================================================================
// Escape sequence handling
// ============================================================================

/// Result of skipping an escape sequence
enum EscapeResult {
    Ok,
    /// Unknown escape character
    Unknown(char),
    /// End of input during escape
    Eof,
}

impl<'a> Lexer<'a> {
    /// Skip a simple escape sequence. Called after consuming the backslash.
    fn skip_escape(&mut self) -> EscapeResult {
        match self.advance() {
            Some('\'' | '"' | '\\' | '0' | 'a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v') => EscapeResult::Ok,
            Some('x') => {
                // 1 to 4 hex digits
                let mut count = 0;
                while count < 4 && self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                    self.advance();
                    count += 1;
                }
                if count == 0 { EscapeResult::Unknown('x') } else { EscapeResult::Ok }
            }
            Some(c @ ('u' | 'U')) => {
                let want = if c == 'u' { 4 } else { 8 };
                for _ in 0..want {
                    if !self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                        return EscapeResult::Unknown(c);
                    }
                    self.advance();
                }
                EscapeResult::Ok
            }
            Some(c) => EscapeResult::Unknown(c),
            None => EscapeResult::Eof,
        }
    }

    /// Consume a quoted literal body up to `quote`. Returns `false` if the literal is unterminated.
    fn scan_quoted(&mut self, start: usize, quote: char, what: &str) -> bool {
        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.error(format!("Unterminated {what}"), start);
                    return false;
                }
                Some('\\') => {
                    self.advance();
                    match self.skip_escape() {
                        EscapeResult::Ok => {}
                        EscapeResult::Unknown(c) => {
                            self.error(format!("Unrecognized escape sequence '\\{c}'"), start);
                        }
                        EscapeResult::Eof => {
                            self.error("Unterminated escape sequence", start);
                            return false;
                        }
                    }
                }
                Some(c) if c == quote => {
                    self.advance();
                    return true;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }
}

// ============================================================================
// String scanning
// ============================================================================

impl<'a> Lexer<'a> {
    pub(super) fn scan_string(&mut self, start: usize) {
        if self.scan_quoted(start, '"', "string") {
            let raw = self.source[start..self.current_pos].to_string();
            self.add_token(TokenKind::String(raw), start);
        }
    }

    pub(super) fn scan_char(&mut self, start: usize) {
        let body_start = self.current_pos;
        if self.scan_quoted(start, '\'', "character literal") {
            if self.current_pos - body_start <= 1 {
                self.error("Empty character literal", start);
                return;
            }
            let raw = self.source[start..self.current_pos].to_string();
            self.add_token(TokenKind::Char(raw), start);
        }
    }

    /// Verbatim string body after `@"`; `""` is an escaped quote and newlines are allowed.
    pub(super) fn scan_verbatim_string(&mut self, start: usize) {
        if self.skip_verbatim_body(start) {
            let raw = self.source[start..self.current_pos].to_string();
            self.add_token(TokenKind::VerbatimString(raw), start);
        }
    }

    fn skip_verbatim_body(&mut self, start: usize) -> bool {
        loop {
            match self.advance() {
                None => {
                    self.error("Unterminated verbatim string", start);
                    return false;
                }
                Some('"') => {
                    if !self.match_char('"') {
                        return true;
                    }
                }
                Some(_) => {}
            }
        }
    }

    // ========================================================================
    // Interpolated strings
    // ========================================================================

    /// Scan an interpolated string; the opening `$"` / `$@"` / `@$"` is already consumed.
    pub(super) fn scan_interpolated(&mut self, start: usize, verbatim: bool) {
        let mut parts = Vec::new();
        let mut text = String::new();

        loop {
            match self.peek() {
                None => {
                    self.error("Unterminated interpolated string", start);
                    return;
                }
                Some('\n') if !verbatim => {
                    self.error("Unterminated interpolated string", start);
                    return;
                }
                Some('"') => {
                    self.advance();
                    if verbatim && self.match_char('"') {
                        text.push_str("\"\"");
                        continue;
                    }
                    break;
                }
                Some('\\') if !verbatim => {
                    self.advance();
                    text.push('\\');
                    let escape_start = self.current_pos;
                    if let EscapeResult::Unknown(c) = self.skip_escape() {
                        self.error(format!("Unrecognized escape sequence '\\{c}'"), start);
                    }
                    text.push_str(&self.source[escape_start..self.current_pos]);
                }
                Some('{') => {
                    self.advance();
                    if self.match_char('{') {
                        text.push_str("{{");
                        continue;
                    }
                    if !text.is_empty() {
                        parts.push(InterpolationPart::Text(std::mem::take(&mut text)));
                    }
                    match self.scan_hole(start) {
                        Some(hole) => parts.push(InterpolationPart::Hole(hole)),
                        None => return,
                    }
                }
                Some('}') => {
                    self.advance();
                    if self.match_char('}') {
                        text.push_str("}}");
                    } else {
                        self.error("Unescaped '}' in interpolated string", start);
                    }
                }
                Some(c) => {
                    self.advance();
                    text.push(c);
                }
            }
        }

        if !text.is_empty() {
            parts.push(InterpolationPart::Text(text));
        }
        self.add_token(TokenKind::InterpolatedString { verbatim, parts }, start);
    }

    /// Scan one hole after its `{`, through the closing `}`.
    ///
    /// `,` and `:` only split off the alignment / format at nesting depth zero; a conditional expression inside a
    /// hole must be parenthesized, exactly as in the language.
    fn scan_hole(&mut self, start: usize) -> Option<Hole> {
        let expr_start = self.current_pos;
        let mut depth = 0usize;
        let mut expr_end = None;
        let mut alignment_start = None;
        let mut alignment_end = None;

        loop {
            let Some(c) = self.peek() else {
                self.error("Unterminated interpolation hole", start);
                return None;
            };
            match c {
                '(' | '[' | '{' => {
                    depth += 1;
                    self.advance();
                }
                ')' | ']' => {
                    depth = depth.saturating_sub(1);
                    self.advance();
                }
                '}' if depth > 0 => {
                    depth -= 1;
                    self.advance();
                }
                '}' => break,
                '"' => {
                    let quote_start = self.current_pos;
                    self.advance();
                    if !self.scan_quoted(quote_start, '"', "string") {
                        return None;
                    }
                }
                '\'' => {
                    let quote_start = self.current_pos;
                    self.advance();
                    if !self.scan_quoted(quote_start, '\'', "character literal") {
                        return None;
                    }
                }
                '@' if self.peek_next() == Some('"') => {
                    let quote_start = self.current_pos;
                    self.advance();
                    self.advance();
                    if !self.skip_verbatim_body(quote_start) {
                        return None;
                    }
                }
                ',' if depth == 0 && alignment_start.is_none() => {
                    expr_end = Some(self.current_pos);
                    self.advance();
                    alignment_start = Some(self.current_pos);
                }
                ':' if depth == 0 && self.peek_next() == Some(':') => {
                    self.advance();
                    self.advance();
                }
                ':' if depth == 0 => {
                    if alignment_start.is_some() {
                        alignment_end = Some(self.current_pos);
                    } else {
                        expr_end = Some(self.current_pos);
                    }
                    self.advance();
                    return self.finish_hole(start, expr_start, expr_end, alignment_start, alignment_end);
                }
                _ => {
                    self.advance();
                }
            }
        }

        let end = self.current_pos;
        self.advance(); // consume }
        let expr_end = expr_end.unwrap_or(end);
        let alignment = alignment_start.map(|a| (self.source[a..alignment_end.unwrap_or(end)].to_string(), a));
        self.make_hole(expr_start, expr_end, alignment, None)
    }

    /// Format specifier: raw text up to the closing `}`.
    fn finish_hole(
        &mut self,
        start: usize,
        expr_start: usize,
        expr_end: Option<usize>,
        alignment_start: Option<usize>,
        alignment_end: Option<usize>,
    ) -> Option<Hole> {
        let format_start = self.current_pos;
        loop {
            match self.peek() {
                None | Some('"') => {
                    self.error("Unterminated interpolation format", start);
                    return None;
                }
                Some('}') => break,
                Some(_) => {
                    self.advance();
                }
            }
        }
        let format = self.source[format_start..self.current_pos].to_string();
        self.advance(); // consume }
        let expr_end = expr_end.unwrap_or(format_start);
        let alignment = match (alignment_start, alignment_end) {
            (Some(a), Some(e)) => Some((self.source[a..e].to_string(), a)),
            _ => None,
        };
        self.make_hole(expr_start, expr_end, alignment, Some(format))
    }

    fn make_hole(
        &mut self,
        expr_start: usize,
        expr_end: usize,
        alignment: Option<(String, usize)>,
        format: Option<String>,
    ) -> Option<Hole> {
        let source = &self.source[expr_start..expr_end];
        if source.trim().is_empty() {
            self.error("Empty interpolation hole", expr_start);
            return None;
        }
        Some(Hole {
            source: source.to_string(),
            offset: expr_start,
            alignment,
            format,
        })
    }
}
