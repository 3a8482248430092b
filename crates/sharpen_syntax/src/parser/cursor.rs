// ============================================================================
// Token cursor
// ============================================================================

/// Saved cursor position. Only meaningful for the parser that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Position(usize);

/// Split every `>>` into `>` `>` and every `>>=` into `>` `>=`.
///
/// The parser recognises a shift only when two `>` halves are adjacent, so a closing generic list never has to split
/// a token halfway through a parse. Streams without shift tokens are borrowed as-is.
fn split_shift_tokens(tokens: &[Token]) -> Cow<'_, [Token]> {
    let needs_split = tokens
        .iter()
        .any(|t| t.kind.is_operator(OperatorId::Shr) || t.kind.is_operator(OperatorId::ShrEq));
    if !needs_split {
        return Cow::Borrowed(tokens);
    }

    let mut out = Vec::with_capacity(tokens.len() + 8);
    for token in tokens {
        let second = match token.kind {
            TokenKind::Operator(OperatorId::Shr) => OperatorId::Gt,
            TokenKind::Operator(OperatorId::ShrEq) => OperatorId::GtEq,
            _ => {
                out.push(token.clone());
                continue;
            }
        };
        let mid = token.span.start + 1;
        out.push(Token::new(
            TokenKind::Operator(OperatorId::Gt),
            Span::new(token.span.start, mid),
        ));
        out.push(Token::new(TokenKind::Operator(second), Span::new(mid, token.span.end)));
    }
    Cow::Owned(out)
}

/// Compute, for every opening bracket, the index of its matching closer.
///
/// Mismatched or unclosed brackets get `None`.
fn bracket_matches(tokens: &[Token]) -> Vec<Option<usize>> {
    let mut matching = vec![None; tokens.len()];
    let mut stack: Vec<(usize, PunctuationId)> = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        let Some(p) = token.punctuation_id() else { continue };
        match p {
            PunctuationId::LParen | PunctuationId::LBracket | PunctuationId::LBrace => stack.push((i, p)),
            PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace => {
                let opener = match p {
                    PunctuationId::RParen => PunctuationId::LParen,
                    PunctuationId::RBracket => PunctuationId::LBracket,
                    _ => PunctuationId::LBrace,
                };
                // Unclosed openers of another kind in between are abandoned; a stray closer changes nothing.
                if let Some(at) = stack.iter().rposition(|&(_, open)| open == opener) {
                    matching[stack[at].0] = Some(i);
                    stack.truncate(at);
                }
            }
            _ => {}
        }
    }
    matching
}

impl<'a> Parser<'a> {
    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    /// Token `k` positions ahead; the end-of-input token once past the stream.
    fn peek_at(&self, k: usize) -> &Token {
        self.tokens.get(self.pos + k).unwrap_or(&self.eof)
    }

    fn peek_kind(&self, k: usize) -> &TokenKind {
        &self.peek_at(k).kind
    }

    fn current_span(&self) -> Span {
        self.peek().span
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> &Token {
        if self.pos < self.tokens.len() && !matches!(self.tokens[self.pos].kind, TokenKind::Eof) {
            self.pos += 1;
        }
        self.previous()
    }

    fn previous(&self) -> &Token {
        if self.pos == 0 {
            return &self.eof;
        }
        self.tokens.get(self.pos - 1).unwrap_or(&self.eof)
    }

    fn mark(&self) -> Position {
        Position(self.pos)
    }

    fn reset(&mut self, position: Position) {
        self.pos = position.0;
    }

    /// End offset of the last consumed token.
    fn prev_end(&self) -> usize {
        if self.pos == 0 { 0 } else { self.previous().span.end }
    }

    /// Span from `start` to the end of the last consumed token (empty if nothing was consumed).
    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.prev_end().max(start))
    }

    /// Index of the bracket matching the opener `k` tokens ahead.
    fn matching_close(&self, k: usize) -> Option<usize> {
        self.matching.get(self.pos + k).copied().flatten()
    }

    /// True if tokens `k` and `k + 1` touch (no whitespace between them).
    fn adjacent(&self, k: usize) -> bool {
        self.peek_at(k).span.end == self.peek_at(k + 1).span.start
    }

    /// `>` `>` with no gap: a right shift.
    fn at_shift_right(&self) -> bool {
        self.peek_kind(0).is_operator(OperatorId::Gt) && self.peek_kind(1).is_operator(OperatorId::Gt) && self.adjacent(0)
    }

    /// `>` `>=` with no gap: a right-shift assignment.
    fn at_shift_right_assign(&self) -> bool {
        self.peek_kind(0).is_operator(OperatorId::Gt) && self.peek_kind(1).is_operator(OperatorId::GtEq) && self.adjacent(0)
    }
}
