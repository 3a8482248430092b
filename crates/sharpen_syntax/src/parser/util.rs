/// Miscellaneous parser utilities.
///
/// This chunk contains small shared parsing helpers that don’t cleanly fit into
/// “decl”, “stmt”, “expr”, or “types” (identifiers, designations, and the token classes used by follow-set checks).
impl<'a> Parser<'a> {
    // ========================================================================
    // Utilities
    // ========================================================================

    fn identifier(&mut self) -> PResult<Ident> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected(&["identifier"])),
        }
    }

    fn identifier_spanned(&mut self) -> PResult<Spanned<Ident>> {
        let span = self.current_span();
        let name = self.identifier()?;
        Ok(Spanned::new(name, span))
    }

    /// `x`, `_` or `(a, (b, _))`.
    fn designation(&mut self) -> PResult<Designation> {
        if self.match_punct(PunctuationId::LParen) {
            let mut parts = Vec::new();
            if !self.check_punct(PunctuationId::RParen) {
                loop {
                    parts.push(self.nested(|p| p.designation())?);
                    if !self.match_punct(PunctuationId::Comma) {
                        break;
                    }
                }
            }
            self.expect_punct(PunctuationId::RParen)?;
            return Ok(Designation::Parenthesized(parts));
        }
        let name = self.identifier()?;
        if name == "_" {
            Ok(Designation::Discard)
        } else {
            Ok(Designation::Single(name))
        }
    }
}

/// Tokens that can begin a unary expression.
fn starts_expression(kind: &TokenKind) -> bool {
    match kind {
        TokenKind::Operator(op) => matches!(
            op,
            OperatorId::Plus
                | OperatorId::Minus
                | OperatorId::Bang
                | OperatorId::Tilde
                | OperatorId::PlusPlus
                | OperatorId::MinusMinus
                | OperatorId::Amp
                | OperatorId::Star
                | OperatorId::Caret
                | OperatorId::DotDot
        ),
        _ => starts_primary(kind),
    }
}

/// Tokens that can begin a primary expression.
fn starts_primary(kind: &TokenKind) -> bool {
    match kind {
        TokenKind::Ident(_) => true,
        TokenKind::Punctuation(PunctuationId::LParen) => true,
        TokenKind::Keyword(id) => keyword_starts_primary(*id),
        _ => kind.is_literal(),
    }
}

fn keyword_starts_primary(id: KeywordId) -> bool {
    matches!(
        id,
        KeywordId::True
            | KeywordId::False
            | KeywordId::Null
            | KeywordId::This
            | KeywordId::Base
            | KeywordId::New
            | KeywordId::Delegate
            | KeywordId::Stackalloc
            | KeywordId::Typeof
            | KeywordId::Sizeof
            | KeywordId::Default
            | KeywordId::Checked
            | KeywordId::Unchecked
            | KeywordId::Throw
    ) || keywords::is_predefined_type(id)
}

/// Contextual words that continue a query expression.
fn is_query_keyword(name: &str) -> bool {
    matches!(
        name,
        "from"
            | "let"
            | "where"
            | "join"
            | "on"
            | "equals"
            | "into"
            | "orderby"
            | "ascending"
            | "descending"
            | "select"
            | "group"
            | "by"
    )
}
