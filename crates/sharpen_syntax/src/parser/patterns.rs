/// Pattern parsing (`is`, `case`, switch-expression arms).
///
/// `or` binds loosest, then `and`, then `not`. A primary pattern that starts like a type is read as one when what
/// follows cannot continue a constant expression; otherwise it is a constant pattern.
impl<'a> Parser<'a> {
    fn pattern(&mut self) -> PResult<Spanned<Pattern>> {
        self.nested(|p| p.or_pattern())
    }

    fn or_pattern(&mut self) -> PResult<Spanned<Pattern>> {
        let mut left = self.and_pattern()?;
        while self.match_contextual(KeywordId::Or) {
            let right = self.and_pattern()?;
            let span = left.span.merge(right.span);
            left = Spanned::new(Pattern::Or(Box::new(left), Box::new(right)), span);
        }
        Ok(left)
    }

    fn and_pattern(&mut self) -> PResult<Spanned<Pattern>> {
        let mut left = self.not_pattern()?;
        while self.match_contextual(KeywordId::And) {
            let right = self.not_pattern()?;
            let span = left.span.merge(right.span);
            left = Spanned::new(Pattern::And(Box::new(left), Box::new(right)), span);
        }
        Ok(left)
    }

    fn not_pattern(&mut self) -> PResult<Spanned<Pattern>> {
        let start = self.current_span().start;
        if self.match_contextual(KeywordId::Not) {
            let operand = self.nested(|p| p.not_pattern())?;
            return Ok(Spanned::new(Pattern::Not(Box::new(operand)), self.span_from(start)));
        }
        self.primary_pattern()
    }

    fn primary_pattern(&mut self) -> PResult<Spanned<Pattern>> {
        let start = self.current_span().start;

        if self.check_punct(PunctuationId::LParen) {
            return self.parenthesized_pattern(start);
        }
        if self.check_punct(PunctuationId::LBrace) {
            return self.recursive_pattern(None, start);
        }

        let relational = match self.peek().kind.operator_id() {
            Some(OperatorId::Lt) => Some(BinaryOp::Lt),
            Some(OperatorId::LtEq) => Some(BinaryOp::LtEq),
            Some(OperatorId::Gt) => Some(BinaryOp::Gt),
            Some(OperatorId::GtEq) => Some(BinaryOp::GtEq),
            _ => None,
        };
        if let Some(op) = relational {
            self.advance();
            let value = self.shift()?;
            return Ok(Spanned::new(Pattern::Relational { op, value }, self.span_from(start)));
        }

        if self.peek().ident() == Some("_")
            && !matches!(
                self.peek_kind(1),
                TokenKind::Punctuation(PunctuationId::Dot | PunctuationId::LParen)
            )
        {
            self.advance();
            return Ok(Spanned::new(Pattern::Discard, self.span_from(start)));
        }

        if self.check_contextual(KeywordId::Var)
            && matches!(
                self.peek_kind(1),
                TokenKind::Ident(_) | TokenKind::Punctuation(PunctuationId::LParen)
            )
        {
            self.advance();
            let designation = self.designation()?;
            return Ok(Spanned::new(Pattern::Var(designation), self.span_from(start)));
        }

        let typed = self.speculate(Rule::Type(TypeMode::Pattern), |p| {
            let ty = p.parse_type(TypeMode::Pattern)?;
            if p.type_pattern_follows() {
                Ok(ty)
            } else {
                Err(p.unexpected(&["pattern"]))
            }
        });
        if let Some(ty) = typed {
            return self.pattern_after_type(ty, start);
        }

        let value = self.shift()?;
        Ok(Spanned::new(Pattern::Constant(value), self.span_from(start)))
    }

    /// True unless the next token would continue a constant expression (`A.B + 1`, `A[0]`).
    fn type_pattern_follows(&self) -> bool {
        match self.peek_kind(0) {
            TokenKind::Operator(o) => !matches!(
                o,
                OperatorId::Plus
                    | OperatorId::Minus
                    | OperatorId::Star
                    | OperatorId::Slash
                    | OperatorId::Percent
                    | OperatorId::Shl
                    | OperatorId::PlusPlus
                    | OperatorId::MinusMinus
                    | OperatorId::Bang
                    | OperatorId::DotDot
            ) && !self.at_shift_right(),
            TokenKind::Punctuation(p) => !matches!(
                p,
                PunctuationId::Dot | PunctuationId::QuestionDot | PunctuationId::Arrow | PunctuationId::LBracket
            ),
            TokenKind::Keyword(_) => !self.check_keyword(KeywordId::Switch),
            _ => true,
        }
    }

    fn pattern_after_type(&mut self, ty: Spanned<Type>, start: usize) -> PResult<Spanned<Pattern>> {
        if self.check_punct(PunctuationId::LParen) || self.check_punct(PunctuationId::LBrace) {
            return self.recursive_pattern(Some(ty), start);
        }
        if self.at_designation() {
            let designation = self.designation()?;
            return Ok(Spanned::new(Pattern::Declaration { ty, designation }, self.span_from(start)));
        }
        Ok(Spanned::new(Pattern::Type(ty), self.span_from(start)))
    }

    /// An identifier that names a variable, not one of the words that continue a pattern.
    fn at_designation(&self) -> bool {
        match self.peek().ident() {
            Some(name) => !matches!(name, "and" | "or" | "when"),
            None => false,
        }
    }

    /// `(p)` is a parenthesised pattern; `(p, q)`, `(x: p)`, `(p) { ... }` and `(p) name` are positional.
    fn parenthesized_pattern(&mut self, start: usize) -> PResult<Spanned<Pattern>> {
        let mut subpatterns = self.subpatterns(PunctuationId::RParen)?;
        let single = subpatterns.len() == 1 && subpatterns[0].node.name.is_none();
        if single && !self.check_punct(PunctuationId::LBrace) && !self.at_designation() {
            let inner = subpatterns.remove(0).node.pattern;
            return Ok(Spanned::new(Pattern::Parenthesized(Box::new(inner)), self.span_from(start)));
        }
        self.finish_recursive_pattern(None, Some(subpatterns), start)
    }

    fn recursive_pattern(&mut self, ty: Option<Spanned<Type>>, start: usize) -> PResult<Spanned<Pattern>> {
        let positional = if self.check_punct(PunctuationId::LParen) {
            Some(self.subpatterns(PunctuationId::RParen)?)
        } else {
            None
        };
        self.finish_recursive_pattern(ty, positional, start)
    }

    fn finish_recursive_pattern(
        &mut self,
        ty: Option<Spanned<Type>>,
        positional: Option<Vec<Spanned<Subpattern>>>,
        start: usize,
    ) -> PResult<Spanned<Pattern>> {
        let properties = if self.check_punct(PunctuationId::LBrace) {
            Some(self.subpatterns(PunctuationId::RBrace)?)
        } else {
            None
        };
        let designation = if self.at_designation() {
            Some(self.designation()?)
        } else {
            None
        };
        Ok(Spanned::new(
            Pattern::Recursive {
                ty,
                positional,
                properties,
                designation,
            },
            self.span_from(start),
        ))
    }

    /// `(a, name: p)` or `{ Prop: p, A.B: q, }`; the opener is the current token.
    fn subpatterns(&mut self, close: PunctuationId) -> PResult<Vec<Spanned<Subpattern>>> {
        self.advance();
        let mut items = Vec::new();
        while !self.check_punct(close) && !self.is_at_end() {
            let start = self.current_span().start;
            let name = self.subpattern_name()?;
            let pattern = self.pattern()?;
            items.push(Spanned::new(Subpattern { name, pattern }, self.span_from(start)));
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_punct(close)?;
        Ok(items)
    }

    /// `Name:` or the extended form `A.B.C:`, joined with dots.
    fn subpattern_name(&mut self) -> PResult<Option<Ident>> {
        let mut k = 0;
        loop {
            if !matches!(self.peek_kind(k), TokenKind::Ident(_)) {
                return Ok(None);
            }
            match self.peek_kind(k + 1) {
                TokenKind::Punctuation(PunctuationId::Colon) => break,
                TokenKind::Punctuation(PunctuationId::Dot) => k += 2,
                _ => return Ok(None),
            }
        }
        let mut name = self.identifier()?;
        while self.match_punct(PunctuationId::Dot) {
            name.push('.');
            name.push_str(&self.identifier()?);
        }
        self.expect_punct(PunctuationId::Colon)?;
        Ok(Some(name))
    }
}
