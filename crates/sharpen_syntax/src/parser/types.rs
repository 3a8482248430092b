/// Type parsing.
///
/// Types are context-free once we know we are parsing one; the ambiguity lives at the call sites (is this `(` a
/// cast? is this `<` a type-argument list?), which wrap these functions in speculation.
impl<'a> Parser<'a> {
    fn parse_type(&mut self, mode: TypeMode) -> PResult<Spanned<Type>> {
        self.nested(|p| {
            let start = p.current_span().start;
            let mut ty = p.non_array_type()?;
            loop {
                if p.check_punct(PunctuationId::Question) && p.question_is_nullable(mode) {
                    p.advance();
                    ty = Spanned::new(Type::Nullable(Box::new(ty)), p.span_from(start));
                } else if mode != TypeMode::Pattern && p.check_op(OperatorId::Star) {
                    p.advance();
                    ty = Spanned::new(Type::Pointer(Box::new(ty)), p.span_from(start));
                } else if mode != TypeMode::Creation && p.at_rank_specifier() {
                    let rank = p.rank_specifier()?;
                    ty = Spanned::new(
                        Type::Array {
                            element: Box::new(ty),
                            rank,
                        },
                        p.span_from(start),
                    );
                } else {
                    break;
                }
            }
            Ok(ty)
        })
    }

    /// A declaration type that may be a reference: `ref T`, `ref readonly T`, or a plain type.
    fn declaration_type(&mut self) -> PResult<Spanned<Type>> {
        if !self.check_keyword(KeywordId::Ref) {
            return self.parse_type(TypeMode::Normal);
        }
        let start = self.advance().span.start;
        let readonly = self.match_keyword(KeywordId::Readonly);
        let ty = self.parse_type(TypeMode::Normal)?;
        Ok(Spanned::new(
            Type::Ref {
                readonly,
                ty: Box::new(ty),
            },
            self.span_from(start),
        ))
    }

    fn question_is_nullable(&self, mode: TypeMode) -> bool {
        match mode {
            TypeMode::Normal | TypeMode::Creation => true,
            // `x is int ? a : b` is a conditional.
            TypeMode::Pattern => !starts_expression(self.peek_kind(1)),
        }
    }

    fn non_array_type(&mut self) -> PResult<Spanned<Type>> {
        let start = self.current_span().start;
        match self.peek().kind.clone() {
            TokenKind::Keyword(id) if keywords::is_predefined_type(id) => {
                self.advance();
                Ok(Spanned::new(Type::Predefined(id), self.span_from(start)))
            }
            TokenKind::Punctuation(PunctuationId::LParen) => self.tuple_type(),
            TokenKind::Ident(_) => {
                let name = self.type_name()?;
                Ok(Spanned::new(Type::Named(name), self.span_from(start)))
            }
            _ => Err(self.unexpected(&["type"])),
        }
    }

    /// `(T1 a, T2 b, ...)` with at least two elements.
    fn tuple_type(&mut self) -> PResult<Spanned<Type>> {
        let start = self.expect_punct(PunctuationId::LParen)?.start;
        let mut elements = Vec::new();
        loop {
            let el_start = self.current_span().start;
            let ty = self.parse_type(TypeMode::Normal)?;
            let name = if self.check_ident() { Some(self.identifier()?) } else { None };
            elements.push(Spanned::new(TupleTypeElement { ty, name }, self.span_from(el_start)));
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_punct(PunctuationId::RParen)?;
        let span = self.span_from(start);
        if elements.len() < 2 {
            return Err(SyntaxError::syntax("a tuple type needs at least two elements", span));
        }
        Ok(Spanned::new(Type::Tuple(elements), span))
    }

    /// `alias::A<T>.B.C<U>`
    fn type_name(&mut self) -> PResult<TypeName> {
        let alias = if self.check_ident() && self.peek_kind(1).is_punctuation(PunctuationId::ColonColon) {
            let alias = self.identifier()?;
            self.advance();
            Some(alias)
        } else {
            None
        };

        let mut segments = Vec::new();
        loop {
            let name = self.identifier()?;
            let type_args = if self.check_op(OperatorId::Lt) {
                self.type_argument_list()?
            } else {
                Vec::new()
            };
            segments.push(NameSegment { name, type_args });
            if self.check_punct(PunctuationId::Dot) && matches!(self.peek_kind(1), TokenKind::Ident(_)) {
                self.advance();
            } else {
                break;
            }
        }
        Ok(TypeName { alias, segments })
    }

    /// `<T1, T2>`, or the unbound form `<,>` used by `typeof`.
    fn type_argument_list(&mut self) -> PResult<Vec<Spanned<Type>>> {
        self.expect_op(OperatorId::Lt)?;
        let mut args = Vec::new();
        if self.check_punct(PunctuationId::Comma) || self.check_op(OperatorId::Gt) {
            loop {
                let at = self.current_span().start;
                args.push(Spanned::new(Type::Omitted, Span::new(at, at)));
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
        } else {
            loop {
                args.push(self.parse_type(TypeMode::Normal)?);
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
        }
        self.expect_op(OperatorId::Gt)?;
        Ok(args)
    }

    fn at_rank_specifier(&self) -> bool {
        self.check_punct(PunctuationId::LBracket)
            && matches!(
                self.peek_kind(1),
                TokenKind::Punctuation(PunctuationId::Comma | PunctuationId::RBracket)
            )
    }

    /// `[]`, `[,]`, ... returning the rank.
    fn rank_specifier(&mut self) -> PResult<usize> {
        self.expect_punct(PunctuationId::LBracket)?;
        let mut rank = 1;
        while self.match_punct(PunctuationId::Comma) {
            rank += 1;
        }
        self.expect_punct(PunctuationId::RBracket)?;
        Ok(rank)
    }

    /// Type arguments after a name in expression context.
    ///
    /// `<` is read as a type-argument list only if the whole list parses and the token after the closing `>` is one
    /// that cannot continue a relational expression; otherwise it is left for the `<` operator.
    fn expression_type_args(&mut self) -> Vec<Spanned<Type>> {
        if !self.check_op(OperatorId::Lt) {
            return Vec::new();
        }
        self.speculate(Rule::TypeArgs, |p| {
            let args = p.type_argument_list()?;
            if p.type_args_follow() {
                Ok(args)
            } else {
                Err(p.unexpected(&["token after type arguments"]))
            }
        })
        .unwrap_or_default()
    }

    fn type_args_follow(&self) -> bool {
        match self.peek_kind(0) {
            TokenKind::Eof => true,
            TokenKind::Punctuation(p) => matches!(
                p,
                PunctuationId::LParen
                    | PunctuationId::RParen
                    | PunctuationId::RBracket
                    | PunctuationId::RBrace
                    | PunctuationId::Colon
                    | PunctuationId::Semicolon
                    | PunctuationId::Comma
                    | PunctuationId::Dot
                    | PunctuationId::Question
                    | PunctuationId::QuestionDot
                    | PunctuationId::LBracket
                    | PunctuationId::FatArrow
            ),
            TokenKind::Operator(o) => matches!(
                o,
                OperatorId::EqEq
                    | OperatorId::NotEq
                    | OperatorId::Pipe
                    | OperatorId::Caret
                    | OperatorId::AmpAmp
                    | OperatorId::PipePipe
                    | OperatorId::Amp
            ),
            _ => false,
        }
    }
}

/// True for types that cannot also be read as an expression (`int`, `List<T>`, `T[]`, `T?`, `T*`, tuples).
fn is_definitely_type(ty: &Type) -> bool {
    match ty {
        Type::Named(name) => name.is_generic(),
        Type::Omitted => false,
        _ => true,
    }
}
