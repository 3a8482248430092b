/// Expression parsing.
///
/// One function per precedence level, lowest first. Binary levels loop (left-associative); assignment, `??` and
/// the conditional operator recurse to the right.
impl<'a> Parser<'a> {
    // ========================================================================
    // Entry / assignment / conditional
    // ========================================================================

    fn expression(&mut self) -> PResult<Spanned<Expr>> {
        self.nested(|p| p.assignment())
    }

    fn assignment(&mut self) -> PResult<Spanned<Expr>> {
        if self.check_keyword(KeywordId::Ref) {
            return self.ref_expression();
        }
        let target = self.conditional()?;
        let Some(op) = self.assignment_operator() else {
            return Ok(target);
        };
        let value = self.expression()?;
        let span = target.span.merge(value.span);
        Ok(Spanned::new(
            Expr::Assignment {
                target: Box::new(target),
                op,
                value: Box::new(value),
            },
            span,
        ))
    }

    /// `ref x`. The operand is anything but an assignment, so `ref c ? ref a : ref b` is one reference.
    fn ref_expression(&mut self) -> PResult<Spanned<Expr>> {
        let start = self.advance().span.start;
        let operand = self.conditional()?;
        Ok(Spanned::new(Expr::Ref(Box::new(operand)), self.span_from(start)))
    }

    /// Consume an assignment operator, if one is next.
    fn assignment_operator(&mut self) -> Option<AssignOp> {
        if self.at_shift_right_assign() {
            self.advance();
            self.advance();
            return Some(AssignOp::Shr);
        }
        let op = match self.peek().kind.operator_id()? {
            OperatorId::Eq => AssignOp::Assign,
            OperatorId::PlusEq => AssignOp::Add,
            OperatorId::MinusEq => AssignOp::Sub,
            OperatorId::StarEq => AssignOp::Mul,
            OperatorId::SlashEq => AssignOp::Div,
            OperatorId::PercentEq => AssignOp::Mod,
            OperatorId::AmpEq => AssignOp::BitAnd,
            OperatorId::PipeEq => AssignOp::BitOr,
            OperatorId::CaretEq => AssignOp::BitXor,
            OperatorId::ShlEq => AssignOp::Shl,
            OperatorId::QuestionQuestionEq => AssignOp::Coalesce,
            _ => return None,
        };
        self.advance();
        Some(op)
    }

    fn conditional(&mut self) -> PResult<Spanned<Expr>> {
        let cond = self.coalesce()?;
        if !self.match_punct(PunctuationId::Question) {
            return Ok(cond);
        }
        let then = self.expression()?;
        self.expect_punct(PunctuationId::Colon)?;
        let otherwise = self.expression()?;
        let span = cond.span.merge(otherwise.span);
        Ok(Spanned::new(
            Expr::Conditional {
                cond: Box::new(cond),
                then: Box::new(then),
                otherwise: Box::new(otherwise),
            },
            span,
        ))
    }

    /// `a ?? b ?? c` groups as `a ?? (b ?? c)`.
    fn coalesce(&mut self) -> PResult<Spanned<Expr>> {
        let left = self.logical_or()?;
        if !self.match_op(OperatorId::QuestionQuestion) {
            return Ok(left);
        }
        let right = self.nested(|p| p.coalesce())?;
        Ok(binary(BinaryOp::Coalesce, left, right))
    }

    // ========================================================================
    // Binary levels
    // ========================================================================

    fn left_assoc(
        &mut self,
        operand: fn(&mut Self) -> PResult<Spanned<Expr>>,
        operator: fn(&Self) -> Option<(BinaryOp, usize)>,
    ) -> PResult<Spanned<Expr>> {
        let mut left = operand(self)?;
        while let Some((op, width)) = operator(self) {
            for _ in 0..width {
                self.advance();
            }
            let right = operand(self)?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn logical_or(&mut self) -> PResult<Spanned<Expr>> {
        self.left_assoc(Self::logical_and, |p| {
            p.check_op(OperatorId::PipePipe).then_some((BinaryOp::Or, 1))
        })
    }

    fn logical_and(&mut self) -> PResult<Spanned<Expr>> {
        self.left_assoc(Self::bitwise_or, |p| {
            p.check_op(OperatorId::AmpAmp).then_some((BinaryOp::And, 1))
        })
    }

    fn bitwise_or(&mut self) -> PResult<Spanned<Expr>> {
        self.left_assoc(Self::bitwise_xor, |p| {
            p.check_op(OperatorId::Pipe).then_some((BinaryOp::BitOr, 1))
        })
    }

    fn bitwise_xor(&mut self) -> PResult<Spanned<Expr>> {
        self.left_assoc(Self::bitwise_and, |p| {
            p.check_op(OperatorId::Caret).then_some((BinaryOp::BitXor, 1))
        })
    }

    fn bitwise_and(&mut self) -> PResult<Spanned<Expr>> {
        self.left_assoc(Self::equality, |p| {
            p.check_op(OperatorId::Amp).then_some((BinaryOp::BitAnd, 1))
        })
    }

    fn equality(&mut self) -> PResult<Spanned<Expr>> {
        self.left_assoc(Self::relational, |p| match p.peek().kind.operator_id() {
            Some(OperatorId::EqEq) => Some((BinaryOp::Eq, 1)),
            Some(OperatorId::NotEq) => Some((BinaryOp::NotEq, 1)),
            _ => None,
        })
    }

    /// Relational operators plus `is` and `as`, which take a pattern / type on the right.
    fn relational(&mut self) -> PResult<Spanned<Expr>> {
        let mut left = self.shift()?;
        loop {
            if self.match_keyword(KeywordId::Is) {
                let pattern = self.pattern()?;
                let span = left.span.merge(pattern.span);
                left = Spanned::new(
                    Expr::Is {
                        operand: Box::new(left),
                        pattern: Box::new(pattern),
                    },
                    span,
                );
            } else if self.match_keyword(KeywordId::As) {
                let ty = self.parse_type(TypeMode::Pattern)?;
                let span = left.span.merge(ty.span);
                left = Spanned::new(
                    Expr::As {
                        operand: Box::new(left),
                        ty,
                    },
                    span,
                );
            } else if let Some(op) = self.relational_operator() {
                self.advance();
                let right = self.shift()?;
                left = binary(op, left, right);
            } else {
                break;
            }
        }
        Ok(left)
    }

    fn relational_operator(&self) -> Option<BinaryOp> {
        match self.peek().kind.operator_id()? {
            OperatorId::Lt => Some(BinaryOp::Lt),
            OperatorId::LtEq => Some(BinaryOp::LtEq),
            OperatorId::GtEq => Some(BinaryOp::GtEq),
            OperatorId::Gt if !self.at_shift_right() && !self.at_shift_right_assign() => Some(BinaryOp::Gt),
            _ => None,
        }
    }

    fn shift(&mut self) -> PResult<Spanned<Expr>> {
        self.left_assoc(Self::additive, |p| {
            if p.check_op(OperatorId::Shl) {
                Some((BinaryOp::Shl, 1))
            } else if p.at_shift_right() {
                Some((BinaryOp::Shr, 2))
            } else {
                None
            }
        })
    }

    fn additive(&mut self) -> PResult<Spanned<Expr>> {
        self.left_assoc(Self::multiplicative, |p| match p.peek().kind.operator_id() {
            Some(OperatorId::Plus) => Some((BinaryOp::Add, 1)),
            Some(OperatorId::Minus) => Some((BinaryOp::Sub, 1)),
            _ => None,
        })
    }

    fn multiplicative(&mut self) -> PResult<Spanned<Expr>> {
        self.left_assoc(Self::switch_level, |p| match p.peek().kind.operator_id() {
            Some(OperatorId::Star) => Some((BinaryOp::Mul, 1)),
            Some(OperatorId::Slash) => Some((BinaryOp::Div, 1)),
            Some(OperatorId::Percent) => Some((BinaryOp::Mod, 1)),
            _ => None,
        })
    }

    /// `x switch { ... }` binds tighter than `*` but looser than `..`.
    fn switch_level(&mut self) -> PResult<Spanned<Expr>> {
        let mut expr = self.range()?;
        while self.check_keyword(KeywordId::Switch) && self.peek_kind(1).is_punctuation(PunctuationId::LBrace) {
            expr = self.switch_expression(expr)?;
        }
        Ok(expr)
    }

    fn switch_expression(&mut self, scrutinee: Spanned<Expr>) -> PResult<Spanned<Expr>> {
        let start = scrutinee.span.start;
        self.expect_keyword(KeywordId::Switch)?;
        self.expect_punct(PunctuationId::LBrace)?;
        let mut arms = Vec::new();
        while !self.check_punct(PunctuationId::RBrace) && !self.is_at_end() {
            let arm_start = self.current_span().start;
            let pattern = self.pattern()?;
            let guard = if self.match_contextual(KeywordId::When) {
                Some(self.expression()?)
            } else {
                None
            };
            self.expect_punct(PunctuationId::FatArrow)?;
            let body = self.expression()?;
            arms.push(Spanned::new(SwitchArm { pattern, guard, body }, self.span_from(arm_start)));
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_closing(PunctuationId::RBrace)?;
        Ok(Spanned::new(
            Expr::Switch {
                scrutinee: Box::new(scrutinee),
                arms,
            },
            self.span_from(start),
        ))
    }

    /// `a..b` with either side optional.
    fn range(&mut self) -> PResult<Spanned<Expr>> {
        let start = self.current_span().start;
        let left = if self.check_op(OperatorId::DotDot) {
            None
        } else {
            let operand = self.unary()?;
            if !self.check_op(OperatorId::DotDot) {
                return Ok(operand);
            }
            Some(Box::new(operand))
        };
        self.advance();
        let right = if starts_expression(self.peek_kind(0)) && !self.check_op(OperatorId::DotDot) {
            Some(Box::new(self.unary()?))
        } else {
            None
        };
        Ok(Spanned::new(Expr::Range { start: left, end: right }, self.span_from(start)))
    }

    // ========================================================================
    // Unary and casts
    // ========================================================================

    fn unary(&mut self) -> PResult<Spanned<Expr>> {
        let start = self.current_span().start;
        let op = match self.peek().kind.operator_id() {
            Some(OperatorId::Plus) => Some(UnaryOp::Plus),
            Some(OperatorId::Minus) => Some(UnaryOp::Minus),
            Some(OperatorId::Bang) => Some(UnaryOp::Not),
            Some(OperatorId::Tilde) => Some(UnaryOp::BitNot),
            Some(OperatorId::PlusPlus) => Some(UnaryOp::PreIncrement),
            Some(OperatorId::MinusMinus) => Some(UnaryOp::PreDecrement),
            Some(OperatorId::Amp) => Some(UnaryOp::AddressOf),
            Some(OperatorId::Star) => Some(UnaryOp::Deref),
            Some(OperatorId::Caret) => Some(UnaryOp::IndexFromEnd),
            _ if self.check_contextual(KeywordId::Await) && starts_primary(self.peek_kind(1)) => Some(UnaryOp::Await),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.nested(|p| p.unary())?;
            return Ok(Spanned::new(
                Expr::Unary {
                    op,
                    operand: Box::new(operand),
                },
                self.span_from(start),
            ));
        }

        if self.check_punct(PunctuationId::LParen) {
            if let Some(cast) = self.cast(start)? {
                return Ok(cast);
            }
        }
        self.postfix_expression()
    }

    /// `(T)x`, when the parenthesised tokens form a type and what follows can only be a cast operand.
    fn cast(&mut self, start: usize) -> PResult<Option<Spanned<Expr>>> {
        if self.paren_starts_lambda(0) {
            return Ok(None);
        }
        let target = self.speculate(Rule::Cast, |p| {
            p.expect_punct(PunctuationId::LParen)?;
            let ty = p.parse_type(TypeMode::Normal)?;
            p.expect_punct(PunctuationId::RParen)?;
            if p.cast_operand_follows(&ty.node) {
                Ok(ty)
            } else {
                Err(p.unexpected(&["cast operand"]))
            }
        });
        let Some(ty) = target else {
            return Ok(None);
        };
        let operand = self.nested(|p| p.unary())?;
        Ok(Some(Spanned::new(
            Expr::Cast {
                ty,
                operand: Box::new(operand),
            },
            self.span_from(start),
        )))
    }

    /// After `(T)`: a definite type casts anything that can start a unary expression; a bare name only casts when
    /// the next token could not continue `(name)` as an expression (`~`, `!`, `(`, a name, a literal or a keyword
    /// that starts a primary).
    fn cast_operand_follows(&self, ty: &Type) -> bool {
        let next = self.peek_kind(0);
        if next.is_operator(OperatorId::DotDot) {
            return false;
        }
        if is_definitely_type(ty) {
            return starts_expression(next);
        }
        match next {
            TokenKind::Operator(OperatorId::Tilde | OperatorId::Bang) => true,
            TokenKind::Punctuation(PunctuationId::LParen) => true,
            TokenKind::Ident(name) => !(self.query_depth > 0 && is_query_keyword(name)),
            TokenKind::Keyword(id) => keyword_starts_primary(*id) && *id != KeywordId::Throw,
            other => other.is_literal(),
        }
    }

    // ========================================================================
    // Postfix
    // ========================================================================

    fn postfix_expression(&mut self) -> PResult<Spanned<Expr>> {
        let start = self.current_span().start;
        let mut expr = self.primary()?;
        loop {
            let kind = match self.peek().kind {
                TokenKind::Punctuation(PunctuationId::Dot) => Some(AccessKind::Dot),
                TokenKind::Punctuation(PunctuationId::QuestionDot) => Some(AccessKind::NullConditional),
                TokenKind::Punctuation(PunctuationId::Arrow) => Some(AccessKind::Pointer),
                _ => None,
            };
            if let Some(kind) = kind {
                self.advance();
                let name = self.identifier()?;
                let type_args = self.expression_type_args();
                expr = Spanned::new(
                    Expr::MemberAccess {
                        target: Box::new(expr),
                        kind,
                        name,
                        type_args,
                    },
                    self.span_from(start),
                );
                continue;
            }

            if self.check_punct(PunctuationId::LParen) {
                let args = self.argument_list(PunctuationId::RParen)?;
                expr = Spanned::new(
                    Expr::Invocation {
                        target: Box::new(expr),
                        args,
                    },
                    self.span_from(start),
                );
            } else if self.check_punct(PunctuationId::LBracket)
                || (self.check_punct(PunctuationId::Question) && self.peek_kind(1).is_punctuation(PunctuationId::LBracket))
            {
                let conditional = self.match_punct(PunctuationId::Question);
                let args = self.argument_list(PunctuationId::RBracket)?;
                expr = Spanned::new(
                    Expr::Indexing {
                        target: Box::new(expr),
                        args,
                        conditional,
                    },
                    self.span_from(start),
                );
            } else if let Some(op) = self.postfix_operator() {
                self.advance();
                expr = Spanned::new(
                    Expr::Postfix {
                        op,
                        operand: Box::new(expr),
                    },
                    self.span_from(start),
                );
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn postfix_operator(&self) -> Option<PostfixOp> {
        match self.peek().kind.operator_id()? {
            OperatorId::PlusPlus => Some(PostfixOp::Increment),
            OperatorId::MinusMinus => Some(PostfixOp::Decrement),
            // A complete operand is never followed by a prefix `!`.
            OperatorId::Bang => Some(PostfixOp::NullForgiving),
            _ => None,
        }
    }

    /// `(args)` or `[args]`; the opener is the current token.
    fn argument_list(&mut self, close: PunctuationId) -> PResult<Vec<Spanned<Argument>>> {
        self.advance();
        let mut args = Vec::new();
        if !self.check_punct(close) {
            loop {
                args.push(self.argument()?);
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
        }
        self.expect_punct(close)?;
        Ok(args)
    }

    fn argument(&mut self) -> PResult<Spanned<Argument>> {
        let start = self.current_span().start;
        let name = if self.check_ident() && self.peek_kind(1).is_punctuation(PunctuationId::Colon) {
            let name = self.identifier()?;
            self.advance();
            Some(name)
        } else {
            None
        };
        let modifier = match self.peek().kind.keyword_id() {
            Some(KeywordId::Ref) => Some(ArgModifier::Ref),
            Some(KeywordId::Out) => Some(ArgModifier::Out),
            Some(KeywordId::In) => Some(ArgModifier::In),
            _ => None,
        };
        if modifier.is_some() {
            self.advance();
        }
        // `out var x`, `out int x`
        let declaration = if modifier == Some(ArgModifier::Out) {
            self.declaration_expression()
        } else {
            None
        };
        let value = match declaration {
            Some(decl) => decl,
            None => self.expression()?,
        };
        Ok(Spanned::new(Argument { name, modifier, value }, self.span_from(start)))
    }

    /// `T x`, `var (a, b)`, followed by `,` or `)`.
    fn declaration_expression(&mut self) -> Option<Spanned<Expr>> {
        let start = self.current_span().start;
        self.speculate(Rule::DeclarationExpr, |p| {
            let ty = p.parse_type(TypeMode::Normal)?;
            let designation = p.designation()?;
            if p.check_punct(PunctuationId::Comma) || p.check_punct(PunctuationId::RParen) {
                Ok(Spanned::new(Expr::Declaration { ty, designation }, p.span_from(start)))
            } else {
                Err(p.unexpected(&["`,`", "`)`"]))
            }
        })
    }

    // ========================================================================
    // Primary
    // ========================================================================

    fn primary(&mut self) -> PResult<Spanned<Expr>> {
        let start = self.current_span().start;
        let literal = match self.peek().kind.clone() {
            TokenKind::Int(v) => Literal::Int(v),
            TokenKind::Real(v) => Literal::Real(v),
            TokenKind::Char(v) => Literal::Char(v),
            TokenKind::String(v) => Literal::String(v),
            TokenKind::VerbatimString(v) => Literal::VerbatimString(v),
            TokenKind::InterpolatedString { verbatim, parts } => {
                self.advance();
                return Ok(self.interpolated(verbatim, parts, start));
            }
            TokenKind::Ident(name) => return self.name_primary(&name, start),
            TokenKind::Punctuation(PunctuationId::LParen) => {
                return if self.paren_starts_lambda(0) {
                    self.lambda(false, start)
                } else {
                    self.parenthesized_or_tuple()
                };
            }
            TokenKind::Keyword(id) => return self.keyword_primary(id, start),
            _ => return Err(self.unexpected(&["expression"])),
        };
        self.advance();
        Ok(Spanned::new(Expr::Literal(literal), self.span_from(start)))
    }

    /// Primaries that start with an identifier, including the contextual forms (`async` lambdas, queries,
    /// `nameof`, `var (a, b)`).
    fn name_primary(&mut self, name: &str, start: usize) -> PResult<Spanned<Expr>> {
        if name == "async" {
            let lambda_follows = (matches!(self.peek_kind(1), TokenKind::Ident(_))
                && self.peek_kind(2).is_punctuation(PunctuationId::FatArrow))
                || self.paren_starts_lambda(1);
            if lambda_follows {
                self.advance();
                return self.lambda(true, start);
            }
            if self.peek_kind(1).is_keyword(KeywordId::Delegate) {
                self.advance();
                return self.anonymous_method(true, start);
            }
        }
        if self.peek_kind(1).is_punctuation(PunctuationId::FatArrow) {
            return self.lambda(false, start);
        }
        if name == "from" {
            if let Some(query) = self.query_expression()? {
                return Ok(query);
            }
        }
        if name == "nameof" && self.peek_kind(1).is_punctuation(PunctuationId::LParen) {
            self.advance();
            self.advance();
            let operand = self.expression()?;
            self.expect_punct(PunctuationId::RParen)?;
            return Ok(Spanned::new(Expr::NameOf(Box::new(operand)), self.span_from(start)));
        }
        if name == "var" && self.peek_kind(1).is_punctuation(PunctuationId::LParen) {
            if let Some(decl) = self.var_deconstruction() {
                return Ok(decl);
            }
        }

        let name = self.identifier()?;
        if self.match_punct(PunctuationId::ColonColon) {
            let member = self.identifier()?;
            let type_args = self.expression_type_args();
            return Ok(Spanned::new(
                Expr::AliasQualified {
                    alias: name,
                    name: member,
                    type_args,
                },
                self.span_from(start),
            ));
        }
        let type_args = self.expression_type_args();
        Ok(Spanned::new(Expr::Name { name, type_args }, self.span_from(start)))
    }

    /// `var (a, b) = ...`
    fn var_deconstruction(&mut self) -> Option<Spanned<Expr>> {
        let start = self.current_span().start;
        self.speculate(Rule::Deconstruction, |p| {
            p.advance();
            let ty = Spanned::new(Type::Named(TypeName::simple("var")), p.span_from(start));
            let designation = p.designation()?;
            if matches!(designation, Designation::Parenthesized(_)) && p.check_op(OperatorId::Eq) {
                Ok(Spanned::new(Expr::Declaration { ty, designation }, p.span_from(start)))
            } else {
                Err(p.unexpected(&["`=`"]))
            }
        })
    }

    fn keyword_primary(&mut self, id: KeywordId, start: usize) -> PResult<Spanned<Expr>> {
        let simple = match id {
            KeywordId::True => Some(Expr::Literal(Literal::Bool(true))),
            KeywordId::False => Some(Expr::Literal(Literal::Bool(false))),
            KeywordId::Null => Some(Expr::Literal(Literal::Null)),
            KeywordId::This => Some(Expr::This),
            KeywordId::Base => Some(Expr::Base),
            id if keywords::is_predefined_type(id) => Some(Expr::PredefinedType(id)),
            _ => None,
        };
        if let Some(expr) = simple {
            self.advance();
            return Ok(Spanned::new(expr, self.span_from(start)));
        }

        let expr = match id {
            KeywordId::New => return self.creation(start),
            KeywordId::Delegate => return self.anonymous_method(false, start),
            KeywordId::Stackalloc => return self.stackalloc(start),
            KeywordId::Typeof | KeywordId::Sizeof => {
                self.advance();
                self.expect_punct(PunctuationId::LParen)?;
                let ty = self.parse_type(TypeMode::Normal)?;
                self.expect_punct(PunctuationId::RParen)?;
                if id == KeywordId::Typeof {
                    Expr::TypeOf(ty)
                } else {
                    Expr::SizeOf(ty)
                }
            }
            KeywordId::Default => {
                self.advance();
                if self.match_punct(PunctuationId::LParen) {
                    let ty = self.parse_type(TypeMode::Normal)?;
                    self.expect_punct(PunctuationId::RParen)?;
                    Expr::Default(Some(ty))
                } else {
                    Expr::Default(None)
                }
            }
            KeywordId::Checked | KeywordId::Unchecked => {
                self.advance();
                self.expect_punct(PunctuationId::LParen)?;
                let inner = Box::new(self.expression()?);
                self.expect_punct(PunctuationId::RParen)?;
                if id == KeywordId::Checked {
                    Expr::Checked(inner)
                } else {
                    Expr::Unchecked(inner)
                }
            }
            KeywordId::Throw => {
                self.advance();
                let operand = self.nested(|p| p.coalesce())?;
                Expr::Throw(Box::new(operand))
            }
            _ => return Err(self.unexpected(&["expression"])),
        };
        Ok(Spanned::new(expr, self.span_from(start)))
    }

    /// `(e)` or a tuple `(a, name: b)`.
    ///
    /// Elements may be declarations (`(int x, var y) = t`) only when the closing `)` is followed by `=`.
    fn parenthesized_or_tuple(&mut self) -> PResult<Spanned<Expr>> {
        let start = self.current_span().start;
        let deconstruction = self
            .matching_close(0)
            .and_then(|close| self.tokens.get(close + 1))
            .is_some_and(|t| t.kind.is_operator(OperatorId::Eq));
        self.expect_punct(PunctuationId::LParen)?;

        let first = self.tuple_element(deconstruction)?;
        if first.node.name.is_none() && self.match_punct(PunctuationId::RParen) {
            return Ok(Spanned::new(
                Expr::Parenthesized(Box::new(first.node.value)),
                self.span_from(start),
            ));
        }
        let mut elements = vec![first];
        while self.match_punct(PunctuationId::Comma) {
            elements.push(self.tuple_element(deconstruction)?);
        }
        self.expect_punct(PunctuationId::RParen)?;
        Ok(Spanned::new(Expr::Tuple(elements), self.span_from(start)))
    }

    fn tuple_element(&mut self, allow_declaration: bool) -> PResult<Spanned<TupleElement>> {
        let start = self.current_span().start;
        let name = if self.check_ident() && self.peek_kind(1).is_punctuation(PunctuationId::Colon) {
            let name = self.identifier()?;
            self.advance();
            Some(name)
        } else {
            None
        };
        let declaration = if allow_declaration {
            self.declaration_expression()
        } else {
            None
        };
        let value = match declaration {
            Some(decl) => decl,
            None => self.expression()?,
        };
        Ok(Spanned::new(TupleElement { name, value }, self.span_from(start)))
    }

    // ========================================================================
    // Lambdas and anonymous methods
    // ========================================================================

    /// `(` at `k` whose matching `)` is directly followed by `=>`.
    fn paren_starts_lambda(&self, k: usize) -> bool {
        if !self.peek_kind(k).is_punctuation(PunctuationId::LParen) {
            return false;
        }
        self.matching_close(k)
            .and_then(|close| self.tokens.get(close + 1))
            .is_some_and(|t| t.kind.is_punctuation(PunctuationId::FatArrow))
    }

    fn lambda(&mut self, is_async: bool, start: usize) -> PResult<Spanned<Expr>> {
        let (parenthesized, params) = if self.check_ident() {
            let param_start = self.current_span().start;
            let name = self.identifier()?;
            let param = LambdaParam {
                modifier: None,
                ty: None,
                name,
            };
            (false, vec![Spanned::new(param, self.span_from(param_start))])
        } else {
            self.expect_punct(PunctuationId::LParen)?;
            let mut params = Vec::new();
            if !self.check_punct(PunctuationId::RParen) {
                loop {
                    params.push(self.lambda_param()?);
                    if !self.match_punct(PunctuationId::Comma) {
                        break;
                    }
                }
            }
            self.expect_punct(PunctuationId::RParen)?;
            (true, params)
        };
        self.expect_punct(PunctuationId::FatArrow)?;

        let body = if self.check_punct(PunctuationId::LBrace) {
            LambdaBody::Block(self.block()?)
        } else {
            LambdaBody::Expr(Box::new(self.expression()?))
        };
        Ok(Spanned::new(
            Expr::Lambda(Box::new(LambdaExpr {
                is_async,
                parenthesized,
                params,
                body,
            })),
            self.span_from(start),
        ))
    }

    /// `x`, `int x`, `ref T x`
    fn lambda_param(&mut self) -> PResult<Spanned<LambdaParam>> {
        let start = self.current_span().start;
        let modifier = self.param_modifier();
        let typed = self.speculate(Rule::LambdaParam, |p| {
            let ty = p.parse_type(TypeMode::Normal)?;
            let name = p.identifier()?;
            if p.check_punct(PunctuationId::Comma) || p.check_punct(PunctuationId::RParen) {
                Ok((ty, name))
            } else {
                Err(p.unexpected(&["`,`", "`)`"]))
            }
        });
        let (ty, name) = match typed {
            Some((ty, name)) => (Some(ty), name),
            None => (None, self.identifier()?),
        };
        Ok(Spanned::new(LambdaParam { modifier, ty, name }, self.span_from(start)))
    }

    fn anonymous_method(&mut self, is_async: bool, start: usize) -> PResult<Spanned<Expr>> {
        self.expect_keyword(KeywordId::Delegate)?;
        let params = if self.check_punct(PunctuationId::LParen) {
            Some(self.parameter_list(PunctuationId::RParen)?)
        } else {
            None
        };
        let body = self.block()?;
        Ok(Spanned::new(
            Expr::AnonymousMethod { is_async, params, body },
            self.span_from(start),
        ))
    }

    // ========================================================================
    // Creation
    // ========================================================================

    /// The `new` forms, chosen by the token after `new` (and after the type, if any).
    fn creation(&mut self, start: usize) -> PResult<Spanned<Expr>> {
        self.expect_keyword(KeywordId::New)?;
        let expr = match self.peek().kind {
            TokenKind::Punctuation(PunctuationId::LBrace) => Expr::AnonymousObject(self.anonymous_object_members()?),
            TokenKind::Punctuation(PunctuationId::LBracket) => {
                let rank = self.rank_specifier()?;
                let initializer = self.initializer()?;
                Expr::ImplicitArrayCreation { rank, initializer }
            }
            TokenKind::Punctuation(PunctuationId::LParen) => {
                let args = self.argument_list(PunctuationId::RParen)?;
                let initializer = self.optional_initializer()?;
                Expr::ObjectCreation {
                    ty: None,
                    args: Some(args),
                    initializer,
                }
            }
            _ => {
                let ty = self.parse_type(TypeMode::Creation)?;
                self.typed_creation(ty)?
            }
        };
        Ok(Spanned::new(expr, self.span_from(start)))
    }

    fn typed_creation(&mut self, ty: Spanned<Type>) -> PResult<Expr> {
        if self.at_rank_specifier() {
            let mut ranks = Vec::new();
            while self.at_rank_specifier() {
                ranks.push(self.rank_specifier()?);
            }
            let initializer = self.initializer()?;
            return Ok(Expr::ArrayCreation {
                element: ty,
                sizes: Vec::new(),
                ranks,
                initializer: Some(initializer),
            });
        }
        if self.match_punct(PunctuationId::LBracket) {
            let mut sizes = Vec::new();
            loop {
                sizes.push(self.expression()?);
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
            self.expect_punct(PunctuationId::RBracket)?;
            let mut ranks = Vec::new();
            while self.at_rank_specifier() {
                ranks.push(self.rank_specifier()?);
            }
            let initializer = self.optional_initializer()?;
            return Ok(Expr::ArrayCreation {
                element: ty,
                sizes,
                ranks,
                initializer,
            });
        }
        if self.check_punct(PunctuationId::LParen) {
            let args = self.argument_list(PunctuationId::RParen)?;
            let initializer = self.optional_initializer()?;
            return Ok(Expr::ObjectCreation {
                ty: Some(ty),
                args: Some(args),
                initializer,
            });
        }
        if self.check_punct(PunctuationId::LBrace) {
            let initializer = self.initializer()?;
            return Ok(Expr::ObjectCreation {
                ty: Some(ty),
                args: None,
                initializer: Some(initializer),
            });
        }
        Err(self.unexpected(&["`(`", "`[`", "`{`"]))
    }

    fn anonymous_object_members(&mut self) -> PResult<Vec<Spanned<AnonymousMember>>> {
        self.expect_punct(PunctuationId::LBrace)?;
        let mut members = Vec::new();
        while !self.check_punct(PunctuationId::RBrace) && !self.is_at_end() {
            let start = self.current_span().start;
            let name = if self.check_ident() && self.peek_kind(1).is_operator(OperatorId::Eq) {
                let name = self.identifier()?;
                self.advance();
                Some(name)
            } else {
                None
            };
            let value = self.expression()?;
            members.push(Spanned::new(AnonymousMember { name, value }, self.span_from(start)));
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_closing(PunctuationId::RBrace)?;
        Ok(members)
    }

    fn optional_initializer(&mut self) -> PResult<Option<Spanned<Initializer>>> {
        if self.check_punct(PunctuationId::LBrace) {
            Ok(Some(self.initializer()?))
        } else {
            Ok(None)
        }
    }

    /// `{ X = 1, [k] = v, item, { nested } }`
    fn initializer(&mut self) -> PResult<Spanned<Initializer>> {
        let start = self.expect_punct(PunctuationId::LBrace)?.start;
        let mut entries = Vec::new();
        while !self.check_punct(PunctuationId::RBrace) && !self.is_at_end() {
            entries.push(self.initializer_entry()?);
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_closing(PunctuationId::RBrace)?;
        Ok(Spanned::new(Initializer { entries }, self.span_from(start)))
    }

    fn initializer_entry(&mut self) -> PResult<Spanned<InitializerEntry>> {
        let start = self.current_span().start;
        let entry = if self.check_ident() && self.peek_kind(1).is_operator(OperatorId::Eq) {
            let name = self.identifier()?;
            self.advance();
            let value = self.variable_initializer()?;
            InitializerEntry::Member { name, value }
        } else if self.check_punct(PunctuationId::LBracket) {
            let args = self.argument_list(PunctuationId::RBracket)?;
            self.expect_op(OperatorId::Eq)?;
            let value = self.variable_initializer()?;
            InitializerEntry::Indexer { args, value }
        } else {
            InitializerEntry::Element(self.variable_initializer()?)
        };
        Ok(Spanned::new(entry, self.span_from(start)))
    }

    /// An expression, or a brace initializer where one is allowed (`int[] a = { 1, 2 };`).
    fn variable_initializer(&mut self) -> PResult<Spanned<Expr>> {
        if self.check_punct(PunctuationId::LBrace) {
            let init = self.initializer()?;
            Ok(Spanned::new(Expr::Initializer(init.node), init.span))
        } else {
            self.expression()
        }
    }

    /// `stackalloc int[n]`, `stackalloc int[] { 1 }`, `stackalloc[] { 1 }`
    fn stackalloc(&mut self, start: usize) -> PResult<Spanned<Expr>> {
        self.expect_keyword(KeywordId::Stackalloc)?;
        let element = if self.check_punct(PunctuationId::LBracket) {
            let at = self.current_span().start;
            Spanned::new(Type::Omitted, Span::new(at, at))
        } else {
            self.parse_type(TypeMode::Creation)?
        };
        self.expect_punct(PunctuationId::LBracket)?;
        let size = if self.check_punct(PunctuationId::RBracket) {
            None
        } else {
            Some(Box::new(self.expression()?))
        };
        self.expect_punct(PunctuationId::RBracket)?;
        let initializer = self.optional_initializer()?;
        Ok(Spanned::new(
            Expr::StackAlloc {
                element,
                size,
                initializer,
            },
            self.span_from(start),
        ))
    }

    // ========================================================================
    // Interpolated strings
    // ========================================================================

    fn interpolated(&mut self, verbatim: bool, parts: Vec<InterpolationPart>, start: usize) -> Spanned<Expr> {
        let mut out = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                InterpolationPart::Text(text) => out.push(InterpolatedPart::Text(text)),
                InterpolationPart::Hole(hole) => {
                    let expr = self.hole_expression(&hole.source, hole.offset);
                    let alignment = hole
                        .alignment
                        .as_ref()
                        .map(|(source, offset)| self.hole_expression(source, *offset));
                    out.push(InterpolatedPart::Hole {
                        expr,
                        alignment,
                        format: hole.format,
                    });
                }
            }
        }
        Spanned::new(Expr::Interpolated { verbatim, parts: out }, self.span_from(start))
    }

    /// Re-lex and parse one interpolation hole. Spans and diagnostics are shifted back into file coordinates; a
    /// hole that does not parse becomes `Expr::Error`.
    fn hole_expression(&mut self, source: &str, offset: usize) -> Spanned<Expr> {
        let fallback = Span::new(offset, offset + source.len());
        let tokens: Vec<Token> = match crate::lexer::lex(source) {
            Ok(tokens) => tokens
                .into_iter()
                .map(|t| Token::new(t.kind, t.span.shifted(offset)))
                .collect(),
            Err(errors) => {
                for error in errors {
                    self.report(error.shifted(offset));
                }
                return Spanned::new(Expr::Error, fallback);
            }
        };

        let mut sub = Parser::new(&tokens, self.options);
        sub.depth = self.depth;
        let result = sub.expression().and_then(|expr| {
            if sub.is_at_end() {
                Ok(expr)
            } else {
                Err(sub.unexpected(&["end of interpolation hole"]))
            }
        });
        let nested_diagnostics = std::mem::take(&mut sub.diagnostics).into_vec();
        for diagnostic in nested_diagnostics {
            self.report(diagnostic);
        }
        match result {
            Ok(expr) => expr,
            Err(error) => {
                self.report(error);
                Spanned::new(Expr::Error, fallback)
            }
        }
    }
}

fn binary(op: BinaryOp, left: Spanned<Expr>, right: Spanned<Expr>) -> Spanned<Expr> {
    let span = left.span.merge(right.span);
    Spanned::new(
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
    )
}
