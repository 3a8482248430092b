/// Statement parsing.
///
/// Statements are dispatched on their first token. Anything that does not start with a statement keyword is
/// either a local declaration (speculatively: a type followed by a name) or an expression statement.
impl<'a> Parser<'a> {
    fn block(&mut self) -> PResult<Spanned<Block>> {
        let start = self.expect_punct(PunctuationId::LBrace)?.start;
        let statements = self.statement_list(|_| false);
        self.expect_closing(PunctuationId::RBrace)?;
        Ok(Spanned::new(Block { statements }, self.span_from(start)))
    }

    /// Statements up to `}`, end of input, or wherever `stop` says.
    ///
    /// A statement that fails to parse is reported, skipped up to the next statement boundary and kept as
    /// `Statement::Error`; its siblings parse normally.
    fn statement_list(&mut self, stop: fn(&Self) -> bool) -> Vec<Spanned<Statement>> {
        let mut statements = Vec::new();
        while !self.is_at_end() && !self.check_punct(PunctuationId::RBrace) && !stop(self) {
            let start_pos = self.pos;
            let start = self.current_span().start;
            match self.statement() {
                Ok(statement) => statements.push(statement),
                Err(e) => {
                    self.report(e);
                    self.synchronize_statement(start_pos);
                    statements.push(Spanned::new(Statement::Error, self.span_from(start)));
                }
            }
        }
        statements
    }

    fn statement(&mut self) -> PResult<Spanned<Statement>> {
        self.nested(|p| p.statement_inner())
    }

    fn statement_inner(&mut self) -> PResult<Spanned<Statement>> {
        let start = self.current_span().start;
        let statement = match self.peek().kind.clone() {
            TokenKind::Punctuation(PunctuationId::LBrace) => {
                let block = self.block()?;
                return Ok(Spanned::new(Statement::Block(block.node), block.span));
            }
            TokenKind::Punctuation(PunctuationId::Semicolon) => {
                self.advance();
                Statement::Empty
            }
            TokenKind::Keyword(id) => match id {
                KeywordId::If => self.if_statement()?,
                KeywordId::While => self.while_statement()?,
                KeywordId::Do => self.do_statement()?,
                KeywordId::For => self.for_statement()?,
                KeywordId::Foreach => self.foreach_statement(false)?,
                KeywordId::Switch => self.switch_statement()?,
                KeywordId::Try => self.try_statement()?,
                KeywordId::Using => self.using_statement(false)?,
                KeywordId::Lock => {
                    self.advance();
                    let (target, body) = self.parenthesized_then_body()?;
                    Statement::Lock { target, body }
                }
                KeywordId::Fixed => self.fixed_statement()?,
                KeywordId::Return => {
                    self.advance();
                    let value = self.optional_expression()?;
                    self.expect_semicolon();
                    Statement::Return(value)
                }
                KeywordId::Throw => {
                    self.advance();
                    let value = self.optional_expression()?;
                    self.expect_semicolon();
                    Statement::Throw(value)
                }
                KeywordId::Break | KeywordId::Continue => {
                    self.advance();
                    self.expect_semicolon();
                    if id == KeywordId::Break {
                        Statement::Break
                    } else {
                        Statement::Continue
                    }
                }
                KeywordId::Goto => self.goto_statement()?,
                KeywordId::Checked | KeywordId::Unchecked | KeywordId::Unsafe
                    if self.peek_kind(1).is_punctuation(PunctuationId::LBrace) =>
                {
                    self.advance();
                    let block = self.block()?;
                    match id {
                        KeywordId::Checked => Statement::Checked(block),
                        KeywordId::Unchecked => Statement::Unchecked(block),
                        _ => Statement::Unsafe(block),
                    }
                }
                KeywordId::Const => {
                    self.advance();
                    let ty = self.parse_type(TypeMode::Normal)?;
                    let name = self.identifier_spanned()?;
                    let declarators = self.variable_declarators(name)?;
                    self.expect_semicolon();
                    Statement::LocalDeclaration(LocalDeclaration {
                        is_const: true,
                        is_using: false,
                        is_await: false,
                        ty,
                        declarators,
                    })
                }
                _ => self.declaration_or_expression_statement()?,
            },
            TokenKind::Ident(name) => {
                if self.peek_kind(1).is_punctuation(PunctuationId::Colon) {
                    let label = self.identifier()?;
                    self.advance();
                    let statement = Box::new(self.statement()?);
                    Statement::Labeled { label, statement }
                } else if name == "yield"
                    && matches!(
                        self.peek_kind(1),
                        TokenKind::Keyword(KeywordId::Return | KeywordId::Break)
                    )
                {
                    self.yield_statement()?
                } else if name == "await" && self.peek_kind(1).is_keyword(KeywordId::Using) {
                    self.advance();
                    self.using_statement(true)?
                } else if name == "await" && self.peek_kind(1).is_keyword(KeywordId::Foreach) {
                    self.advance();
                    self.foreach_statement(true)?
                } else {
                    self.declaration_or_expression_statement()?
                }
            }
            _ => self.declaration_or_expression_statement()?,
        };
        Ok(Spanned::new(statement, self.span_from(start)))
    }

    /// Local function, local declaration or expression statement.
    fn declaration_or_expression_statement(&mut self) -> PResult<Statement> {
        let modifiers = self.local_function_modifiers();
        if let Some((ty, name)) = self.local_declaration_head() {
            if self.check_punct(PunctuationId::LParen) || self.check_op(OperatorId::Lt) {
                let name = MemberName {
                    interface: None,
                    name: name.node,
                };
                let method = self.method_rest(ty, name)?;
                return Ok(Statement::LocalFunction(LocalFunction { modifiers, method }));
            }
            if !modifiers.is_empty() {
                return Err(self.unexpected(&["`(`"]));
            }
            let declarators = self.variable_declarators(name)?;
            self.expect_semicolon();
            return Ok(Statement::LocalDeclaration(LocalDeclaration {
                is_const: false,
                is_using: false,
                is_await: false,
                ty,
                declarators,
            }));
        }
        if !modifiers.is_empty() {
            return Err(self.unexpected(&["local function"]));
        }

        let expr = self.expression()?;
        self.expect_semicolon();
        Ok(Statement::Expression(expr))
    }

    /// `static`, `async`, `unsafe`, `extern` in front of a local function.
    fn local_function_modifiers(&mut self) -> Vec<Spanned<Modifier>> {
        let mut modifiers = Vec::new();
        loop {
            let span = self.current_span();
            let modifier = match self.peek().kind {
                TokenKind::Keyword(KeywordId::Static) => Modifier::Static,
                TokenKind::Keyword(KeywordId::Unsafe) => Modifier::Unsafe,
                TokenKind::Keyword(KeywordId::Extern) => Modifier::Extern,
                _ if self.check_contextual(KeywordId::Async)
                    && matches!(self.peek_kind(1), TokenKind::Ident(_) | TokenKind::Keyword(_)) =>
                {
                    Modifier::Async
                }
                _ => break,
            };
            self.advance();
            modifiers.push(Spanned::new(modifier, span));
        }
        modifiers
    }

    /// Speculatively parse `Type name` at the start of a local declaration or local function.
    ///
    /// The head is only accepted when the name is followed by `=`, `;`, `,`, `(` or `<`. A bare `await`
    /// never counts as a type, so `await x;` stays an expression.
    fn local_declaration_head(&mut self) -> Option<(Spanned<Type>, Spanned<Ident>)> {
        self.speculate(Rule::LocalDeclHead, |p| {
            let ty = p.declaration_type()?;
            if matches!(&ty.node, Type::Named(name) if name.alias.is_none() && name.segments.len() == 1
                && name.segments[0].name == "await" && name.segments[0].type_args.is_empty())
            {
                return Err(p.unexpected(&["expression"]));
            }
            let name = p.identifier_spanned()?;
            let follows = match p.peek_kind(0) {
                TokenKind::Operator(o) => matches!(o, OperatorId::Eq | OperatorId::Lt),
                TokenKind::Punctuation(q) => matches!(
                    q,
                    PunctuationId::Semicolon | PunctuationId::Comma | PunctuationId::LParen
                ),
                _ => false,
            };
            if follows {
                Ok((ty, name))
            } else {
                Err(p.unexpected(&["`=`", "`;`"]))
            }
        })
    }

    /// `name [= init] (, name [= init])*` starting from an already-parsed first name.
    fn variable_declarators(&mut self, first: Spanned<Ident>) -> PResult<Vec<Spanned<VariableDeclarator>>> {
        let mut declarators = Vec::new();
        let mut name = first;
        loop {
            let initializer = if self.match_op(OperatorId::Eq) {
                Some(self.variable_initializer()?)
            } else {
                None
            };
            declarators.push(Spanned::new(
                VariableDeclarator {
                    name: name.node,
                    initializer,
                },
                self.span_from(name.span.start),
            ));
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
            name = self.identifier_spanned()?;
        }
        Ok(declarators)
    }

    fn optional_expression(&mut self) -> PResult<Option<Spanned<Expr>>> {
        if self.check_punct(PunctuationId::Semicolon) || self.is_at_end() || self.check_punct(PunctuationId::RBrace) {
            Ok(None)
        } else {
            Ok(Some(self.expression()?))
        }
    }

    /// `(expr) statement`, shared by `while` and `lock`.
    fn parenthesized_then_body(&mut self) -> PResult<(Spanned<Expr>, Box<Spanned<Statement>>)> {
        let expr = self.parenthesized_condition()?;
        let body = Box::new(self.statement()?);
        Ok((expr, body))
    }

    fn parenthesized_condition(&mut self) -> PResult<Spanned<Expr>> {
        self.expect_punct(PunctuationId::LParen)?;
        let expr = self.expression()?;
        self.expect_punct(PunctuationId::RParen)?;
        Ok(expr)
    }

    // ========================================================================
    // Control flow
    // ========================================================================

    /// `else` binds to the nearest `if`.
    fn if_statement(&mut self) -> PResult<Statement> {
        self.expect_keyword(KeywordId::If)?;
        let cond = self.parenthesized_condition()?;
        let then = Box::new(self.statement()?);
        let otherwise = if self.match_keyword(KeywordId::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        Ok(Statement::If { cond, then, otherwise })
    }

    fn while_statement(&mut self) -> PResult<Statement> {
        self.expect_keyword(KeywordId::While)?;
        let (cond, body) = self.parenthesized_then_body()?;
        Ok(Statement::While { cond, body })
    }

    fn do_statement(&mut self) -> PResult<Statement> {
        self.expect_keyword(KeywordId::Do)?;
        let body = Box::new(self.statement()?);
        self.expect_keyword(KeywordId::While)?;
        let cond = self.parenthesized_condition()?;
        self.expect_semicolon();
        Ok(Statement::Do { body, cond })
    }

    fn for_statement(&mut self) -> PResult<Statement> {
        self.expect_keyword(KeywordId::For)?;
        self.expect_punct(PunctuationId::LParen)?;

        let init = if self.check_punct(PunctuationId::Semicolon) {
            None
        } else if let Some((ty, name)) = self.local_declaration_head() {
            let declarators = self.variable_declarators(name)?;
            Some(ForInit::Declaration(LocalDeclaration {
                is_const: false,
                is_using: false,
                is_await: false,
                ty,
                declarators,
            }))
        } else {
            Some(ForInit::Expressions(self.expression_list()?))
        };
        self.expect_punct(PunctuationId::Semicolon)?;

        let cond = if self.check_punct(PunctuationId::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect_punct(PunctuationId::Semicolon)?;

        let iterators = if self.check_punct(PunctuationId::RParen) {
            Vec::new()
        } else {
            self.expression_list()?
        };
        self.expect_punct(PunctuationId::RParen)?;
        let body = Box::new(self.statement()?);
        Ok(Statement::For {
            init,
            cond,
            iterators,
            body,
        })
    }

    fn expression_list(&mut self) -> PResult<Vec<Spanned<Expr>>> {
        let mut exprs = vec![self.expression()?];
        while self.match_punct(PunctuationId::Comma) {
            exprs.push(self.expression()?);
        }
        Ok(exprs)
    }

    /// `foreach (T x in xs)`, `foreach (var (a, b) in pairs)`; `is_await` when preceded by `await`.
    fn foreach_statement(&mut self, is_await: bool) -> PResult<Statement> {
        self.expect_keyword(KeywordId::Foreach)?;
        self.expect_punct(PunctuationId::LParen)?;
        let ty = self.declaration_type()?;
        let target = self.designation()?;
        self.expect_keyword(KeywordId::In)?;
        let iterable = self.expression()?;
        self.expect_punct(PunctuationId::RParen)?;
        let body = Box::new(self.statement()?);
        Ok(Statement::ForEach {
            is_await,
            ty,
            target,
            iterable,
            body,
        })
    }

    fn goto_statement(&mut self) -> PResult<Statement> {
        self.expect_keyword(KeywordId::Goto)?;
        let target = if self.match_keyword(KeywordId::Case) {
            GotoTarget::Case(self.expression()?)
        } else if self.match_keyword(KeywordId::Default) {
            GotoTarget::Default
        } else {
            GotoTarget::Label(self.identifier()?)
        };
        self.expect_semicolon();
        Ok(Statement::Goto(target))
    }

    fn yield_statement(&mut self) -> PResult<Statement> {
        self.expect_contextual(KeywordId::Yield)?;
        let statement = if self.match_keyword(KeywordId::Return) {
            Statement::YieldReturn(self.expression()?)
        } else {
            self.expect_keyword(KeywordId::Break)?;
            Statement::YieldBreak
        };
        self.expect_semicolon();
        Ok(statement)
    }

    // ========================================================================
    // switch / try
    // ========================================================================

    fn switch_statement(&mut self) -> PResult<Statement> {
        self.expect_keyword(KeywordId::Switch)?;
        if !self.check_punct(PunctuationId::LParen) {
            return Err(self.unexpected(&["`(`"]));
        }
        // Parsed as one expression so that `switch (a, b)` yields a tuple.
        let scrutinee = match self.expression()? {
            Spanned {
                node: Expr::Parenthesized(inner),
                ..
            } => *inner,
            other => other,
        };

        self.expect_punct(PunctuationId::LBrace)?;
        let mut sections = Vec::new();
        while !self.check_punct(PunctuationId::RBrace) && !self.is_at_end() {
            let start = self.current_span().start;
            let mut labels = Vec::new();
            while self.at_switch_label() {
                labels.push(self.switch_label()?);
            }
            if labels.is_empty() {
                return Err(self.unexpected(&["`case`", "`default`"]));
            }
            let statements = self.statement_list(Self::at_switch_label);
            sections.push(Spanned::new(SwitchSection { labels, statements }, self.span_from(start)));
        }
        self.expect_closing(PunctuationId::RBrace)?;
        Ok(Statement::Switch { scrutinee, sections })
    }

    fn at_switch_label(&self) -> bool {
        self.check_keyword(KeywordId::Case)
            || (self.check_keyword(KeywordId::Default) && self.peek_kind(1).is_punctuation(PunctuationId::Colon))
    }

    fn switch_label(&mut self) -> PResult<Spanned<SwitchLabel>> {
        let start = self.current_span().start;
        let label = if self.match_keyword(KeywordId::Default) {
            SwitchLabel::Default
        } else {
            self.expect_keyword(KeywordId::Case)?;
            let pattern = self.pattern()?;
            let guard = if self.match_contextual(KeywordId::When) {
                Some(self.expression()?)
            } else {
                None
            };
            SwitchLabel::Case { pattern, guard }
        };
        self.expect_punct(PunctuationId::Colon)?;
        Ok(Spanned::new(label, self.span_from(start)))
    }

    fn try_statement(&mut self) -> PResult<Statement> {
        let try_span = self.expect_keyword(KeywordId::Try)?;
        let block = self.block()?;

        let mut catches = Vec::new();
        while self.check_keyword(KeywordId::Catch) {
            let start = self.advance().span.start;
            let (ty, name) = if self.match_punct(PunctuationId::LParen) {
                let ty = self.parse_type(TypeMode::Normal)?;
                let name = if self.check_ident() { Some(self.identifier()?) } else { None };
                self.expect_punct(PunctuationId::RParen)?;
                (Some(ty), name)
            } else {
                (None, None)
            };
            let filter = if self.match_contextual(KeywordId::When) {
                Some(self.parenthesized_condition()?)
            } else {
                None
            };
            let block = self.block()?;
            catches.push(Spanned::new(
                CatchClause {
                    ty,
                    name,
                    filter,
                    block,
                },
                self.span_from(start),
            ));
        }

        let finally = if self.match_keyword(KeywordId::Finally) {
            Some(self.block()?)
        } else {
            None
        };
        if catches.is_empty() && finally.is_none() {
            self.report(
                SyntaxError::syntax("`try` needs a `catch` or `finally` clause", try_span)
                    .with_expected(["`catch`", "`finally`"]),
            );
        }
        Ok(Statement::Try { block, catches, finally })
    }

    // ========================================================================
    // using / fixed
    // ========================================================================

    /// `using (resource) body` or the declaration form `using var x = ...;`.
    fn using_statement(&mut self, is_await: bool) -> PResult<Statement> {
        self.expect_keyword(KeywordId::Using)?;
        if self.match_punct(PunctuationId::LParen) {
            let resource = match self.local_declaration_head() {
                Some((ty, name)) => {
                    let declarators = self.variable_declarators(name)?;
                    UsingResource::Declaration(LocalDeclaration {
                        is_const: false,
                        is_using: false,
                        is_await: false,
                        ty,
                        declarators,
                    })
                }
                None => UsingResource::Expr(self.expression()?),
            };
            self.expect_punct(PunctuationId::RParen)?;
            let body = Box::new(self.statement()?);
            return Ok(Statement::Using {
                is_await,
                resource,
                body,
            });
        }

        let Some((ty, name)) = self.local_declaration_head() else {
            return Err(self.unexpected(&["`(`", "local declaration"]));
        };
        let declarators = self.variable_declarators(name)?;
        self.expect_semicolon();
        Ok(Statement::LocalDeclaration(LocalDeclaration {
            is_const: false,
            is_using: true,
            is_await,
            ty,
            declarators,
        }))
    }

    fn fixed_statement(&mut self) -> PResult<Statement> {
        self.expect_keyword(KeywordId::Fixed)?;
        self.expect_punct(PunctuationId::LParen)?;
        let ty = self.parse_type(TypeMode::Normal)?;
        let name = self.identifier_spanned()?;
        let declarators = self.variable_declarators(name)?;
        self.expect_punct(PunctuationId::RParen)?;
        let body = Box::new(self.statement()?);
        Ok(Statement::Fixed {
            declaration: LocalDeclaration {
                is_const: false,
                is_using: false,
                is_await: false,
                ty,
                declarators,
            },
            body,
        })
    }
}
