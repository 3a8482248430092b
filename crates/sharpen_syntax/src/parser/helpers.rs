/// Parser helper methods.
///
/// Small building blocks shared by the expression, statement and declaration parsers: token checks, `expect_*`
/// helpers that produce consistent diagnostics, and the synchronisation routines used for error recovery.
impl<'a> Parser<'a> {
    // ========================================================================
    // Checks
    // ========================================================================

    fn check_keyword(&self, id: KeywordId) -> bool {
        self.peek().kind.is_keyword(id)
    }

    fn check_op(&self, id: OperatorId) -> bool {
        self.peek().kind.is_operator(id)
    }

    fn check_punct(&self, id: PunctuationId) -> bool {
        self.peek().kind.is_punctuation(id)
    }

    /// Identifier spelled like the contextual keyword `id`.
    fn check_contextual(&self, id: KeywordId) -> bool {
        self.peek().kind.is_contextual(id)
    }

    fn check_ident(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Ident(_))
    }

    fn match_keyword(&mut self, id: KeywordId) -> bool {
        if self.check_keyword(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_op(&mut self, id: OperatorId) -> bool {
        if self.check_op(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_contextual(&mut self, id: KeywordId) -> bool {
        if self.check_contextual(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    // ========================================================================
    // Expect
    // ========================================================================

    fn expect_punct(&mut self, id: PunctuationId) -> PResult<Span> {
        if self.check_punct(id) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected(&[&format!("`{}`", sharpen_core::lang::punctuation::as_str(id))]))
        }
    }

    fn expect_keyword(&mut self, id: KeywordId) -> PResult<Span> {
        if self.check_keyword(id) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected(&[&format!("`{}`", keywords::as_str(id))]))
        }
    }

    fn expect_op(&mut self, id: OperatorId) -> PResult<Span> {
        if self.check_op(id) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected(&[&format!("`{}`", sharpen_core::lang::operators::as_str(id))]))
        }
    }

    fn expect_contextual(&mut self, id: KeywordId) -> PResult<Span> {
        if self.check_contextual(id) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected(&[&format!("`{}`", keywords::as_str(id))]))
        }
    }

    /// Consume a `;`, or record that it is missing and carry on as if it were there.
    ///
    /// The diagnostic points just past the previous token and nothing is consumed, so the following construct
    /// still parses normally.
    fn expect_semicolon(&mut self) {
        if self.match_punct(PunctuationId::Semicolon) {
            return;
        }
        let at = self.prev_end();
        let found = self.peek().kind.describe();
        let err = if self.is_at_end() {
            SyntaxError::unexpected_eof("expected `;`, found end of input", Span::new(at, at))
        } else {
            SyntaxError::syntax(format!("expected `;`, found {}", found), Span::new(at, at))
        };
        self.report(err.with_expected(["`;`"]));
    }

    /// Consume the `close` bracket of a scope.
    ///
    /// At end of input the scope is closed silently after recording a single end-of-input diagnostic, so callers
    /// can return their partial node.
    fn expect_closing(&mut self, close: PunctuationId) -> PResult<()> {
        if self.match_punct(close) {
            return Ok(());
        }
        let err = self.unexpected(&[&format!("`{}`", sharpen_core::lang::punctuation::as_str(close))]);
        if self.is_at_end() {
            self.report(err);
            Ok(())
        } else {
            Err(err)
        }
    }

    // ========================================================================
    // Errors
    // ========================================================================

    fn report(&mut self, error: SyntaxError) {
        tracing::trace!(kind = %error.kind, message = %error.message, "diagnostic");
        self.diagnostics.push(error);
    }

    /// Build an "expected X, found Y" error at the current token.
    fn unexpected(&self, expected: &[&str]) -> SyntaxError {
        let token = self.peek();
        let list = expected.join(" or ");
        let err = if matches!(token.kind, TokenKind::Eof) {
            SyntaxError::unexpected_eof(format!("expected {}, found end of input", list), token.span)
        } else {
            SyntaxError::syntax(format!("expected {}, found {}", list, token.kind.describe()), token.span)
        };
        err.with_expected(expected.iter().copied())
    }

    // ========================================================================
    // Recovery
    // ========================================================================

    /// Skip to the end of a broken statement.
    ///
    /// Stops after a `;` or before a `}` at the starting nesting level, or at end of input. Braces the statement
    /// opened before failing are skipped up to and including their closer. Always consumes at least one token
    /// unless already at `}` or end of input, so callers cannot loop.
    fn synchronize_statement(&mut self, start_pos: usize) {
        let open = self.unclosed_braces(start_pos);
        let mut depth = open;
        loop {
            let kind = self.peek().kind.clone();
            match kind {
                TokenKind::Eof => break,
                TokenKind::Punctuation(PunctuationId::Semicolon) if depth == 0 => {
                    self.advance();
                    break;
                }
                TokenKind::Punctuation(PunctuationId::RBrace) if depth == 0 => break,
                TokenKind::Punctuation(PunctuationId::LBrace | PunctuationId::LParen | PunctuationId::LBracket) => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::Punctuation(PunctuationId::RBrace) => {
                    depth -= 1;
                    self.advance();
                    if open > 0 && depth == 0 {
                        break;
                    }
                }
                TokenKind::Punctuation(PunctuationId::RParen | PunctuationId::RBracket) => {
                    depth = depth.saturating_sub(1);
                    self.advance();
                }
                _ => {
                    self.advance();
                }
            }
        }
        tracing::debug!(skipped = self.pos - start_pos, "recovered at statement boundary");
    }

    /// Skip to the start of the next member or type declaration.
    ///
    /// Like [`Self::synchronize_statement`], but also stops after a braced body closes at the starting level and
    /// before modifiers and declaration keywords.
    fn synchronize_member(&mut self, start_pos: usize) {
        let mut depth = self.unclosed_braces(start_pos);
        loop {
            let kind = self.peek().kind.clone();
            if depth == 0 && self.pos > start_pos && self.starts_declaration(&kind) {
                break;
            }
            match kind {
                TokenKind::Eof => break,
                TokenKind::Punctuation(PunctuationId::Semicolon) if depth == 0 => {
                    self.advance();
                    break;
                }
                TokenKind::Punctuation(PunctuationId::RBrace) if depth == 0 => break,
                TokenKind::Punctuation(PunctuationId::LBrace | PunctuationId::LParen | PunctuationId::LBracket) => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::Punctuation(PunctuationId::RBrace) => {
                    depth -= 1;
                    self.advance();
                    if depth == 0 {
                        break;
                    }
                }
                TokenKind::Punctuation(PunctuationId::RParen | PunctuationId::RBracket) => {
                    depth = depth.saturating_sub(1);
                    self.advance();
                }
                _ => {
                    self.advance();
                }
            }
        }
        tracing::debug!(skipped = self.pos - start_pos, "recovered at member boundary");
    }

    /// Number of `{` consumed since `start_pos` that are still open.
    fn unclosed_braces(&self, start_pos: usize) -> usize {
        self.tokens[start_pos..self.pos].iter().fold(0, |depth, token| match token.kind {
            TokenKind::Punctuation(PunctuationId::LBrace) => depth + 1,
            TokenKind::Punctuation(PunctuationId::RBrace) => depth.saturating_sub(1),
            _ => depth,
        })
    }

    fn starts_declaration(&self, kind: &TokenKind) -> bool {
        match kind {
            TokenKind::Keyword(id) => {
                matches!(
                    keywords::category(*id),
                    KeywordCategory::Modifier | KeywordCategory::Declaration
                ) && !matches!(id, KeywordId::Out | KeywordId::Params | KeywordId::Ref | KeywordId::Using)
            }
            _ => false,
        }
    }
}
