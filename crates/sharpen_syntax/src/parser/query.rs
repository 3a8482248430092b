/// Query expressions (`from x in xs where ... select ...`).
///
/// The clause words are contextual: a query is only entered when `from` is followed by a range variable and `in`.
impl<'a> Parser<'a> {
    /// Parse a query if the `from` at the cursor starts one; `Ok(None)` leaves the cursor untouched.
    fn query_expression(&mut self) -> PResult<Option<Spanned<Expr>>> {
        let start = self.current_span().start;
        let Some((ty, name)) = self.from_head() else {
            return Ok(None);
        };
        self.query_depth += 1;
        let result = self.query_body(ty, name, start);
        self.query_depth -= 1;
        result.map(Some)
    }

    /// `from x in` or `from T x in`, leaving the cursor after `in`.
    fn from_head(&mut self) -> Option<(Option<Spanned<Type>>, Ident)> {
        if matches!(self.peek_kind(1), TokenKind::Ident(_)) && self.peek_kind(2).is_keyword(KeywordId::In) {
            self.advance();
            let name = self.identifier().ok()?;
            self.advance();
            return Some((None, name));
        }
        self.speculate(Rule::QueryStart, |p| {
            p.expect_contextual(KeywordId::From)?;
            let ty = p.parse_type(TypeMode::Normal)?;
            let name = p.identifier()?;
            p.expect_keyword(KeywordId::In)?;
            Ok((Some(ty), name))
        })
    }

    fn query_body(&mut self, ty: Option<Spanned<Type>>, name: Ident, start: usize) -> PResult<Spanned<Expr>> {
        let source = self.expression()?;
        let mut clauses = vec![Spanned::new(QueryClause::From { ty, name, source }, self.span_from(start))];

        loop {
            while let Some(clause) = self.body_clause()? {
                clauses.push(clause);
            }

            let clause_start = self.current_span().start;
            let last = if self.match_contextual(KeywordId::Select) {
                QueryClause::Select(self.expression()?)
            } else if self.match_contextual(KeywordId::Group) {
                let value = self.expression()?;
                self.expect_contextual(KeywordId::By)?;
                let key = self.expression()?;
                QueryClause::Group { value, key }
            } else {
                return Err(self.unexpected(&["`select`", "`group`"]));
            };
            clauses.push(Spanned::new(last, self.span_from(clause_start)));

            let into_start = self.current_span().start;
            if !self.match_contextual(KeywordId::Into) {
                break;
            }
            let name = self.identifier()?;
            clauses.push(Spanned::new(QueryClause::Into(name), self.span_from(into_start)));
        }

        Ok(Spanned::new(Expr::Query(QueryExpr { clauses }), self.span_from(start)))
    }

    /// `from`, `let`, `where`, `join` or `orderby`; `None` at anything else.
    fn body_clause(&mut self) -> PResult<Option<Spanned<QueryClause>>> {
        let start = self.current_span().start;
        let clause = if self.check_contextual(KeywordId::From) {
            let Some((ty, name)) = self.from_head() else {
                return Err(self.unexpected(&["range variable"]));
            };
            let source = self.expression()?;
            QueryClause::From { ty, name, source }
        } else if self.match_contextual(KeywordId::Let) {
            let name = self.identifier()?;
            self.expect_op(OperatorId::Eq)?;
            let value = self.expression()?;
            QueryClause::Let { name, value }
        } else if self.match_contextual(KeywordId::Where) {
            QueryClause::Where(self.expression()?)
        } else if self.match_contextual(KeywordId::Join) {
            let ty = if matches!(self.peek_kind(1), TokenKind::Keyword(KeywordId::In)) {
                None
            } else {
                Some(self.parse_type(TypeMode::Normal)?)
            };
            let name = self.identifier()?;
            self.expect_keyword(KeywordId::In)?;
            let source = self.expression()?;
            self.expect_contextual(KeywordId::On)?;
            let left = self.expression()?;
            self.expect_contextual(KeywordId::Equals)?;
            let right = self.expression()?;
            let into = if self.match_contextual(KeywordId::Into) {
                Some(self.identifier()?)
            } else {
                None
            };
            QueryClause::Join {
                ty,
                name,
                source,
                left,
                right,
                into,
            }
        } else if self.match_contextual(KeywordId::Orderby) {
            let mut orderings = Vec::new();
            loop {
                let ordering_start = self.current_span().start;
                let expr = self.expression()?;
                let direction = if self.match_contextual(KeywordId::Ascending) {
                    Some(OrderDirection::Ascending)
                } else if self.match_contextual(KeywordId::Descending) {
                    Some(OrderDirection::Descending)
                } else {
                    None
                };
                orderings.push(Spanned::new(Ordering { expr, direction }, self.span_from(ordering_start)));
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
            QueryClause::OrderBy(orderings)
        } else {
            return Ok(None);
        };
        Ok(Some(Spanned::new(clause, self.span_from(start))))
    }
}
