/// Parse a token stream into an AST [`CompilationUnit`].
///
/// This is the main public entrypoint for parsing.
///
/// ## Parameters
/// - `tokens`: Token stream produced by `sharpen_syntax::lexer`.
///
/// ## Errors
/// Returns `Err(Vec<SyntaxError>)` if anything was reported; use [`parse_with_diagnostics`] to keep the partial tree.
pub fn parse(tokens: &[Token]) -> Result<CompilationUnit, Vec<SyntaxError>> {
    parse_with_options(tokens, ParseOptions::default()).into_result()
}

/// Parse a token stream, returning the (possibly partial) tree together with every diagnostic.
pub fn parse_with_diagnostics(tokens: &[Token]) -> Parse {
    parse_with_options(tokens, ParseOptions::default())
}

/// Like [`parse_with_diagnostics`], with explicit limits.
#[tracing::instrument(skip_all, fields(token_count = tokens.len(), max_depth = options.max_depth))]
pub fn parse_with_options(tokens: &[Token], options: ParseOptions) -> Parse {
    Parser::new(tokens, options).parse()
}

/// Parse a single expression that must span the whole token stream.
pub fn parse_expression(tokens: &[Token]) -> Result<Spanned<Expr>, Vec<SyntaxError>> {
    let mut parser = Parser::new(tokens, ParseOptions::default());
    let result = parser.expression();
    parser.finish_fragment(result, "end of expression")
}

/// Parse a single statement that must span the whole token stream.
pub fn parse_statement(tokens: &[Token]) -> Result<Spanned<Statement>, Vec<SyntaxError>> {
    let mut parser = Parser::new(tokens, ParseOptions::default());
    let result = parser.statement();
    parser.finish_fragment(result, "end of statement")
}

impl<'a> Parser<'a> {
    /// Turn the result of a fragment parse into the public shape, requiring that all input was consumed.
    fn finish_fragment<T>(mut self, result: PResult<T>, what: &str) -> Result<T, Vec<SyntaxError>> {
        match result {
            Ok(node) => {
                if !self.is_at_end() {
                    let err = self.unexpected(&[what]);
                    self.report(err);
                }
                if self.diagnostics.is_empty() {
                    Ok(node)
                } else {
                    Err(self.diagnostics.into_vec())
                }
            }
            Err(error) => {
                self.report(error);
                Err(self.diagnostics.into_vec())
            }
        }
    }
}
