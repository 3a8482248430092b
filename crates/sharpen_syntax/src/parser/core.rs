/// Parser core types and entrypoint.
///
/// This chunk defines the [`Parser`] type, its configuration ([`ParseOptions`]) and result ([`Parse`]) types, and
/// the top-level compilation-unit loop.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module while avoiding a single “god file”.
type PResult<T> = Result<T, SyntaxError>;

/// Parser configuration.
///
/// ## Examples
/// ```rust
/// use sharpen_syntax::parser::ParseOptions;
///
/// let options = ParseOptions::new().with_max_depth(64).with_max_diagnostics(Some(20));
/// assert_eq!(options.max_depth, 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting of expressions, statements, types, patterns and members. Deeper input yields a
    /// [`ErrorKind::NestingTooDeep`] diagnostic instead of exhausting the stack.
    pub max_depth: usize,
    /// Keep at most this many diagnostics (parsing continues either way).
    pub max_diagnostics: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_diagnostics: None,
        }
    }
}

impl ParseOptions {
    /// Create options with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the nesting limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the diagnostics cap
    pub fn with_max_diagnostics(mut self, max: Option<usize>) -> Self {
        self.max_diagnostics = max;
        self
    }
}

/// Result of a parse: always a tree, plus every diagnostic recorded on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Parse {
    pub unit: CompilationUnit,
    pub diagnostics: Vec<SyntaxError>,
}

impl Parse {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Fail if anything was reported.
    pub fn into_result(self) -> Result<CompilationUnit, Vec<SyntaxError>> {
        if self.diagnostics.is_empty() {
            Ok(self.unit)
        } else {
            Err(self.diagnostics)
        }
    }
}

/// Parser state.
///
/// ## Notes
/// - All state is local to one parse; nothing is shared between parser instances.
/// - The parser recovers from errors by synchronizing at statement/member/declaration boundaries and leaving
///   `Error` placeholders in the tree.
pub struct Parser<'a> {
    /// Token stream with `>>` / `>>=` already split into `>` halves.
    tokens: Cow<'a, [Token]>,
    pos: usize,
    /// Returned for every peek past the end of the stream.
    eof: Token,
    /// `matching[i]` is the index of the bracket closing the one opened at `i`.
    matching: Vec<Option<usize>>,
    diagnostics: Diagnostics,
    /// Failed speculative attempts, by rule and start position.
    failed: HashSet<(Rule, usize)>,
    depth: usize,
    /// > 0 while parsing query clauses (their contextual keywords end casts).
    query_depth: usize,
    options: ParseOptions,
}

impl<'a> Parser<'a> {
    /// Create a new parser for a token stream.
    ///
    /// ## Parameters
    /// - `tokens`: Token stream produced by `sharpen_syntax::lexer` (or any producer honouring the same contract).
    /// - `options`: limits for this parse.
    pub fn new(tokens: &'a [Token], options: ParseOptions) -> Self {
        let tokens = split_shift_tokens(tokens);
        let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
        let matching = bracket_matches(&tokens);
        Self {
            tokens,
            pos: 0,
            eof: Token::new(TokenKind::Eof, Span::new(end, end)),
            matching,
            diagnostics: Diagnostics::new(options.max_diagnostics),
            failed: HashSet::new(),
            depth: 0,
            query_depth: 0,
            options,
        }
    }

    /// Parse the entire token stream into a [`CompilationUnit`].
    ///
    /// Never fails: malformed constructs become `Error` placeholders and diagnostics.
    pub fn parse(mut self) -> Parse {
        let unit = self.compilation_unit();
        tracing::debug!(
            members = unit.members.len(),
            diagnostics = self.diagnostics.len(),
            "parse finished"
        );
        Parse {
            unit,
            diagnostics: self.diagnostics.into_vec(),
        }
    }

    fn compilation_unit(&mut self) -> CompilationUnit {
        let externs = self.extern_aliases();
        let usings = self.using_directives();
        let attributes = self.global_attributes();
        let members = self.namespace_members(false);
        CompilationUnit {
            externs,
            usings,
            attributes,
            members,
        }
    }

    /// Parse declarations until end of input, or until `}` when `in_braces`.
    fn namespace_members(&mut self, in_braces: bool) -> Vec<Spanned<NamespaceMember>> {
        let mut members = Vec::new();
        loop {
            if self.is_at_end() || (in_braces && self.check_punct(PunctuationId::RBrace)) {
                break;
            }
            if self.check_punct(PunctuationId::RBrace) {
                let err = self.unexpected(&["type or namespace declaration"]);
                self.report(err);
                self.advance();
                continue;
            }

            let start_pos = self.pos;
            let start = self.current_span().start;
            match self.namespace_member() {
                Ok(member) => members.push(member),
                Err(e) => {
                    self.report(e);
                    self.synchronize_member(start_pos);
                    members.push(Spanned::new(NamespaceMember::Error, self.span_from(start)));
                }
            }
        }
        members
    }
}
