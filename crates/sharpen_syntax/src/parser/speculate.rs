// ============================================================================
// Speculation and nesting
// ============================================================================

/// How `?`, `*` and array ranks are read after a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum TypeMode {
    /// Declarations, casts and type arguments: `?` always makes the type nullable.
    Normal,
    /// After `is`/`as` and in patterns: `?` is nullable only when no expression follows it, and `*` is never a
    /// pointer.
    Pattern,
    /// After `new` / `stackalloc`: array ranks and sizes belong to the creation expression.
    Creation,
}

/// Speculative rules, used as memo keys together with the start position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Rule {
    Type(TypeMode),
    TypeArgs,
    Cast,
    LambdaParam,
    LocalDeclHead,
    DeclarationExpr,
    Deconstruction,
    MemberHead,
    InterfaceTypeArgs,
    QueryStart,
}

/// Remaining native stack below which [`Parser::nested`] switches to a new segment.
const STACK_RED_ZONE: usize = 1024 * 1024;
const STACK_SEGMENT: usize = 4 * 1024 * 1024;

impl<'a> Parser<'a> {
    /// Try `attempt` from the current position.
    ///
    /// On success (it returned `Ok` and recorded no diagnostic) its consumption and result are kept. Otherwise the
    /// cursor and the diagnostics sink are restored exactly and `None` is returned. A failure is remembered for
    /// `(rule, position)`; later attempts of the same rule there fail without re-parsing.
    fn speculate<T>(&mut self, rule: Rule, attempt: impl FnOnce(&mut Self) -> PResult<T>) -> Option<T> {
        let start = self.mark();
        let key = (rule, start.0);
        if self.failed.contains(&key) {
            tracing::trace!(?rule, pos = start.0, "speculation memo hit");
            return None;
        }

        let checkpoint = self.diagnostics.checkpoint();
        match attempt(self) {
            Ok(value) if !self.diagnostics.has_new_since(checkpoint) => {
                tracing::trace!(?rule, pos = start.0, "speculation committed");
                Some(value)
            }
            outcome => {
                // Running out of depth says nothing about the tokens at `start`.
                let depth_limited = matches!(&outcome, Err(e) if e.kind == ErrorKind::NestingTooDeep);
                self.diagnostics.rollback(checkpoint);
                self.reset(start);
                if !depth_limited {
                    self.failed.insert(key);
                }
                tracing::trace!(?rule, pos = start.0, "speculation rolled back");
                None
            }
        }
    }

    /// Run `f` one nesting level deeper, failing with a nesting diagnostic past `max_depth`.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.depth >= self.options.max_depth {
            return Err(SyntaxError::nesting_too_deep(self.options.max_depth, self.current_span()));
        }
        self.depth += 1;
        // Continue on a fresh segment when the native stack runs low.
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || f(self));
        self.depth -= 1;
        result
    }
}
