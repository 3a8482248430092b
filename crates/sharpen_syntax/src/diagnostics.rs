//! Syntax diagnostics.
//!
//! [`SyntaxError`] is the single error type produced by the lexer and parser. It carries the message, span,
//! an [`ErrorKind`], the expected productions (when known), and free-form notes/hints in the same builder style the
//! rest of the frontend uses.
//!
//! ## Notes
//! - `SyntaxError` implements [`miette::Diagnostic`] so hosts can render it with source context; rendering is not
//!   done here.
//! - [`Diagnostics`] is the parser-side sink. It supports checkpoint/rollback so speculative parses can discard
//!   everything they recorded.

use std::fmt;

use miette::{Diagnostic, LabeledSpan};

use crate::ast::Span;

/// A syntax-level error with location information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub span: Span,
    pub kind: ErrorKind,
    /// Expected token kinds or production names, in the order they were tried.
    pub expected: Vec<String>,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl SyntaxError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            kind,
            expected: Vec::new(),
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Syntax, message, span)
    }

    pub fn unexpected_eof(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::UnexpectedEof, message, span)
    }

    pub fn lexical(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Lexical, message, span)
    }

    pub fn nesting_too_deep(limit: usize, span: Span) -> Self {
        Self::new(
            ErrorKind::NestingTooDeep,
            format!("nesting exceeds the maximum depth of {limit}"),
            span,
        )
        .with_hint("split the construct up, or raise `ParseOptions::max_depth`")
    }

    pub fn with_expected<I, S>(mut self, expected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected.extend(expected.into_iter().map(Into::into));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    /// Move the error right by `offset` bytes (used for re-lexed interpolation holes).
    pub fn shifted(mut self, offset: usize) -> Self {
        self.span = self.span.shifted(offset);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Syntax,
    UnexpectedEof,
    Lexical,
    NestingTooDeep,
}

impl ErrorKind {
    /// Stable diagnostic code.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Syntax => "sharpen::syntax::unexpected_token",
            ErrorKind::UnexpectedEof => "sharpen::syntax::unexpected_eof",
            ErrorKind::Lexical => "sharpen::syntax::lexical",
            ErrorKind::NestingTooDeep => "sharpen::syntax::nesting_too_deep",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Syntax => write!(f, "syntax error"),
            ErrorKind::UnexpectedEof => write!(f, "unexpected end of input"),
            ErrorKind::Lexical => write!(f, "lexical error"),
            ErrorKind::NestingTooDeep => write!(f, "nesting too deep"),
        }
    }
}

impl Diagnostic for SyntaxError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let mut lines: Vec<String> = Vec::new();
        if !self.expected.is_empty() {
            lines.push(format!("expected one of: {}", self.expected.join(", ")));
        }
        lines.extend(self.notes.iter().map(|n| format!("note: {n}")));
        lines.extend(self.hints.iter().map(|h| format!("hint: {h}")));
        if lines.is_empty() {
            None
        } else {
            Some(Box::new(lines.join("\n")))
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let len = self.span.end.saturating_sub(self.span.start);
        Some(Box::new(std::iter::once(LabeledSpan::new(
            Some(self.message.clone()),
            self.span.start,
            len,
        ))))
    }
}

// ============================================================================
// Sink
// ============================================================================

/// Opaque position in a [`Diagnostics`] sink, used to roll back speculative work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    len: usize,
    reported: usize,
    eof_reported: bool,
}

/// Ordered collection of diagnostics for one parse.
///
/// ## Notes
/// - Only the first [`ErrorKind::UnexpectedEof`] is kept; once input has run out every enclosing scope would
///   otherwise report the same thing again.
/// - With a cap (`max`), extra diagnostics are dropped but still *counted*, so a speculative parse that produced
///   only dropped diagnostics is still seen as failed.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    errors: Vec<SyntaxError>,
    reported: usize,
    eof_reported: bool,
    max: Option<usize>,
}

impl Diagnostics {
    pub fn new(max: Option<usize>) -> Self {
        Self {
            max,
            ..Self::default()
        }
    }

    /// Record a diagnostic.
    pub fn push(&mut self, error: SyntaxError) {
        // Suppressed duplicates still count, so speculation sees the failure.
        self.reported += 1;
        if error.kind == ErrorKind::UnexpectedEof {
            if self.eof_reported {
                return;
            }
            self.eof_reported = true;
        }
        if self.max.is_none_or(|max| self.errors.len() < max) {
            self.errors.push(error);
        }
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            len: self.errors.len(),
            reported: self.reported,
            eof_reported: self.eof_reported,
        }
    }

    /// Return `true` if anything was reported since `checkpoint`.
    pub fn has_new_since(&self, checkpoint: Checkpoint) -> bool {
        self.reported > checkpoint.reported || self.eof_reported != checkpoint.eof_reported
    }

    /// Drop everything recorded since `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.errors.truncate(checkpoint.len);
        self.reported = checkpoint.reported;
        self.eof_reported = checkpoint.eof_reported;
    }

    pub fn eof_reported(&self) -> bool {
        self.eof_reported
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SyntaxError> {
        self.errors.iter()
    }

    pub fn into_vec(self) -> Vec<SyntaxError> {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_message() {
        let err = SyntaxError::syntax("expected `;`", Span::new(3, 4));
        assert_eq!(err.to_string(), "syntax error: expected `;`");
    }

    #[test]
    fn test_builder_collects_context() {
        let err = SyntaxError::syntax("bad", Span::new(0, 1))
            .with_expected(["`)`", "`,`"])
            .with_note("inside an argument list")
            .with_hint("close the call");
        assert_eq!(err.expected, vec!["`)`".to_string(), "`,`".to_string()]);
        let help = err.help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.contains("expected one of: `)`, `,`"));
        assert!(help.contains("hint: close the call"));
    }

    #[test]
    fn test_miette_code_and_label() {
        let err = SyntaxError::unexpected_eof("unexpected end of input", Span::new(10, 10));
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("sharpen::syntax::unexpected_eof".to_string())
        );
        let labels: Vec<_> = err.labels().into_iter().flatten().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 10);
    }

    #[test]
    fn test_only_first_eof_is_kept() {
        let mut sink = Diagnostics::new(None);
        sink.push(SyntaxError::unexpected_eof("one", Span::new(5, 5)));
        sink.push(SyntaxError::unexpected_eof("two", Span::new(5, 5)));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_suppressed_eof_still_counts_as_new() {
        let mut sink = Diagnostics::new(None);
        sink.push(SyntaxError::unexpected_eof("one", Span::new(5, 5)));
        let cp = sink.checkpoint();
        assert!(!sink.has_new_since(cp));
        sink.push(SyntaxError::unexpected_eof("two", Span::new(5, 5)));
        assert!(sink.has_new_since(cp));
        assert_eq!(sink.len(), 1);
        sink.rollback(cp);
        assert!(!sink.has_new_since(cp));
        assert!(sink.eof_reported());
    }

    #[test]
    fn test_rollback_restores_state() {
        let mut sink = Diagnostics::new(None);
        sink.push(SyntaxError::syntax("kept", Span::new(0, 1)));
        let cp = sink.checkpoint();
        sink.push(SyntaxError::syntax("speculative", Span::new(1, 2)));
        sink.push(SyntaxError::unexpected_eof("eof", Span::new(2, 2)));
        assert!(sink.has_new_since(cp));
        sink.rollback(cp);
        assert!(!sink.has_new_since(cp));
        assert_eq!(sink.len(), 1);
        assert!(!sink.eof_reported());
    }

    #[test]
    fn test_cap_drops_but_still_counts() {
        let mut sink = Diagnostics::new(Some(1));
        sink.push(SyntaxError::syntax("first", Span::new(0, 1)));
        let cp = sink.checkpoint();
        sink.push(SyntaxError::syntax("dropped", Span::new(1, 2)));
        assert_eq!(sink.len(), 1);
        assert!(sink.has_new_since(cp));
    }
}
