#![forbid(unsafe_code)]
//! Sharpen: a recursive-descent C# parser
//!
//! This crate is the facade over the workspace: the syntax frontend (lexer, parser, AST, diagnostics, visitor) from
//! `sharpen_syntax`, the vocabulary registries from `sharpen_core`, and a pretty-printer that turns a tree back into
//! source.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The parser never panics on
//!   malformed input; it records diagnostics and returns a partial tree.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a bug in a static table, use `.expect("INVARIANT: reason")`.
//!
//! ## Examples
//! ```rust
//! let unit = sharpen::parse_source("Program.cs", "class C { int x = (int)y; }").unwrap();
//! assert_eq!(unit.members.len(), 1);
//!
//! let formatted = sharpen::format_source("class C{int x=(int)y;}").unwrap();
//! assert_eq!(formatted, "class C\n{\n    int x = (int)y;\n}\n");
//! ```

pub mod format;

pub use sharpen_core::lang;
pub use sharpen_syntax as syntax;
pub use sharpen_syntax::{ast, diagnostics, lexer, parser, visit};

pub use format::{BraceStyle, FormatConfig, Formatter, check_formatted, format_source, format_source_with_config};

use miette::NamedSource;
use sharpen_syntax::ast::CompilationUnit;
use sharpen_syntax::diagnostics::SyntaxError;

/// Every diagnostic for one source file, bundled with the text so a host can render it with miette.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
#[error("{name}: {} syntax error(s)", .errors.len())]
#[diagnostic(code(sharpen::source))]
pub struct SourceError {
    name: String,
    #[source_code]
    source_code: NamedSource<String>,
    #[related]
    errors: Vec<SyntaxError>,
}

impl SourceError {
    pub fn new(name: impl Into<String>, text: impl Into<String>, errors: Vec<SyntaxError>) -> Self {
        let name = name.into();
        Self {
            source_code: NamedSource::new(name.clone(), text.into()),
            name,
            errors,
        }
    }

    /// The individual lexical and syntax errors, in the order they were reported.
    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Lex and parse one source file.
///
/// ## Errors
/// Lexical errors stop before parsing; otherwise every parser diagnostic is returned. Use
/// [`parser::parse_with_diagnostics`] to keep the partial tree alongside its diagnostics.
#[tracing::instrument(skip_all, fields(name = name, len = text.len()))]
pub fn parse_source(name: &str, text: &str) -> Result<CompilationUnit, SourceError> {
    let result = lexer::lex(text).and_then(|tokens| parser::parse(&tokens));
    result.map_err(|errors| {
        tracing::debug!(errors = errors.len(), "source rejected");
        SourceError::new(name, text, errors)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Diagnostic;
    use sharpen_syntax::diagnostics::ErrorKind;

    #[test]
    fn test_parse_source_ok() {
        let unit = parse_source("a.cs", "namespace N; class C { }").unwrap();
        assert_eq!(unit.members.len(), 1);
    }

    #[test]
    fn test_parse_source_collects_errors() {
        let err = parse_source("bad.cs", "class C { void M() { int x = 1 } }").unwrap_err();
        assert_eq!(err.name(), "bad.cs");
        assert_eq!(err.errors().len(), 1);
        assert_eq!(err.errors()[0].kind, ErrorKind::Syntax);
        assert_eq!(err.to_string(), "bad.cs: 1 syntax error(s)");
        assert_eq!(err.related().map(|r| r.count()), Some(1));
        assert!(err.source_code().is_some());
    }

    #[test]
    fn test_parse_source_lexical_error() {
        let err = parse_source("lex.cs", "class C { char c = 'ab; }").unwrap_err();
        assert!(err.errors().iter().any(|e| e.kind == ErrorKind::Lexical));
    }
}
