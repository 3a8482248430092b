//! C# pretty-printer
//!
//! Re-serialises a parsed [`CompilationUnit`](sharpen_syntax::ast::CompilationUnit) to source:
//! - configurable indentation width and brace placement
//! - one declaration or statement per line
//! - expressions on a single line, grouped exactly as parsed
//!
//! Comments and preprocessor lines are not part of the tree, so they do not survive formatting.

mod config;
mod formatter;
mod writer;

pub use config::{BraceStyle, FormatConfig};
pub use formatter::Formatter;

use sharpen_syntax::diagnostics::SyntaxError;
use sharpen_syntax::{lexer, parser};

/// Format C# source code with default settings
pub fn format_source(source: &str) -> Result<String, Vec<SyntaxError>> {
    format_source_with_config(source, FormatConfig::default())
}

/// Format C# source code with custom configuration
///
/// ## Errors
/// Returns every lexical and syntax diagnostic if the source does not parse cleanly; a partial tree is never printed.
#[tracing::instrument(skip_all, fields(source_len = source.len(), indent_width = config.indent_width))]
pub fn format_source_with_config(source: &str, config: FormatConfig) -> Result<String, Vec<SyntaxError>> {
    let tokens = lexer::lex(source)?;
    let unit = parser::parse(&tokens)?;
    let formatted = Formatter::new(config).format(&unit);
    tracing::debug!(output_len = formatted.len(), "formatted compilation unit");
    Ok(formatted)
}

/// Check if source code is already formatted
pub fn check_formatted(source: &str) -> Result<bool, Vec<SyntaxError>> {
    let formatted = format_source(source)?;
    Ok(source == formatted)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // format_source tests
    // ========================================

    #[test]
    fn test_format_source_simple_class() {
        let source = "class  C{int  x=1;void M(){return;}}";
        let expected = "\
class C
{
    int x = 1;

    void M()
    {
        return;
    }
}
";
        assert_eq!(format_source(source).unwrap(), expected);
    }

    #[test]
    fn test_format_source_invalid_syntax() {
        let errors = format_source("class C { void M( }").unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_format_source_lexical_error() {
        let errors = format_source("class C { string s = \"open; }").unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_format_source_empty() {
        assert_eq!(format_source("").unwrap(), "");
    }

    // ========================================
    // format_source_with_config tests
    // ========================================

    #[test]
    fn test_format_source_with_custom_config() {
        let config = FormatConfig::new()
            .with_indent_width(2)
            .with_blank_lines_between_members(0)
            .with_brace_style(BraceStyle::SameLine);
        let result = format_source_with_config("class C { int a; int b; }", config).unwrap();
        assert_eq!(result, "class C {\n  int a;\n  int b;\n}\n");
    }

    // ========================================
    // check_formatted tests
    // ========================================

    #[test]
    fn test_check_formatted_round_trip() {
        let formatted = format_source("namespace N { enum E { A, B = 2 } }").unwrap();
        assert_eq!(check_formatted(&formatted), Ok(true));
        assert_eq!(check_formatted("enum E{A}"), Ok(false));
    }

    #[test]
    fn test_check_formatted_invalid_syntax() {
        assert!(check_formatted("class {").is_err());
    }
}
