//! Output writer with indentation tracking

use super::config::{BraceStyle, FormatConfig};

/// Writer that tracks indentation and builds formatted output
pub struct FormatWriter {
    /// The output buffer
    output: String,
    /// Current indentation level
    indent_level: usize,
    config: FormatConfig,
    /// Whether we're at the start of a line
    at_line_start: bool,
}

impl FormatWriter {
    /// Create a new format writer with the given config
    pub fn new(config: FormatConfig) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            config,
            at_line_start: true,
        }
    }

    /// Get the formatted output
    pub fn finish(self) -> String {
        self.output
    }

    /// Increase indentation level
    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indentation level
    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    fn write_indent(&mut self) {
        if self.at_line_start {
            let width = self.indent_level * self.config.indent_width;
            self.output.extend(std::iter::repeat_n(' ', width));
            self.at_line_start = false;
        }
    }

    /// Write a string (with auto-indent)
    pub fn write(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.write_indent();
        self.output.push_str(s);
    }

    /// Write a string and newline
    pub fn writeln(&mut self, s: &str) {
        self.write(s);
        self.newline();
    }

    /// Write just a newline
    pub fn newline(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    /// Write multiple blank lines (for spacing between declarations)
    pub fn blank_lines(&mut self, count: usize) {
        for _ in 0..count {
            self.newline();
        }
    }

    /// End a header line with `{` (placed per the brace style) and indent the body.
    ///
    /// A block that starts its own line (a nested block statement) just opens there.
    pub fn open_brace(&mut self) {
        if self.at_line_start {
            self.writeln("{");
        } else {
            match self.config.brace_style {
                BraceStyle::NextLine => {
                    self.newline();
                    self.writeln("{");
                }
                BraceStyle::SameLine => self.writeln(" {"),
            }
        }
        self.indent();
    }

    /// Dedent and write `}`, leaving the line open for a continuation (`else`, `catch`, `while`).
    pub fn close_brace(&mut self) {
        self.dedent();
        self.write("}");
    }

    /// Separate a closed `}` from the keyword that continues the statement.
    pub fn continue_after_brace(&mut self) {
        match self.config.brace_style {
            BraceStyle::NextLine => self.newline(),
            BraceStyle::SameLine => self.write(" "),
        }
    }

    pub fn config(&self) -> &FormatConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_writer() -> FormatWriter {
        FormatWriter::new(FormatConfig::default())
    }

    #[test]
    fn test_write_and_writeln() {
        let mut writer = default_writer();
        writer.write("hello");
        writer.write("");
        writer.writeln(" world");
        writer.writeln("");
        assert_eq!(writer.finish(), "hello world\n\n");
    }

    #[test]
    fn test_indent_affects_output() {
        let mut writer = default_writer();
        writer.indent();
        writer.writeln("indented");
        writer.dedent();
        writer.dedent();
        writer.writeln("not indented");
        assert_eq!(writer.finish(), "    indented\nnot indented\n");
    }

    #[test]
    fn test_blank_lines_between_content() {
        let mut writer = default_writer();
        writer.writeln("line1");
        writer.blank_lines(2);
        writer.writeln("line2");
        assert_eq!(writer.finish(), "line1\n\n\nline2\n");
    }

    #[test]
    fn test_next_line_braces() {
        let mut writer = FormatWriter::new(FormatConfig::new().with_indent_width(2));
        writer.write("if (x)");
        writer.open_brace();
        writer.writeln("y();");
        writer.close_brace();
        writer.continue_after_brace();
        writer.write("else");
        writer.open_brace();
        writer.close_brace();
        writer.newline();
        assert_eq!(writer.finish(), "if (x)\n{\n  y();\n}\nelse\n{\n}\n");
    }

    #[test]
    fn test_same_line_braces() {
        let config = FormatConfig::new().with_brace_style(BraceStyle::SameLine);
        let mut writer = FormatWriter::new(config);
        writer.write("if (x)");
        writer.open_brace();
        writer.writeln("y();");
        writer.close_brace();
        writer.continue_after_brace();
        writer.write("else");
        writer.open_brace();
        writer.close_brace();
        writer.newline();
        assert_eq!(writer.finish(), "if (x) {\n    y();\n} else {\n}\n");
    }
}
