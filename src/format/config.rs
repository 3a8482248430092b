//! Formatting configuration for C# output.

/// Formatting configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatConfig {
    /// Number of spaces per indentation level
    pub indent_width: usize,
    /// Number of blank lines between members of a type and between namespace members
    pub blank_lines_between_members: usize,
    /// Where opening braces of blocks and type bodies go
    pub brace_style: BraceStyle,
}

/// Placement of `{` after a declaration or statement header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BraceStyle {
    /// Allman style: the brace starts its own line.
    NextLine,
    /// K&R style: the brace ends the header line.
    SameLine,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            blank_lines_between_members: 1,
            brace_style: BraceStyle::NextLine,
        }
    }
}

impl FormatConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation width
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Set the spacing between members
    pub fn with_blank_lines_between_members(mut self, count: usize) -> Self {
        self.blank_lines_between_members = count;
        self
    }

    /// Set the brace placement
    pub fn with_brace_style(mut self, style: BraceStyle) -> Self {
        self.brace_style = style;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FormatConfig::default();
        assert_eq!(config.indent_width, 4);
        assert_eq!(config.blank_lines_between_members, 1);
        assert_eq!(config.brace_style, BraceStyle::NextLine);
        assert_eq!(FormatConfig::new(), config);
    }

    #[test]
    fn test_builder_chain() {
        let config = FormatConfig::new()
            .with_indent_width(2)
            .with_blank_lines_between_members(0)
            .with_brace_style(BraceStyle::SameLine);

        assert_eq!(config.indent_width, 2);
        assert_eq!(config.blank_lines_between_members, 0);
        assert_eq!(config.brace_style, BraceStyle::SameLine);
    }

    #[test]
    fn test_builder_override() {
        let config = FormatConfig::new().with_indent_width(2).with_indent_width(8);

        assert_eq!(config.indent_width, 8); // Last value wins
    }
}
