//! Formatting configuration for Adorad
//!
//! There is no configuration file; callers build a [`FormatConfig`] in code.

/// Formatting configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatConfig {
    /// Number of spaces per indentation level
    pub indent_width: usize,
    /// Number of blank lines between top-level declarations
    pub blank_lines_top_level: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            blank_lines_top_level: 1,
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

    /// Set the number of blank lines between top-level declarations
    pub fn with_blank_lines(mut self, count: usize) -> Self {
        self.blank_lines_top_level = count;
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
        assert_eq!(config.blank_lines_top_level, 1);
        assert_eq!(FormatConfig::new(), config);
    }

    #[test]
    fn test_builder_chaining() {
        let config = FormatConfig::new().with_indent_width(2).with_blank_lines(0);
        assert_eq!(config.indent_width, 2);
        assert_eq!(config.blank_lines_top_level, 0);
    }
}
