//! Locale context for scalar text conversions.

/// Locale-sensitive formatting context.
///
/// Governs how numbers are parsed from and rendered to text; nothing else
/// in the engine consults it. The default is invariant: `.` as the decimal
/// separator and no digit grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatContext {
    /// The character separating the integral and fractional parts.
    pub decimal_separator: char,
    /// Digit grouping character stripped while parsing, if any.
    pub group_separator: Option<char>,
}

impl Default for FormatContext {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            group_separator: None,
        }
    }
}

impl FormatContext {
    /// Create a context with explicit separators.
    pub fn new(decimal_separator: char, group_separator: Option<char>) -> Self {
        Self {
            decimal_separator,
            group_separator,
        }
    }

    /// Normalize localized numeric text to the invariant form parsers
    /// expect: group separators are stripped, the decimal separator is
    /// mapped to `.`.
    pub fn normalize_number(&self, text: &str) -> String {
        text.chars()
            .filter(|c| Some(*c) != self.group_separator)
            .map(|c| if c == self.decimal_separator { '.' } else { c })
            .collect()
    }

    /// Localize invariant numeric text for display.
    pub fn localize_number(&self, text: String) -> String {
        if self.decimal_separator == '.' {
            text
        } else {
            text.replace('.', &self.decimal_separator.to_string())
        }
    }
}
