//! # Diagnostic snapshot types.
//!
//! A [`Diagnostic`] is a problem the host reported at a [`Range`] of a document.
//! Values are captured once per trigger and never updated afterwards.

use std::{borrow::Cow, fmt};

use serde::Deserialize;

/// Zero-based line/column position.
///
/// Ordering is by line, then column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    #[inline]
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.character)
    }
}

/// Half-open range between two positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    #[inline]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Shorthand for `(start_line, start_col)-(end_line, end_col)`.
    #[inline]
    pub const fn from_coords(sl: u32, sc: u32, el: u32, ec: u32) -> Self {
        Self::new(Position::new(sl, sc), Position::new(el, ec))
    }

    #[inline]
    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }

    /// True if any part of the range lies on `line`.
    #[inline]
    pub fn touches_line(&self, line: u32) -> bool {
        self.start.line <= line && line <= self.end.line
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Diagnostic severity as reported by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
    Information,
    Hint,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Information => "information",
            Severity::Hint => "hint",
        }
    }
}

/// Diagnostic code: hosts report either text or a number.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum DiagnosticCode {
    Number(i64),
    Text(String),
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCode::Number(n) => write!(f, "{n}"),
            DiagnosticCode::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for DiagnosticCode {
    fn from(value: &str) -> Self {
        DiagnosticCode::Text(value.to_string())
    }
}

impl From<i64> for DiagnosticCode {
    fn from(value: i64) -> Self {
        DiagnosticCode::Number(value)
    }
}

/// A reported problem at a position range in a document.
///
/// Identity for filtering is `source + code + range`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct Diagnostic {
    pub range: Range,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub code: Option<DiagnosticCode>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic with only a range; fill the rest with the `with_*` helpers.
    pub fn new(range: Range) -> Self {
        Self {
            range,
            source: None,
            code: None,
            severity: Severity::default(),
            message: String::new(),
        }
    }

    #[inline]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[inline]
    pub fn with_code(mut self, code: impl Into<DiagnosticCode>) -> Self {
        self.code = Some(code.into());
        self
    }

    #[inline]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    #[inline]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Rendered code, if any.
    pub fn code_text(&self) -> Option<String> {
        self.code.as_ref().map(ToString::to_string)
    }

    /// Display label: the source if present, otherwise the code.
    pub fn label(&self) -> Cow<'_, str> {
        match (&self.source, &self.code) {
            (Some(source), _) => Cow::Borrowed(source.as_str()),
            (None, Some(DiagnosticCode::Text(code))) => Cow::Borrowed(code.as_str()),
            (None, Some(code)) => Cow::Owned(code.to_string()),
            (None, None) => Cow::Borrowed(""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_order_by_line_then_column() {
        assert!(Position::new(1, 9) < Position::new(2, 0));
        assert!(Position::new(2, 1) < Position::new(2, 4));
    }

    #[test]
    fn label_prefers_source() {
        let d = Diagnostic::new(Range::default()).with_source("eslint").with_code("semi");
        assert_eq!(d.label(), "eslint");

        let d = Diagnostic::new(Range::default()).with_code(7027);
        assert_eq!(d.label(), "7027");
    }

    #[test]
    fn multi_line_range_touches_inner_lines() {
        let r = Range::from_coords(3, 4, 6, 0);
        assert!(r.touches_line(3));
        assert!(r.touches_line(5));
        assert!(!r.touches_line(7));
        assert!(!r.is_single_line());
    }
}
