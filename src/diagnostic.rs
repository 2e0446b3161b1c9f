use std::cmp::Ordering;

/// A resolved position in a message document.
///
/// Produced by the location mapper for diagnostic display; never stored
/// past the compile pass that created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpan {
    /// Path of the message document.
    pub file: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column (0-indexed) within the line.
    pub column: usize,
    /// Length of the offending range in bytes.
    pub length: usize,
    /// Full text of the line the span starts on, for display context.
    pub line_text: String,
}

/// A single problem found while compiling a message document.
///
/// Some validator paths cannot recover a position (e.g. a node synthesized
/// without a source range); those diagnostics carry `location: None` and
/// are still reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub text: String,
    pub location: Option<SourceSpan>,
}

impl Diagnostic {
    pub fn new(text: impl Into<String>, location: Option<SourceSpan>) -> Self {
        Self {
            text: text.into(),
            location,
        }
    }

    /// A diagnostic with no recoverable position.
    pub fn unlocated(text: impl Into<String>) -> Self {
        Self::new(text, None)
    }
}

impl Ord for Diagnostic {
    fn cmp(&self, other: &Self) -> Ordering {
        // Sort by file/line/column, then text so report output is
        // deterministic when several diagnostics share a position.
        match (&self.location, &other.location) {
            (Some(a), Some(b)) => a
                .file
                .cmp(&b.file)
                .then_with(|| a.line.cmp(&b.line))
                .then_with(|| a.column.cmp(&b.column))
                .then_with(|| self.text.cmp(&other.text)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.text.cmp(&other.text),
        }
    }
}

impl PartialOrd for Diagnostic {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(line: usize, column: usize) -> SourceSpan {
        SourceSpan {
            file: "messages.msg".to_string(),
            line,
            column,
            length: 1,
            line_text: String::new(),
        }
    }

    #[test]
    fn test_located_sorts_before_unlocated() {
        let mut diagnostics = vec![
            Diagnostic::unlocated("b"),
            Diagnostic::new("a", Some(span(3, 0))),
        ];
        diagnostics.sort();
        assert_eq!(diagnostics[0].text, "a");
    }

    #[test]
    fn test_sorted_by_position_then_text() {
        let mut diagnostics = vec![
            Diagnostic::new("z", Some(span(2, 4))),
            Diagnostic::new("a", Some(span(2, 4))),
            Diagnostic::new("m", Some(span(1, 9))),
        ];
        diagnostics.sort();
        let texts: Vec<&str> = diagnostics.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["m", "a", "z"]);
    }
}
