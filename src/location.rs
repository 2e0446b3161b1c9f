//! Maps abstract byte ranges back to line/column positions.
//!
//! Template-level semantic errors report offsets against the *stored* value
//! string. For plain and quoted scalars that string starts at a known source
//! offset; for block literals the stored value has had its indentation
//! stripped, so every newline crossed before the error offset means one
//! stripped indent run that has to be added back before the offset is valid
//! against the original text.

use std::ops::Range;

use crate::diagnostic::SourceSpan;
use crate::document::Node;

/// Precomputed line-start offsets for O(log n) position lookups.
#[derive(Debug)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                starts.push(i + 1);
            }
        }
        Self { starts }
    }

    /// 1-based line number containing `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }

    /// Byte offset where the given 1-based line starts.
    pub fn line_start(&self, line: usize) -> usize {
        self.starts[line - 1]
    }
}

/// Resolve a node (optionally narrowed to a range inside its scalar value)
/// into a displayable source span. Returns `None` when the node carries no
/// source range.
pub fn span_for(
    node: &Node,
    file: &str,
    text: &str,
    index: &LineIndex,
    inner: Option<Range<usize>>,
) -> Option<SourceSpan> {
    let span = node.span.as_ref()?;
    let (start, end) = match inner {
        None => (span.start, span.end),
        Some(range) => {
            let scalar = node.as_scalar()?;
            let map = |offset: usize| {
                let restored = match scalar.block_indent {
                    Some(width) => offset + newlines_before(&scalar.value, offset) * width,
                    None => offset,
                };
                scalar.content_start + restored
            };
            (map(range.start), map(range.end))
        }
    };

    let line = index.line_of(start);
    let line_start = index.line_start(line);
    let line_text = text[line_start..]
        .split('\n')
        .next()
        .unwrap_or("")
        .to_string();

    Some(SourceSpan {
        file: file.to_string(),
        line,
        column: start - line_start,
        length: end.saturating_sub(start),
        line_text,
    })
}

/// Number of newlines in `value` strictly before byte offset `offset`.
fn newlines_before(value: &str, offset: usize) -> usize {
    value.as_bytes()[..offset.min(value.len())]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::document::parse;

    fn locale_value(root: &Node, message: usize, locale: usize) -> &Node {
        &root.as_mapping().unwrap()[message].1.as_mapping().unwrap()[locale].1
    }

    #[test]
    fn test_line_index_lookup() {
        let index = LineIndex::new("aaa\nbb\nc");
        assert_eq!(index.line_of(0), 1);
        assert_eq!(index.line_of(3), 1);
        assert_eq!(index.line_of(4), 2);
        assert_eq!(index.line_of(7), 3);
        assert_eq!(index.line_start(2), 4);
    }

    #[test]
    fn test_plain_node_span() {
        let text = "greeting:\n  en: Hello\n";
        let root = parse(text).unwrap();
        let index = LineIndex::new(text);
        let value = locale_value(&root, 0, 0);

        let span = span_for(value, "m.msg", text, &index, None).unwrap();
        assert_eq!(span.line, 2);
        assert_eq!(span.column, 6);
        assert_eq!(span.length, 5);
        assert_eq!(span.line_text, "  en: Hello");
    }

    #[test]
    fn test_inner_offset_in_plain_scalar() {
        let text = "greeting:\n  en: Hello {name}!\n";
        let root = parse(text).unwrap();
        let index = LineIndex::new(text);
        let value = locale_value(&root, 0, 0);

        // "{name}" starts at offset 6 of the value
        let span = span_for(value, "m.msg", text, &index, Some(6..12)).unwrap();
        assert_eq!(span.line, 2);
        assert_eq!(span.column, 12);
        assert_eq!(span.length, 6);
        assert_eq!(&text[text.find("{n").unwrap()..][..6], "{name}");
    }

    #[test]
    fn test_inner_offset_in_quoted_scalar() {
        let text = "greeting:\n  en: \"Hi {name}\"\n";
        let root = parse(text).unwrap();
        let index = LineIndex::new(text);
        let value = locale_value(&root, 0, 0);

        // "{name}" starts at offset 3 of the decoded value; the opening
        // quote shifts the source column by one.
        let span = span_for(value, "m.msg", text, &index, Some(3..9)).unwrap();
        assert_eq!(span.column, "  en: \"Hi ".len());
        assert_eq!(span.length, 6);
    }

    #[test]
    fn test_block_literal_single_line_offset() {
        let text = "legal:\n  en: |\n    Hello {name}\n";
        let root = parse(text).unwrap();
        let index = LineIndex::new(text);
        let value = locale_value(&root, 0, 0);

        // No newline crossed, so only content_start shifts the offset.
        let span = span_for(value, "m.msg", text, &index, Some(6..12)).unwrap();
        assert_eq!(span.line, 3);
        assert_eq!(span.column, 4 + 6);
        assert_eq!(span.line_text, "    Hello {name}");
    }

    #[test]
    fn test_block_literal_multi_line_offset() {
        let text = "legal:\n  en: |\n    first line\n    bye {who}\n";
        let root = parse(text).unwrap();
        let index = LineIndex::new(text);
        let value = locale_value(&root, 0, 0);

        // Value is "first line\nbye {who}"; "{who}" starts at offset 15,
        // one newline crossed, indent width 4: column = 4 + (15 - 11).
        let span = span_for(value, "m.msg", text, &index, Some(15..20)).unwrap();
        assert_eq!(span.line, 4);
        assert_eq!(span.column, 8);
        assert_eq!(span.length, 5);
        assert_eq!(span.line_text, "    bye {who}");
    }

    #[test]
    fn test_node_without_span_yields_none() {
        let node = Node {
            kind: crate::document::NodeKind::Mapping(Vec::new()),
            span: None,
        };
        let index = LineIndex::new("");
        assert!(span_for(&node, "m.msg", "", &index, None).is_none());
    }
}
