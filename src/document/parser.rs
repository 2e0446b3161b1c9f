//! Hand-rolled parser for the message-document format.
//!
//! The format is a small indentation-based subset: nested mappings, plain
//! scalars, double-quoted scalars, `|` block literals, and `-` sequence
//! items. The parser's job is not ergonomics but fidelity: every node it
//! produces carries the byte range it occupied in the source so the
//! location mapper can point diagnostics at the original text.

use std::ops::Range;

use anyhow::{Result, bail};

use super::{Node, NodeKind, Scalar};

/// One physical line of the source, with its byte range (newline excluded).
#[derive(Debug, Clone, Copy)]
struct Line {
    start: usize,
    end: usize,
    number: usize,
}

struct Parser<'a> {
    text: &'a str,
    lines: Vec<Line>,
    pos: usize,
}

/// Parse a message document into a node tree.
///
/// A document whose root is not a mapping still parses (to a sequence or
/// scalar root) so the validator can reject it with a proper diagnostic.
pub fn parse(text: &str) -> Result<Node> {
    let mut parser = Parser {
        text,
        lines: split_lines(text),
        pos: 0,
    };
    parser.parse_root()
}

fn split_lines(text: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut number = 1;
    for (i, b) in text.bytes().enumerate() {
        if b == b'\n' {
            lines.push(Line {
                start,
                end: i,
                number,
            });
            start = i + 1;
            number += 1;
        }
    }
    if start < text.len() {
        lines.push(Line {
            start,
            end: text.len(),
            number,
        });
    }
    lines
}

impl<'a> Parser<'a> {
    fn line_text(&self, line: Line) -> &'a str {
        &self.text[line.start..line.end]
    }

    /// Leading-space count of a line. Tabs are rejected outright; mixing
    /// them with spaces makes offset math meaningless.
    fn indent_of(&self, line: Line) -> Result<usize> {
        let text = self.line_text(line);
        if text.trim_start_matches(' ').starts_with('\t') || text.starts_with('\t') {
            bail!("tab character in indentation at line {}", line.number);
        }
        Ok(text.len() - text.trim_start_matches(' ').len())
    }

    fn is_significant(&self, line: Line) -> bool {
        let trimmed = self.line_text(line).trim_start();
        !trimmed.is_empty() && !trimmed.starts_with('#')
    }

    fn skip_insignificant(&mut self) {
        while self.pos < self.lines.len() && !self.is_significant(self.lines[self.pos]) {
            self.pos += 1;
        }
    }

    fn parse_root(&mut self) -> Result<Node> {
        self.skip_insignificant();
        if self.pos >= self.lines.len() {
            return Ok(Node {
                kind: NodeKind::Mapping(Vec::new()),
                span: None,
            });
        }

        let line = self.lines[self.pos];
        let indent = self.indent_of(line)?;
        let content = self.line_text(line)[indent..].trim_end();

        if content == "-" || content.starts_with("- ") {
            return self.parse_sequence(indent);
        }
        if find_key_colon(content).is_some() {
            return self.parse_mapping(indent);
        }

        // Bare scalar root; the validator reports it as a structural error.
        let start = line.start + indent;
        let node = Node::scalar(content, start..start + content.len(), start);
        self.pos += 1;
        Ok(node)
    }

    fn parse_mapping(&mut self, indent: usize) -> Result<Node> {
        let mut entries = Vec::new();
        let mut span: Option<Range<usize>> = None;

        loop {
            self.skip_insignificant();
            if self.pos >= self.lines.len() {
                break;
            }
            let line = self.lines[self.pos];
            let line_indent = self.indent_of(line)?;
            if line_indent < indent {
                break;
            }
            if line_indent > indent {
                bail!("unexpected indentation at line {}", line.number);
            }

            let (key, value) = self.parse_entry(line, indent)?;
            let start = span.as_ref().map(|s| s.start);
            let end = value
                .span
                .as_ref()
                .map(|s| s.end)
                .or_else(|| key.span.as_ref().map(|s| s.end));
            if let Some(end) = end {
                let start = start.unwrap_or_else(|| key.span.as_ref().map_or(end, |s| s.start));
                span = Some(start..end.max(span.as_ref().map_or(0, |s| s.end)));
            }
            entries.push((key, value));
        }

        Ok(Node {
            kind: NodeKind::Mapping(entries),
            span,
        })
    }

    /// Parse one `key: value` line (consuming any nested block it owns).
    fn parse_entry(&mut self, line: Line, indent: usize) -> Result<(Node, Node)> {
        let content_offset = line.start + indent;
        let content = self.line_text(line)[indent..].trim_end();

        let (key, colon) = if content.starts_with('"') {
            let (value, consumed) = parse_quoted(content, line.number)?;
            let after = content[consumed..].trim_start();
            if !after.starts_with(':') {
                bail!("expected ':' after quoted key at line {}", line.number);
            }
            let colon = consumed + (content[consumed..].len() - after.len());
            let key = Node {
                kind: NodeKind::Scalar(Scalar {
                    value,
                    content_start: content_offset + 1,
                    block_indent: None,
                }),
                span: Some(content_offset..content_offset + consumed),
            };
            (key, colon)
        } else {
            let Some(colon) = find_key_colon(content) else {
                bail!("expected ':' after key at line {}", line.number);
            };
            let raw = content[..colon].trim_end();
            let key = Node::scalar(
                raw,
                content_offset..content_offset + raw.len(),
                content_offset,
            );
            (key, colon)
        };

        let rest = content[colon + 1..].trim();
        let rest_offset = content_offset + colon + 1 + leading_spaces(&content[colon + 1..]);

        let value = if rest.is_empty() {
            self.pos += 1;
            self.parse_nested_value(line, indent)?
        } else if rest == "|" {
            self.pos += 1;
            self.parse_block_literal(line, indent)?
        } else if rest.starts_with('"') {
            let (value, consumed) = parse_quoted(rest, line.number)?;
            if !rest[consumed..].trim().is_empty() {
                bail!(
                    "unexpected trailing content after quoted scalar at line {}",
                    line.number
                );
            }
            self.pos += 1;
            Node {
                kind: NodeKind::Scalar(Scalar {
                    value,
                    content_start: rest_offset + 1,
                    block_indent: None,
                }),
                span: Some(rest_offset..rest_offset + consumed),
            }
        } else {
            self.pos += 1;
            Node::scalar(rest, rest_offset..rest_offset + rest.len(), rest_offset)
        };

        Ok((key, value))
    }

    /// Value on the lines following a bare `key:` header.
    fn parse_nested_value(&mut self, header: Line, indent: usize) -> Result<Node> {
        self.skip_insignificant();
        if self.pos < self.lines.len() {
            let next = self.lines[self.pos];
            let next_indent = self.indent_of(next)?;
            if next_indent > indent {
                let content = self.line_text(next)[next_indent..].trim_end();
                if content == "-" || content.starts_with("- ") {
                    return self.parse_sequence(next_indent);
                }
                return self.parse_mapping(next_indent);
            }
        }
        // `key:` with nothing nested is an empty scalar at end of line.
        Ok(Node::scalar("", header.end..header.end, header.end))
    }

    fn parse_sequence(&mut self, indent: usize) -> Result<Node> {
        let mut items = Vec::new();
        let mut span: Option<Range<usize>> = None;

        loop {
            self.skip_insignificant();
            if self.pos >= self.lines.len() {
                break;
            }
            let line = self.lines[self.pos];
            let line_indent = self.indent_of(line)?;
            if line_indent != indent {
                break;
            }
            let content = self.line_text(line)[line_indent..].trim_end();
            if content != "-" && !content.starts_with("- ") {
                break;
            }
            let item = content[1..].trim_start();
            let item_offset =
                line.start + line_indent + 1 + leading_spaces(&content[1..]);
            items.push(Node::scalar(
                item,
                item_offset..item_offset + item.len(),
                item_offset,
            ));
            let start = span.map_or(line.start + line_indent, |s| s.start);
            span = Some(start..item_offset + item.len());
            self.pos += 1;
        }

        Ok(Node {
            kind: NodeKind::Sequence(items),
            span,
        })
    }

    /// Consume a `|` block literal: all following lines indented past the
    /// key line, de-indented by the first content line's indentation.
    fn parse_block_literal(&mut self, header: Line, key_indent: usize) -> Result<Node> {
        let mut content_lines: Vec<(Line, bool)> = Vec::new();
        while self.pos < self.lines.len() {
            let line = self.lines[self.pos];
            let text = self.line_text(line);
            if text.trim().is_empty() {
                content_lines.push((line, false));
                self.pos += 1;
                continue;
            }
            let indent = self.indent_of(line)?;
            if indent <= key_indent {
                break;
            }
            content_lines.push((line, true));
            self.pos += 1;
        }
        // Trailing blank lines belong to whatever follows the block.
        while matches!(content_lines.last(), Some((_, false))) {
            content_lines.pop();
        }

        let Some(&(first, _)) = content_lines.iter().find(|(_, sig)| *sig) else {
            // An empty block literal; anchor it at the end of the header line.
            return Ok(Node {
                kind: NodeKind::Scalar(Scalar {
                    value: String::new(),
                    content_start: header.end,
                    block_indent: Some(0),
                }),
                span: Some(header.end..header.end),
            });
        };
        let width = self.indent_of(first)?;

        let mut value = String::new();
        for (i, &(line, significant)) in content_lines.iter().enumerate() {
            if i > 0 {
                value.push('\n');
            }
            if !significant {
                continue;
            }
            let indent = self.indent_of(line)?;
            if indent < width {
                bail!(
                    "block literal line {} is indented less than the block ({} < {})",
                    line.number,
                    indent,
                    width
                );
            }
            value.push_str(&self.text[line.start + width..line.end]);
        }

        let content_start = first.start + width;
        let last = content_lines
            .iter()
            .rev()
            .find(|(_, sig)| *sig)
            .map(|&(line, _)| line)
            .unwrap_or(first);
        Ok(Node {
            kind: NodeKind::Scalar(Scalar {
                value,
                content_start,
                block_indent: Some(width),
            }),
            span: Some(content_start..last.end),
        })
    }
}

/// Find the `:` that terminates a plain key: the first colon followed by
/// whitespace or end of line. Colons inside the value are untouched.
fn find_key_colon(content: &str) -> Option<usize> {
    let bytes = content.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b':' && (i + 1 == bytes.len() || bytes[i + 1] == b' ') {
            return Some(i);
        }
    }
    None
}

fn leading_spaces(text: &str) -> usize {
    text.len() - text.trim_start_matches(' ').len()
}

/// Parse a double-quoted scalar at the start of `content`. Returns the
/// decoded value and the number of source bytes consumed (quotes included).
fn parse_quoted(content: &str, line_number: usize) -> Result<(String, usize)> {
    debug_assert!(content.starts_with('"'));
    let mut value = String::new();
    let mut chars = content.char_indices().skip(1);
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok((value, i + 1)),
            '\\' => match chars.next() {
                Some((_, '"')) => value.push('"'),
                Some((_, '\\')) => value.push('\\'),
                Some((_, 'n')) => value.push('\n'),
                Some((_, 't')) => value.push('\t'),
                Some((_, other)) => {
                    value.push('\\');
                    value.push(other);
                }
                None => bail!("unclosed quoted scalar at line {}", line_number),
            },
            _ => value.push(c),
        }
    }
    bail!("unclosed quoted scalar at line {}", line_number)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn mapping_entries(node: &Node) -> &[(Node, Node)] {
        node.as_mapping().expect("expected mapping root")
    }

    #[test]
    fn test_parse_flat_document() {
        let text = "greeting:\n  en: Hello\n  fr: Bonjour\n";
        let root = parse(text).unwrap();
        let entries = mapping_entries(&root);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0.as_scalar().unwrap().value, "greeting");

        let locales = mapping_entries(&entries[0].1);
        assert_eq!(locales.len(), 2);
        assert_eq!(locales[0].0.as_scalar().unwrap().value, "en");
        assert_eq!(locales[0].1.as_scalar().unwrap().value, "Hello");
        assert_eq!(locales[1].1.as_scalar().unwrap().value, "Bonjour");
    }

    #[test]
    fn test_plain_scalar_span_points_at_value() {
        let text = "greeting:\n  en: Hello\n";
        let root = parse(text).unwrap();
        let locales = mapping_entries(&mapping_entries(&root)[0].1);
        let value = locales[0].1.as_scalar().unwrap();
        let span = locales[0].1.span.clone().unwrap();
        assert_eq!(&text[span], "Hello");
        assert_eq!(value.content_start, text.find("Hello").unwrap());
    }

    #[test]
    fn test_quoted_scalar_decodes_and_tracks_content_start() {
        let text = "greeting:\n  en: \"Say \\\"hi\\\"\"\n";
        let root = parse(text).unwrap();
        let locales = mapping_entries(&mapping_entries(&root)[0].1);
        let value = locales[0].1.as_scalar().unwrap();
        assert_eq!(value.value, "Say \"hi\"");
        // content_start is just past the opening quote
        assert_eq!(value.content_start, text.find('"').unwrap() + 1);
    }

    #[test]
    fn test_block_literal_strips_indentation() {
        let text = "legal:\n  en: |\n    Line one\n    Line two\n";
        let root = parse(text).unwrap();
        let locales = mapping_entries(&mapping_entries(&root)[0].1);
        let value = locales[0].1.as_scalar().unwrap();
        assert_eq!(value.value, "Line one\nLine two");
        assert_eq!(value.block_indent, Some(4));
        assert_eq!(value.content_start, text.find("Line one").unwrap());
    }

    #[test]
    fn test_block_literal_keeps_interior_blank_lines() {
        let text = "legal:\n  en: |\n    a\n\n    b\n";
        let root = parse(text).unwrap();
        let locales = mapping_entries(&mapping_entries(&root)[0].1);
        assert_eq!(locales[0].1.as_scalar().unwrap().value, "a\n\nb");
    }

    #[test]
    fn test_block_literal_followed_by_sibling_key() {
        let text = "legal:\n  en: |\n    body\n  fr: corps\n";
        let root = parse(text).unwrap();
        let locales = mapping_entries(&mapping_entries(&root)[0].1);
        assert_eq!(locales.len(), 2);
        assert_eq!(locales[0].1.as_scalar().unwrap().value, "body");
        assert_eq!(locales[1].1.as_scalar().unwrap().value, "corps");
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let text = "# header\n\ngreeting:\n  # note\n  en: Hi\n";
        let root = parse(text).unwrap();
        let locales = mapping_entries(&mapping_entries(&root)[0].1);
        assert_eq!(locales.len(), 1);
        assert_eq!(locales[0].1.as_scalar().unwrap().value, "Hi");
    }

    #[test]
    fn test_sequence_root_parses_as_sequence() {
        let text = "- one\n- two\n";
        let root = parse(text).unwrap();
        match &root.kind {
            NodeKind::Sequence(items) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[0].as_scalar().unwrap().value, "one");
            }
            other => panic!("expected sequence, got {:?}", other),
        }
    }

    #[test]
    fn test_scalar_root_parses_as_scalar() {
        let root = parse("just text\n").unwrap();
        assert_eq!(root.as_scalar().unwrap().value, "just text");
    }

    #[test]
    fn test_sequence_value_under_key() {
        let text = "greeting:\n  - a\n  - b\n";
        let root = parse(text).unwrap();
        let entries = mapping_entries(&root);
        assert!(matches!(entries[0].1.kind, NodeKind::Sequence(_)));
    }

    #[test]
    fn test_value_with_colon_keeps_whole_text() {
        let text = "greeting:\n  en: Hello: world\n";
        let root = parse(text).unwrap();
        let locales = mapping_entries(&mapping_entries(&root)[0].1);
        assert_eq!(locales[0].0.as_scalar().unwrap().value, "en");
        assert_eq!(locales[0].1.as_scalar().unwrap().value, "Hello: world");
    }

    #[test]
    fn test_tab_indentation_rejected() {
        let err = parse("greeting:\n\ten: Hi\n").unwrap_err();
        assert!(err.to_string().contains("tab character"));
    }

    #[test]
    fn test_unclosed_quote_rejected() {
        let err = parse("greeting:\n  en: \"Hello\n").unwrap_err();
        assert!(err.to_string().contains("unclosed quoted scalar"));
    }

    #[test]
    fn test_missing_colon_rejected() {
        let err = parse("greeting:\n  just words\n").unwrap_err();
        assert!(err.to_string().contains("expected ':'"));
    }

    #[test]
    fn test_empty_document_is_empty_mapping() {
        let root = parse("\n# only a comment\n").unwrap();
        assert_eq!(root.as_mapping().unwrap().len(), 0);
    }
}
