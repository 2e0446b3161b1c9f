//! Parsed message-document tree with source ranges.
//!
//! The compiler works against this generic tree rather than raw text: every
//! node remembers the byte range it came from so diagnostics can point at
//! the exact spot in the original document, including inside de-indented
//! block literals.

mod parser;

pub use parser::parse;

use std::ops::Range;

/// A scalar value together with the bookkeeping needed to map offsets
/// inside the *stored* value string back to the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scalar {
    /// The decoded value (quotes removed, block indentation stripped).
    pub value: String,
    /// Byte offset where the value text itself begins in the source
    /// (past an opening quote, or at the first block content character).
    pub content_start: usize,
    /// For block literals: the indentation width stripped from every
    /// content line. `None` for plain and quoted scalars.
    pub block_indent: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Ordered key/value pairs, document order preserved.
    Mapping(Vec<(Node, Node)>),
    Sequence(Vec<Node>),
    Scalar(Scalar),
}

/// One node of the parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    /// Byte range of the node in the source text, when recoverable.
    pub span: Option<Range<usize>>,
}

impl Node {
    pub fn scalar(value: impl Into<String>, span: Range<usize>, content_start: usize) -> Self {
        Self {
            kind: NodeKind::Scalar(Scalar {
                value: value.into(),
                content_start,
                block_indent: None,
            }),
            span: Some(span),
        }
    }

    pub fn as_mapping(&self) -> Option<&[(Node, Node)]> {
        match &self.kind {
            NodeKind::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match &self.kind {
            NodeKind::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }
}
