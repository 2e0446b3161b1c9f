//! The message data model.
//!
//! Every placeholder element records the template-relative byte range it
//! was parsed from so semantic errors can be mapped back into the source
//! document. The whole model is serde-serializable; the code generator
//! embeds it as JSON in generated modules.

use std::collections::BTreeMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Literal markup options, e.g. `<link to=home>` carries `{to: "home"}`.
pub type Options = BTreeMap<String, String>;

/// A parsed and validated message template for one locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Literal {
        value: String,
    },
    /// `{name}`, plain argument substitution.
    Argument {
        name: String,
        span: Range<usize>,
    },
    /// `{name, number}` or `{name, number, style}`.
    Number {
        name: String,
        style: NumberStyle,
        span: Range<usize>,
    },
    /// `{name, fn}` for any other function; formats as a plain argument
    /// and is flagged by the semantic validator.
    Function {
        name: String,
        function: String,
        span: Range<usize>,
    },
    /// `{name, plural, one {...} other {...}}`.
    Plural {
        name: String,
        branches: Vec<Branch>,
        span: Range<usize>,
    },
    /// `#` inside a plural branch: the selected number, formatted.
    PoundSign {
        span: Range<usize>,
    },
    /// `<name attr=value>`.
    MarkupOpen {
        name: String,
        options: Options,
        span: Range<usize>,
    },
    /// `<name/>`.
    MarkupStandalone {
        name: String,
        options: Options,
        span: Range<usize>,
    },
    /// `</name>`.
    MarkupClose {
        name: String,
        span: Range<usize>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub selector: Selector,
    pub elements: Vec<Element>,
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Selector {
    /// `=3 {...}`, matches the exact value.
    Exact(i64),
    /// `one {...}`, `other {...}`, or any other CLDR category word.
    Category(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberStyle {
    Decimal,
    Integer,
    Percent,
    /// Parsed but unsupported; flagged by the semantic validator and
    /// formatted as `Decimal`.
    Other(String),
}
