//! ICU-style message template engine.
//!
//! The compiler and runtime only ever touch templates through this module:
//! `parse` turns template text into a serializable [`Message`] model,
//! `validate` reports advisory semantic errors with template-relative
//! offsets, and `format`/`format_to_string` render a model against named
//! arguments into a flat parts sequence or a plain string.

mod ast;
mod format;
mod parser;
mod validate;

pub use ast::{Branch, Element, Message, NumberStyle, Options, Selector};
pub use format::{Args, NumberSegment, NumberSegmentKind, Part, format, format_to_string};
pub use parser::{SyntaxError, parse};
pub use validate::{SemanticError, validate};
