//! Reconstructs a nested render tree from a flat parts sequence.
//!
//! The formatter emits markup as open/standalone/close events in source
//! order; consumers that want rich output walk that stream with a stack:
//! an open suspends the current buffer, a close finishes the nested
//! buffer and hands it to the markup function of the frame being popped.
//!
//! Markup names absent from the table are unwrapped rather than rejected:
//! the open and close events vanish and the children flow into whatever
//! buffer is currently active. A close event only decides *whether* to
//! pop; the popped frame's own function and options render the collected
//! children, even if the names disagree. Mismatched open/close names are
//! not detected.

use std::collections::HashMap;

use crate::template::{Options, Part};

/// One node of the reconstructed tree.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderNode<T> {
    Text(String),
    Element(T),
}

/// Renders one markup span. Called with `None` children for standalone
/// markup, `Some` with the collected subtree for paired tags.
pub type MarkupFn<'a, T> = Box<dyn Fn(Option<Vec<RenderNode<T>>>, &Options) -> T + 'a>;

struct Frame<'a, 'f, T> {
    func: &'a MarkupFn<'f, T>,
    options: Options,
    parent: Vec<RenderNode<T>>,
}

/// Fold a flat parts sequence into a render tree.
///
/// Panics on a close event that would pop an empty stack while its name is
/// in the table: that means the formatter emitted malformed output, which
/// is a programmer error rather than bad user input.
pub fn render<T>(parts: &[Part], markup: &HashMap<String, MarkupFn<'_, T>>) -> Vec<RenderNode<T>> {
    let mut current: Vec<RenderNode<T>> = Vec::new();
    let mut stack: Vec<Frame<'_, '_, T>> = Vec::new();

    for part in parts {
        match part {
            Part::Literal { value } => push_text(&mut current, value),
            Part::Number { segments } => {
                for segment in segments {
                    push_text(&mut current, &segment.value);
                }
            }
            Part::MarkupOpen { name, options } => {
                let Some(func) = markup.get(name) else {
                    continue;
                };
                stack.push(Frame {
                    func,
                    options: options.clone(),
                    parent: std::mem::take(&mut current),
                });
            }
            Part::MarkupStandalone { name, options } => {
                let Some(func) = markup.get(name) else {
                    continue;
                };
                current.push(RenderNode::Element(func(None, options)));
            }
            Part::MarkupClose { name } => {
                if !markup.contains_key(name) {
                    continue;
                }
                let frame = stack
                    .pop()
                    .expect("markup close without a matching open");
                let children = std::mem::replace(&mut current, frame.parent);
                let element = (frame.func)(Some(children), &frame.options);
                current.push(RenderNode::Element(element));
            }
        }
    }

    current
}

fn push_text<T>(buffer: &mut Vec<RenderNode<T>>, text: &str) {
    if let Some(RenderNode::Text(existing)) = buffer.last_mut() {
        existing.push_str(text);
    } else {
        buffer.push(RenderNode::Text(text.to_string()));
    }
}
