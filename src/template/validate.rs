//! Semantic checks over a parsed message.
//!
//! Semantic errors are advisory: the compiler reports them with a source
//! location but keeps the model, since the template still formats.

use super::ast::{Element, Message, NumberStyle, Selector};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticError {
    pub text: String,
    /// Template-relative byte range of the offending element.
    pub start: usize,
    pub end: usize,
}

pub fn validate(message: &Message) -> Vec<SemanticError> {
    let mut errors = Vec::new();
    walk(&message.elements, &mut errors);
    errors
}

fn walk(elements: &[Element], errors: &mut Vec<SemanticError>) {
    for element in elements {
        match element {
            Element::Function { function, span, .. } => {
                errors.push(SemanticError {
                    text: format!("unknown format function `{}`", function),
                    start: span.start,
                    end: span.end,
                });
            }
            Element::Number {
                style: NumberStyle::Other(style),
                span,
                ..
            } => {
                errors.push(SemanticError {
                    text: format!("unsupported number style `{}`", style),
                    start: span.start,
                    end: span.end,
                });
            }
            Element::Plural {
                name,
                branches,
                span,
            } => {
                let mut seen = Vec::new();
                for branch in branches {
                    if seen.contains(&branch.selector) {
                        errors.push(SemanticError {
                            text: format!(
                                "duplicate plural selector in `{}`",
                                name
                            ),
                            start: branch.span.start,
                            end: branch.span.end,
                        });
                    } else {
                        seen.push(branch.selector.clone());
                    }
                    walk(&branch.elements, errors);
                }
                let has_other = branches
                    .iter()
                    .any(|b| b.selector == Selector::Category("other".to_string()));
                if !has_other {
                    errors.push(SemanticError {
                        text: format!("plural for `{}` has no `other` branch", name),
                        start: span.start,
                        end: span.end,
                    });
                }
            }
            _ => {}
        }
    }
}
