//! Formats a message model against named arguments.
//!
//! Output is a flat parts sequence in source order; `format_to_string`
//! concatenates the textual content (markup tags contribute nothing, their
//! body text does; the same content the parts renderer keeps when a
//! markup name is unknown).

use serde::Serialize;
use serde_json::Value;

use super::ast::{Element, Message, NumberStyle, Options, Selector};

/// Named arguments for one format call.
pub type Args = serde_json::Map<String, Value>;

/// One event of a formatted message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    Literal {
        value: String,
    },
    Number {
        segments: Vec<NumberSegment>,
    },
    MarkupOpen {
        name: String,
        options: Options,
    },
    MarkupStandalone {
        name: String,
        options: Options,
    },
    MarkupClose {
        name: String,
    },
}

/// One run of a formatted number, ordered as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberSegment {
    pub kind: NumberSegmentKind,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberSegmentKind {
    MinusSign,
    Integer,
    Group,
    Decimal,
    Fraction,
    PercentSign,
}

/// Format a message into its flat parts sequence.
pub fn format(message: &Message, args: &Args) -> Vec<Part> {
    let mut parts = Vec::new();
    walk(&message.elements, args, None, &mut parts);
    parts
}

/// Format a message into a plain string: literal and number content
/// concatenated, markup dropped.
pub fn format_to_string(message: &Message, args: &Args) -> String {
    let mut out = String::new();
    for part in format(message, args) {
        match part {
            Part::Literal { value } => out.push_str(&value),
            Part::Number { segments } => {
                for segment in segments {
                    out.push_str(&segment.value);
                }
            }
            Part::MarkupOpen { .. } | Part::MarkupStandalone { .. } | Part::MarkupClose { .. } => {}
        }
    }
    out
}

fn walk(elements: &[Element], args: &Args, plural_value: Option<f64>, parts: &mut Vec<Part>) {
    for element in elements {
        match element {
            Element::Literal { value } => push_literal(parts, value),
            Element::Argument { name, .. } | Element::Function { name, .. } => {
                match args.get(name) {
                    Some(value) => push_literal(parts, &display_value(value)),
                    // Missing arguments render as the placeholder itself,
                    // matching lenient ICU formatters.
                    None => push_literal(parts, &format!("{{{}}}", name)),
                }
            }
            Element::Number { name, style, .. } => match numeric_arg(args, name) {
                Some(n) => parts.push(Part::Number {
                    segments: number_segments(n, style),
                }),
                None => push_literal(parts, &format!("{{{}}}", name)),
            },
            Element::Plural { name, branches, .. } => {
                let value = numeric_arg(args, name);
                let branch = select_branch(branches, value);
                if let Some(branch) = branch {
                    walk(&branch.elements, args, value, parts);
                }
            }
            Element::PoundSign { .. } => match plural_value {
                Some(n) => parts.push(Part::Number {
                    segments: number_segments(n, &NumberStyle::Decimal),
                }),
                None => push_literal(parts, "#"),
            },
            Element::MarkupOpen { name, options, .. } => parts.push(Part::MarkupOpen {
                name: name.clone(),
                options: options.clone(),
            }),
            Element::MarkupStandalone { name, options, .. } => {
                parts.push(Part::MarkupStandalone {
                    name: name.clone(),
                    options: options.clone(),
                })
            }
            Element::MarkupClose { name, .. } => parts.push(Part::MarkupClose {
                name: name.clone(),
            }),
        }
    }
}

fn select_branch<'a>(
    branches: &'a [super::ast::Branch],
    value: Option<f64>,
) -> Option<&'a super::ast::Branch> {
    if let Some(n) = value {
        let exact = branches.iter().find(|b| match b.selector {
            Selector::Exact(e) => n == e as f64,
            Selector::Category(_) => false,
        });
        if exact.is_some() {
            return exact;
        }
        let category = plural_category(n);
        let by_category = branches
            .iter()
            .find(|b| b.selector == Selector::Category(category.to_string()));
        if by_category.is_some() {
            return by_category;
        }
    }
    branches
        .iter()
        .find(|b| b.selector == Selector::Category("other".to_string()))
}

/// Cardinal plural category. Only `one`/`other` are distinguished; locale
/// specific rule data is out of scope for this engine.
fn plural_category(n: f64) -> &'static str {
    if n == 1.0 { "one" } else { "other" }
}

fn push_literal(parts: &mut Vec<Part>, text: &str) {
    if let Some(Part::Literal { value }) = parts.last_mut() {
        value.push_str(text);
    } else {
        parts.push(Part::Literal {
            value: text.to_string(),
        });
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn numeric_arg(args: &Args, name: &str) -> Option<f64> {
    match args.get(name)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Break a number into display segments: sign, grouped integer digits,
/// decimal point, fraction, percent sign.
fn number_segments(n: f64, style: &NumberStyle) -> Vec<NumberSegment> {
    let percent = matches!(style, NumberStyle::Percent);
    let mut value = if percent { n * 100.0 } else { n };
    let integer_only = matches!(style, NumberStyle::Integer);
    if integer_only {
        value = value.round();
    }

    let mut segments = Vec::new();
    if value.is_sign_negative() && value != 0.0 {
        segments.push(NumberSegment {
            kind: NumberSegmentKind::MinusSign,
            value: "-".to_string(),
        });
    }

    let rendered = format_abs(value.abs());
    let (int_digits, fraction) = match rendered.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (rendered, None),
    };

    for (i, group) in group_digits(&int_digits).into_iter().enumerate() {
        if i > 0 {
            segments.push(NumberSegment {
                kind: NumberSegmentKind::Group,
                value: ",".to_string(),
            });
        }
        segments.push(NumberSegment {
            kind: NumberSegmentKind::Integer,
            value: group,
        });
    }

    if let Some(fraction) = fraction
        && !integer_only
    {
        segments.push(NumberSegment {
            kind: NumberSegmentKind::Decimal,
            value: ".".to_string(),
        });
        segments.push(NumberSegment {
            kind: NumberSegmentKind::Fraction,
            value: fraction,
        });
    }

    if percent {
        segments.push(NumberSegment {
            kind: NumberSegmentKind::PercentSign,
            value: "%".to_string(),
        });
    }
    segments
}

fn format_abs(value: f64) -> String {
    if value.fract() == 0.0 && value < 1e15 {
        format!("{}", value as u64)
    } else {
        format!("{}", value)
    }
}

/// Split integer digits into thousands groups, most significant first.
fn group_digits(digits: &str) -> Vec<String> {
    let bytes = digits.as_bytes();
    if bytes.len() <= 3 {
        return vec![digits.to_string()];
    }
    let mut groups = Vec::new();
    let head = bytes.len() % 3;
    if head > 0 {
        groups.push(digits[..head].to_string());
    }
    let mut i = head;
    while i < bytes.len() {
        groups.push(digits[i..i + 3].to_string());
        i += 3;
    }
    groups
}
