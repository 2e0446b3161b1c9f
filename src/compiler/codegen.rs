//! Emits the generated Rust module for a compiled document.
//!
//! Each surviving message becomes a lazily constructed `MessageFactory`
//! static, with its locale models embedded as serialized JSON. Factory
//! construction failures (a message without `en`) surface at first use of
//! the generated module, not as compile diagnostics.

use std::fmt::Write;

use super::CompiledMessage;

/// Serialize the surviving messages into generated module source.
pub fn emit(messages: &[CompiledMessage]) -> String {
    let mut out = String::new();
    out.push_str("// @generated by glossa. Do not edit.\n\n");
    out.push_str("use std::sync::LazyLock;\n\nuse glossa::runtime::MessageFactory;\n\n");

    let mut bindings: Vec<(String, String)> = Vec::new();
    for message in messages {
        // A message with zero surviving locales is simply absent.
        if message.locales.is_empty() {
            continue;
        }
        let ident = binding_ident(&message.name, &bindings);

        let _ = write!(
            out,
            "static {}: LazyLock<MessageFactory> = LazyLock::new(|| {{\n    MessageFactory::from_serialized(&[\n",
            ident
        );
        for (tag, model) in &message.locales {
            let json = serde_json::to_string(model)
                .expect("message models always serialize");
            let _ = writeln!(
                out,
                "        ({}, {}),",
                rust_string(tag),
                rust_string(&json)
            );
        }
        let _ = write!(
            out,
            "    ])\n    .expect(\"invalid compiled message `{}`\")\n}});\n\n",
            message.name
        );
        bindings.push((message.name.clone(), ident));
    }

    out.push_str("pub fn messages() -> Vec<(&'static str, &'static MessageFactory)> {\n    vec![\n");
    for (name, ident) in &bindings {
        let _ = writeln!(out, "        ({}, &*{}),", rust_string(name), ident);
    }
    out.push_str("    ]\n}\n");
    out
}

/// Mangle a message name into a unique static identifier.
fn binding_ident(name: &str, taken: &[(String, String)]) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    if ident.chars().next().is_none_or(|c| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    let mut candidate = ident.clone();
    let mut counter = 2;
    while taken.iter().any(|(_, taken)| *taken == candidate) {
        candidate = format!("{}_{}", ident, counter);
        counter += 1;
    }
    candidate
}

/// Escape arbitrary text as a Rust string literal.
fn rust_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{{{:x}}}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::template;

    fn message(name: &str, locales: &[(&str, &str)]) -> CompiledMessage {
        CompiledMessage {
            name: name.to_string(),
            locales: locales
                .iter()
                .map(|(tag, text)| (tag.to_string(), template::parse(text).unwrap()))
                .collect(),
        }
    }

    #[test]
    fn test_emit_empty_document() {
        let source = emit(&[]);
        assert!(source.starts_with("// @generated by glossa."));
        assert!(source.contains("pub fn messages()"));
        assert!(!source.contains("LazyLock::new"));
    }

    #[test]
    fn test_emit_binding_per_message_in_document_order() {
        let source = emit(&[
            message("greeting", &[("en", "Hello"), ("fr", "Bonjour")]),
            message("farewell", &[("en", "Bye")]),
        ]);
        let greeting = source.find("static GREETING:").unwrap();
        let farewell = source.find("static FAREWELL:").unwrap();
        assert!(greeting < farewell);
        assert!(source.contains("(\"greeting\", &*GREETING),"));
        assert!(source.contains("(\"farewell\", &*FAREWELL),"));
    }

    #[test]
    fn test_emit_serializes_models_as_json() {
        let source = emit(&[message("greeting", &[("en", "Hello, {name}!")])]);
        assert!(source.contains("MessageFactory::from_serialized(&["));
        assert!(source.contains("(\"en\", \"{"));
        assert!(source.contains("argument"));
    }

    #[test]
    fn test_message_with_no_surviving_locales_is_absent() {
        let source = emit(&[
            message("broken", &[]),
            message("greeting", &[("en", "Hi")]),
        ]);
        assert!(!source.contains("BROKEN"));
        assert!(!source.contains("\"broken\""));
        assert!(source.contains("GREETING"));
    }

    #[test]
    fn test_binding_ident_mangling() {
        assert_eq!(binding_ident("greeting.title", &[]), "GREETING_TITLE");
        assert_eq!(binding_ident("2fa", &[]), "_2FA");
        let taken = vec![("a.b".to_string(), "A_B".to_string())];
        assert_eq!(binding_ident("a-b", &taken), "A_B_2");
    }

    #[test]
    fn test_rust_string_escapes() {
        assert_eq!(rust_string("a\"b\\c\nd"), "\"a\\\"b\\\\c\\nd\"");
    }

    #[test]
    fn test_generated_model_round_trips() {
        let model = template::parse("Hi <b>{name}</b>").unwrap();
        let json = serde_json::to_string(&model).unwrap();
        let back: template::Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, model);
    }
}
