//! Walks the parsed document and checks every message/locale entry.
//!
//! Rules are applied in document order and each violation rejects only the
//! offending entry; validation of the rest of the document continues.

use unic_langid::LanguageIdentifier;

use crate::diagnostic::Diagnostic;
use crate::document::{Node, NodeKind};
use crate::location::{LineIndex, span_for};
use crate::template::{self, Message};

/// One message that survived validation, with its locale models in
/// document order (first-seen normalized tag wins its position).
#[derive(Debug, Clone)]
pub struct CompiledMessage {
    pub name: String,
    pub locales: Vec<(String, Message)>,
}

/// Validate a parsed document, producing the surviving messages and every
/// diagnostic found along the way.
pub fn validate(root: &Node, file: &str, source: &str) -> (Vec<CompiledMessage>, Vec<Diagnostic>) {
    let index = LineIndex::new(source);
    let mut messages: Vec<CompiledMessage> = Vec::new();
    let mut diagnostics = Vec::new();

    let Some(entries) = root.as_mapping() else {
        diagnostics.push(Diagnostic::new(
            "document root must be a map",
            span_for(root, file, source, &index, None),
        ));
        return (messages, diagnostics);
    };

    for (key, value) in entries {
        let Some(name) = key.as_scalar() else {
            diagnostics.push(Diagnostic::new(
                "message name must be a string",
                span_for(key, file, source, &index, None),
            ));
            continue;
        };
        let name = name.value.clone();

        if messages.iter().any(|m| m.name == name) {
            diagnostics.push(Diagnostic::new(
                format!("duplicate message `{}`", name),
                span_for(key, file, source, &index, None),
            ));
            continue;
        }

        let Some(locale_entries) = value.as_mapping() else {
            diagnostics.push(Diagnostic::new(
                format!("message `{}` must map locales to templates", name),
                span_for(value, file, source, &index, None)
                    .or_else(|| span_for(key, file, source, &index, None)),
            ));
            continue;
        };

        let mut locales: Vec<(String, Message)> = Vec::new();
        for (locale_key, template_node) in locale_entries {
            let Some(raw_tag) = locale_key.as_scalar() else {
                diagnostics.push(Diagnostic::new(
                    format!("locale tag in message `{}` must be a string", name),
                    span_for(locale_key, file, source, &index, None),
                ));
                continue;
            };
            let raw_tag = raw_tag.value.as_str();

            let template = match &template_node.kind {
                NodeKind::Scalar(scalar) => scalar,
                _ => {
                    diagnostics.push(Diagnostic::new(
                        format!(
                            "template for locale `{}` in message `{}` must be a string",
                            raw_tag, name
                        ),
                        span_for(template_node, file, source, &index, None)
                            .or_else(|| span_for(locale_key, file, source, &index, None)),
                    ));
                    continue;
                }
            };

            let tag = match raw_tag.parse::<LanguageIdentifier>() {
                Ok(lid) => lid.to_string(),
                Err(_) => {
                    diagnostics.push(Diagnostic::new(
                        format!("invalid locale tag `{}` for message `{}`", raw_tag, name),
                        span_for(locale_key, file, source, &index, None),
                    ));
                    continue;
                }
            };

            if locales.iter().any(|(seen, _)| *seen == tag) {
                diagnostics.push(Diagnostic::new(
                    format!("duplicate locale `{}` for message `{}`", tag, name),
                    span_for(locale_key, file, source, &index, None),
                ));
                continue;
            }

            let message = match template::parse(&template.value) {
                Ok(message) => message,
                Err(err) => {
                    diagnostics.push(Diagnostic::new(
                        format!("invalid template for `{}.{}`: {}", name, tag, err.text),
                        span_for(
                            template_node,
                            file,
                            source,
                            &index,
                            Some(err.offset..err.offset + 1),
                        ),
                    ));
                    continue;
                }
            };

            // Semantic errors are advisory; the model is kept either way.
            for err in template::validate(&message) {
                diagnostics.push(Diagnostic::new(
                    format!("in `{}.{}`: {}", name, tag, err.text),
                    span_for(template_node, file, source, &index, Some(err.start..err.end)),
                ));
            }

            locales.push((tag, message));
        }

        messages.push(CompiledMessage { name, locales });
    }

    (messages, diagnostics)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::document::parse;

    const FILE: &str = "messages.msg";

    fn run(source: &str) -> (Vec<CompiledMessage>, Vec<Diagnostic>) {
        let root = parse(source).unwrap();
        validate(&root, FILE, source)
    }

    #[test]
    fn test_valid_document() {
        let (messages, diagnostics) = run("greeting:\n  en: \"Hello, {name}!\"\n  fr: \"Bonjour, {name}!\"\n");
        assert_eq!(diagnostics, vec![]);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].name, "greeting");
        let tags: Vec<&str> = messages[0].locales.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(tags, vec!["en", "fr"]);
    }

    #[test]
    fn test_non_mapping_root_fails_whole_document() {
        let (messages, diagnostics) = run("- one\n- two\n");
        assert!(messages.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].text, "document root must be a map");
    }

    #[test]
    fn test_non_mapping_message_value_rejected() {
        let (messages, diagnostics) = run("greeting: just text\nfarewell:\n  en: Bye\n");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].text.contains("`greeting` must map locales"));
        // Processing continued past the bad entry.
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].name, "farewell");
    }

    #[test]
    fn test_tags_are_normalized() {
        let (messages, _) = run("greeting:\n  EN-us: Hello\n");
        assert_eq!(messages[0].locales[0].0, "en-US");
    }

    #[test]
    fn test_duplicate_locale_after_normalization() {
        let (messages, diagnostics) =
            run("greeting:\n  en: Hello\n  EN: Howdy\n");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].text.contains("duplicate locale `en` for message `greeting`"));
        // Only the first entry's model survives.
        assert_eq!(messages[0].locales.len(), 1);
        let span = diagnostics[0].location.as_ref().unwrap();
        assert_eq!(span.line, 3);
        assert_eq!(span.column, 2);
    }

    #[test]
    fn test_invalid_locale_tag_rejected() {
        let (messages, diagnostics) = run("greeting:\n  not a tag: Hello\n");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].text.contains("invalid locale tag"));
        assert!(messages[0].locales.is_empty());
    }

    #[test]
    fn test_template_syntax_error_skips_entry_only() {
        let (messages, diagnostics) = run("greeting:\n  en: \"Hello {\"\n  fr: Bonjour\n");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].text.contains("invalid template for `greeting.en`"));
        let tags: Vec<&str> = messages[0].locales.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(tags, vec!["fr"]);
    }

    #[test]
    fn test_semantic_error_is_advisory_and_located() {
        let (messages, diagnostics) = run("greeting:\n  en: See you {when, datetime}\n");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].text.contains("unknown format function"));
        // The model is kept despite the semantic error.
        assert_eq!(messages[0].locales.len(), 1);
        let span = diagnostics[0].location.as_ref().unwrap();
        assert_eq!(span.line, 2);
        assert_eq!(span.column, "  en: See you ".len());
        assert_eq!(span.length, "{when, datetime}".len());
    }

    #[test]
    fn test_semantic_error_in_block_literal_maps_through_indentation() {
        let source = "legal:\n  en: |\n    first line\n    see {when, datetime}\n";
        let (_, diagnostics) = run(source);
        assert_eq!(diagnostics.len(), 1);
        let span = diagnostics[0].location.as_ref().unwrap();
        assert_eq!(span.line, 4);
        assert_eq!(span.column, "    see ".len());
        assert_eq!(span.line_text, "    see {when, datetime}");
    }

    #[test]
    fn test_duplicate_message_name_rejected() {
        let (messages, diagnostics) = run("greeting:\n  en: Hi\ngreeting:\n  en: Hello\n");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].text.contains("duplicate message `greeting`"));
        assert_eq!(messages.len(), 1);
        assert_eq!(
            crate::template::format_to_string(
                &messages[0].locales[0].1,
                &crate::template::Args::new()
            ),
            "Hi"
        );
    }
}
