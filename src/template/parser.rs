//! Recursive-descent parser for ICU-style template text.
//!
//! Supported syntax: `{name}` arguments, `{name, number[, style]}`,
//! `{name, plural, =1 {...} one {...} other {...}}` with `#`, markup tags
//! `<b>...</b>`, `<icon/>`, `<link to=home>`, and ICU apostrophe quoting
//! (`''` and `'{'...'`).

use std::fmt;

use super::ast::{Branch, Element, Message, NumberStyle, Options, Selector};

/// A hard parse failure. The offending locale entry is skipped entirely;
/// there is no partial model to keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub text: String,
    /// Template-relative byte offset of the failure.
    pub offset: usize,
}

impl SyntaxError {
    fn new(text: impl Into<String>, offset: usize) -> Self {
        Self {
            text: text.into(),
            offset,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at offset {})", self.text, self.offset)
    }
}

impl std::error::Error for SyntaxError {}

pub fn parse(text: &str) -> Result<Message, SyntaxError> {
    let mut parser = Parser { text, pos: 0 };
    let elements = parser.parse_sequence(false, false)?;
    Ok(Message { elements })
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn ident(&mut self) -> &'a str {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.bump();
        }
        &self.text[start..self.pos]
    }

    /// Parse elements until end of input, or until a terminating `}` when
    /// `stop_at_brace` is set (the brace is consumed).
    fn parse_sequence(
        &mut self,
        in_plural: bool,
        stop_at_brace: bool,
    ) -> Result<Vec<Element>, SyntaxError> {
        let mut elements = Vec::new();
        loop {
            let Some(c) = self.peek() else {
                if stop_at_brace {
                    return Err(SyntaxError::new("unclosed brace", self.pos));
                }
                return Ok(elements);
            };
            match c {
                '}' => {
                    if stop_at_brace {
                        self.bump();
                        return Ok(elements);
                    }
                    return Err(SyntaxError::new("unexpected '}'", self.pos));
                }
                '{' => elements.push(self.parse_placeholder()?),
                '<' => self.parse_markup_or_literal(&mut elements)?,
                '\'' => self.parse_quoted(&mut elements),
                '#' if in_plural => {
                    let start = self.pos;
                    self.bump();
                    elements.push(Element::PoundSign {
                        span: start..self.pos,
                    });
                }
                _ => {
                    self.bump();
                    push_literal(&mut elements, c);
                }
            }
        }
    }

    /// ICU apostrophe handling: `''` is a literal apostrophe; an apostrophe
    /// followed by a syntax character quotes everything up to the next
    /// apostrophe (or end of input).
    fn parse_quoted(&mut self, elements: &mut Vec<Element>) {
        self.bump();
        match self.peek() {
            Some('\'') => {
                self.bump();
                push_literal(elements, '\'');
            }
            Some(c) if matches!(c, '{' | '}' | '<' | '#') => {
                while let Some(c) = self.bump() {
                    if c == '\'' {
                        break;
                    }
                    push_literal(elements, c);
                }
            }
            _ => push_literal(elements, '\''),
        }
    }

    fn parse_placeholder(&mut self) -> Result<Element, SyntaxError> {
        let start = self.pos;
        self.bump(); // '{'
        self.skip_whitespace();
        let name = self.ident().to_string();
        if name.is_empty() {
            return Err(SyntaxError::new("expected argument name", self.pos));
        }
        self.skip_whitespace();

        if self.eat('}') {
            return Ok(Element::Argument {
                name,
                span: start..self.pos,
            });
        }
        if !self.eat(',') {
            return Err(SyntaxError::new(
                "expected ',' or '}' in argument",
                self.pos,
            ));
        }
        self.skip_whitespace();
        let function = self.ident().to_string();
        if function.is_empty() {
            return Err(SyntaxError::new("expected format function name", self.pos));
        }
        self.skip_whitespace();

        match function.as_str() {
            "number" => {
                let style = if self.eat(',') {
                    self.skip_whitespace();
                    let word = self.ident();
                    match word {
                        "integer" => NumberStyle::Integer,
                        "percent" => NumberStyle::Percent,
                        other => NumberStyle::Other(other.to_string()),
                    }
                } else {
                    NumberStyle::Decimal
                };
                self.skip_whitespace();
                if !self.eat('}') {
                    return Err(SyntaxError::new("expected '}' after number format", self.pos));
                }
                Ok(Element::Number {
                    name,
                    style,
                    span: start..self.pos,
                })
            }
            "plural" => {
                if !self.eat(',') {
                    return Err(SyntaxError::new(
                        "expected ',' after 'plural'",
                        self.pos,
                    ));
                }
                let branches = self.parse_plural_branches()?;
                if !self.eat('}') {
                    return Err(SyntaxError::new("unclosed plural argument", self.pos));
                }
                Ok(Element::Plural {
                    name,
                    branches,
                    span: start..self.pos,
                })
            }
            _ => {
                // Unknown function: keep the structure for the semantic
                // validator, skipping any trailing style content.
                let mut depth = 0usize;
                loop {
                    match self.peek() {
                        None => {
                            return Err(SyntaxError::new("unclosed brace", self.pos));
                        }
                        Some('{') => {
                            depth += 1;
                            self.bump();
                        }
                        Some('}') if depth == 0 => break,
                        Some('}') => {
                            depth -= 1;
                            self.bump();
                        }
                        Some(_) => {
                            self.bump();
                        }
                    }
                }
                self.bump(); // '}'
                Ok(Element::Function {
                    name,
                    function,
                    span: start..self.pos,
                })
            }
        }
    }

    fn parse_plural_branches(&mut self) -> Result<Vec<Branch>, SyntaxError> {
        let mut branches = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('}') | None => return Ok(branches),
                _ => {}
            }

            let start = self.pos;
            let selector = if self.eat('=') {
                let digits_start = self.pos;
                while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                    self.bump();
                }
                let digits = &self.text[digits_start..self.pos];
                let value: i64 = digits.parse().map_err(|_| {
                    SyntaxError::new("expected digits after '=' selector", digits_start)
                })?;
                Selector::Exact(value)
            } else {
                let word = self.ident();
                if word.is_empty() {
                    return Err(SyntaxError::new("expected plural selector", self.pos));
                }
                Selector::Category(word.to_string())
            };

            self.skip_whitespace();
            if !self.eat('{') {
                return Err(SyntaxError::new(
                    "expected '{' after plural selector",
                    self.pos,
                ));
            }
            let elements = self.parse_sequence(true, true)?;
            branches.push(Branch {
                selector,
                elements,
                span: start..self.pos,
            });
        }
    }

    /// `<` begins markup only when followed by a tag; otherwise it is an
    /// ordinary literal character ("1 < 2" stays text).
    fn parse_markup_or_literal(
        &mut self,
        elements: &mut Vec<Element>,
    ) -> Result<(), SyntaxError> {
        let start = self.pos;
        let rest = &self.text[self.pos + 1..];
        let is_close = rest.starts_with('/');
        let name_rest = if is_close { &rest[1..] } else { rest };
        if !name_rest.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.bump();
            push_literal(elements, '<');
            return Ok(());
        }

        self.bump(); // '<'
        if is_close {
            self.bump(); // '/'
        }
        let name = self.ident().to_string();
        self.skip_whitespace();

        if is_close {
            if !self.eat('>') {
                return Err(SyntaxError::new("unclosed markup tag", self.pos));
            }
            elements.push(Element::MarkupClose {
                name,
                span: start..self.pos,
            });
            return Ok(());
        }

        let options = self.parse_markup_options()?;
        if self.eat('/') {
            if !self.eat('>') {
                return Err(SyntaxError::new("unclosed markup tag", self.pos));
            }
            elements.push(Element::MarkupStandalone {
                name,
                options,
                span: start..self.pos,
            });
        } else if self.eat('>') {
            elements.push(Element::MarkupOpen {
                name,
                options,
                span: start..self.pos,
            });
        } else {
            return Err(SyntaxError::new("unclosed markup tag", self.pos));
        }
        Ok(())
    }

    fn parse_markup_options(&mut self) -> Result<Options, SyntaxError> {
        let mut options = Options::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('>') | Some('/') => return Ok(options),
                None => return Err(SyntaxError::new("unclosed markup tag", self.pos)),
                _ => {}
            }

            let key_start = self.pos;
            while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_' || c == '-')
            {
                self.bump();
            }
            let key = self.text[key_start..self.pos].to_string();
            if key.is_empty() {
                return Err(SyntaxError::new("expected markup option name", self.pos));
            }

            let value = if self.eat('=') {
                if self.eat('"') {
                    let value_start = self.pos;
                    while !matches!(self.peek(), Some('"') | None) {
                        self.bump();
                    }
                    let value = self.text[value_start..self.pos].to_string();
                    if !self.eat('"') {
                        return Err(SyntaxError::new("unclosed option value", self.pos));
                    }
                    value
                } else {
                    let value_start = self.pos;
                    while matches!(self.peek(), Some(c) if !c.is_whitespace() && c != '>' && c != '/')
                    {
                        self.bump();
                    }
                    self.text[value_start..self.pos].to_string()
                }
            } else {
                String::new()
            };
            options.insert(key, value);
        }
    }
}

fn push_literal(elements: &mut Vec<Element>, c: char) {
    if let Some(Element::Literal { value }) = elements.last_mut() {
        value.push(c);
    } else {
        elements.push(Element::Literal {
            value: c.to_string(),
        });
    }
}
