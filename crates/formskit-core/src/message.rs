//! Templated, lazily rendered messages.
//!
//! A [`Message`] stores a template and its substitution arguments and only
//! produces text when it is rendered. Rendering first passes the template
//! through a translator (the [`i18n`](crate::i18n) catalog by default) and
//! then substitutes brace placeholders:
//!
//! - `{}` takes the next positional argument
//! - `{0}`, `{1}` take positional arguments by index
//! - `{name}` takes a named argument
//! - `{{` and `}}` produce literal braces
//!
//! Placeholders without a matching argument are left in the output verbatim.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::i18n;

/// Translates a message template before placeholders are substituted.
///
/// Any `Fn(&str) -> String` closure is a translator.
pub trait Translate {
    /// Returns the translated form of `text`.
    fn translate(&self, text: &str) -> String;
}

impl<F> Translate for F
where
    F: Fn(&str) -> String,
{
    fn translate(&self, text: &str) -> String {
        self(text)
    }
}

/// A lazily rendered, templated message.
///
/// # Examples
///
/// ```
/// use formskit_core::Message;
///
/// let message = Message::new("text {0} {two}").arg("one").kwarg("two", "two");
/// assert_eq!(message.render(), "text one two");
///
/// let shouted = message.render_with(&|text: &str| text.to_uppercase());
/// assert_eq!(shouted, "TEXT one two");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    text: String,
    args: Vec<String>,
    kwargs: BTreeMap<String, String>,
}

impl Message {
    /// Creates a message from a template with no arguments.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            args: Vec::new(),
            kwargs: BTreeMap::new(),
        }
    }

    /// Appends a positional argument.
    #[must_use]
    pub fn arg(mut self, value: impl ToString) -> Self {
        self.args.push(value.to_string());
        self
    }

    /// Sets a named argument.
    #[must_use]
    pub fn kwarg(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.kwargs.insert(key.into(), value.to_string());
        self
    }

    /// Returns the untranslated template.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the positional arguments in order.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns the named arguments.
    pub const fn kwargs(&self) -> &BTreeMap<String, String> {
        &self.kwargs
    }

    /// Renders the message using the active language's catalog.
    pub fn render(&self) -> String {
        self.render_with(&|text: &str| i18n::gettext(text))
    }

    /// Renders the message using the given translator.
    pub fn render_with<T: Translate + ?Sized>(&self, translator: &T) -> String {
        let template = translator.translate(&self.text);
        format_template(&template, &self.args, &self.kwargs)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

fn format_template(template: &str, args: &[String], kwargs: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut next_positional = 0;

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut key = String::new();
                let mut closed = false;
                for k in chars.by_ref() {
                    if k == '}' {
                        closed = true;
                        break;
                    }
                    key.push(k);
                }
                if !closed {
                    out.push('{');
                    out.push_str(&key);
                    continue;
                }

                let value = if key.is_empty() {
                    let value = args.get(next_positional);
                    next_positional += 1;
                    value
                } else if let Ok(index) = key.parse::<usize>() {
                    args.get(index)
                } else {
                    kwargs.get(&key)
                };

                match value {
                    Some(v) => out.push_str(v),
                    None => {
                        out.push('{');
                        out.push_str(&key);
                        out.push('}');
                    }
                }
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        assert_eq!(Message::new("NotEmpty").render(), "NotEmpty");
    }

    #[test]
    fn test_positional_and_named() {
        let message = Message::new("text {0} {two}").arg("one").kwarg("two", "two");
        assert_eq!(message.render(), "text one two");
    }

    #[test]
    fn test_sequential_positional() {
        let message = Message::new("{} and {}").arg(1).arg(2);
        assert_eq!(message.render(), "1 and 2");
    }

    #[test]
    fn test_escaped_braces() {
        let message = Message::new("{{literal}} {0}").arg("x");
        assert_eq!(message.render(), "{literal} x");
    }

    #[test]
    fn test_missing_argument_left_verbatim() {
        let message = Message::new("{0} {missing}").arg("a");
        assert_eq!(message.render(), "a {missing}");
        assert_eq!(Message::new("open {brace").render(), "open {brace");
    }

    #[test]
    fn test_copy_keeps_template_and_args() {
        let message = Message::new("text").arg("one").kwarg("two", "two");
        let copy = message.clone();
        assert_eq!(copy.text(), "text");
        assert_eq!(copy.args(), ["one".to_string()]);
        assert_eq!(copy.kwargs().get("two").map(String::as_str), Some("two"));
    }

    #[test]
    fn test_translator_runs_before_substitution() {
        let message = Message::new("text {0} {two}").arg("one").kwarg("two", "two");
        let rendered = message.render_with(&|text: &str| format!("{text}something"));
        assert_eq!(rendered, "text one twosomething");
    }

    #[test]
    fn test_render_uses_catalog() {
        i18n::catalog::register_translations("test_message_lang", vec![("Hello {0}", "Hola {0}")]);
        i18n::activate("test_message_lang");
        assert_eq!(Message::new("Hello {0}").arg("Ana").render(), "Hola Ana");
        i18n::deactivate();
        assert_eq!(Message::new("Hello {0}").arg("Ana").render(), "Hello Ana");
    }

    #[test]
    fn test_serializes_rendered() {
        let message = Message::new("{0} must be the same!").arg("input");
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            serde_json::json!("input must be the same!")
        );
    }
}
