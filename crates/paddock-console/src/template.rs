//! Template parameter substitution.
//!
//! A template is a SQL string containing `{name}` placeholders, where a name
//! is one or more word characters. Substitution replaces every placeholder
//! with the parameter's string form, verbatim — no escaping, no recursion,
//! no default values. The first placeholder without a matching parameter
//! aborts the whole format.

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Errors that can occur during template formatting.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// A `{name}` placeholder had no entry in the parameter mapping.
    #[error("Missing template parameter: {0}")]
    MissingParameter(String),
}

/// A template parameter: a string or a number, substituted verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateValue {
    Text(String),
    Int(i64),
    Float(f64),
}

impl fmt::Display for TemplateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateValue::Text(s) => f.write_str(s),
            TemplateValue::Int(i) => write!(f, "{i}"),
            TemplateValue::Float(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for TemplateValue {
    fn from(s: &str) -> Self {
        TemplateValue::Text(s.to_string())
    }
}

impl From<String> for TemplateValue {
    fn from(s: String) -> Self {
        TemplateValue::Text(s)
    }
}

impl From<i64> for TemplateValue {
    fn from(i: i64) -> Self {
        TemplateValue::Int(i)
    }
}

impl From<f64> for TemplateValue {
    fn from(n: f64) -> Self {
        TemplateValue::Float(n)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Replaces every `{name}` placeholder in `template` with the matching
/// parameter's string representation.
///
/// Braces that do not wrap a word-character run (e.g. `{not a name}` or an
/// unclosed `{`) pass through unchanged, mirroring how a `\{(\w+)\}` pattern
/// would skip them.
///
/// # Errors
///
/// Returns `TemplateError::MissingParameter` for the first referenced name
/// absent from the mapping; no partial output is produced.
pub fn format_template(
    template: &str,
    params: &HashMap<String, TemplateValue>,
) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let name_len = after.find(|c: char| !is_word_char(c)).unwrap_or(after.len());
        let closes = name_len > 0 && after[name_len..].starts_with('}');

        if closes {
            let name = &after[..name_len];
            match params.get(name) {
                Some(value) => out.push_str(&value.to_string()),
                None => return Err(TemplateError::MissingParameter(name.to_string())),
            }
            rest = &after[name_len + 1..];
        } else {
            out.push('{');
            rest = after;
        }
    }

    out.push_str(rest);
    Ok(out)
}
