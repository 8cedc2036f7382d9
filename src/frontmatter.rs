//! YAML front-matter extraction.
//!
//! A document carries front-matter when its first line is exactly `---`. The
//! block runs until the next line that is exactly `---`; an unterminated block
//! swallows the rest of the file, matching how common front-matter parsers
//! behave.
//!
//! ```text
//! ---
//! title: Getting Started
//! qr: true
//! slug: /start
//! ---
//! # Body starts here
//! ```
//!
//! Values are stored as [`serde_json::Value`] so documents read from a host
//! index export (JSON) and documents parsed from disk (YAML) share one
//! representation and one truthiness rule.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

const DELIMITER: &str = "---";

/// Front-matter key a document sets to opt into QR generation.
pub const QR_FLAG: &str = "qr";

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Parsed front-matter: string keys mapped to JSON-like values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrontMatter(BTreeMap<String, Value>);

impl FrontMatter {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `key` is present with a truthy value (see [`is_truthy`]).
    pub fn is_truthy(&self, key: &str) -> bool {
        self.get(key).is_some_and(is_truthy)
    }

    /// Render a truthy scalar value as text.
    ///
    /// Strings are returned as-is, numbers and booleans through their display
    /// form. Falsy values, arrays and objects yield `None`.
    pub fn text(&self, key: &str) -> Option<String> {
        let value = self.get(key).filter(|v| is_truthy(v))?;
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl FromIterator<(String, Value)> for FrontMatter {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Loose truthiness: `null`, `false`, `0` and `""` are falsy, everything
/// else (including empty arrays and objects) is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Split a document into `(front_matter_source, body)`.
///
/// Returns `None` when the document does not open with a `---` line.
pub fn split(input: &str) -> Option<(&str, &str)> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let first_end = input.find('\n').unwrap_or(input.len());
    if input[..first_end].trim_end() != DELIMITER {
        return None;
    }

    let rest = &input[(first_end + 1).min(input.len())..];
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    Some((rest, ""))
}

/// Parse the leading front-matter block of a document.
///
/// Documents without a block, with an empty block, or whose block is not a
/// mapping yield an empty [`FrontMatter`]. Invalid YAML is an error.
pub fn parse(input: &str) -> Result<FrontMatter, FrontMatterError> {
    let Some((matter, _body)) = split(input) else {
        return Ok(FrontMatter::default());
    };
    if matter.trim().is_empty() {
        return Ok(FrontMatter::default());
    }
    match serde_yaml::from_str::<Value>(matter)? {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => Ok(FrontMatter::default()),
    }
}
