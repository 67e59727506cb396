//! Shape fingerprints of outgoing messages
//!
//! Used for the sent-message report only; fingerprints never influence the
//! generated types.

use super::types::Kind;
use crate::types::{JsonObject, JsonValue};
use serde::Serialize;
use std::collections::BTreeSet;

/// Replaces the identifier part of a prefixed key value (`action:<ID>`)
pub const ID_PLACEHOLDER: &str = "<ID>";

/// Unordered set of rendered `"name": <repr>` lines for one message
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Fingerprint(BTreeSet<String>);

impl Fingerprint {
    /// Fingerprint a message body
    ///
    /// Fields named in `key_fields` keep their string value, with anything
    /// after the first `:` masked. Everything else keeps only its kind.
    pub fn of(message: &JsonObject, key_fields: &[String]) -> Self {
        Self(
            message
                .iter()
                .map(|(key, value)| render_field(key, value, key_fields, 0))
                .collect(),
        )
    }

    /// Rendered lines in sorted order
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Sent = {{")?;
        for line in self.lines() {
            writeln!(f, "  {line}")?;
        }
        write!(f, "}}")
    }
}

fn render_field(key: &str, value: &JsonValue, key_fields: &[String], depth: usize) -> String {
    if key_fields.iter().any(|k| k == key) {
        if let JsonValue::String(s) = value {
            return match s.split_once(':') {
                Some((prefix, _)) => format!("\"{key}\": \"{prefix}:{ID_PLACEHOLDER}\""),
                None => format!("\"{key}\": \"{s}\""),
            };
        }
    }

    if let JsonValue::Object(map) = value {
        let mut entries: Vec<_> = map.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        let inner = "  ".repeat(depth + 2);
        let mut rendered = format!("\"{key}\": {{\n");
        for (sub_key, sub_value) in entries {
            let line = render_field(sub_key, sub_value, key_fields, depth + 1);
            rendered.push_str(&format!("{inner}{line}\n"));
        }
        rendered.push_str(&"  ".repeat(depth + 1));
        rendered.push('}');
        return rendered;
    }

    format!("\"{key}\": <{}>", Kind::of(value))
}
