//! Tag block decoding.
//!
//! A tag block is `key=value;key2=value2`. Values use the IRCv3 escaping
//! rules. Keys are checked against the command's schema; unrecognized keys
//! are kept and reported as [`TagAnomaly`] values.

use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use crate::command::CommandKind;
use crate::schema;

/// Decoded tags of one line, keyed by whatever the server actually sent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagMap(HashMap<String, Option<String>>);

impl TagMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `key`, if the key is present and carries a value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.as_deref())
    }

    /// Value of `key`, treating an empty value as absent.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Parse the value of `key` as a base-10 integer.
    ///
    /// Missing, empty or non-numeric values yield `None`.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.parse().ok())
    }

    /// Whether `key` was sent, with or without a value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Record a key. A later duplicate replaces an earlier one.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        self.0.insert(key.into(), value);
    }

    /// Number of keys present.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no keys are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(key, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }
}

/// A tag key that is not in the command's schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TagAnomaly {
    /// Command the tag arrived on.
    pub command: String,
    /// The unrecognized key.
    pub key: String,
    /// The raw `key=value` entry as sent.
    pub raw: String,
}

/// Result of decoding a tag block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodedTags {
    /// All decoded tags, recognized or not.
    pub tags: TagMap,
    /// One entry per unrecognized key.
    pub anomalies: Vec<TagAnomaly>,
}

/// Decode a raw tag block (without the leading `@`) for `command`.
///
/// Each entry is split on its first `=`. Entries without `=` are recorded
/// with no value. Empty entries are skipped.
pub fn decode_tags(block: &str, command: &CommandKind) -> DecodedTags {
    let mut decoded = DecodedTags::default();

    for raw in block.split(';').filter(|entry| !entry.is_empty()) {
        let (key, value) = match raw.split_once('=') {
            Some((key, value)) => (key, Some(unescape_tag_value(value))),
            None => (raw, None),
        };

        if !schema::is_allowed(command, key) {
            warn!(command = %command, tag = raw, "unknown tag");
            decoded.anomalies.push(TagAnomaly {
                command: command.to_string(),
                key: key.to_string(),
                raw: raw.to_string(),
            });
        }

        decoded.tags.insert(key, value);
    }

    decoded
}

/// Unescape a tag value from wire format.
pub(crate) fn unescape_tag_value(value: &str) -> String {
    let mut unescaped = String::with_capacity(value.len());
    let mut iter = value.chars();
    while let Some(c) = iter.next() {
        let r = if c == '\\' {
            match iter.next() {
                Some(':') => ';',
                Some('s') => ' ',
                Some('\\') => '\\',
                Some('r') => '\r',
                Some('n') => '\n',
                Some(c) => c,
                None => break,
            }
        } else {
            c
        };
        unescaped.push(r);
    }
    unescaped
}
