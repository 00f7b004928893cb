use serde::{Deserialize, Serialize};

/// Query token matching any value of a field. Only valid in queries.
pub const WILDCARD: &str = "*";

/// A configuration entry as exchanged with store callers.
///
/// An empty `value` is a tombstone: passing it to `set` removes the entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub set: String,
    pub schema: String,
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl ConfigEntry {
    pub fn new(set: impl Into<String>, schema: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { set: set.into(), schema: schema.into(), key: key.into(), value: value.into() }
    }

    /// Entry requesting deletion of `(set, schema, key)`.
    pub fn tombstone(set: impl Into<String>, schema: impl Into<String>, key: impl Into<String>) -> Self {
        Self::new(set, schema, key, String::new())
    }

    pub fn is_tombstone(&self) -> bool {
        self.value.is_empty()
    }
}

/// Lookup filter; every field is either a literal or [`WILDCARD`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QueryPattern {
    pub set: String,
    pub schema: String,
    pub key: String,
}

impl QueryPattern {
    pub fn new(set: impl Into<String>, schema: impl Into<String>, key: impl Into<String>) -> Self {
        Self { set: set.into(), schema: schema.into(), key: key.into() }
    }

    /// Pattern matching every stored entry.
    pub fn all() -> Self {
        Self::new(WILDCARD, WILDCARD, WILDCARD)
    }
}
