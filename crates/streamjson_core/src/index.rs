//! Offset index: member key to the byte range of its `"key":value` text.

use indexmap::IndexMap;
use serde_json::Value;

/// Decode shape recorded for a member when it is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// String, number, boolean or null.
    Scalar,
    /// Object or array.
    Composite,
}

impl ValueShape {
    /// Returns the shape of a JSON value.
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) | Value::Array(_) => Self::Composite,
            _ => Self::Scalar,
        }
    }

    /// Returns `true` for [`ValueShape::Composite`].
    #[must_use]
    pub const fn is_composite(self) -> bool {
        matches!(self, Self::Composite)
    }
}

/// Location and shape of one serialized member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    /// Offset of the opening quote of the key literal, prefix included.
    pub start: u64,
    /// Length of `"key":value`, without separators or braces.
    pub len: u64,
    /// Shape of the value when it was stored.
    pub shape: ValueShape,
}

impl IndexEntry {
    /// Offset one past the last byte of the member.
    #[must_use]
    pub const fn end(&self) -> u64 {
        self.start + self.len
    }
}

/// Insertion-ordered map from member key to [`IndexEntry`].
///
/// Iteration order is the physical order of the members in the store, which
/// lets a rebuild walk the old store front to back.
#[derive(Debug, Clone, Default)]
pub struct OffsetIndex {
    entries: IndexMap<String, IndexEntry>,
}

impl OffsetIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `key` is indexed.
    #[must_use]
    pub fn exists(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the entry for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&IndexEntry> {
        self.entries.get(key)
    }

    /// Stores `entry` under `key` as the last member.
    ///
    /// An existing entry for `key` is replaced and moves to the end.
    pub fn put(&mut self, key: &str, entry: IndexEntry) {
        self.entries.shift_remove(key);
        self.entries.insert(key.to_owned(), entry);
    }

    /// Removes `key`, returning its entry. Later entries keep their order.
    pub fn remove(&mut self, key: &str) -> Option<IndexEntry> {
        self.entries.shift_remove(key)
    }

    /// Number of indexed members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(key, entry)` in physical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexEntry)> + '_ {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// Iterates over keys in physical order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Moves every entry's start by `adjust` bytes.
    pub fn shift(&mut self, adjust: i64) {
        for entry in self.entries.values_mut() {
            entry.start = entry.start.saturating_add_signed(adjust);
        }
    }

    /// Records a new start offset for `key`.
    ///
    /// Returns `false` if `key` is not indexed.
    pub fn relocate(&mut self, key: &str, start: u64) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.start = start;
                true
            }
            None => false,
        }
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
