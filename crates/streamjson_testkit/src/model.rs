//! Ordered reference model of a buffer and a harness checking against it.

use crate::fixtures::{assert_layout, TestBuffer};
use crate::generators::BufferOperation;
use serde_json::Value;
use streamjson_core::StoreKind;

/// What a buffer should hold: members in physical order and a prefix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceModel {
    members: Vec<(String, Value)>,
    prefix: Option<String>,
}

impl ReferenceModel {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, moving it to the end.
    pub fn set(&mut self, key: &str, value: Value) {
        self.delete(key);
        self.members.push((key.to_owned(), value));
    }

    /// Removes `key` if present.
    pub fn delete(&mut self, key: &str) {
        self.members.retain(|(k, _)| k != key);
    }

    /// Returns the value of `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.members
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// Sets or clears the prefix.
    pub fn set_prefix(&mut self, prefix: Option<&str>) {
        self.prefix = prefix.map(str::to_owned);
    }

    /// Keys in physical order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.members.iter().map(|(k, _)| k.as_str())
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` without members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Exact text the buffer is expected to hold.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(name) = &self.prefix {
            out.push_str(name);
            out.push('=');
        }
        out.push('{');
        for (i, (key, value)) in self.members.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(&serde_json::to_string(key).expect("Failed to encode key"));
            out.push(':');
            out.push_str(&serde_json::to_string(value).expect("Failed to encode value"));
        }
        out.push('}');
        out
    }
}

/// Applies operations to a buffer and a model side by side.
pub struct ModelHarness {
    /// The buffer under test.
    pub buffer: TestBuffer,
    /// The expected state.
    pub model: ReferenceModel,
}

impl ModelHarness {
    /// Creates a harness around an empty buffer of `kind`.
    pub fn new(kind: StoreKind) -> Self {
        Self {
            buffer: TestBuffer::of_kind(kind),
            model: ReferenceModel::new(),
        }
    }

    /// Applies `op` to both sides and checks every observable result.
    pub fn apply(&mut self, op: &BufferOperation) {
        match op {
            BufferOperation::Set { key, value } => {
                self.buffer.set(key, value).expect("Failed to set member");
                self.model.set(key, value.clone());
            }
            BufferOperation::Delete { key } => {
                self.buffer.delete(key).expect("Failed to delete member");
                self.model.delete(key);
            }
            BufferOperation::Get { key } => {
                let actual = self.buffer.get(key).expect("Failed to get member");
                assert_eq!(actual.as_ref(), self.model.get(key), "Value mismatch for {key:?}");
            }
            BufferOperation::SetPrefix { prefix } => {
                self.buffer
                    .set_prefix(prefix.as_deref())
                    .expect("Failed to set prefix");
                self.model.set_prefix(prefix.as_deref());
            }
        }
        self.verify();
    }

    /// Checks text, length, layout, membership and every value.
    pub fn verify(&mut self) {
        assert_layout(&mut self.buffer);

        let expected = self.model.render();
        assert_eq!(self.buffer.contents(), expected);
        assert_eq!(self.buffer.size(), Some(expected.len() as u64));
        assert_eq!(self.buffer.len(), self.model.len());

        let keys: Vec<String> = self.model.keys().map(str::to_owned).collect();
        for key in &keys {
            assert!(self.buffer.exists(key), "Missing member {key:?}");
            let actual = self.buffer.get(key).expect("Failed to get member");
            assert_eq!(actual.as_ref(), self.model.get(key), "Value mismatch for {key:?}");
        }
    }
}
