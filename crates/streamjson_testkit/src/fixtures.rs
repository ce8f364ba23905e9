//! Buffer fixtures and layout checks.
//!
//! Provides buffers for every store kind and helpers that parse the buffer
//! text back to confirm it is still a valid object.

use serde_json::{Map, Value};
use streamjson_core::{Config, StoreKind, StreamJson};
use streamjson_storage::StorageBackend;

/// Spill threshold small enough that a handful of members moves a spooled
/// store to disk.
pub const SMALL_SPILL_THRESHOLD: usize = 64;

/// A buffer created for a test, remembering which store it uses.
pub struct TestBuffer {
    /// The buffer under test.
    pub buffer: StreamJson,
    /// Store kind the buffer was created with.
    pub kind: StoreKind,
}

impl TestBuffer {
    /// Creates a buffer with the given configuration.
    pub fn with_config(config: Config) -> Self {
        let kind = config.store;
        Self {
            buffer: StreamJson::with_config(config).expect("Failed to create buffer"),
            kind,
        }
    }

    /// Creates an in-memory buffer.
    pub fn memory() -> Self {
        Self::with_config(Config::new())
    }

    /// Creates a buffer backed by an anonymous temporary file.
    pub fn temp_file() -> Self {
        Self::with_config(Config::new().store(StoreKind::TempFile))
    }

    /// Creates a spooled buffer that spills after `threshold` bytes.
    pub fn spooled(threshold: usize) -> Self {
        Self::with_config(
            Config::new()
                .store(StoreKind::Spooled)
                .spill_threshold(threshold),
        )
    }

    /// Creates a buffer of the given kind. Spooled buffers use
    /// [`SMALL_SPILL_THRESHOLD`].
    pub fn of_kind(kind: StoreKind) -> Self {
        match kind {
            StoreKind::Memory => Self::memory(),
            StoreKind::TempFile => Self::temp_file(),
            StoreKind::Spooled => Self::spooled(SMALL_SPILL_THRESHOLD),
        }
    }

    /// Name of the backend currently holding the bytes.
    pub fn backend_name(&self) -> &'static str {
        self.buffer
            .metadata()
            .map(|meta| meta.backend)
            .unwrap_or("detached")
    }
}

impl std::ops::Deref for TestBuffer {
    type Target = StreamJson;

    fn deref(&self) -> &Self::Target {
        &self.buffer
    }
}

impl std::ops::DerefMut for TestBuffer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buffer
    }
}

/// Every store kind, for tests that must hold on all of them.
pub const ALL_KINDS: [StoreKind; 3] = [StoreKind::Memory, StoreKind::TempFile, StoreKind::Spooled];

/// Runs `f` once with a fresh buffer of every store kind.
pub fn for_each_kind<F>(mut f: F)
where
    F: FnMut(&mut TestBuffer),
{
    for kind in ALL_KINDS {
        let mut buffer = TestBuffer::of_kind(kind);
        f(&mut buffer);
    }
}

/// Splits `name={...}` into the prefix and the object text.
pub fn split_prefix(text: &str) -> (Option<&str>, &str) {
    match text.find('{') {
        Some(0) | None => (None, text),
        Some(brace) => {
            let header = &text[..brace];
            let name = header
                .strip_suffix('=')
                .unwrap_or_else(|| panic!("Header {header:?} does not end with '='"));
            (Some(name), &text[brace..])
        }
    }
}

/// Checks the serialized layout of `buffer` and returns its members.
///
/// Asserts that the text is an object (after the optional prefix), that the
/// prefix matches, that the reported size is the byte length of the text and
/// that the members appear in index order.
pub fn assert_layout(buffer: &mut StreamJson) -> Map<String, Value> {
    let text = buffer.contents();
    assert_eq!(
        buffer.size(),
        Some(text.len() as u64),
        "Size does not match text {text:?}"
    );

    let (prefix, object) = split_prefix(&text);
    assert_eq!(prefix, buffer.prefix(), "Prefix mismatch in {text:?}");

    let members: Map<String, Value> = serde_json::from_str(object)
        .unwrap_or_else(|err| panic!("Invalid object {object:?}: {err}"));

    let physical: Vec<&str> = members.keys().map(String::as_str).collect();
    let indexed: Vec<&str> = buffer.keys().collect();
    assert_eq!(physical, indexed, "Member order differs from index");

    members
}

/// Reads the whole content of a detached store.
pub fn detached_text(store: &dyn StorageBackend) -> String {
    let size = store.size().expect("Failed to read store size");
    let bytes = store
        .read_at(0, size as usize)
        .expect("Failed to read store");
    String::from_utf8(bytes).expect("Store is not UTF-8")
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// Creates a buffer holding `count` members `k0..k{count-1}` with their
    /// index as value.
    pub fn populated_buffer(kind: StoreKind, count: usize) -> TestBuffer {
        let mut buffer = TestBuffer::of_kind(kind);
        for i in 0..count {
            buffer
                .set(&format!("k{i}"), &i)
                .expect("Failed to set member");
        }
        buffer
    }
}
