//! The buffer aggregate: store, cursor, length, index and prefix.

use crate::config::Config;
use crate::error::{BufferError, BufferResult};
use crate::index::OffsetIndex;
use std::fmt;
use streamjson_storage::{InMemoryBackend, StorageBackend};
use tracing::{debug, warn};

/// Serialized form of an object without members.
pub(crate) const EMPTY_OBJECT: &[u8] = b"{}";

/// A serialized JSON object that stays valid while it is edited.
///
/// The buffer owns a backing store holding `{...}` (or `prefix={...}`), a
/// single cursor and the content length. The stream methods (see
/// [`StreamJson::read`], [`StreamJson::write`], [`StreamJson::seek`]) work on
/// the raw bytes; the dictionary methods (see [`StreamJson::set`],
/// [`StreamJson::get`], [`StreamJson::delete`]) splice whole members and keep
/// an offset index so members can be read back without parsing the object.
///
/// After [`StreamJson::close`] or [`StreamJson::detach`] the buffer is inert
/// and every store-touching call fails with
/// [`BufferError::StoreUnavailable`].
pub struct StreamJson {
    pub(crate) store: Option<Box<dyn StorageBackend>>,
    pub(crate) length: u64,
    pub(crate) cursor: u64,
    pub(crate) index: OffsetIndex,
    pub(crate) prefix: Option<String>,
    pub(crate) config: Config,
}

impl StreamJson {
    /// Creates an empty in-memory buffer holding `{}` with the cursor just
    /// inside the closing brace.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: Some(Box::new(InMemoryBackend::with_data(EMPTY_OBJECT.to_vec()))),
            length: EMPTY_OBJECT.len() as u64,
            cursor: 1,
            index: OffsetIndex::new(),
            prefix: None,
            config: Config::default(),
        }
    }

    /// Creates an empty buffer from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured store cannot be allocated.
    pub fn with_config(config: Config) -> BufferResult<Self> {
        let prefix = config.prefix.clone();
        let (store, length) = empty_store(&config, prefix.as_deref())?;
        debug!(store = %config.store, length, "created buffer");

        Ok(Self {
            store: Some(store),
            length,
            cursor: length - 1,
            index: OffsetIndex::new(),
            prefix,
            config,
        })
    }

    /// Creates an empty buffer on a caller-supplied store.
    ///
    /// The store must be empty; `{}` (or `prefix={}`) is written into it.
    /// Stores allocated later, when a delete rebuilds the object, still come
    /// from `config`.
    ///
    /// # Errors
    ///
    /// Fails with [`BufferError::InvalidConfig`] if the store already holds
    /// data, or with a storage error if the initial content cannot be written.
    pub fn with_backend(config: Config, mut store: Box<dyn StorageBackend>) -> BufferResult<Self> {
        let size = store.size()?;
        if size != 0 {
            return Err(BufferError::invalid_config(format!(
                "store must be empty, holds {size} bytes"
            )));
        }

        let prefix = config.prefix.clone();
        let mut content = header_bytes(prefix.as_deref());
        content.extend_from_slice(EMPTY_OBJECT);
        store.append(&content)?;
        let length = content.len() as u64;
        debug!(backend = store.backend_name(), length, "adopted store");

        Ok(Self {
            store: Some(store),
            length,
            cursor: length - 1,
            index: OffsetIndex::new(),
            prefix,
            config,
        })
    }

    /// Returns the configuration the buffer allocates stores with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Releases the backing store. The buffer becomes inert.
    pub fn close(&mut self) {
        if let Some(mut store) = self.take_store() {
            if let Err(err) = store.flush() {
                warn!(%err, "flush failed while closing buffer");
            }
        }
    }

    /// Hands the backing store to the caller. The buffer becomes inert.
    ///
    /// Returns `None` if the buffer was already closed or detached.
    pub fn detach(&mut self) -> Option<Box<dyn StorageBackend>> {
        self.take_store()
    }

    fn take_store(&mut self) -> Option<Box<dyn StorageBackend>> {
        self.index.clear();
        self.length = 0;
        self.cursor = 0;
        self.store.take()
    }

    pub(crate) fn store(&self) -> BufferResult<&dyn StorageBackend> {
        self.store.as_deref().ok_or(BufferError::StoreUnavailable)
    }

    pub(crate) fn store_mut(&mut self) -> BufferResult<&mut (dyn StorageBackend + 'static)> {
        self.store.as_deref_mut().ok_or(BufferError::StoreUnavailable)
    }

    pub(crate) fn ensure_available(&self) -> BufferResult<()> {
        self.store().map(|_| ())
    }

    /// Replaces the content with an empty object, keeping the prefix.
    pub(crate) fn reset_empty(&mut self) -> BufferResult<()> {
        self.ensure_available()?;
        let (store, length) = empty_store(&self.config, self.prefix.as_deref())?;
        self.index.clear();
        self.store = Some(store);
        self.length = length;
        self.cursor = length - 1;
        Ok(())
    }
}

impl Default for StreamJson {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StreamJson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamJson")
            .field("store", &self.store.as_ref().map(|s| s.backend_name()))
            .field("length", &self.length)
            .field("cursor", &self.cursor)
            .field("index", &self.index)
            .field("prefix", &self.prefix)
            .finish()
    }
}

/// Renders the full content without moving the cursor.
///
/// Never fails: an inert buffer renders as an empty string and a store read
/// failure is logged and rendered as an empty string.
impl fmt::Display for StreamJson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(store) = self.store.as_deref() else {
            return Ok(());
        };
        match store.read_at(0, self.length as usize) {
            Ok(bytes) => f.write_str(&String::from_utf8_lossy(&bytes)),
            Err(err) => {
                warn!(%err, "could not render buffer content");
                Ok(())
            }
        }
    }
}

/// Bytes written before the opening brace: `prefix=` or nothing.
pub(crate) fn header_bytes(prefix: Option<&str>) -> Vec<u8> {
    match prefix {
        Some(name) => format!("{name}=").into_bytes(),
        None => Vec::new(),
    }
}

/// Allocates a store holding `{}` or `prefix={}` and returns it with its length.
pub(crate) fn empty_store(
    config: &Config,
    prefix: Option<&str>,
) -> BufferResult<(Box<dyn StorageBackend>, u64)> {
    let mut store = config.open_backend()?;
    let mut content = header_bytes(prefix);
    content.extend_from_slice(EMPTY_OBJECT);
    store.append(&content)?;
    Ok((store, content.len() as u64))
}
