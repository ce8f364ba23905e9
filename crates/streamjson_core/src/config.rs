//! Buffer configuration.

use crate::error::{BufferError, BufferResult};
use std::fmt;
use std::str::FromStr;
use streamjson_storage::{
    FileBackend, InMemoryBackend, SpooledBackend, StorageBackend, StorageResult,
    DEFAULT_SPILL_THRESHOLD,
};

/// Which kind of backing store a buffer allocates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    /// Everything in memory.
    #[default]
    Memory,
    /// An anonymous temporary file.
    TempFile,
    /// Memory until `spill_threshold` bytes, then a temporary file.
    Spooled,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Memory => "memory",
            Self::TempFile => "temp",
            Self::Spooled => "spooled",
        };
        f.write_str(name)
    }
}

impl FromStr for StoreKind {
    type Err = BufferError;

    fn from_str(s: &str) -> BufferResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "temp" | "tempfile" | "file" => Ok(Self::TempFile),
            "spooled" | "spool" => Ok(Self::Spooled),
            other => Err(BufferError::invalid_config(format!(
                "unknown store kind {other:?} (expected memory, temp or spooled)"
            ))),
        }
    }
}

/// Configuration for creating a buffer.
#[derive(Debug, Clone)]
pub struct Config {
    /// Kind of store used for the initial content and every rebuild.
    pub store: StoreKind,

    /// Bytes kept in memory by a spooled store before it moves to disk.
    pub spill_threshold: usize,

    /// Variable name the object is assigned to, if any.
    pub prefix: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreKind::Memory,
            spill_threshold: DEFAULT_SPILL_THRESHOLD,
            prefix: None,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the store kind.
    #[must_use]
    pub const fn store(mut self, kind: StoreKind) -> Self {
        self.store = kind;
        self
    }

    /// Sets the spill threshold of spooled stores.
    #[must_use]
    pub const fn spill_threshold(mut self, bytes: usize) -> Self {
        self.spill_threshold = bytes;
        self
    }

    /// Sets the initial variable prefix.
    #[must_use]
    pub fn prefix(mut self, name: impl Into<String>) -> Self {
        self.prefix = Some(name.into());
        self
    }

    /// Allocates an empty backend of the configured kind.
    ///
    /// # Errors
    ///
    /// Returns an error if a temporary file cannot be created.
    pub fn open_backend(&self) -> StorageResult<Box<dyn StorageBackend>> {
        let backend: Box<dyn StorageBackend> = match self.store {
            StoreKind::Memory => Box::new(InMemoryBackend::new()),
            StoreKind::TempFile => Box::new(FileBackend::temp()?),
            StoreKind::Spooled => Box::new(SpooledBackend::new(self.spill_threshold)),
        };
        Ok(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.spill_threshold, DEFAULT_SPILL_THRESHOLD);
        assert!(config.prefix.is_none());
    }

    #[test]
    fn builder_pattern() {
        let config = Config::new()
            .store(StoreKind::Spooled)
            .spill_threshold(1024)
            .prefix("payload");

        assert_eq!(config.store, StoreKind::Spooled);
        assert_eq!(config.spill_threshold, 1024);
        assert_eq!(config.prefix.as_deref(), Some("payload"));
    }

    #[test]
    fn store_kind_parses() {
        assert_eq!("memory".parse::<StoreKind>().unwrap(), StoreKind::Memory);
        assert_eq!("TEMP".parse::<StoreKind>().unwrap(), StoreKind::TempFile);
        assert_eq!("spooled".parse::<StoreKind>().unwrap(), StoreKind::Spooled);
        assert!(matches!(
            "disk".parse::<StoreKind>(),
            Err(BufferError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn open_backend_matches_kind() {
        let memory = Config::new().open_backend().unwrap();
        assert_eq!(memory.backend_name(), "memory");

        let file = Config::new().store(StoreKind::TempFile).open_backend().unwrap();
        assert_eq!(file.backend_name(), "file");

        let spooled = Config::new().store(StoreKind::Spooled).open_backend().unwrap();
        assert_eq!(spooled.backend_name(), "spooled-memory");
    }
}
