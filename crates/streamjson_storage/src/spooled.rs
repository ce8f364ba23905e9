//! Spooled storage backend: memory first, temporary file once it grows.

use crate::backend::StorageBackend;
use crate::error::StorageResult;
use crate::file::FileBackend;
use crate::memory::InMemoryBackend;
use tracing::debug;

/// Default number of bytes kept in memory before spilling to disk (2 MiB).
pub const DEFAULT_SPILL_THRESHOLD: usize = 2 * 1024 * 1024;

#[derive(Debug)]
enum Spool {
    Memory(InMemoryBackend),
    File(FileBackend),
}

/// A backend that starts in memory and moves to a temporary file once its
/// content would exceed a threshold.
///
/// After spilling, the backend stays file-backed for the rest of its life,
/// even if it later shrinks below the threshold.
///
/// # Example
///
/// ```rust
/// use streamjson_storage::{StorageBackend, SpooledBackend};
///
/// let mut backend = SpooledBackend::new(4);
/// backend.append(b"{}").unwrap();
/// assert!(!backend.is_spilled());
///
/// backend.insert_at(1, b"\"a\":1").unwrap();
/// assert!(backend.is_spilled());
/// assert_eq!(backend.read_at(0, 7).unwrap(), b"{\"a\":1}");
/// ```
#[derive(Debug)]
pub struct SpooledBackend {
    inner: Spool,
    threshold: usize,
}

impl Default for SpooledBackend {
    fn default() -> Self {
        Self::new(DEFAULT_SPILL_THRESHOLD)
    }
}

impl SpooledBackend {
    /// Creates an empty spooled backend that spills past `threshold` bytes.
    #[must_use]
    pub fn new(threshold: usize) -> Self {
        Self {
            inner: Spool::Memory(InMemoryBackend::new()),
            threshold,
        }
    }

    /// Returns the spill threshold in bytes.
    #[must_use]
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Returns `true` once the content has moved to a temporary file.
    #[must_use]
    pub fn is_spilled(&self) -> bool {
        matches!(self.inner, Spool::File(_))
    }

    fn backend(&self) -> &dyn StorageBackend {
        match &self.inner {
            Spool::Memory(memory) => memory,
            Spool::File(file) => file,
        }
    }

    fn backend_mut(&mut self) -> &mut dyn StorageBackend {
        match &mut self.inner {
            Spool::Memory(memory) => memory,
            Spool::File(file) => file,
        }
    }

    /// Moves the content to a temporary file if `incoming` more bytes would
    /// push it past the threshold.
    fn spill_if_needed(&mut self, incoming: u64) -> StorageResult<()> {
        let Spool::Memory(memory) = &self.inner else {
            return Ok(());
        };

        let size = memory.size()?;
        if size.saturating_add(incoming) <= self.threshold as u64 {
            return Ok(());
        }

        let mut file = FileBackend::temp()?;
        file.append(&memory.data())?;
        debug!(
            size,
            incoming,
            threshold = self.threshold,
            "spilling in-memory store to temporary file"
        );
        self.inner = Spool::File(file);
        Ok(())
    }
}

impl StorageBackend for SpooledBackend {
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>> {
        self.backend().read_at(offset, len)
    }

    fn append(&mut self, data: &[u8]) -> StorageResult<u64> {
        self.spill_if_needed(data.len() as u64)?;
        self.backend_mut().append(data)
    }

    fn flush(&mut self) -> StorageResult<()> {
        self.backend_mut().flush()
    }

    fn size(&self) -> StorageResult<u64> {
        self.backend().size()
    }

    fn sync(&mut self) -> StorageResult<()> {
        self.backend_mut().sync()
    }

    fn truncate(&mut self, new_size: u64) -> StorageResult<()> {
        self.backend_mut().truncate(new_size)
    }

    fn backend_name(&self) -> &'static str {
        match self.inner {
            Spool::Memory(_) => "spooled-memory",
            Spool::File(_) => "spooled-file",
        }
    }

    fn splice(&mut self, offset: u64, remove: u64, data: &[u8]) -> StorageResult<()> {
        self.spill_if_needed((data.len() as u64).saturating_sub(remove))?;
        self.backend_mut().splice(offset, remove, data)
    }
}
