//! Test-only store that fails on demand.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use streamjson_storage::{InMemoryBackend, StorageBackend, StorageError, StorageResult};

/// In-memory store whose reads and writes fail while the switch is on.
#[derive(Debug, Default)]
pub(crate) struct FailingStore {
    inner: InMemoryBackend,
    failing: Arc<AtomicBool>,
}

impl FailingStore {
    /// Returns the store and the switch that makes it fail.
    pub(crate) fn new() -> (Self, Arc<AtomicBool>) {
        let store = Self::default();
        let switch = Arc::clone(&store.failing);
        (store, switch)
    }

    fn check(&self) -> StorageResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Io(io::Error::other("device unavailable")));
        }
        Ok(())
    }
}

impl StorageBackend for FailingStore {
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>> {
        self.check()?;
        self.inner.read_at(offset, len)
    }

    fn append(&mut self, data: &[u8]) -> StorageResult<u64> {
        self.check()?;
        self.inner.append(data)
    }

    fn flush(&mut self) -> StorageResult<()> {
        self.inner.flush()
    }

    fn size(&self) -> StorageResult<u64> {
        self.inner.size()
    }

    fn sync(&mut self) -> StorageResult<()> {
        self.inner.sync()
    }

    fn truncate(&mut self, new_size: u64) -> StorageResult<()> {
        self.check()?;
        self.inner.truncate(new_size)
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }

    fn splice(&mut self, offset: u64, remove: u64, data: &[u8]) -> StorageResult<()> {
        self.check()?;
        self.inner.splice(offset, remove, data)
    }
}
