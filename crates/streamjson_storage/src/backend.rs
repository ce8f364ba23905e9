//! Storage backend trait definition.

use crate::error::{StorageError, StorageResult};

/// A low-level backing store for a StreamJSON buffer.
///
/// Storage backends are **opaque byte stores**. They provide simple
/// operations for reading, appending, truncating and splicing data. The
/// buffer owns all interpretation of the bytes - backends never look at the
/// JSON text.
///
/// # Invariants
///
/// - `append` returns the offset where data was written
/// - `read_at` returns exactly the bytes currently stored at that offset
/// - `insert_at` never overwrites: bytes at and after the offset are
///   preserved after the inserted bytes
/// - Backends must be `Send + Sync`
///
/// # Implementors
///
/// - [`super::InMemoryBackend`]
/// - [`super::FileBackend`]
/// - [`super::SpooledBackend`]
pub trait StorageBackend: Send + Sync {
    /// Reads `len` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The offset is beyond the current size
    /// - The read would extend beyond the current size
    /// - An I/O error occurs
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>>;

    /// Appends data to the end of the storage.
    ///
    /// Returns the offset where the data was written.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn append(&mut self, data: &[u8]) -> StorageResult<u64>;

    /// Flushes all pending writes to the underlying medium.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush operation fails.
    fn flush(&mut self) -> StorageResult<()>;

    /// Returns the current size of the storage in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn size(&self) -> StorageResult<u64>;

    /// Syncs all data and metadata to durable storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync operation fails.
    fn sync(&mut self) -> StorageResult<()>;

    /// Truncates the storage to the given size.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The truncation fails
    /// - `new_size` is greater than current size
    fn truncate(&mut self, new_size: u64) -> StorageResult<()>;

    /// Short name of the backend kind, used in metadata and logs.
    fn backend_name(&self) -> &'static str {
        "custom"
    }

    /// Replaces `remove` bytes at `offset` with `data`.
    ///
    /// The default implementation copies the tail after the removed range
    /// into a side buffer, truncates at `offset`, appends `data` and then
    /// appends the tail back. Backends with a cheaper way to move bytes
    /// should override it.
    ///
    /// # Errors
    ///
    /// Returns an error if the range `offset..offset + remove` is not inside
    /// the storage or an I/O error occurs.
    fn splice(&mut self, offset: u64, remove: u64, data: &[u8]) -> StorageResult<()> {
        let size = self.size()?;
        let tail_start = offset.saturating_add(remove);
        if tail_start > size {
            return Err(StorageError::invalid_range(offset, remove, size));
        }

        let tail = self.read_at(tail_start, (size - tail_start) as usize)?;
        self.truncate(offset)?;
        self.append(data)?;
        self.append(&tail)?;
        Ok(())
    }

    /// Inserts `data` at `offset`, shifting the existing bytes from `offset`
    /// onwards behind it.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns an error if `offset` is beyond the current size or an I/O
    /// error occurs.
    fn insert_at(&mut self, offset: u64, data: &[u8]) -> StorageResult<usize> {
        if data.is_empty() {
            return Ok(0);
        }
        self.splice(offset, 0, data)?;
        Ok(data.len())
    }
}

impl StorageBackend for Box<dyn StorageBackend> {
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>> {
        (**self).read_at(offset, len)
    }

    fn append(&mut self, data: &[u8]) -> StorageResult<u64> {
        (**self).append(data)
    }

    fn flush(&mut self) -> StorageResult<()> {
        (**self).flush()
    }

    fn size(&self) -> StorageResult<u64> {
        (**self).size()
    }

    fn sync(&mut self) -> StorageResult<()> {
        (**self).sync()
    }

    fn truncate(&mut self, new_size: u64) -> StorageResult<()> {
        (**self).truncate(new_size)
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    fn splice(&mut self, offset: u64, remove: u64, data: &[u8]) -> StorageResult<()> {
        (**self).splice(offset, remove, data)
    }

    fn insert_at(&mut self, offset: u64, data: &[u8]) -> StorageResult<usize> {
        (**self).insert_at(offset, data)
    }
}
