//! Temporary-file storage backend.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::Mutex;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};

/// A backend on an anonymous temporary file.
///
/// The OS removes the file once the backend is dropped. Reads take the
/// handle lock because they move the shared file position.
///
/// # Example
///
/// ```rust
/// use streamjson_storage::{StorageBackend, FileBackend};
///
/// let mut backend = FileBackend::temp().unwrap();
/// backend.append(b"{}").unwrap();
/// backend.insert_at(1, b"\"k\":true").unwrap();
/// assert_eq!(backend.read_at(0, 10).unwrap(), b"{\"k\":true}");
/// ```
#[derive(Debug)]
pub struct FileBackend {
    handle: Mutex<File>,
    len: u64,
}

impl FileBackend {
    /// Creates a backend on a fresh anonymous temporary file.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be created.
    pub fn temp() -> StorageResult<Self> {
        Ok(Self {
            handle: Mutex::new(tempfile::tempfile()?),
            len: 0,
        })
    }
}

impl StorageBackend for FileBackend {
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>> {
        let size = self.len;
        if offset.saturating_add(len as u64) > size {
            return Err(StorageError::ReadPastEnd { offset, len, size });
        }

        let mut bytes = vec![0u8; len];
        if len > 0 {
            let mut handle = self.handle.lock();
            handle.seek(SeekFrom::Start(offset))?;
            handle.read_exact(&mut bytes)?;
        }
        Ok(bytes)
    }

    fn append(&mut self, data: &[u8]) -> StorageResult<u64> {
        let at = self.len;
        if !data.is_empty() {
            let handle = self.handle.get_mut();
            handle.seek(SeekFrom::Start(at))?;
            handle.write_all(data)?;
            self.len += data.len() as u64;
        }
        Ok(at)
    }

    fn flush(&mut self) -> StorageResult<()> {
        self.handle.get_mut().flush()?;
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(self.len)
    }

    fn sync(&mut self) -> StorageResult<()> {
        self.handle.get_mut().sync_data()?;
        Ok(())
    }

    fn truncate(&mut self, new_size: u64) -> StorageResult<()> {
        if new_size > self.len {
            return Err(StorageError::invalid_range(new_size, 0, self.len));
        }
        self.handle.get_mut().set_len(new_size)?;
        self.len = new_size;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
