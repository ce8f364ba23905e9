//! Byte-stream view of the buffer.
//!
//! All methods here work on the serialized bytes directly and share the
//! cursor with the dictionary methods. Writes are inserts: nothing after the
//! cursor is overwritten.

use crate::buffer::StreamJson;
use crate::error::{BufferError, BufferResult};
use tracing::{trace, warn};

/// Origin of a [`StreamJson::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    /// From the first byte.
    Start,
    /// From the current cursor.
    Current,
    /// From one past the last byte.
    End,
}

impl TryFrom<i32> for Whence {
    type Error = BufferError;

    /// Maps the POSIX `SEEK_SET`, `SEEK_CUR` and `SEEK_END` values.
    fn try_from(whence: i32) -> BufferResult<Self> {
        match whence {
            0 => Ok(Self::Start),
            1 => Ok(Self::Current),
            2 => Ok(Self::End),
            _ => Err(BufferError::InvalidSeekMode { whence }),
        }
    }
}

/// Snapshot of the stream state, see [`StreamJson::metadata`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamMetadata {
    /// Content length in bytes.
    pub size: u64,
    /// Cursor position.
    pub position: u64,
    /// Number of indexed members.
    pub entries: usize,
    /// Active variable prefix.
    pub prefix: Option<String>,
    /// Name of the backend kind holding the bytes.
    pub backend: &'static str,
}

impl StreamJson {
    /// Reads up to `len` bytes from the cursor and advances past them.
    ///
    /// Fewer bytes are returned near the end; none at the end.
    ///
    /// # Errors
    ///
    /// Fails with [`BufferError::StoreUnavailable`] once closed or detached.
    pub fn read(&mut self, len: usize) -> BufferResult<Vec<u8>> {
        let store = self.store()?;
        let count = (len as u64).min(self.length - self.cursor);
        let bytes = store.read_at(self.cursor, count as usize)?;
        self.cursor += count;
        Ok(bytes)
    }

    /// Inserts `data` at the cursor and advances past it.
    ///
    /// Bytes from the cursor to the end are kept and move behind the new
    /// bytes. Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Fails with [`BufferError::StoreUnavailable`] once closed or detached
    /// and with [`BufferError::WriteFailed`] if the store rejects the write.
    pub fn write(&mut self, data: &[u8]) -> BufferResult<usize> {
        let cursor = self.cursor;
        let written = self
            .store_mut()?
            .insert_at(cursor, data)
            .map_err(BufferError::write_failed)?;
        self.length += written as u64;
        self.cursor += written as u64;
        trace!(at = cursor, written, length = self.length, "insert-write");
        Ok(written)
    }

    /// Moves the cursor and returns the new position.
    ///
    /// # Errors
    ///
    /// Fails with [`BufferError::SeekOutOfRange`] if the target lies outside
    /// the content (the cursor is left untouched), and with
    /// [`BufferError::StoreUnavailable`] once closed or detached.
    pub fn seek(&mut self, offset: i64, whence: Whence) -> BufferResult<u64> {
        self.ensure_available()?;
        let base = match whence {
            Whence::Start => 0,
            Whence::Current => self.cursor as i64,
            Whence::End => self.length as i64,
        };
        let target = base.saturating_add(offset);
        if target < 0 || target as u64 > self.length {
            return Err(BufferError::SeekOutOfRange {
                target,
                length: self.length,
            });
        }
        self.cursor = target as u64;
        Ok(self.cursor)
    }

    /// Like [`StreamJson::seek`], with the origin given as a POSIX `whence`
    /// value (0, 1 or 2).
    ///
    /// # Errors
    ///
    /// Fails with [`BufferError::InvalidSeekMode`] for any other origin.
    pub fn seek_whence(&mut self, offset: i64, whence: i32) -> BufferResult<u64> {
        let whence = Whence::try_from(whence)?;
        self.seek(offset, whence)
    }

    /// Returns the cursor position.
    ///
    /// # Errors
    ///
    /// Fails with [`BufferError::StoreUnavailable`] once closed or detached.
    pub fn tell(&self) -> BufferResult<u64> {
        self.ensure_available()?;
        Ok(self.cursor)
    }

    /// Returns `true` when the cursor is at the end of the content.
    #[must_use]
    pub fn eof(&self) -> bool {
        self.cursor == self.length
    }

    /// Seeks to the first byte.
    ///
    /// # Errors
    ///
    /// Fails with [`BufferError::StoreUnavailable`] once closed or detached.
    pub fn rewind(&mut self) -> BufferResult<()> {
        self.seek(0, Whence::Start).map(|_| ())
    }

    /// Reads everything from the cursor to the end.
    ///
    /// # Errors
    ///
    /// Fails with [`BufferError::StoreUnavailable`] once closed or detached.
    pub fn get_contents(&mut self) -> BufferResult<Vec<u8>> {
        self.ensure_available()?;
        let remaining = self.length - self.cursor;
        self.read(remaining as usize)
    }

    /// Reads the whole content from the start, leaving the cursor at the end.
    ///
    /// Never fails: an inert buffer yields an empty string and a read failure
    /// is logged and yields an empty string.
    pub fn contents(&mut self) -> String {
        if self.store.is_none() {
            return String::new();
        }
        match self.read_all() {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                warn!(%err, "could not read buffer content");
                String::new()
            }
        }
    }

    fn read_all(&mut self) -> BufferResult<Vec<u8>> {
        self.rewind()?;
        let bytes = self.read(self.length as usize)?;
        self.cursor = self.length;
        Ok(bytes)
    }

    /// Content length, or `None` once closed or detached.
    #[must_use]
    pub fn size(&self) -> Option<u64> {
        self.store.as_ref().map(|_| self.length)
    }

    /// Returns `true` until the buffer is closed or detached.
    #[must_use]
    pub fn is_readable(&self) -> bool {
        self.store.is_some()
    }

    /// Returns `true` until the buffer is closed or detached.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.store.is_some()
    }

    /// Returns `true` until the buffer is closed or detached.
    #[must_use]
    pub fn is_seekable(&self) -> bool {
        self.store.is_some()
    }

    /// Describes the stream, or `None` once closed or detached.
    #[must_use]
    pub fn metadata(&self) -> Option<StreamMetadata> {
        let store = self.store.as_deref()?;
        Some(StreamMetadata {
            size: self.length,
            position: self.cursor,
            entries: self.index.len(),
            prefix: self.prefix.clone(),
            backend: store.backend_name(),
        })
    }
}
