//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Attempted to read beyond the end of storage.
    #[error("read beyond end of storage: offset {offset}, len {len}, size {size}")]
    ReadPastEnd {
        /// The requested read offset.
        offset: u64,
        /// The requested read length.
        len: usize,
        /// The current storage size.
        size: u64,
    },

    /// A splice or truncate addressed bytes that do not exist.
    #[error("invalid range: offset {offset}, len {len}, size {size}")]
    InvalidRange {
        /// Start of the addressed range.
        offset: u64,
        /// Length of the addressed range.
        len: u64,
        /// The current storage size.
        size: u64,
    },
}

impl StorageError {
    /// Creates an invalid range error.
    #[must_use]
    pub fn invalid_range(offset: u64, len: u64, size: u64) -> Self {
        Self::InvalidRange { offset, len, size }
    }
}
