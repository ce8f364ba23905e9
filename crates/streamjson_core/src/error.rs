//! Error types for the buffer.

use std::io;
use streamjson_storage::StorageError;
use thiserror::Error;

/// Result type for buffer operations.
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur while operating a [`crate::StreamJson`] buffer.
#[derive(Debug, Error)]
pub enum BufferError {
    /// The buffer was closed or detached; its store is gone.
    #[error("store unavailable: buffer was closed or detached")]
    StoreUnavailable,

    /// A seek origin other than start, current or end was given.
    #[error("invalid seek mode: {whence}")]
    InvalidSeekMode {
        /// The rejected origin value.
        whence: i32,
    },

    /// A seek would move the cursor outside the content.
    #[error("seek target {target} is outside 0..={length}")]
    SeekOutOfRange {
        /// The computed target position.
        target: i64,
        /// The content length at the time of the seek.
        length: u64,
    },

    /// The underlying store could not complete a write.
    #[error("write failed: {source}")]
    WriteFailed {
        /// The storage failure.
        #[source]
        source: StorageError,
    },

    /// An indexed byte range no longer holds the expected member.
    #[error("corrupted member {key:?}: {message}")]
    Corrupted {
        /// Key of the member.
        key: String,
        /// What was found instead.
        message: String,
    },

    /// A configuration value could not be parsed.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },

    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BufferError {
    /// Creates a write failed error.
    pub fn write_failed(source: StorageError) -> Self {
        Self::WriteFailed { source }
    }

    /// Creates a corrupted member error.
    pub fn corrupted(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Corrupted {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

impl From<BufferError> for io::Error {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::Storage(StorageError::Io(inner)) => inner,
            BufferError::StoreUnavailable => io::Error::new(io::ErrorKind::NotConnected, err),
            BufferError::InvalidSeekMode { .. } | BufferError::SeekOutOfRange { .. } => {
                io::Error::new(io::ErrorKind::InvalidInput, err)
            }
            BufferError::WriteFailed { .. } => io::Error::new(io::ErrorKind::WriteZero, err),
            other => io::Error::new(io::ErrorKind::Other, other),
        }
    }
}
