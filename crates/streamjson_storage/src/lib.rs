//! # StreamJSON Storage
//!
//! Backing store trait and implementations for StreamJSON.
//!
//! This crate provides the lowest-level storage abstraction for the
//! StreamJSON buffer. Storage backends are **opaque byte stores** - they do
//! not interpret the JSON text they hold.
//!
//! ## Design Principles
//!
//! - Backends are simple byte stores (read, append, truncate, splice)
//! - Writes in the middle of the store are *inserts*: bytes after the write
//!   position are preserved and moved behind the inserted bytes
//! - No knowledge of JSON, keys or prefixes
//! - Must be `Send + Sync`
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - Vector-backed, splices with a direct memory move
//! - [`FileBackend`] - Anonymous temporary file, removed on drop
//! - [`SpooledBackend`] - Memory until a size threshold, then a temp file
//!
//! ## Example
//!
//! ```rust
//! use streamjson_storage::{StorageBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! backend.append(b"{}").unwrap();
//! backend.insert_at(1, b"\"a\":1").unwrap();
//! assert_eq!(backend.read_at(0, 7).unwrap(), b"{\"a\":1}");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod copy;
mod error;
mod file;
mod memory;
mod spooled;

pub use backend::StorageBackend;
pub use copy::{copy_range, COPY_CHUNK_SIZE};
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
pub use spooled::{SpooledBackend, DEFAULT_SPILL_THRESHOLD};
