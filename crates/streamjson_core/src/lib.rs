//! # StreamJSON Core
//!
//! An incremental JSON-object buffer.
//!
//! [`StreamJson`] keeps a serialized JSON object (optionally written as a
//! variable assignment, `name={...}`) valid at all times and exposes two views
//! over the same bytes:
//!
//! - a seekable byte stream (`read`, `write`, `seek`, `tell`, `eof`, ...),
//!   also available through `std::io::{Read, Write, Seek}`
//! - a dictionary (`exists`, `get`, `set`, `delete`) that splices single
//!   members in and out without re-serializing the rest of the object
//!
//! Both views share one cursor and one length.
//!
//! ## Example
//!
//! ```rust
//! use streamjson_core::{StreamJson, Whence};
//!
//! let mut buffer = StreamJson::new();
//! buffer.set("foo", "bar").unwrap();
//! assert_eq!(buffer.contents(), r#"{"foo":"bar"}"#);
//!
//! buffer.seek(-6, Whence::End).unwrap();
//! assert_eq!(buffer.get_contents().unwrap(), br#""bar"}"#);
//!
//! buffer.set_prefix(Some("data")).unwrap();
//! assert_eq!(buffer.contents(), r#"data={"foo":"bar"}"#);
//! assert_eq!(buffer.get("foo").unwrap(), Some("bar".into()));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod buffer;
mod config;
mod dictionary;
mod error;
mod index;
mod io;
mod prefix;
mod stream;
#[cfg(test)]
mod testing;

pub use buffer::StreamJson;
pub use config::{Config, StoreKind};
pub use error::{BufferError, BufferResult};
pub use index::{IndexEntry, OffsetIndex, ValueShape};
pub use stream::{StreamMetadata, Whence};

pub use streamjson_storage::StorageBackend;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
