//! # StreamJSON Testkit
//!
//! Test utilities for StreamJSON.
//!
//! This crate provides:
//! - Buffer fixtures for every store kind
//! - Layout checks that parse the buffer text back
//! - Property-based test generators using proptest
//! - An ordered reference model and a harness that checks a buffer
//!   against it after every operation
//!
//! ## Usage
//!
//! ```rust
//! use streamjson_testkit::prelude::*;
//!
//! let mut buffer = TestBuffer::memory();
//! buffer.set("a", &1).unwrap();
//! let members = assert_layout(&mut buffer);
//! assert_eq!(members["a"], 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod model;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::model::*;
}

pub use fixtures::*;
pub use generators::*;
pub use model::*;
