//! CLI command implementations.

pub mod build;
pub mod ops;
pub mod script;
