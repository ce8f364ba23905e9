//! Operation syntax shared by `build` and `script`.

use serde_json::Value;
use std::str::FromStr;
use streamjson_core::{BufferResult, StreamJson};
use thiserror::Error;
use tracing::debug;

/// Error for a malformed operation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OpError {
    /// Nothing to parse.
    #[error("empty operation")]
    Empty,

    /// `-` or `=value` without a key.
    #[error("missing key in operation {0:?}")]
    MissingKey(String),

    /// Not a set, delete or prefix operation.
    #[error("unrecognized operation {0:?} (expected key=value, -key, @name or @)")]
    Unrecognized(String),
}

/// One edit to apply to a buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// `key=<json>`
    Set {
        /// Member key
        key: String,
        /// Parsed value
        value: Value,
    },
    /// `-key`
    Delete {
        /// Member key
        key: String,
    },
    /// `@name`, or `@` to clear
    Prefix(Option<String>),
}

impl FromStr for Op {
    type Err = OpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(OpError::Empty);
        }

        if let Some(name) = s.strip_prefix('@') {
            let name = (!name.is_empty()).then(|| name.to_owned());
            return Ok(Self::Prefix(name));
        }

        if let Some(key) = s.strip_prefix('-') {
            if key.is_empty() {
                return Err(OpError::MissingKey(s.to_owned()));
            }
            return Ok(Self::Delete {
                key: key.to_owned(),
            });
        }

        let Some((key, raw)) = s.split_once('=') else {
            return Err(OpError::Unrecognized(s.to_owned()));
        };
        if key.is_empty() {
            return Err(OpError::MissingKey(s.to_owned()));
        }
        let value =
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()));
        Ok(Self::Set {
            key: key.to_owned(),
            value,
        })
    }
}

impl Op {
    /// Applies the operation to `buffer`.
    pub fn apply(&self, buffer: &mut StreamJson) -> BufferResult<()> {
        debug!(op = ?self, "applying");
        match self {
            Self::Set { key, value } => buffer.set(key, value),
            Self::Delete { key } => buffer.delete(key),
            Self::Prefix(name) => buffer.set_prefix(name.as_deref()),
        }
    }
}

/// Parses every operation, stopping at the first malformed one.
pub fn parse_all<I, S>(ops: I) -> Result<Vec<Op>, OpError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ops.into_iter().map(|op| op.as_ref().parse()).collect()
}
