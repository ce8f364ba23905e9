//! Property-based test generators using proptest.
//!
//! Keys are drawn from a small alphabet so that sequences overwrite and
//! delete existing members often.

use proptest::prelude::*;
use serde_json::{Map, Value};

/// Strategy for member keys, including characters that need escaping.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => prop::string::string_regex("[a-e]{1,2}").expect("Invalid regex"),
        1 => prop::string::string_regex(r#"[a-c"\\/é ]{1,3}"#).expect("Invalid regex"),
    ]
}

/// Strategy for variable prefixes.
pub fn prefix_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop::string::string_regex("[a-z][a-z0-9_.]{0,9}").expect("Invalid regex"))
}

/// Strategy for scalar JSON values.
pub fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        any::<f64>()
            .prop_filter("JSON has no NaN or infinity", |f| f.is_finite())
            .prop_map(Value::from),
        prop::string::string_regex("[ -~]{0,12}")
            .expect("Invalid regex")
            .prop_map(Value::String),
    ]
}

/// Strategy for arbitrary JSON values, nested up to three levels.
pub fn json_value_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec(("[a-z0-9]{1,4}", inner), 0..4)
                .prop_map(|pairs| Value::Object(pairs.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

/// One operation applied to a buffer.
#[derive(Debug, Clone)]
pub enum BufferOperation {
    /// Set a member
    Set {
        /// Member key
        key: String,
        /// New value
        value: Value,
    },
    /// Delete a member
    Delete {
        /// Member key
        key: String,
    },
    /// Read a member back
    Get {
        /// Member key
        key: String,
    },
    /// Set or clear the variable prefix
    SetPrefix {
        /// New prefix
        prefix: Option<String>,
    },
}

/// Strategy for generating buffer operations.
pub fn operation_strategy() -> impl Strategy<Value = BufferOperation> {
    prop_oneof![
        4 => (key_strategy(), json_value_strategy())
            .prop_map(|(key, value)| BufferOperation::Set { key, value }),
        2 => key_strategy().prop_map(|key| BufferOperation::Delete { key }),
        2 => key_strategy().prop_map(|key| BufferOperation::Get { key }),
        1 => prefix_strategy().prop_map(|prefix| BufferOperation::SetPrefix { prefix }),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<BufferOperation>> {
    prop::collection::vec(operation_strategy(), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 128,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Few cases, for strategies that touch temporary files.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 24,
            max_shrink_iters: 200,
        }
    }

    /// Many cases, for in-memory runs.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 512,
            max_shrink_iters: 5000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn keys_are_not_empty(key in key_strategy()) {
            prop_assert!(!key.is_empty());
        }

        #[test]
        fn values_serialize(value in json_value_strategy()) {
            let text = serde_json::to_string(&value).unwrap();
            let parsed: Value = serde_json::from_str(&text).unwrap();
            prop_assert_eq!(parsed, value);
        }

        #[test]
        fn prefixes_have_no_brace(prefix in prefix_strategy()) {
            if let Some(name) = prefix {
                prop_assert!(!name.contains('{') && !name.contains('='), "name contains a forbidden character: {:?}", name);
            }
        }
    }
}
