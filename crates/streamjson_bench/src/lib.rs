//! Benchmark utilities.

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::{json, Value};
use streamjson_core::{Config, StreamJson};

/// Generate random bytes of the specified size.
pub fn random_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

/// Generate a random alphanumeric string.
pub fn random_text(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate a member value carrying roughly `payload` bytes of text.
pub fn member_value(payload: usize) -> Value {
    let mut rng = rand::thread_rng();
    json!({
        "id": rng.gen::<u32>(),
        "active": rng.gen::<bool>(),
        "body": random_text(payload),
    })
}

/// Build a buffer holding `count` members `m0..` with `payload`-byte values.
pub fn populated(config: Config, count: usize, payload: usize) -> StreamJson {
    let mut buffer = StreamJson::with_config(config).expect("Failed to create buffer");
    for i in 0..count {
        buffer
            .set(&format!("m{i}"), &member_value(payload))
            .expect("Failed to set member");
    }
    buffer
}
