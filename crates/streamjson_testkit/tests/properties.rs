//! Buffer properties checked against the reference model on every store kind.

use proptest::prelude::*;
use serde_json::json;
use streamjson_core::{BufferError, StoreKind, StreamJson, Whence};
use streamjson_testkit::prelude::*;

proptest! {
    #![proptest_config(PropTestConfig::default().to_proptest_config())]

    #[test]
    fn memory_buffer_matches_model(ops in operation_sequence_strategy(1, 40)) {
        let mut harness = ModelHarness::new(StoreKind::Memory);
        for op in &ops {
            harness.apply(op);
        }
    }

    #[test]
    fn set_then_get_round_trips(key in key_strategy(), value in json_value_strategy()) {
        let mut buffer = TestBuffer::memory();
        buffer.set(&key, &value).unwrap();
        prop_assert_eq!(buffer.get(&key).unwrap(), Some(value));
        prop_assert!(buffer.exists(&key));
    }

    #[test]
    fn exists_until_deleted(keys in prop::collection::vec(key_strategy(), 1..8), victim in key_strategy()) {
        let mut buffer = TestBuffer::memory();
        for key in &keys {
            buffer.set(key, &key.len()).unwrap();
        }
        buffer.delete(&victim).unwrap();

        for key in &keys {
            prop_assert_eq!(buffer.exists(key), key != &victim);
        }
        assert_layout(&mut buffer);
    }
}

proptest! {
    #![proptest_config(PropTestConfig::quick().to_proptest_config())]

    #[test]
    fn file_buffer_matches_model(ops in operation_sequence_strategy(1, 30)) {
        let mut harness = ModelHarness::new(StoreKind::TempFile);
        for op in &ops {
            harness.apply(op);
        }
    }

    #[test]
    fn spooled_buffer_matches_model(ops in operation_sequence_strategy(1, 30)) {
        let mut harness = ModelHarness::new(StoreKind::Spooled);
        for op in &ops {
            harness.apply(op);
        }
    }
}

#[test]
fn overwrite_moves_member_last_on_every_kind() {
    for_each_kind(|buffer| {
        buffer.set("a", &1).unwrap();
        buffer.set("b", &2).unwrap();
        buffer.set("a", &3).unwrap();
        assert_eq!(buffer.contents(), r#"{"b":2,"a":3}"#);
    });
}

#[test]
fn sole_delete_resets_on_every_kind() {
    for_each_kind(|buffer| {
        buffer.set("only", &json!({"x": [1, 2]})).unwrap();
        buffer.delete("only").unwrap();

        assert_eq!(buffer.contents(), "{}");
        assert_eq!(buffer.size(), Some(2));
        buffer.seek(-1, Whence::End).unwrap();
        assert_eq!(buffer.tell().unwrap(), 1);
    });
}

#[test]
fn middle_delete_keeps_later_offsets_on_every_kind() {
    for_each_kind(|buffer| {
        buffer.set("one", &"first").unwrap();
        buffer.set("two", &json!({"nested": true})).unwrap();
        buffer.set("three", &[3, 3, 3]).unwrap();

        buffer.delete("two").unwrap();
        assert_eq!(buffer.get("three").unwrap(), Some(json!([3, 3, 3])));
        assert_eq!(buffer.get("one").unwrap(), Some(json!("first")));

        buffer.set("four", &4).unwrap();
        buffer.delete("one").unwrap();
        assert_eq!(buffer.get("three").unwrap(), Some(json!([3, 3, 3])));
        assert_eq!(buffer.get("four").unwrap(), Some(json!(4)));
        assert_layout(buffer);
    });
}

#[test]
fn stream_tail_after_set() {
    for_each_kind(|buffer| {
        buffer.set("foo", "bar").unwrap();
        assert_eq!(buffer.contents(), r#"{"foo":"bar"}"#);
        buffer.seek(-6, Whence::End).unwrap();
        assert_eq!(buffer.get_contents().unwrap(), br#""bar"}"#);
    });
}

#[test]
fn prefix_sequence_on_every_kind() {
    for_each_kind(|buffer| {
        buffer.set_prefix(Some("test")).unwrap();
        assert_eq!(buffer.contents(), "test={}");
        buffer.set("key", "label").unwrap();
        assert_eq!(buffer.contents(), r#"test={"key":"label"}"#);

        for prefix in [Some("diff"), Some("nowlonger"), Some("shorter"), None] {
            buffer.set_prefix(prefix).unwrap();
            assert_eq!(buffer.get("key").unwrap(), Some(json!("label")));
            assert_layout(buffer);
        }
        assert_eq!(buffer.contents(), r#"{"key":"label"}"#);
    });
}

#[test]
fn delete_with_prefix_keeps_prefix_on_every_kind() {
    for_each_kind(|buffer| {
        buffer.set_prefix(Some("data")).unwrap();
        buffer.set("a", &1).unwrap();
        buffer.set("b", &2).unwrap();
        buffer.delete("a").unwrap();
        assert_eq!(buffer.contents(), r#"data={"b":2}"#);
        buffer.delete("b").unwrap();
        assert_eq!(buffer.contents(), "data={}");
    });
}

#[test]
fn detached_buffer_is_inert_on_every_kind() {
    for_each_kind(|buffer| {
        buffer.set("test", "testvalue").unwrap();
        let store = buffer.detach().expect("store");
        assert_eq!(detached_text(store.as_ref()), r#"{"test":"testvalue"}"#);

        assert!(!buffer.exists("test"));
        assert!(buffer.size().is_none());
        assert!(matches!(buffer.read(1), Err(BufferError::StoreUnavailable)));
        assert!(matches!(buffer.write(b"x"), Err(BufferError::StoreUnavailable)));
        assert!(matches!(
            buffer.seek(0, Whence::Start),
            Err(BufferError::StoreUnavailable)
        ));
        assert!(matches!(buffer.tell(), Err(BufferError::StoreUnavailable)));
        assert!(matches!(buffer.get("test"), Err(BufferError::StoreUnavailable)));
        assert!(matches!(buffer.set("x", &1), Err(BufferError::StoreUnavailable)));
        assert!(matches!(buffer.delete("test"), Err(BufferError::StoreUnavailable)));
        assert_eq!(buffer.to_string(), "");
    });
}

#[test]
fn spooled_store_spills_mid_sequence() {
    let mut harness = ModelHarness::new(StoreKind::Spooled);
    assert_eq!(harness.buffer.backend_name(), "spooled-memory");

    let mut spilled_at = None;
    for i in 0..16 {
        harness.apply(&BufferOperation::Set {
            key: format!("k{i}"),
            value: json!({ "n": i, "tag": "x".repeat(4) }),
        });
        if spilled_at.is_none() && harness.buffer.backend_name() == "spooled-file" {
            spilled_at = Some(i);
        }
    }
    assert!(spilled_at.is_some_and(|i| i > 0), "Store never spilled");

    harness.apply(&BufferOperation::Delete { key: "k3".into() });
    harness.apply(&BufferOperation::SetPrefix {
        prefix: Some("after".into()),
    });
    harness.apply(&BufferOperation::Get { key: "k15".into() });
}

#[test]
fn config_threshold_controls_spill() {
    let mut buffer = TestBuffer::spooled(1024);
    buffer.set("small", &1).unwrap();
    assert_eq!(buffer.backend_name(), "spooled-memory");

    let mut big = StreamJson::with_config(buffer.config().clone()).unwrap();
    big.set("large", &"y".repeat(2048)).unwrap();
    assert_eq!(big.metadata().unwrap().backend, "spooled-file");
}
