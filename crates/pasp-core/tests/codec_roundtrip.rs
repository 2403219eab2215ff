//! Property-based tests for the front matter wire format.
//!
//! Encoding then decoding must give back the same metadata map and the same
//! body for any input, including bodies and string values that contain
//! delimiter lines.

use pasp_core::codec::{decode, encode};
use proptest::prelude::*;
use serde_yaml::{Mapping, Value};

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        "[a-zA-Z0-9 _:#-]{0,16}".prop_map(Value::String),
        // Multi-line strings, some lines being a bare delimiter
        "(---|[a-z0-9]{1,8})(\n(---|[a-z0-9]{1,8})){1,3}".prop_map(Value::String),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Sequence),
            mapping(inner).prop_map(Value::Mapping),
        ]
    })
}

fn mapping(values: impl Strategy<Value = Value>) -> impl Strategy<Value = Mapping> {
    prop::collection::btree_map("[a-z_]{1,8}", values, 0..5).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(key, value)| (Value::String(key), value))
            .collect()
    })
}

fn body() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ -~\n]{0,64}",
        "[ -~\n]{0,16}".prop_map(|tail| format!("```\n---\n{}\n---\n```", tail)),
        "[a-z\n]{0,16}".prop_map(|tail| format!("\n\n---\n{}", tail)),
        Just("\r\n".to_string()),
        Just("...".to_string()),
    ]
}

proptest! {
    /// Property: decode(encode(m, b)) == (m, b) for every metadata map and body.
    #[test]
    fn prop_roundtrip(metadata in mapping(value()), body in body()) {
        let wire = encode(&metadata, &body).unwrap();
        let decoded = decode(&wire);

        prop_assert!(decoded.error.is_none(), "decode failed: {:?}", decoded.error);
        prop_assert_eq!(decoded.metadata, metadata);
        prop_assert_eq!(decoded.body, body);
    }

    /// Property: text without an opening delimiter line is returned untouched.
    #[test]
    fn prop_plain_text_returned_whole(text in "[a-z][ -~\n]{0,64}") {
        let decoded = decode(&text);

        prop_assert!(decoded.error.is_some());
        prop_assert!(decoded.metadata.is_empty());
        prop_assert_eq!(decoded.body, text);
    }
}
