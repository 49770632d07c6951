//! Property-based tests for the attribute codec and the normalizer.
//!
//! The codec round trip is exercised over generated payloads restricted
//! to the supported value types with no empty collections, the one
//! documented class of values the storage round trip loses.

use http::HeaderMap;
use nestbox_core::{normalize, store::attr};
use proptest::{prelude::*, strategy::BoxedStrategy, test_runner::Config as ProptestConfig};
use serde_json::{Map, Value};

/// Deterministic property test configuration for CI stability.
fn proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: 64,
        timeout: 5000,
        fork: false,
        failure_persistence: None,
        source_file: None,
        ..ProptestConfig::default()
    }
}

/// Scalars the store represents faithfully. Strings are non-empty because
/// empty strings are omitted on write. Boxed so the composed strategies
/// below can be cloned into several positions.
fn scalar_strategy() -> BoxedStrategy<Value> {
    prop_oneof![
        prop::string::string_regex("[a-zA-Z0-9 ._-]{1,16}").unwrap().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1.0e12f64..1.0e12f64).prop_map(|f| serde_json::json!(f)),
        any::<bool>().prop_map(Value::from),
    ]
    .boxed()
}

fn object_of(values: BoxedStrategy<Value>) -> BoxedStrategy<Value> {
    prop::collection::btree_map(
        prop::string::string_regex("[a-z][a-z0-9_]{0,11}").unwrap(),
        values,
        1..4,
    )
    .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<String, Value>>()))
    .boxed()
}

/// Generates objects of scalars, nested non-empty maps, and non-empty
/// lists whose elements are scalars or maps (nested lists are
/// unsupported by the wire model).
fn supported_object_strategy() -> BoxedStrategy<Value> {
    let leaf = scalar_strategy();
    let inner_map = object_of(leaf.clone());
    let list = prop::collection::vec(prop_oneof![leaf.clone(), inner_map.clone()], 1..4)
        .prop_map(Value::Array)
        .boxed();
    object_of(prop_oneof![leaf, inner_map, list].boxed())
}

fn encode_decode(value: &Value) -> Value {
    let Value::Object(map) = value else { panic!("strategy must yield objects") };
    Value::Object(attr::decode_object(&attr::encode_object(map)))
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn codec_round_trips_supported_values(object in supported_object_strategy()) {
        prop_assert_eq!(encode_decode(&object), object);
    }

    #[test]
    fn normalized_json_bodies_survive_the_full_pipeline(object in supported_object_strategy()) {
        let body = serde_json::to_vec(&object).unwrap();
        let captured = normalize("POST", &HeaderMap::new(), &body);

        // Parsing preserves the body exactly.
        prop_assert_eq!(captured.data.as_ref(), Some(&object));

        // And the storage codec preserves the parsed form.
        let stored = serde_json::json!({ "data": captured.data.unwrap() });
        prop_assert_eq!(
            encode_decode(&stored),
            serde_json::json!({ "data": object })
        );
    }

    #[test]
    fn non_json_bodies_always_wrap_as_raw_data(body in "[a-zA-Z ]{1,32}") {
        prop_assume!(serde_json::from_str::<Value>(&body).is_err());

        let captured = normalize("POST", &HeaderMap::new(), body.as_bytes());
        prop_assert_eq!(
            captured.data,
            Some(serde_json::json!({ "rawData": body }))
        );
    }

    #[test]
    fn normalizer_never_panics_on_arbitrary_bytes(body in prop::collection::vec(any::<u8>(), 0..512)) {
        let captured = normalize("POST", &HeaderMap::new(), &body);

        // Whatever came out must survive the codec without panicking too.
        if let Some(data) = captured.data {
            let wrapped = serde_json::json!({ "data": data });
            let _ = encode_decode(&wrapped);
        }
    }
}
