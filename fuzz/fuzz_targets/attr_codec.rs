#![no_main]

//! Fuzz target for the attribute codec.
//!
//! Parses arbitrary bytes as JSON and, when an object comes out, runs
//! it through the encode and decode paths. The codec must never panic,
//! and decoding an encoded object must yield another object a second
//! encode pass accepts (encoding is idempotent on its own output).

use libfuzzer_sys::fuzz_target;
use nestbox_core::store::attr;
use serde_json::Value;

fuzz_target!(|data: &[u8]| {
    let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(data) else {
        return;
    };

    let encoded = attr::encode_object(&map);
    let decoded = attr::decode_object(&encoded);

    let reencoded = attr::encode_object(&decoded);
    let redecoded = attr::decode_object(&reencoded);
    assert_eq!(decoded, redecoded);
});
