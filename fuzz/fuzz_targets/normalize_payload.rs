#![no_main]

//! Fuzz target for request payload normalization.
//!
//! Feeds arbitrary bytes through the normalizer to ensure it never
//! panics: strict JSON must parse into structured data, everything
//! else must take the rawData fallback, and the result must always be
//! storable as an object.

use http::HeaderMap;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let headers = HeaderMap::new();
    let captured = nestbox_core::normalize("POST", &headers, data);

    // Normalization is total: empty bodies drop the payload, anything
    // else yields either the parsed document or the rawData envelope.
    if data.is_empty() {
        assert!(captured.data.is_none());
    } else {
        assert!(captured.data.is_some());
    }
});
