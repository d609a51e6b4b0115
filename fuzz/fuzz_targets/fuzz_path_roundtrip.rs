#![no_main]

//! Structured roundtrip: a stored value is found again under the same path,
//! and every ancestor along the way is a mapping.

use arbitrary::Arbitrary;
use bindery_core::path::{self, KeyPath};
use libfuzzer_sys::fuzz_target;
use serde_json::{Map, Value};

#[derive(Arbitrary, Debug)]
struct Case {
    segments: Vec<String>,
    payload: u32,
}

fuzz_target!(|case: Case| {
    // Dots are separators; drop them from segment names and skip empties.
    let segments: Vec<String> = case
        .segments
        .into_iter()
        .take(6)
        .map(|s| s.replace('.', ""))
        .filter(|s| !s.is_empty())
        .collect();
    if segments.is_empty() {
        return;
    }

    let joined = segments.join(".");
    let payload = Value::from(u64::from(case.payload));
    let mut data = Map::new();
    path::store(&mut data, KeyPath::new(&joined), payload.clone());

    assert_eq!(path::lookup(&data, KeyPath::new(&joined)), Some(&payload));

    for prefix_len in 1..segments.len() {
        let prefix = segments[..prefix_len].join(".");
        let ancestor = path::lookup(&data, KeyPath::new(&prefix));
        assert!(matches!(ancestor, Some(Value::Object(_))));
    }
});
