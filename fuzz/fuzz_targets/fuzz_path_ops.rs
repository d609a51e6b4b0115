#![no_main]

//! Arbitrary store/lookup sequences over one data tree: must never panic,
//! whatever the path strings look like.

use arbitrary::Arbitrary;
use bindery_core::path::{self, KeyPath};
use libfuzzer_sys::fuzz_target;
use serde_json::{Map, Value};

#[derive(Arbitrary, Debug)]
enum Op<'a> {
    StoreNumber { path: &'a str, value: i64 },
    StoreText { path: &'a str, value: &'a str },
    StoreNull { path: &'a str },
    Lookup { path: &'a str },
}

fuzz_target!(|ops: Vec<Op<'_>>| {
    let mut data = Map::new();
    for op in ops {
        match op {
            Op::StoreNumber { path: p, value } => {
                path::store(&mut data, KeyPath::new(p), Value::from(value));
            }
            Op::StoreText { path: p, value } => {
                path::store(&mut data, KeyPath::new(p), Value::from(value));
            }
            Op::StoreNull { path: p } => {
                path::store(&mut data, KeyPath::new(p), Value::Null);
            }
            Op::Lookup { path: p } => {
                let _ = path::lookup(&data, KeyPath::new(p));
            }
        }
    }
});
