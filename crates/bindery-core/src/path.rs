#![forbid(unsafe_code)]

//! Dotted-path addressing into the nested data tree.
//!
//! A [`KeyPath`] is a borrowed, dot-delimited string (`"customer.address.city"`)
//! naming a location inside an [`EntityData`] tree. Paths carry no escaping:
//! every `.` is a separator, so keys themselves must not contain dots.
//!
//! [`lookup`] walks the tree read-only and short-circuits to `None` the moment
//! a segment is missing or a non-terminal segment does not resolve to a
//! mapping. [`store`] walks the same segments creating (or overwriting)
//! intermediate mappings as needed, then writes the value under the final
//! segment.
//!
//! # Invariants
//!
//! 1. The empty path addresses nothing: `lookup` returns `None` and `store`
//!    is a silent no-op.
//! 2. `store` never fails: any intermediate slot that is absent, or holds a
//!    non-mapping value (scalar, array, null), is replaced with a fresh empty
//!    mapping before descent continues.
//! 3. After `store(data, p, v)`, `lookup(data, p)` yields `v` for any
//!    non-empty path whose segments are all non-empty.
//! 4. Only mappings are traversed. Arrays are opaque on the read path and are
//!    overwritten like scalars on the write path; there is no index
//!    addressing.
//!
//! # Failure Modes
//!
//! | Input                          | `lookup`        | `store`                      |
//! |--------------------------------|-----------------|------------------------------|
//! | empty path                     | `None`          | no-op                        |
//! | missing intermediate key       | `None`          | mapping created              |
//! | scalar/array intermediate      | `None`          | slot overwritten with `{}`   |
//! | empty segment (`"a..b"`)       | `None`          | `""` used as a literal key   |

use std::fmt;

use serde_json::{Map, Value};

use crate::entity::EntityData;

/// A borrowed dot-delimited path into the data tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyPath<'a> {
    raw: &'a str,
}

impl<'a> KeyPath<'a> {
    #[must_use]
    pub fn new(raw: &'a str) -> Self {
        Self { raw }
    }

    /// The empty path addresses nothing at all.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.raw.is_empty()
    }

    #[must_use]
    pub fn as_str(self) -> &'a str {
        self.raw
    }

    /// Iterate the `.`-separated segments, in order.
    ///
    /// Splitting is literal: `"a..b"` yields `["a", "", "b"]`.
    pub fn segments(self) -> impl Iterator<Item = &'a str> {
        self.raw.split('.')
    }
}

impl<'a> From<&'a str> for KeyPath<'a> {
    fn from(raw: &'a str) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for KeyPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw)
    }
}

/// Resolve `path` inside `data`, read-only.
///
/// Returns `None` for the empty path, for any missing segment, and whenever a
/// non-terminal segment resolves to something other than a mapping.
#[must_use]
pub fn lookup<'v>(data: &'v EntityData, path: KeyPath<'_>) -> Option<&'v Value> {
    if path.is_empty() {
        return None;
    }
    let mut segments = path.segments();
    let first = segments.next()?;
    let mut current = data.get(first)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Write `value` at `path` inside `data`, creating intermediate mappings.
///
/// Every non-terminal slot that is absent or holds a non-mapping value is
/// replaced with a fresh empty mapping; existing sibling keys inside mappings
/// that are traversed (not replaced) are untouched. The empty path is a
/// silent no-op.
pub fn store(data: &mut EntityData, path: KeyPath<'_>, value: Value) {
    if path.is_empty() {
        return;
    }
    let segments: Vec<&str> = path.segments().collect();
    let Some((last, ancestors)) = segments.split_last() else {
        return;
    };

    let mut current = data;
    for segment in ancestors {
        let slot = current
            .entry((*segment).to_string())
            .or_insert(Value::Null);
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(next) = slot else {
            unreachable!("non-terminal slot is a mapping after vivification")
        };
        current = next;
    }
    current.insert((*last).to_string(), value);
}
