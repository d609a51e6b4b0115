#![forbid(unsafe_code)]

//! Parsing and formatting shared by the field models.
//!
//! Numeric parsing is deliberately strict: these functions validate what a
//! user typed, so anything the pattern does not admit is `None` rather than
//! a best-effort guess. Formatting produces en-US style grouping
//! (`1,234,567.89`); the parse side strips that grouping back out where the
//! original input could legitimately contain it.
//!
//! # Invariants
//!
//! 1. `parse_int` admits exactly an optional leading minus followed by ASCII
//!    digits. No grouping separators, no whitespace, no exponent.
//! 2. `parse_decimal` strips grouping commas first, then admits at most one
//!    dot, a leading minus, and digits. `"-"`, `"."`, and `""` are `None`.
//! 3. `format_decimal(parse_decimal(s), d)` is stable: formatting an
//!    already-rounded value does not change it.
//! 4. `group_digits` only ever inserts commas; it never reorders or drops
//!    characters.

use bindery_core::Value;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::TextCase;

/// Apply a case transform to a typed value.
#[must_use]
pub fn apply_text_case(value: &str, case: TextCase) -> String {
    match case {
        TextCase::Upper => value.to_uppercase(),
        TextCase::Lower => value.to_lowercase(),
        TextCase::Capitalize => capitalize_words(value),
        TextCase::None => value.to_string(),
    }
}

/// Uppercase the first alphabetic character of every word, leaving
/// everything else (digits, punctuation, inner letters) alone.
fn capitalize_words(value: &str) -> String {
    value
        .split_word_bounds()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) if first.is_alphabetic() => {
                    first.to_uppercase().chain(chars).collect::<String>()
                }
                _ => word.to_string(),
            }
        })
        .collect()
}

/// Strict integer parse: optional leading `-`, then one or more ASCII
/// digits. Grouping separators are rejected; values beyond `i64` range are
/// rejected.
#[must_use]
pub fn parse_int(raw: &str) -> Option<i64> {
    if raw.is_empty() {
        return None;
    }
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<i64>().ok()
}

/// Whether `raw` is a plausible integer prefix while typing: empty, a lone
/// `-`, or a strict integer.
#[must_use]
pub fn is_partial_int(raw: &str) -> bool {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    digits.bytes().all(|b| b.is_ascii_digit())
}

/// Decimal parse: grouping commas are stripped, then the value must be an
/// optional leading `-`, digits, and at most one dot.
#[must_use]
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let stripped: String = raw.chars().filter(|&c| c != ',').collect();
    if stripped.is_empty() {
        return None;
    }
    let digits = stripped.strip_prefix('-').unwrap_or(&stripped);
    let mut dots = 0usize;
    for c in digits.chars() {
        match c {
            '.' => dots += 1,
            '0'..='9' => {}
            _ => return None,
        }
    }
    if dots > 1 {
        return None;
    }
    stripped.parse::<f64>().ok()
}

/// Insert en-US thousands separators into a digit run.
fn group_digits(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(bytes.len() + bytes.len() / 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*b as char);
    }
    out
}

/// Format an integer, with en-US grouping unless `no_format` is set.
#[must_use]
pub fn format_int(value: i64, no_format: bool) -> String {
    if no_format {
        return value.to_string();
    }
    let digits = value.unsigned_abs().to_string();
    let grouped = group_digits(&digits);
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Format with exactly `digits` fraction digits and en-US grouping.
#[must_use]
pub fn format_decimal(value: f64, digits: u8) -> String {
    let rendered = format!("{value:.precision$}", precision = digits as usize);
    let negative = rendered.starts_with('-');
    let unsigned = rendered.trim_start_matches('-');
    let (int_part, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_digits(int_part));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Round to `digits` fraction digits via the display representation, so the
/// stored value and the rendered value always agree.
#[must_use]
pub fn round_to_digits(value: f64, digits: u8) -> f64 {
    format!("{value:.precision$}", precision = digits as usize)
        .parse()
        .unwrap_or(value)
}

/// Integer view of a bound value: numbers must be exact integers, strings
/// go through the strict parse, everything else is absent.
#[must_use]
pub fn int_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => parse_int(s),
        _ => None,
    }
}

/// Decimal view of a bound value.
#[must_use]
pub fn decimal_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

/// Text view of a bound value: null is empty, strings are themselves,
/// anything else renders its JSON form.
#[must_use]
pub fn text_from_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
