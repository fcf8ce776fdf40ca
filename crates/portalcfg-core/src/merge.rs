// SPDX-License-Identifier: MIT OR Apache-2.0
//! Recursive object merge and keyed array merge.
//!
//! Every function here borrows its inputs and builds a new tree. The delta
//! side is applied as a patch onto the base side: base-only keys survive,
//! conflicting leaves take the delta value, and recursion only happens where
//! both sides hold a composite of the same kind that has children.

use serde_json::{Map, Number, Value};

/// Merge `delta` onto `base`, returning the merged object.
///
/// Keys present only in `base` are kept untouched and keep their position.
/// Keys present only in `delta` are appended. Keys present on both sides are
/// resolved with [`merge_value`].
#[must_use]
pub fn merge_objects(base: &Map<String, Value>, delta: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, delta_value) in delta {
        let replacement = match merged.get(key) {
            Some(base_value) => merge_value(base_value, delta_value),
            None => delta_value.clone(),
        };
        // Existing keys are replaced in place, preserving base ordering
        merged.insert(key.clone(), replacement);
    }
    merged
}

/// Resolve a key present on both sides of an object merge.
///
/// Recurses when both values are non-empty objects, or both are non-empty
/// arrays (merged position by position). Any other pairing, including an
/// empty composite on either side, is a leaf replacement: the delta wins.
#[must_use]
pub fn merge_value(base: &Value, delta: &Value) -> Value {
    match (base, delta) {
        (Value::Object(b), Value::Object(d)) if !b.is_empty() && !d.is_empty() => {
            Value::Object(merge_objects(b, d))
        }
        (Value::Array(b), Value::Array(d)) if !b.is_empty() && !d.is_empty() => {
            Value::Array(merge_positional(b, d))
        }
        _ => delta.clone(),
    }
}

/// Overlay `delta` onto `base` index by index; the longer side supplies the tail.
fn merge_positional(base: &[Value], delta: &[Value]) -> Vec<Value> {
    let mut merged: Vec<Value> = base
        .iter()
        .zip(delta)
        .map(|(b, d)| merge_value(b, d))
        .collect();
    let tail = if delta.len() > base.len() {
        &delta[base.len()..]
    } else {
        &base[delta.len()..]
    };
    merged.extend_from_slice(tail);
    merged
}

/// Merge two arrays of objects by matching elements on `key`.
///
/// The result is anchored on `base`: it has exactly `base.len()` elements in
/// base order. Each base element is merged with the first delta element
/// whose `key` value equals its own; unmatched base elements pass through.
/// Delta elements with no base counterpart are dropped.
///
/// A missing `delta` returns `base` unchanged. Elements whose `key` is
/// absent, null, or composite never match.
#[must_use]
pub fn merge_arrays_on_key(base: &[Value], delta: Option<&[Value]>, key: &str) -> Vec<Value> {
    let Some(delta) = delta else {
        return base.to_vec();
    };

    base.iter()
        .map(|element| {
            let counterpart = find_counterpart(element, delta, key).and_then(Value::as_object);
            match (element.as_object(), counterpart) {
                (Some(b), Some(d)) => Value::Object(merge_objects(b, d)),
                _ => element.clone(),
            }
        })
        .collect()
}

fn find_counterpart<'a>(element: &Value, candidates: &'a [Value], key: &str) -> Option<&'a Value> {
    let id = key_of(element, key)?;
    candidates
        .iter()
        .find(|candidate| key_of(candidate, key).is_some_and(|other| keys_equal(id, other)))
}

fn key_of<'a>(element: &'a Value, key: &str) -> Option<&'a Value> {
    match element.get(key)? {
        id @ (Value::String(_) | Value::Number(_) | Value::Bool(_)) => Some(id),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn keys_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        _ => a == b,
    }
}

/// Numeric identity regardless of representation, so `1` matches `1.0`.
#[allow(clippy::float_cmp)]
fn numbers_equal(x: &Number, y: &Number) -> bool {
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
        return a == b;
    }
    match (x.as_f64(), y.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
