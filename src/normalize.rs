// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Input normalization shared by every record type.

use serde_json::{Map, Value};

/// Returns a copy of `input` with every mapping key lowercased, at any depth.
///
/// Arrays are walked element by element; scalars and nulls come back as-is.
/// Mappings keep their keys sorted, and uppercase ASCII sorts before
/// lowercase, so when two keys collapse onto the same lowercase form the one
/// already in lowercase wins.
pub fn lowercase_keys(input: &Value) -> Value {
    match input {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.to_lowercase(), lowercase_keys(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(lowercase_keys).collect()),
        other => other.clone(),
    }
}

/// A value counts as absent when it is null or the empty string.
pub fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

pub fn is_present(value: Option<&Value>) -> bool {
    value.is_some_and(|v| !is_absent(v))
}

/// Drops absent entries; `None` when nothing is left.
///
/// `None` means "omit this key from the parent" so a shallow write leaves the
/// stored path alone, which an empty mapping would not.
pub fn prune(fields: Map<String, Value>) -> Option<Map<String, Value>> {
    let kept: Map<String, Value> = fields.into_iter().filter(|(_, v)| !is_absent(v)).collect();
    if kept.is_empty() { None } else { Some(kept) }
}
