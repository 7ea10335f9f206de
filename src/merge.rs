// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Turns raw request bodies into records, and folds update bodies into
//! what is already stored.

use crate::error::{ApiError, StoreError};
use crate::models::Record;
use crate::normalize::lowercase_keys;
use serde_json::{Map, Value};

/// Lowercases keys and shapes the result into `R`. No validation.
pub fn shape<R: Record>(raw: &Value) -> Result<R, ApiError> {
    R::shape(&lowercase_keys(raw))
}

/// Record for a create: validated before it is built, and never empty.
pub fn build<R: Record>(raw: &Value) -> Result<R, ApiError> {
    let input = lowercase_keys(raw);
    R::validate(&input)?;
    let record = R::shape(&input)?;
    if record.is_empty() {
        return Err(ApiError::validation(format!(
            "Invalid input: {} object is empty.",
            R::KIND
        )));
    }
    Ok(record)
}

/// Merges `raw` over the stored document `existing` and returns the partial
/// record to hand to a shallow update.
///
/// Each recognised field takes the new value when one is present, otherwise
/// the stored one; fields absent on both sides are left out entirely.
pub fn merge<R: Record>(existing: &Value, raw: &Value) -> Result<Map<String, Value>, ApiError> {
    let stored = decode_stored::<R>(existing)?;
    let incoming = shape::<R>(raw)?;
    incoming.validate_patch()?;
    into_fields(&stored.merge(incoming))
}

fn decode_stored<R: Record>(existing: &Value) -> Result<R, ApiError> {
    let mut doc = existing.clone();
    if let Some(fields) = doc.as_object_mut() {
        R::fold_aliases(fields);
    }
    Ok(serde_json::from_value(doc).map_err(StoreError::from)?)
}

pub fn into_fields<R: Record>(record: &R) -> Result<Map<String, Value>, ApiError> {
    match serde_json::to_value(record).map_err(StoreError::from)? {
        Value::Object(fields) => Ok(fields),
        _ => Ok(Map::new()),
    }
}
