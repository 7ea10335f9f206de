// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The five operations every record type supports, expressed against a
//! [`DocumentStore`]. Nothing here logs; callers decide what to report.

use crate::error::ApiError;
use crate::merge;
use crate::models::{EntityKind, Record};
use crate::store::{DocumentStore, is_valid_key};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Acknowledgement returned by create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt<I> {
    pub id: I,
    pub message: String,
}

fn record_path(kind: EntityKind, id: &str) -> String {
    format!("{}/{}", kind.collection(), id)
}

fn check_id(kind: EntityKind, id: &str) -> Result<(), ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{} ID is required", kind)));
    }
    if !is_valid_key(id) {
        return Err(ApiError::BadRequest(format!("Invalid {} ID '{}'", kind, id)));
    }
    Ok(())
}

/// Every stored record of this kind keyed by id, or `[]` when there are none.
pub fn list<R: Record>(store: &dyn DocumentStore) -> Result<Value, ApiError> {
    list_kind(store, R::KIND)
}

pub fn list_kind(store: &dyn DocumentStore, kind: EntityKind) -> Result<Value, ApiError> {
    Ok(store
        .get(kind.collection())?
        .unwrap_or_else(|| Value::Array(Vec::new())))
}

pub fn fetch<R: Record>(store: &dyn DocumentStore, id: &str) -> Result<Value, ApiError> {
    check_id(R::KIND, id)?;
    store
        .get(&record_path(R::KIND, id))?
        .ok_or_else(|| ApiError::NotFound {
            kind: R::KIND,
            id: id.to_string(),
        })
}

/// Validates and shapes `body`, then writes it under a freshly allocated id.
/// Nothing is allocated or written when the body is rejected.
pub fn create<R: Record>(store: &dyn DocumentStore, body: &Value) -> Result<Receipt<u64>, ApiError> {
    let record: R = merge::build(body)?;
    let doc = Value::Object(merge::into_fields(&record)?);
    let id = store.allocate_id(R::KIND.counter())?;
    store.set(&record_path(R::KIND, &id.to_string()), &doc)?;
    Ok(Receipt {
        id,
        message: format!("{} created", R::KIND),
    })
}

/// Read, merge, shallow write. Not transactional: two updates racing on the
/// same record both land, field by field, last write winning.
pub fn update<R: Record>(
    store: &dyn DocumentStore,
    id: &str,
    body: &Value,
) -> Result<Receipt<String>, ApiError> {
    let existing = fetch::<R>(store, id)?;
    let fields = merge::merge::<R>(&existing, body)?;
    store.update(&record_path(R::KIND, id), &fields)?;
    Ok(Receipt {
        id: id.to_string(),
        message: format!("{} updated", R::KIND),
    })
}

pub fn delete<R: Record>(store: &dyn DocumentStore, id: &str) -> Result<(), ApiError> {
    fetch::<R>(store, id)?;
    store.remove(&record_path(R::KIND, id))?;
    Ok(())
}

/// `(id, record)` pairs of a listed collection. The hosted store may hand
/// back dense numeric collections as arrays; holes are skipped.
pub fn entries(collection: &Value) -> Vec<(String, &Value)> {
    match collection {
        Value::Object(map) => map.iter().map(|(id, v)| (id.clone(), v)).collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_null())
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => Vec::new(),
    }
}
