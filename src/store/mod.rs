// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Key-path document storage.
//!
//! Records live at `/<collection>/<id>` and id counters at `/<counterKey>`.
//! Every backend honours the same rules: a null (or empty mapping) written
//! anywhere removes that path, and removing the last child of a mapping
//! removes the mapping too.

pub mod firebase;
pub mod memory;
pub mod sqlite;

pub use firebase::FirebaseStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::StoreError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

/// First id handed out by a fresh counter.
pub const FIRST_ID: u64 = 100;

static KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^.#$\[\]/\p{Cc}]+$").expect("key pattern compiles"));

/// Persistence port. Calls block; async callers should move them off the
/// reactor.
pub trait DocumentStore: Send + Sync {
    /// Subtree at `path`, or `None` when nothing is stored there.
    fn get(&self, path: &str) -> Result<Option<Value>, StoreError>;

    /// Replaces the subtree at `path`.
    fn set(&self, path: &str, value: &Value) -> Result<(), StoreError>;

    /// Shallow merge: each entry of `fields` replaces `path/<key>`,
    /// a null entry removes it, and siblings not named are untouched.
    fn update(&self, path: &str, fields: &Map<String, Value>) -> Result<(), StoreError>;

    fn remove(&self, path: &str) -> Result<(), StoreError>;

    /// Atomically bumps the counter at `counter` and returns the new value.
    /// A missing counter starts at [`FIRST_ID`].
    fn allocate_id(&self, counter: &str) -> Result<u64, StoreError>;

    /// Human readable location, for operator output.
    fn describe(&self) -> String;
}

pub fn is_valid_key(key: &str) -> bool {
    KEY.is_match(key)
}

/// Splits a `/`-separated path into validated keys.
pub fn segments(path: &str) -> Result<Vec<String>, StoreError> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return Err(StoreError::InvalidPath(path.to_string()));
    }
    trimmed
        .split('/')
        .map(|key| {
            if is_valid_key(key) {
                Ok(key.to_string())
            } else {
                Err(StoreError::InvalidPath(path.to_string()))
            }
        })
        .collect()
}

/// Value the counter takes after `current`.
pub fn next_id(counter: &str, current: Option<&Value>) -> Result<u64, StoreError> {
    match current {
        None | Some(Value::Null) => Ok(FIRST_ID),
        Some(v) => v
            .as_u64()
            .and_then(|n| n.checked_add(1))
            .ok_or_else(|| StoreError::CorruptCounter(counter.to_string())),
    }
}

fn is_vacant(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

pub(crate) fn lookup<'a>(root: &'a Value, segs: &[String]) -> Option<&'a Value> {
    segs.iter()
        .try_fold(root, |node, key| node.as_object()?.get(key))
}

pub(crate) fn assign(root: &mut Value, segs: &[String], value: Value) {
    if is_vacant(&value) {
        detach(root, segs);
        return;
    }
    let mut node = root;
    for key in segs {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        node = &mut node[key.as_str()];
    }
    *node = value;
}

pub(crate) fn detach(node: &mut Value, segs: &[String]) {
    let Some((first, rest)) = segs.split_first() else {
        return;
    };
    let Some(map) = node.as_object_mut() else {
        return;
    };
    if rest.is_empty() {
        map.remove(first);
        return;
    }
    if let Some(child) = map.get_mut(first) {
        detach(child, rest);
        if is_vacant(child) {
            map.remove(first);
        }
    }
}

pub(crate) fn merge_into(root: &mut Value, segs: &[String], fields: &Map<String, Value>) {
    for (key, value) in fields {
        let mut path = segs.to_vec();
        path.push(key.clone());
        assign(root, &path, value.clone());
    }
}
