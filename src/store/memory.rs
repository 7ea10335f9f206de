// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{DocumentStore, assign, detach, lookup, merge_into, next_id, segments};
use crate::error::StoreError;
use serde_json::{Map, Value};
use std::sync::Mutex;

/// Whole tree held in process memory behind one lock.
#[derive(Debug)]
pub struct MemoryStore {
    root: Mutex<Value>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore {
            root: Mutex::new(Value::Object(Map::new())),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything stored.
    pub fn snapshot(&self) -> Result<Value, StoreError> {
        self.with_root(|root| Ok(root.clone()))
    }

    fn with_root<T>(&self, f: impl FnOnce(&mut Value) -> Result<T, StoreError>) -> Result<T, StoreError> {
        let mut root = self.root.lock().map_err(|_| StoreError::Poisoned)?;
        f(&mut root)
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let segs = segments(path)?;
        self.with_root(|root| Ok(lookup(root, &segs).cloned()))
    }

    fn set(&self, path: &str, value: &Value) -> Result<(), StoreError> {
        let segs = segments(path)?;
        self.with_root(|root| {
            assign(root, &segs, value.clone());
            Ok(())
        })
    }

    fn update(&self, path: &str, fields: &Map<String, Value>) -> Result<(), StoreError> {
        let segs = segments(path)?;
        self.with_root(|root| {
            merge_into(root, &segs, fields);
            Ok(())
        })
    }

    fn remove(&self, path: &str) -> Result<(), StoreError> {
        let segs = segments(path)?;
        self.with_root(|root| {
            detach(root, &segs);
            Ok(())
        })
    }

    fn allocate_id(&self, counter: &str) -> Result<u64, StoreError> {
        let segs = segments(counter)?;
        self.with_root(|root| {
            let id = next_id(counter, lookup(root, &segs))?;
            assign(root, &segs, Value::from(id));
            Ok(id)
        })
    }

    fn describe(&self) -> String {
        "in-memory store".to_string()
    }
}
