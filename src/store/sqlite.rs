// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{DocumentStore, assign, detach, lookup, merge_into, next_id, segments};
use crate::error::StoreError;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

/// SQLite-backed tree. Each top-level key (`users`, `lastUserId`, ...) is one
/// row holding its subtree as JSON; every call runs in its own transaction,
/// and writers take the database lock up front so counters stay atomic
/// across processes sharing the file.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
    location: String,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::init(conn, path.display().to_string())
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?, ":memory:".to_string())
    }

    fn init(conn: Connection, location: String) -> Result<Self, StoreError> {
        conn.busy_timeout(Duration::from_secs(5))?;
        init_schema(&conn)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
            location,
        })
    }

    /// Loads the branch `segs` lives in, hands it to `f` rooted the same way
    /// as the whole tree, and writes it back when `write` is set.
    fn with_branch<T>(
        &self,
        path: &str,
        write: bool,
        f: impl FnOnce(&mut Value, &[String]) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let segs = segments(path)?;
        let top = segs[0].clone();

        let mut conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let behavior = if write {
            TransactionBehavior::Immediate
        } else {
            TransactionBehavior::Deferred
        };
        let tx = conn.transaction_with_behavior(behavior)?;

        let stored: Option<String> = tx
            .query_row("SELECT doc FROM documents WHERE key=?1", params![&top], |r| {
                r.get(0)
            })
            .optional()?;
        let mut root = Value::Object(Map::new());
        if let Some(doc) = stored {
            assign(&mut root, std::slice::from_ref(&top), serde_json::from_str(&doc)?);
        }

        let out = f(&mut root, &segs)?;

        if write {
            match root.get(&top) {
                Some(branch) => {
                    tx.execute(
                        "INSERT INTO documents(key, doc) VALUES (?1, ?2)
                         ON CONFLICT(key) DO UPDATE SET doc=excluded.doc, updated_at=datetime('now')",
                        params![&top, serde_json::to_string(branch)?],
                    )?;
                }
                None => {
                    tx.execute("DELETE FROM documents WHERE key=?1", params![&top])?;
                }
            }
        }
        tx.commit()?;
        Ok(out)
    }
}

fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS documents(
        key TEXT PRIMARY KEY,
        doc TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    Ok(())
}

impl DocumentStore for SqliteStore {
    fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        self.with_branch(path, false, |root, segs| Ok(lookup(root, segs).cloned()))
    }

    fn set(&self, path: &str, value: &Value) -> Result<(), StoreError> {
        self.with_branch(path, true, |root, segs| {
            assign(root, segs, value.clone());
            Ok(())
        })
    }

    fn update(&self, path: &str, fields: &Map<String, Value>) -> Result<(), StoreError> {
        self.with_branch(path, true, |root, segs| {
            merge_into(root, segs, fields);
            Ok(())
        })
    }

    fn remove(&self, path: &str) -> Result<(), StoreError> {
        self.with_branch(path, true, |root, segs| {
            detach(root, segs);
            Ok(())
        })
    }

    fn allocate_id(&self, counter: &str) -> Result<u64, StoreError> {
        self.with_branch(counter, true, |root, segs| {
            let id = next_id(counter, lookup(root, segs))?;
            assign(root, segs, Value::from(id));
            Ok(id)
        })
    }

    fn describe(&self) -> String {
        format!("sqlite database at {}", self.location)
    }
}
