// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fintrack::error::StoreError;
use fintrack::store::{
    DocumentStore, FIRST_ID, FirebaseStore, MemoryStore, SqliteStore, next_id, segments,
};
use serde_json::{Map, json};
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

fn fields(v: serde_json::Value) -> Map<String, serde_json::Value> {
    v.as_object().cloned().unwrap()
}

/// Behaviour every backend must share.
fn exercise(store: &dyn DocumentStore) {
    assert_eq!(store.get("users").unwrap(), None);

    store
        .set("/users/100", &json!({"name": "Ann", "address": {"city": "Oslo"}}))
        .unwrap();
    store.set("users/101", &json!({"name": "Bo"})).unwrap();
    assert_eq!(store.get("users/100/name").unwrap(), Some(json!("Ann")));

    // shallow: named keys replaced whole, siblings untouched, null removes
    store
        .update(
            "users/100",
            &fields(json!({"address": {"street": "Main"}, "email": "a@b", "name": null})),
        )
        .unwrap();
    assert_eq!(
        store.get("users/100").unwrap(),
        Some(json!({"address": {"street": "Main"}, "email": "a@b"}))
    );

    store.remove("users/101").unwrap();
    store.remove("users/100").unwrap();
    assert_eq!(store.get("users").unwrap(), None);

    assert_eq!(store.allocate_id("lastUserId").unwrap(), FIRST_ID);
    assert_eq!(store.allocate_id("lastUserId").unwrap(), FIRST_ID + 1);
    assert_eq!(store.allocate_id("lastIncomeId").unwrap(), FIRST_ID);
    assert_eq!(store.get("lastUserId").unwrap(), Some(json!(101)));
}

#[test]
fn memory_store_semantics() {
    exercise(&MemoryStore::new());
}

#[test]
fn sqlite_store_semantics() {
    exercise(&SqliteStore::open_in_memory().unwrap());
}

#[test]
fn empty_mapping_is_never_stored() {
    let store = MemoryStore::new();
    store.set("expenses/100", &json!({"savings": {"rrsp": 1}})).unwrap();
    store.set("expenses/100/savings", &json!({})).unwrap();
    assert_eq!(store.get("expenses").unwrap(), None);
}

#[test]
fn invalid_paths_are_refused() {
    let store = MemoryStore::new();
    for bad in ["", "/", "users/a.b", "users/$x", "users//1", "a[0]"] {
        assert!(
            matches!(store.get(bad), Err(StoreError::InvalidPath(_))),
            "{bad} should be refused"
        );
    }
    assert_eq!(segments("/users/100/").unwrap(), vec!["users", "100"]);
    assert_eq!(segments("expenses/100/payment obligations").unwrap().len(), 3);
}

#[test]
fn counter_progression() {
    assert_eq!(next_id("c", None).unwrap(), 100);
    assert_eq!(next_id("c", Some(&json!(null))).unwrap(), 100);
    assert_eq!(next_id("c", Some(&json!(100))).unwrap(), 101);
    assert!(matches!(
        next_id("c", Some(&json!("abc"))),
        Err(StoreError::CorruptCounter(_))
    ));
    assert!(matches!(
        next_id("c", Some(&json!(-3))),
        Err(StoreError::CorruptCounter(_))
    ));
}

#[test]
fn sqlite_persists_across_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fintrack.sqlite");
    {
        let store = SqliteStore::open(&path).unwrap();
        store.set("income/100", &json!({"wages": 4000})).unwrap();
        assert_eq!(store.allocate_id("lastIncomeId").unwrap(), 100);
    }
    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.get("income/100/wages").unwrap(), Some(json!(4000)));
    assert_eq!(store.allocate_id("lastIncomeId").unwrap(), 101);
    assert!(store.describe().contains("fintrack.sqlite"));
}

#[test]
fn sqlite_corrupt_counter_is_reported() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.set("lastUserId", &json!("abc")).unwrap();
    assert!(matches!(
        store.allocate_id("lastUserId"),
        Err(StoreError::CorruptCounter(_))
    ));
}

#[test]
fn sqlite_allocation_is_atomic_across_connections() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shared.sqlite");
    let stores: Vec<Arc<SqliteStore>> = (0..2)
        .map(|_| Arc::new(SqliteStore::open(&path).unwrap()))
        .collect();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let store = Arc::clone(&stores[i % 2]);
            thread::spawn(move || {
                (0..25)
                    .map(|_| store.allocate_id("lastExpenseId").unwrap())
                    .collect::<Vec<u64>>()
            })
        })
        .collect();
    let mut ids: Vec<u64> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, (100..200).collect::<Vec<u64>>());
}

#[test]
fn firebase_endpoints() {
    let store = FirebaseStore::new("https://demo.firebaseio.com/", Some("secret".into())).unwrap();
    assert_eq!(
        store.endpoint("/users/100").unwrap(),
        "https://demo.firebaseio.com/users/100.json"
    );
    assert_eq!(
        store.endpoint("lastUserId").unwrap(),
        "https://demo.firebaseio.com/lastUserId.json"
    );
    assert!(store.endpoint("users/1.5").is_err());
    assert_eq!(store.describe(), "realtime database at https://demo.firebaseio.com");
}
