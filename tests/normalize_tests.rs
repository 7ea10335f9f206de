// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fintrack::normalize::{is_absent, is_present, lowercase_keys, prune};
use serde_json::{Map, Value, json};

fn has_uppercase_key(v: &Value) -> bool {
    match v {
        Value::Object(map) => map
            .iter()
            .any(|(k, v)| k.chars().any(char::is_uppercase) || has_uppercase_key(v)),
        Value::Array(items) => items.iter().any(has_uppercase_key),
        _ => false,
    }
}

fn object(v: Value) -> Map<String, Value> {
    v.as_object().cloned().unwrap()
}

#[test]
fn lowercases_keys_at_every_depth() {
    let input = json!({
        "Savings": {"RRSP": 10, "Nested": [{"DeepKey": "Value"}]},
        "List": [1, "Two", null]
    });
    let out = lowercase_keys(&input);
    assert_eq!(
        out,
        json!({
            "savings": {"rrsp": 10, "nested": [{"deepkey": "Value"}]},
            "list": [1, "Two", null]
        })
    );
    assert!(!has_uppercase_key(&out));
    // the caller's value is left alone
    assert_eq!(input["Savings"]["RRSP"], 10);
}

#[test]
fn values_are_never_rewritten() {
    assert_eq!(lowercase_keys(&json!("MiXeD")), json!("MiXeD"));
    assert_eq!(lowercase_keys(&json!(42)), json!(42));
    assert_eq!(lowercase_keys(&Value::Null), Value::Null);
    assert_eq!(
        lowercase_keys(&json!({"Name": "Ann LEE"})),
        json!({"name": "Ann LEE"})
    );
}

#[test]
fn colliding_keys_keep_the_lowercase_one() {
    let out = lowercase_keys(&json!({"NAME": "a", "name": "c", "Name": "b"}));
    assert_eq!(out, json!({"name": "c"}));
}

#[test]
fn lowercasing_twice_changes_nothing() {
    let once = lowercase_keys(&json!({"A": {"B": [{"C": 1}]}}));
    assert_eq!(lowercase_keys(&once), once);
}

#[test]
fn prune_drops_null_and_empty_strings_only() {
    let kept = prune(object(json!({
        "a": null, "b": "", "c": 0, "d": "x", "e": false, "f": " "
    })))
    .unwrap();
    assert_eq!(
        Value::Object(kept),
        json!({"c": 0, "d": "x", "e": false, "f": " "})
    );
}

#[test]
fn prune_of_nothing_is_absent() {
    assert!(prune(object(json!({"a": null, "b": ""}))).is_none());
    assert!(prune(Map::new()).is_none());
}

#[test]
fn presence_rule() {
    assert!(is_absent(&Value::Null));
    assert!(is_absent(&json!("")));
    assert!(!is_absent(&json!(0)));
    assert!(!is_absent(&json!(false)));
    assert!(!is_present(None));
    assert!(is_present(Some(&json!("x"))));
}
