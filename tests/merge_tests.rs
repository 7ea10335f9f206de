// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fintrack::error::ApiError;
use fintrack::merge::merge;
use fintrack::models::{Expense, Income, User};
use serde_json::{Map, Value, json};

fn merged<R: fintrack::models::Record>(existing: Value, raw: Value) -> Value {
    Value::Object(merge::<R>(&existing, &raw).unwrap())
}

#[test]
fn new_field_wins_and_siblings_survive() {
    let out = merged::<Expense>(
        json!({"savings": {"rrsp": 10, "bonds": 20}}),
        json!({"savings": {"rrsp": 50}}),
    );
    assert_eq!(out, json!({"savings": {"rrsp": 50, "bonds": 20}}));
}

#[test]
fn categories_not_in_the_input_are_carried() {
    let out = merged::<Expense>(
        json!({"housing": {"rent": 1000}, "savings": {"rrsp": 10}}),
        json!({"Savings": {"Others": 5}}),
    );
    assert_eq!(
        out,
        json!({"housing": {"rent": 1000}, "savings": {"rrsp": 10, "others": 5}})
    );
}

#[test]
fn zero_replaces_a_stored_value() {
    let out = merged::<Expense>(
        json!({"savings": {"bonds": 20}}),
        json!({"savings": {"bonds": 0}}),
    );
    assert_eq!(out, json!({"savings": {"bonds": 0}}));
}

#[test]
fn blank_or_null_input_falls_back() {
    let out = merged::<Expense>(
        json!({"savings": {"rrsp": 10, "bonds": 20}}),
        json!({"savings": {"rrsp": "", "bonds": null}}),
    );
    assert_eq!(out, json!({"savings": {"rrsp": 10, "bonds": 20}}));
}

#[test]
fn nothing_in_nothing_out() {
    assert_eq!(merged::<Expense>(json!({}), json!({})), json!({}));
    assert_eq!(merged::<Income>(json!({}), json!({"salary": 1})), json!({}));
}

#[test]
fn income_field_by_field() {
    let cases = [
        (None, None, None),
        (Some(1), None, Some(1)),
        (None, Some(2), Some(2)),
        (Some(1), Some(2), Some(2)),
    ];
    for (stored, input, expected) in cases {
        let mut existing = Map::new();
        existing.insert("wages".into(), json!(3000));
        if let Some(v) = stored {
            existing.insert("interest".into(), json!(v));
        }
        let raw = match input {
            Some(v) => json!({"Interest": v}),
            None => json!({}),
        };
        let out = merged::<Income>(Value::Object(existing), raw);
        assert_eq!(out.get("interest").cloned(), expected.map(|v| json!(v)));
        assert_eq!(out["wages"], json!(3000));
    }
}

#[test]
fn income_reads_back_camel_case_fields() {
    let out = merged::<Income>(
        json!({"wages": 4000, "interest": 12, "secondaryIncome": 50}),
        json!({"Wages": 4200, "Support Payment": 300}),
    );
    assert_eq!(
        out,
        json!({"wages": 4200, "secondaryIncome": 50, "interest": 12, "supportPayment": 300})
    );
}

#[test]
fn stored_parking_typo_is_read_back() {
    let out = merged::<Expense>(
        json!({"housing": {"rent": 900, "sorage and parking": 40}}),
        json!({"housing": {"rent": 950}}),
    );
    assert_eq!(out, json!({"housing": {"rent": 950, "storage and parking": 40}}));
}

#[test]
fn stored_record_with_both_parking_spellings_merges() {
    let out = merged::<Expense>(
        json!({"housing": {"rent": 900, "sorage and parking": 40, "storage and parking": 45}}),
        json!({"Housing": {"Sorage and Parking": 60}}),
    );
    assert_eq!(out, json!({"housing": {"rent": 900, "storage and parking": 60}}));
}

#[test]
fn income_with_stored_and_input_spellings_merges() {
    let out = merged::<Income>(
        json!({"wages": 10, "secondaryIncome": 5, "secondary income": 4}),
        json!({"secondary income": 8, "secondaryIncome": 9}),
    );
    assert_eq!(out, json!({"wages": 10, "secondaryIncome": 9}));
}

#[test]
fn user_address_falls_back_per_field() {
    let existing = json!({
        "name": "Ann", "username": "ann1", "email": "ann@x.com",
        "address": {"street": "1 Main", "suite": null, "city": "Oslo", "zipcode": null}
    });
    let out = merged::<User>(existing, json!({"Address": {"City": "Bergen", "ZipCode": "5003"}}));
    assert_eq!(
        out,
        json!({
            "name": "Ann", "username": "ann1", "email": "ann@x.com",
            "address": {"street": "1 Main", "suite": null, "city": "Bergen", "zipcode": "5003"}
        })
    );
}

#[test]
fn user_patch_with_bad_email_is_rejected() {
    let existing = json!({"name": "Ann", "username": "ann1", "email": "ann@x.com"});
    let err = merge::<User>(&existing, &json!({"email": "no-at-sign"})).unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[test]
fn malformed_stored_document_is_a_backend_error() {
    let err = merge::<Expense>(&json!({"savings": 12}), &json!({})).unwrap_err();
    assert!(matches!(err, ApiError::Store(_)));
}
