// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod expense;
pub mod income;
pub mod user;

pub use expense::Expense;
pub use income::Income;
pub use user::{Address, User};

use crate::error::ApiError;
use crate::normalize::{is_absent, is_present, prune};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// A stored field value: either a number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(Number),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Expense,
    Income,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::User, EntityKind::Expense, EntityKind::Income];

    /// Top-level path holding every record of this kind.
    pub fn collection(self) -> &'static str {
        match self {
            EntityKind::User => "users",
            EntityKind::Expense => "expenses",
            EntityKind::Income => "income",
        }
    }

    /// Path of the id counter for this kind.
    pub fn counter(self) -> &'static str {
        match self {
            EntityKind::User => "lastUserId",
            EntityKind::Expense => "lastExpenseId",
            EntityKind::Income => "lastIncomeId",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Expense => "Expense",
            EntityKind::Income => "Income",
        }
    }

    pub fn from_collection(name: &str) -> Option<EntityKind> {
        Self::ALL
            .into_iter()
            .find(|k| k.collection().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A persisted entity type: how raw input becomes a record and how two
/// records of the same type combine.
pub trait Record: Serialize + DeserializeOwned + Send + 'static {
    const KIND: EntityKind;

    /// Rewrites alternate spellings of a field onto its canonical key, in
    /// place. Runs on input and on stored documents before either is decoded.
    fn fold_aliases(_fields: &mut Map<String, Value>) {}

    /// Create-time checks over normalized input, run before anything is built.
    fn validate(_input: &Value) -> Result<(), ApiError> {
        Ok(())
    }

    /// Builds the allow-listed record from normalized (lowercase-keyed) input.
    /// Unrecognised fields are dropped; absent values never make it in.
    fn shape(input: &Value) -> Result<Self, ApiError>;

    /// Checks that apply to the input side of an update.
    fn validate_patch(&self) -> Result<(), ApiError> {
        Ok(())
    }

    /// Field by field, `newer` wins wherever it holds a value and `self`
    /// fills the rest.
    fn merge(self, newer: Self) -> Self;

    fn is_empty(&self) -> bool;
}

/// Top-level fields of an input document; anything but a mapping has none.
pub(crate) fn fields_of(input: &Value) -> Map<String, Value> {
    input.as_object().cloned().unwrap_or_default()
}

/// Removes every key in `aliases` from `fields`. The canonical key keeps its
/// value when it has one; otherwise the first alias holding a value supplies it.
pub(crate) fn fold_alias(fields: &mut Map<String, Value>, canonical: &str, aliases: &[&str]) {
    for alias in aliases {
        let Some(value) = fields.remove(*alias) else {
            continue;
        };
        if !is_absent(&value) && !is_present(fields.get(canonical)) {
            fields.insert(canonical.to_string(), value);
        }
    }
}

/// Prunes `fields` and decodes what is left into `T`.
pub(crate) fn decode_pruned<T>(fields: Map<String, Value>, what: &str) -> Result<Option<T>, ApiError>
where
    T: DeserializeOwned,
{
    match prune(fields) {
        None => Ok(None),
        Some(kept) => serde_json::from_value(Value::Object(kept))
            .map(Some)
            .map_err(|e| ApiError::validation(format!("Invalid {}: {}", what, e))),
    }
}
