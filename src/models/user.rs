// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{EntityKind, Record, Scalar, decode_pruned, fields_of};
use crate::error::ApiError;
use crate::normalize::is_present;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Postal address. Always written with all four keys; unset ones are null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub suite: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub zipcode: Option<Scalar>,
}

impl Address {
    fn merge(self, newer: Self) -> Self {
        Address {
            street: newer.street.or(self.street),
            suite: newer.suite.or(self.suite),
            city: newer.city.or(self.city),
            zipcode: newer.zipcode.or(self.zipcode),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Address,
}

fn valid_email(email: &str) -> bool {
    email.contains('@')
}

impl Record for User {
    const KIND: EntityKind = EntityKind::User;

    fn validate(input: &Value) -> Result<(), ApiError> {
        if !input.is_object() {
            return Err(ApiError::validation("Invalid input: Data must be an object"));
        }
        if !is_present(input.get("name")) || !is_present(input.get("username")) {
            return Err(ApiError::validation("Name and Username are required"));
        }
        match input.get("email").and_then(Value::as_str) {
            Some(email) if valid_email(email) => Ok(()),
            _ => Err(ApiError::validation("A valid email string is required")),
        }
    }

    fn shape(input: &Value) -> Result<Self, ApiError> {
        let mut fields = fields_of(input);
        let address = match fields.remove("address") {
            Some(Value::Object(parts)) => decode_pruned(parts, "address")?.unwrap_or_default(),
            _ => Address::default(),
        };
        let mut user: User = decode_pruned(fields, "user field")?.unwrap_or_default();
        user.address = address;
        Ok(user)
    }

    fn validate_patch(&self) -> Result<(), ApiError> {
        match &self.email {
            Some(email) if !valid_email(email) => {
                Err(ApiError::validation("A valid email string is required"))
            }
            _ => Ok(()),
        }
    }

    fn merge(self, newer: Self) -> Self {
        User {
            name: newer.name.or(self.name),
            username: newer.username.or(self.username),
            email: newer.email.or(self.email),
            address: self.address.merge(newer.address),
        }
    }

    // The address block is always written, so a user is never empty.
    fn is_empty(&self) -> bool {
        false
    }
}
