// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{EntityKind, Record, Scalar, decode_pruned, fields_of, fold_alias};
use crate::error::ApiError;
use crate::normalize::is_absent;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Flat income record. Stored keys are camelCase; input keys arrive
/// lowercased, with or without the space. When one body carries several
/// spellings of a field, the stored camelCase key wins, then the unspaced
/// form, then the spaced one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Income {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wages: Option<Scalar>,
    #[serde(
        rename = "secondaryIncome",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub secondary_income: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest: Option<Scalar>,
    #[serde(
        rename = "supportPayment",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub support_payment: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub others: Option<Scalar>,
}

const ALIASES: [(&str, &[&str]); 2] = [
    ("secondaryIncome", &["secondaryincome", "secondary income"]),
    ("supportPayment", &["supportpayment", "support payment"]),
];

/// Zero and `false` count as missing wages, as do the absent values.
fn falsy(value: Option<&Value>) -> bool {
    match value {
        None => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(v) => is_absent(v),
    }
}

impl Record for Income {
    const KIND: EntityKind = EntityKind::Income;

    fn validate(input: &Value) -> Result<(), ApiError> {
        if falsy(input.get("wages")) {
            return Err(ApiError::validation("wages is required fields."));
        }
        Ok(())
    }

    fn fold_aliases(fields: &mut Map<String, Value>) {
        for (key, aliases) in ALIASES {
            fold_alias(fields, key, aliases);
        }
    }

    fn shape(input: &Value) -> Result<Self, ApiError> {
        let mut fields = fields_of(input);
        Self::fold_aliases(&mut fields);
        Ok(decode_pruned(fields, "income field")?.unwrap_or_default())
    }

    fn merge(self, newer: Self) -> Self {
        Income {
            wages: newer.wages.or(self.wages),
            secondary_income: newer.secondary_income.or(self.secondary_income),
            interest: newer.interest.or(self.interest),
            support_payment: newer.support_payment.or(self.support_payment),
            others: newer.others.or(self.others),
        }
    }

    fn is_empty(&self) -> bool {
        self.wages.is_none()
            && self.secondary_income.is_none()
            && self.interest.is_none()
            && self.support_payment.is_none()
            && self.others.is_none()
    }
}
