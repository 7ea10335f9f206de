// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Categorised expense records.
//!
//! Each category is a fixed allow-list of lowercase field names. A category
//! only appears on a record when at least one of its fields holds a value.

use super::{EntityKind, Record, Scalar, decode_pruned, fields_of, fold_alias};
use crate::error::ApiError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Behaviour shared by the generated category structs.
pub trait Category: DeserializeOwned + Default {
    const NAME: &'static str;
    const FIELDS: &'static [&'static str];
    /// `(field, alternate spellings)` for every field.
    const ALIASES: &'static [(&'static str, &'static [&'static str])];

    fn merge(self, newer: Self) -> Self;
    fn is_empty(&self) -> bool;
}

/// Declares a category struct whose fields are all optional scalars,
/// serialized under their lowercase names and skipped when unset. Alternate
/// spellings are folded onto the field before decoding, never by serde.
macro_rules! category {
    (
        $(#[$meta:meta])*
        $name:ident = $category:literal {
            $( $field:ident => $key:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            $(
                #[serde(rename = $key, default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<Scalar>,
            )+
        }

        impl Category for $name {
            const NAME: &'static str = $category;
            const FIELDS: &'static [&'static str] = &[$($key),+];
            const ALIASES: &'static [(&'static str, &'static [&'static str])] =
                &[$( ($key, &[$($alias),*]) ),+];

            fn merge(self, newer: Self) -> Self {
                Self {
                    $( $field: newer.$field.or(self.$field), )+
                }
            }

            fn is_empty(&self) -> bool {
                true $( && self.$field.is_none() )+
            }
        }
    };
}

category!(Savings = "savings" {
    rrsp => "rrsp",
    investment_savings => "investment savings",
    long_term_savings => "long-term savings",
    bonds => "bonds",
    others => "others",
});

category!(PaymentObligations = "payment obligations" {
    credit_card => "credit card",
    loan => "loan",
    vehicle_lease => "vehicle lease",
    line_of_credit => "line of credit",
});

category!(Insurance = "insurance" {
    life_insurance => "life insurance",
    health_insurance => "health insurance",
    others => "others",
});

category!(
    /// `sorage and parking` is still read so older records keep the value.
    /// Records holding both spellings keep `storage and parking`.
    Housing = "housing" {
        rent => "rent",
        rent_insurance => "rent insurance",
        storage_and_parking => "storage and parking" | "sorage and parking",
        utilities => "utilities",
        maintainance => "maintainance",
    }
);

category!(Utilities = "utilities" {
    phone => "phone",
    internet => "internet",
    water => "water",
    heat => "heat",
    electricity => "electricity",
    cable => "cable",
    others => "others",
});

category!(Personal = "personal" {
    transportation => "transportation",
    clothing => "clothing",
    gifts_family => "gifts -family",
    personal_grooming => "personal grooming",
    dining_out => "dining out",
    hobbies => "hobbies",
    others => "others",
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings: Option<Savings>,
    #[serde(rename = "payment obligations", default, skip_serializing_if = "Option::is_none")]
    pub payment_obligations: Option<PaymentObligations>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance: Option<Insurance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub housing: Option<Housing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utilities: Option<Utilities>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal: Option<Personal>,
}

impl Expense {
    pub const CATEGORIES: [&'static str; 6] = [
        Savings::NAME,
        PaymentObligations::NAME,
        Insurance::NAME,
        Housing::NAME,
        Utilities::NAME,
        Personal::NAME,
    ];
}

fn fold_category<C: Category>(fields: &mut Map<String, Value>) {
    if let Some(Value::Object(category)) = fields.get_mut(C::NAME) {
        for (key, aliases) in C::ALIASES {
            fold_alias(category, key, aliases);
        }
    }
}

fn shape_category<C: Category>(input: &Map<String, Value>) -> Result<Option<C>, ApiError> {
    let fields = match input.get(C::NAME) {
        Some(Value::Object(fields)) => fields.clone(),
        _ => return Ok(None),
    };
    let what = format!("value in category '{}'", C::NAME);
    Ok(decode_pruned::<C>(fields, &what)?.filter(|c| !c.is_empty()))
}

fn merge_category<C: Category>(existing: Option<C>, newer: Option<C>) -> Option<C> {
    let merged = match (existing, newer) {
        (Some(old), Some(new)) => Some(old.merge(new)),
        (old, new) => new.or(old),
    };
    merged.filter(|c| !c.is_empty())
}

impl Record for Expense {
    const KIND: EntityKind = EntityKind::Expense;

    fn fold_aliases(fields: &mut Map<String, Value>) {
        fold_category::<Savings>(fields);
        fold_category::<PaymentObligations>(fields);
        fold_category::<Insurance>(fields);
        fold_category::<Housing>(fields);
        fold_category::<Utilities>(fields);
        fold_category::<Personal>(fields);
    }

    fn shape(input: &Value) -> Result<Self, ApiError> {
        let mut input = fields_of(input);
        Self::fold_aliases(&mut input);
        Ok(Expense {
            savings: shape_category(&input)?,
            payment_obligations: shape_category(&input)?,
            insurance: shape_category(&input)?,
            housing: shape_category(&input)?,
            utilities: shape_category(&input)?,
            personal: shape_category(&input)?,
        })
    }

    fn merge(self, newer: Self) -> Self {
        Expense {
            savings: merge_category(self.savings, newer.savings),
            payment_obligations: merge_category(self.payment_obligations, newer.payment_obligations),
            insurance: merge_category(self.insurance, newer.insurance),
            housing: merge_category(self.housing, newer.housing),
            utilities: merge_category(self.utilities, newer.utilities),
            personal: merge_category(self.personal, newer.personal),
        }
    }

    fn is_empty(&self) -> bool {
        self.savings.is_none()
            && self.payment_obligations.is_none()
            && self.insurance.is_none()
            && self.housing.is_none()
            && self.utilities.is_none()
            && self.personal.is_none()
    }
}
