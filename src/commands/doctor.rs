// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::EntityKind;
use crate::service::{entries, list_kind};
use crate::store::DocumentStore;
use crate::utils::pretty_table;
use anyhow::Result;
use serde_json::Value;

/// Counter and record bookkeeping for one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionHealth {
    pub kind: EntityKind,
    /// Raw counter value, when one is stored.
    pub counter: Option<Value>,
    pub records: usize,
    pub highest_id: Option<u64>,
}

impl CollectionHealth {
    pub fn issues(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        let counter = match &self.counter {
            None => None,
            Some(v) => match v.as_u64() {
                Some(n) => Some(n),
                None => {
                    out.push(("counter_corrupt".into(), format!("{} = {}", self.kind.counter(), v)));
                    return out;
                }
            },
        };
        if let Some(high) = self.highest_id {
            if counter.is_none_or(|c| c < high) {
                out.push((
                    "counter_behind".into(),
                    format!(
                        "{} is {} but {}/{} exists",
                        self.kind.counter(),
                        counter.map_or_else(|| "unset".to_string(), |c| c.to_string()),
                        self.kind.collection(),
                        high
                    ),
                ));
            }
        }
        out
    }
}

pub fn inspect(store: &dyn DocumentStore) -> Result<Vec<CollectionHealth>> {
    let mut out = Vec::new();
    for kind in EntityKind::ALL {
        let listed = list_kind(store, kind)?;
        let ids = entries(&listed);
        out.push(CollectionHealth {
            kind,
            counter: store.get(kind.counter())?,
            records: ids.len(),
            highest_id: ids.iter().filter_map(|(id, _)| id.parse::<u64>().ok()).max(),
        });
    }
    Ok(out)
}

pub fn handle(store: &dyn DocumentStore) -> Result<()> {
    let report = inspect(store)?;

    let summary = report
        .iter()
        .map(|h| {
            vec![
                h.kind.collection().to_string(),
                h.counter.as_ref().map_or_else(|| "-".to_string(), Value::to_string),
                h.records.to_string(),
                h.highest_id.map_or_else(|| "-".to_string(), |n| n.to_string()),
            ]
        })
        .collect();
    println!("Store: {}", store.describe());
    println!(
        "{}",
        pretty_table(&["Collection", "Counter", "Records", "Highest ID"], summary)
    );

    let rows: Vec<Vec<String>> = report
        .iter()
        .flat_map(|h| h.issues())
        .map(|(issue, detail)| vec![issue, detail])
        .collect();
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
