// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::EntityKind;
use crate::service::{entries, list_kind};
use crate::store::DocumentStore;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Context, Result};

/// Rows of `id, record` for one collection, ordered by id.
pub fn query_rows(store: &dyn DocumentStore, kind: EntityKind) -> Result<Vec<Vec<String>>> {
    let listed = list_kind(store, kind)?;
    let mut rows = entries(&listed)
        .into_iter()
        .map(|(id, record)| -> Result<Vec<String>> {
            Ok(vec![id, serde_json::to_string(record)?])
        })
        .collect::<Result<Vec<_>>>()?;
    rows.sort_by_key(|r| (r[0].len(), r[0].clone()));
    Ok(rows)
}

pub fn handle(store: &dyn DocumentStore, m: &clap::ArgMatches) -> Result<()> {
    let name = m
        .get_one::<String>("collection")
        .context("collection is required")?;
    let kind = EntityKind::from_collection(name)
        .with_context(|| format!("Unknown collection '{}'", name))?;

    if m.get_flag("json") || m.get_flag("jsonl") {
        let listed = list_kind(store, kind)?;
        let records: Vec<_> = entries(&listed)
            .into_iter()
            .map(|(id, record)| serde_json::json!({ "id": id, "record": record }))
            .collect();
        maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &records)?;
        return Ok(());
    }

    let rows = query_rows(store, kind)?;
    if rows.is_empty() {
        println!("No {} stored.", kind.collection());
    } else {
        println!("{}", pretty_table(&["ID", kind.label()], rows));
    }
    Ok(())
}
