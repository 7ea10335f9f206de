// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fintrack::cli;
use fintrack::commands::{doctor, show};
use fintrack::config::{LogFormat, Settings, StoreConfig};
use fintrack::models::{EntityKind, User};
use fintrack::service;
use fintrack::store::{DocumentStore, MemoryStore};
use serde_json::json;
use std::net::SocketAddr;
use std::path::PathBuf;

fn settings(args: &[&str]) -> anyhow::Result<Settings> {
    let matches = cli::build_cli().try_get_matches_from(args)?;
    Settings::from_matches(&matches)
}

#[test]
fn memory_store_from_flags() {
    let s = settings(&["fintrack", "--store", "memory", "--log-format", "json", "init"]).unwrap();
    assert_eq!(s.store, StoreConfig::Memory);
    assert_eq!(s.log_format, LogFormat::Json);
    assert!(s.open_store().unwrap().describe().contains("memory"));
}

#[test]
fn sqlite_path_from_flag() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("db.sqlite");
    let path_arg = path.to_string_lossy().to_string();
    let s = settings(&["fintrack", "--store", "sqlite", "--db", &path_arg, "doctor"]).unwrap();
    assert_eq!(s.store, StoreConfig::Sqlite(PathBuf::from(&path_arg)));
    s.open_store().unwrap();
    assert!(path.exists());
}

#[test]
fn firebase_needs_a_url() {
    let err = settings(&["fintrack", "--store", "firebase", "init"]).unwrap_err();
    assert!(err.to_string().contains("--database-url"));

    let s = settings(&[
        "fintrack",
        "--store",
        "firebase",
        "--database-url",
        " https://demo.firebaseio.com ",
        "--auth-token",
        "tok",
        "init",
    ])
    .unwrap();
    assert_eq!(
        s.store,
        StoreConfig::Firebase {
            url: "https://demo.firebaseio.com".into(),
            auth: Some("tok".into())
        }
    );
}

#[test]
fn serve_defaults_to_port_3400() {
    let matches = cli::build_cli().get_matches_from(["fintrack", "serve"]);
    let (_, sub) = matches.subcommand().unwrap();
    assert_eq!(
        sub.get_one::<SocketAddr>("bind").copied(),
        Some("0.0.0.0:3400".parse().unwrap())
    );
}

#[test]
fn show_rows_are_ordered_numerically() {
    let store = MemoryStore::new();
    store.set("users/100", &json!({"name": "B"})).unwrap();
    store.set("users/99", &json!({"name": "A"})).unwrap();
    let rows = show::query_rows(&store, EntityKind::User).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], "99");
    assert_eq!(rows[1], vec!["100".to_string(), r#"{"name":"B"}"#.to_string()]);
}

#[test]
fn doctor_flags_lagging_counters() {
    let store = MemoryStore::new();
    let body = json!({"name": "Ann", "username": "a", "email": "a@b"});
    service::create::<User>(&store, &body).unwrap();
    service::create::<User>(&store, &body).unwrap();

    let report = doctor::inspect(&store).unwrap();
    let users = report.iter().find(|h| h.kind == EntityKind::User).unwrap();
    assert_eq!(users.records, 2);
    assert_eq!(users.highest_id, Some(101));
    assert!(users.issues().is_empty());

    store.set("users/150", &body).unwrap();
    store.set("lastIncomeId", &json!("oops")).unwrap();
    let report = doctor::inspect(&store).unwrap();
    let issues: Vec<String> = report
        .iter()
        .flat_map(|h| h.issues())
        .map(|(issue, _)| issue)
        .collect();
    assert_eq!(issues, vec!["counter_behind", "counter_corrupt"]);
}
