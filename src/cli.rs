// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};
use std::net::SocketAddr;
use std::path::PathBuf;

pub fn build_cli() -> Command {
    Command::new("fintrack")
        .about("REST backend for personal income, expense and user records")
        .version(crate_version!())
        .arg(
            Arg::new("store")
                .long("store")
                .global(true)
                .env("FINTRACK_STORE")
                .value_parser(["memory", "sqlite", "firebase"])
                .default_value("sqlite")
                .help("Where records are kept"),
        )
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("FINTRACK_DB")
                .value_parser(value_parser!(PathBuf))
                .help("SQLite file (defaults to the platform data dir)"),
        )
        .arg(
            Arg::new("database-url")
                .long("database-url")
                .global(true)
                .env("FINTRACK_DATABASE_URL")
                .help("Realtime database URL, for --store firebase"),
        )
        .arg(
            Arg::new("auth-token")
                .long("auth-token")
                .global(true)
                .env("FINTRACK_AUTH_TOKEN")
                .hide_env_values(true)
                .help("Credential sent as the `auth` query parameter"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .global(true)
                .env("FINTRACK_LOG_FORMAT")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .subcommand(
            Command::new("serve").about("Run the HTTP API").arg(
                Arg::new("bind")
                    .long("bind")
                    .env("FINTRACK_BIND")
                    .value_parser(value_parser!(SocketAddr))
                    .default_value("0.0.0.0:3400"),
            ),
        )
        .subcommand(Command::new("init").about("Open the configured store and report its location"))
        .subcommand(
            Command::new("show")
                .about("Print every record of one collection")
                .arg(
                    Arg::new("collection")
                        .required(true)
                        .value_parser(["users", "expenses", "income"]),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("jsonl"),
                )
                .arg(Arg::new("jsonl").long("jsonl").action(ArgAction::SetTrue)),
        )
        .subcommand(Command::new("doctor").about("Check id counters against stored records"))
}
