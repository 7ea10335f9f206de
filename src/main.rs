// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use std::net::SocketAddr;

use fintrack::config::Settings;
use fintrack::{cli, commands, logging, server};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let settings = Settings::from_matches(&matches)?;
    logging::init_tracing(settings.log_format);
    // Opened before any runtime exists: the blocking HTTP client of the
    // hosted backend must not be built or dropped on a reactor thread.
    let store = settings.open_store()?;

    match matches.subcommand() {
        Some(("serve", sub)) => {
            let bind = *sub
                .get_one::<SocketAddr>("bind")
                .context("missing bind address")?;
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("Failed to start async runtime")?;
            runtime.block_on(server::serve(store.clone(), bind))?;
        }
        Some(("init", _)) => {
            println!("Store ready: {}", store.describe());
        }
        Some(("show", sub)) => commands::show::handle(store.as_ref(), sub)?,
        Some(("doctor", _)) => commands::doctor::handle(store.as_ref())?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
