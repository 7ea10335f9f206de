// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::{DocumentStore, FirebaseStore, MemoryStore, SqliteStore};
use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Fintrack", "fintrack"));

#[derive(Debug, Clone, PartialEq)]
pub enum StoreConfig {
    Memory,
    Sqlite(PathBuf),
    Firebase { url: String, auth: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub store: StoreConfig,
    pub log_format: LogFormat,
}

pub fn default_db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("fintrack.sqlite"))
}

impl Settings {
    /// Resolves settings from parsed arguments; every flag already carries
    /// its environment fallback.
    pub fn from_matches(m: &ArgMatches) -> Result<Settings> {
        let store = match m.get_one::<String>("store").map(String::as_str) {
            Some("memory") => StoreConfig::Memory,
            Some("firebase") => {
                let url = m
                    .get_one::<String>("database-url")
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .context("--database-url (or FINTRACK_DATABASE_URL) is required for the firebase store")?;
                let auth = m
                    .get_one::<String>("auth-token")
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty());
                StoreConfig::Firebase { url, auth }
            }
            Some("sqlite") | None => match m.get_one::<PathBuf>("db") {
                Some(path) => StoreConfig::Sqlite(path.clone()),
                None => StoreConfig::Sqlite(default_db_path()?),
            },
            Some(other) => bail!("Unknown store '{}'", other),
        };
        let log_format = match m.get_one::<String>("log-format").map(String::as_str) {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };
        Ok(Settings { store, log_format })
    }

    pub fn open_store(&self) -> Result<Arc<dyn DocumentStore>> {
        let store: Arc<dyn DocumentStore> = match &self.store {
            StoreConfig::Memory => Arc::new(MemoryStore::new()),
            StoreConfig::Sqlite(path) => {
                if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                    fs::create_dir_all(dir)
                        .with_context(|| format!("Failed to create {}", dir.display()))?;
                }
                Arc::new(
                    SqliteStore::open(path)
                        .with_context(|| format!("Open DB at {}", path.display()))?,
                )
            }
            StoreConfig::Firebase { url, auth } => Arc::new(
                FirebaseStore::new(url, auth.clone())
                    .with_context(|| format!("Connect to {}", url))?,
            ),
        };
        Ok(store)
    }
}
