// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::EntityKind;
use thiserror::Error;

/// Failures raised by a [`crate::store::DocumentStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("backend rejected '{path}' with status {status}: {body}")]
    Rejected {
        path: String,
        status: u16,
        body: String,
    },

    #[error("invalid path '{0}'")]
    InvalidPath(String),

    #[error("counter '{0}' does not hold a non-negative integer")]
    CorruptCounter(String),

    #[error("transaction on '{key}' gave up after {attempts} attempts")]
    Contention { key: String, attempts: u32 },

    #[error("store lock poisoned")]
    Poisoned,
}

/// Outcome of a core operation that did not succeed.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{kind} with ID {id} does not exist.")]
    NotFound { kind: EntityKind, id: String },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }
}
