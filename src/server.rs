// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! HTTP surface. Endpoints, identical for every record type:
//! - `GET    /api/<collection>`       every record keyed by id
//! - `GET    /api/<collection>/:id`   one record
//! - `POST   /api/<collection>`       create, 201 with `{id, message}`
//! - `PUT    /api/<collection>/:id`   merge update, 200 with `{id, message}`
//! - `DELETE /api/<collection>/:id`   204

use crate::error::ApiError;
use crate::models::{Expense, Income, Record, User};
use crate::service::{self, Receipt};
use crate::store::DocumentStore;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared state for axum handlers.
pub type AppState = Arc<dyn DocumentStore>;

pub async fn serve(store: AppState, bind: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(addr = %listener.local_addr()?, store = %store.describe(), "fintrack API listening");
    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("fintrack API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "could not listen for shutdown signal");
    }
}

/// Build the axum router (separated for testing).
pub fn router(store: AppState) -> Router {
    Router::new()
        .nest(&api_base::<User>(), collection::<User>())
        .nest(&api_base::<Expense>(), collection::<Expense>())
        .nest(&api_base::<Income>(), collection::<Income>())
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

fn api_base<R: Record>() -> String {
    format!("/api/{}", R::KIND.collection())
}

fn collection<R: Record>() -> Router<AppState> {
    Router::new()
        .route("/", get(list::<R>).post(create::<R>))
        .route("/:id", get(fetch::<R>).put(update::<R>).delete(remove::<R>))
}

/// Runs a store-bound operation on the blocking pool.
async fn blocking<T, F>(store: AppState, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&dyn DocumentStore) -> Result<T, ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || op(store.as_ref())).await?
}

fn body_of(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    body.map(|Json(v)| v)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

// ============================================================================
// Handlers
// ============================================================================

async fn list<R: Record>(State(store): State<AppState>) -> Result<Json<Value>, ApiError> {
    blocking(store, service::list::<R>).await.map(Json)
}

async fn fetch<R: Record>(
    State(store): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    blocking(store, move |s| service::fetch::<R>(s, &id))
        .await
        .map(Json)
}

async fn create<R: Record>(
    State(store): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Receipt<u64>>), ApiError> {
    let body = body_of(body)?;
    let receipt = blocking(store, move |s| service::create::<R>(s, &body)).await?;
    info!(kind = %R::KIND, id = receipt.id, "record created");
    Ok((StatusCode::CREATED, Json(receipt)))
}

async fn update<R: Record>(
    State(store): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Receipt<String>>, ApiError> {
    let body = body_of(body)?;
    let receipt = blocking(store, move |s| service::update::<R>(s, &id, &body)).await?;
    info!(kind = %R::KIND, id = %receipt.id, "record updated");
    Ok(Json(receipt))
}

async fn remove<R: Record>(
    State(store): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let target = id.clone();
    blocking(store, move |s| service::delete::<R>(s, &target)).await?;
    info!(kind = %R::KIND, id = %id, "record deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Errors
// ============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, label, message) = match &self {
            ApiError::NotFound { .. } => (StatusCode::NOT_FOUND, "Not Found", self.to_string()),
            ApiError::Validation(msg) | ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "Bad Request", msg.clone())
            }
            ApiError::Store(_) | ApiError::Worker(_) => {
                error!(error = %self, "request failed against the database");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    "Could not complete the request against the database.".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": label, "message": message }))).into_response()
    }
}
