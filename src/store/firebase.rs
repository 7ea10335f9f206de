// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Hosted realtime database, spoken to over its REST protocol.

use super::{DocumentStore, next_id, segments};
use crate::error::StoreError;
use crate::utils::http_client;
use reqwest::Method;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ETAG, IF_MATCH};
use serde_json::{Map, Value};

/// Compare-and-swap rounds before a counter bump gives up.
const MAX_ATTEMPTS: u32 = 25;

pub struct FirebaseStore {
    client: Client,
    base: String,
    auth: Option<String>,
}

impl FirebaseStore {
    pub fn new(database_url: &str, auth: Option<String>) -> Result<Self, StoreError> {
        Ok(FirebaseStore {
            client: http_client()?,
            base: database_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// REST endpoint for a key path, e.g. `<base>/users/100.json`.
    pub fn endpoint(&self, path: &str) -> Result<String, StoreError> {
        Ok(format!("{}/{}.json", self.base, segments(path)?.join("/")))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, StoreError> {
        let mut req = self.client.request(method, self.endpoint(path)?);
        if let Some(token) = &self.auth {
            req = req.query(&[("auth", token)]);
        }
        Ok(req)
    }

    fn checked(path: &str, resp: Response) -> Result<Response, StoreError> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status().as_u16();
        Err(StoreError::Rejected {
            path: path.to_string(),
            status,
            body: resp.text().unwrap_or_default(),
        })
    }
}

impl DocumentStore for FirebaseStore {
    fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let resp = Self::checked(path, self.request(Method::GET, path)?.send()?)?;
        match resp.json::<Value>()? {
            Value::Null => Ok(None),
            v => Ok(Some(v)),
        }
    }

    fn set(&self, path: &str, value: &Value) -> Result<(), StoreError> {
        Self::checked(path, self.request(Method::PUT, path)?.json(value).send()?)?;
        Ok(())
    }

    fn update(&self, path: &str, fields: &Map<String, Value>) -> Result<(), StoreError> {
        Self::checked(path, self.request(Method::PATCH, path)?.json(fields).send()?)?;
        Ok(())
    }

    fn remove(&self, path: &str) -> Result<(), StoreError> {
        Self::checked(path, self.request(Method::DELETE, path)?.send()?)?;
        Ok(())
    }

    fn allocate_id(&self, counter: &str) -> Result<u64, StoreError> {
        for _ in 0..MAX_ATTEMPTS {
            let resp = self
                .request(Method::GET, counter)?
                .header("X-Firebase-ETag", "true")
                .send()?;
            let resp = Self::checked(counter, resp)?;
            let etag = resp
                .headers()
                .get(ETAG)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
                .ok_or_else(|| StoreError::Rejected {
                    path: counter.to_string(),
                    status: resp.status().as_u16(),
                    body: "response carried no ETag".to_string(),
                })?;
            let current: Value = resp.json()?;
            let id = next_id(counter, Some(&current))?;

            let resp = self
                .request(Method::PUT, counter)?
                .header(IF_MATCH, etag)
                .json(&id)
                .send()?;
            if resp.status() == StatusCode::PRECONDITION_FAILED {
                continue;
            }
            Self::checked(counter, resp)?;
            return Ok(id);
        }
        Err(StoreError::Contention {
            key: counter.to_string(),
            attempts: MAX_ATTEMPTS,
        })
    }

    fn describe(&self) -> String {
        format!("realtime database at {}", self.base)
    }
}
