//! HTTP client for a store endpoint peer service.
//!
//! Every request targets the locally reachable peer service at `address` and names the
//! remote endpoint by UUID through the `endpoint` query parameter:
//! - `GET  /get?key=`    payload bytes; 400/404 when the key is absent
//! - `POST /set?key=`    payload bytes as `application/octet-stream`
//! - `GET  /exists?key=` `{"exists": bool}`
//! - `POST /evict?key=`
//! - `GET  /endpoint`    `{"uuid": "..."}`
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use reqwest::{StatusCode, Url, header::CONTENT_TYPE};
use serde::Deserialize;
use tracing::trace;

use crate::{
    error::StoreError,
    store::{EndpointInfo, Store},
};

#[derive(Deserialize)]
struct ExistsResponse {
    exists: bool,
}

pub struct EndpointStore {
    name: String,
    address: Url,
    endpoint: String,
    client: reqwest::Client,
    closed: AtomicBool,
}

impl EndpointStore {
    /// Create a handle for the remote `endpoint` reached through the peer service at `address`.
    pub fn new(
        name: impl Into<String>,
        address: &str,
        endpoint: impl Into<String>,
    ) -> Result<Self, StoreError> {
        // `Url::join` replaces the last path segment unless the base ends with '/'.
        let normalized = format!("{}/", address.trim_end_matches('/'));
        let address = Url::parse(&normalized).map_err(|e| StoreError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            name: name.into(),
            address,
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
            closed: AtomicBool::new(false),
        })
    }

    fn url(&self, route: &'static str, key: Option<&str>) -> Result<Url, StoreError> {
        let mut url = self
            .address
            .join(route)
            .map_err(|e| StoreError::InvalidAddress {
                address: self.address.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut q = url.query_pairs_mut();
            if let Some(key) = key {
                q.append_pair("key", key);
            }
            q.append_pair("endpoint", &self.endpoint);
        }
        Ok(url)
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed(self.name.clone()));
        }
        Ok(())
    }
}

fn check(route: &'static str, status: StatusCode) -> Result<(), StoreError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(StoreError::Status {
            route,
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl Store for EndpointStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.ensure_open()?;
        let resp = self.client.get(self.url("get", Some(key))?).send().await?;
        match resp.status() {
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => Ok(None),
            status => {
                check("get", status)?;
                Ok(Some(resp.bytes().await?.to_vec()))
            }
        }
    }

    async fn set(&self, key: &str, data: Vec<u8>) -> Result<String, StoreError> {
        self.ensure_open()?;
        trace!(target: "psb.store.endpoint", key, bytes = data.len(), "set");
        let resp = self
            .client
            .post(self.url("set", Some(key))?)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(data)
            .send()
            .await?;
        check("set", resp.status())?;
        Ok(key.to_string())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        self.ensure_open()?;
        let resp = self
            .client
            .get(self.url("exists", Some(key))?)
            .send()
            .await?;
        check("exists", resp.status())?;
        Ok(resp.json::<ExistsResponse>().await?.exists)
    }

    async fn evict(&self, key: &str) -> Result<(), StoreError> {
        self.ensure_open()?;
        trace!(target: "psb.store.endpoint", key, "evict");
        let resp = self
            .client
            .post(self.url("evict", Some(key))?)
            .send()
            .await?;
        check("evict", resp.status())
    }

    async fn endpoint_info(&self) -> Result<EndpointInfo, StoreError> {
        self.ensure_open()?;
        let resp = self.client.get(self.url("endpoint", None)?).send().await?;
        check("endpoint", resp.status())?;
        Ok(resp.json::<EndpointInfo>().await?)
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
