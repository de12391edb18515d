use std::sync::Arc;

use async_trait::async_trait;
use psb_model::ProxyRef;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Metadata reported by the service behind a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointInfo {
    pub uuid: String,
}

/// Key/value store handle.
///
/// Implementations must be safe to share between tasks; every operation is a single request.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Store name, used to bind proxy references to this store.
    fn name(&self) -> &str;

    /// Fetch the bytes under `key`; `None` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write `data` under `key` and return the key.
    async fn set(&self, key: &str, data: Vec<u8>) -> Result<String, StoreError>;

    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// Remove `key`. Evicting an absent key is not an error.
    async fn evict(&self, key: &str) -> Result<(), StoreError>;

    async fn endpoint_info(&self) -> Result<EndpointInfo, StoreError>;

    /// Release the handle; later operations fail with [`StoreError::Closed`].
    async fn close(&self) -> Result<(), StoreError>;

    /// Write `data` under a freshly generated key.
    async fn put(&self, data: Vec<u8>) -> Result<String, StoreError> {
        self.set(&new_key(), data).await
    }

    /// Write `data` and return a proxy reference bound to this store.
    async fn proxy(&self, data: Vec<u8>) -> Result<ProxyRef, StoreError> {
        let key = self.put(data).await?;
        Ok(ProxyRef {
            store: self.name().to_string(),
            key,
        })
    }
}

/// Factory for store handles.
///
/// Load generator workers each connect their own handle so no client state is shared between them.
#[async_trait]
pub trait StoreConnector: Send + Sync + 'static {
    async fn connect(&self) -> Result<Arc<dyn Store>, StoreError>;
}

/// Generate a new unique store key.
pub fn new_key() -> String {
    uuid::Uuid::new_v4().to_string()
}
