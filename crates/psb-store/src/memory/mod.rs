use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::trace;

use crate::{
    error::StoreError,
    store::{EndpointInfo, Store},
};

/// In-process store.
///
/// Clones are separate handles onto the same backing map.
#[derive(Clone)]
pub struct MemoryStore {
    name: Arc<str>,
    uuid: Arc<str>,
    inner: Arc<RwLock<MemoryStoreInner>>,
}

struct MemoryStoreInner {
    data: HashMap<String, Vec<u8>>,
    closed: bool,
}

impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().into(),
            uuid: uuid::Uuid::new_v4().to_string().into(),
            inner: Arc::new(RwLock::new(MemoryStoreInner {
                data: HashMap::new(),
                closed: false,
            })),
        }
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.inner.read().await.data.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn closed(&self) -> StoreError {
        StoreError::Closed(self.name.to_string())
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let inner = self.inner.read().await;
        if inner.closed {
            return Err(self.closed());
        }
        Ok(inner.data.get(key).cloned())
    }

    async fn set(&self, key: &str, data: Vec<u8>) -> Result<String, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.closed {
            return Err(self.closed());
        }
        trace!(target: "psb.store.memory", key, bytes = data.len(), "set");
        inner.data.insert(key.to_string(), data);
        Ok(key.to_string())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let inner = self.inner.read().await;
        if inner.closed {
            return Err(self.closed());
        }
        Ok(inner.data.contains_key(key))
    }

    async fn evict(&self, key: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.closed {
            return Err(self.closed());
        }
        trace!(target: "psb.store.memory", key, "evict");
        inner.data.remove(key);
        Ok(())
    }

    async fn endpoint_info(&self) -> Result<EndpointInfo, StoreError> {
        if self.inner.read().await.closed {
            return Err(self.closed());
        }
        Ok(EndpointInfo {
            uuid: self.uuid.to_string(),
        })
    }

    async fn close(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.closed = true;
        inner.data.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_exists_evict() {
        let store = MemoryStore::new("mem");

        assert!(!store.exists("k").await.unwrap());
        assert_eq!(store.get("k").await.unwrap(), None);

        let key = store.set("k", vec![1, 2, 3]).await.unwrap();
        assert_eq!(key, "k");
        assert!(store.exists("k").await.unwrap());
        assert_eq!(store.get("k").await.unwrap(), Some(vec![1, 2, 3]));

        store.evict("k").await.unwrap();
        assert!(!store.exists("k").await.unwrap());
        // evicting twice is fine
        store.evict("k").await.unwrap();
    }

    #[tokio::test]
    async fn set_same_key_does_not_grow() {
        let store = MemoryStore::new("mem");
        for _ in 0..10 {
            store.set("same", vec![0; 8]).await.unwrap();
        }
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn put_generates_unique_keys() {
        let store = MemoryStore::new("mem");
        let a = store.put(vec![1]).await.unwrap();
        let b = store.put(vec![2]).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn proxy_binds_to_store_name() {
        let store = MemoryStore::new("mem");
        let r = store.proxy(vec![7; 4]).await.unwrap();
        assert_eq!(r.store, "mem");
        assert_eq!(store.get(&r.key).await.unwrap(), Some(vec![7; 4]));
    }

    #[tokio::test]
    async fn clones_share_data_and_uuid() {
        let a = MemoryStore::new("mem");
        let b = a.clone();
        a.set("k", vec![1]).await.unwrap();
        assert!(b.exists("k").await.unwrap());
        assert_eq!(
            a.endpoint_info().await.unwrap(),
            b.endpoint_info().await.unwrap()
        );
    }

    #[tokio::test]
    async fn closed_store_rejects_operations() {
        let store = MemoryStore::new("mem");
        store.set("k", vec![1]).await.unwrap();
        store.close().await.unwrap();

        assert!(matches!(store.get("k").await, Err(StoreError::Closed(_))));
        assert!(matches!(store.exists("k").await, Err(StoreError::Closed(_))));
        assert!(matches!(
            store.endpoint_info().await,
            Err(StoreError::Closed(_))
        ));
    }
}
