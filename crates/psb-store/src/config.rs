use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::{
    endpoint::EndpointStore,
    error::StoreError,
    memory::MemoryStore,
    store::{Store, StoreConnector},
};

/// Default address of the local endpoint peer service.
pub const DEFAULT_ENDPOINT_ADDRESS: &str = "http://127.0.0.1:8765";

/// Store connection parameters.
#[derive(Clone)]
pub enum StoreConfig {
    /// In-process store; every connection is a handle onto the same map.
    Memory(MemoryStore),
    /// Remote endpoint reached through a peer service.
    Endpoint {
        name: String,
        address: String,
        endpoint: String,
    },
}

impl StoreConfig {
    pub fn memory(name: impl Into<String>) -> Self {
        StoreConfig::Memory(MemoryStore::new(name))
    }

    pub fn endpoint(
        name: impl Into<String>,
        address: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        StoreConfig::Endpoint {
            name: name.into(),
            address: address.into(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl StoreConnector for StoreConfig {
    async fn connect(&self) -> Result<Arc<dyn Store>, StoreError> {
        match self {
            StoreConfig::Memory(store) => Ok(Arc::new(store.clone())),
            StoreConfig::Endpoint {
                name,
                address,
                endpoint,
            } => {
                debug!(target: "psb.store", %address, %endpoint, "connecting endpoint store");
                Ok(Arc::new(EndpointStore::new(
                    name.clone(),
                    address,
                    endpoint.clone(),
                )?))
            }
        }
    }
}
