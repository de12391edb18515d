mod error;
pub use error::StoreError;

mod store;
pub use store::{EndpointInfo, Store, StoreConnector, new_key};

mod memory;
pub use memory::MemoryStore;

mod endpoint;
pub use endpoint::EndpointStore;

mod config;
pub use config::{DEFAULT_ENDPOINT_ADDRESS, StoreConfig};
