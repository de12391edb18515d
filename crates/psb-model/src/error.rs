use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Invalid route: {0} (expected: GET|SET|EXISTS|EVICT|ENDPOINT)")]
    InvalidRoute(String),
}
