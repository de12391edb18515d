use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid store address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("store rejected /{route}: status {status}")]
    Status { route: &'static str, status: u16 },

    #[error("store {0} is closed")]
    Closed(String),
}
