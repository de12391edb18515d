use psb_store::StoreError;
use thiserror::Error;

pub type ExecResult<T> = Result<T, ExecError>;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("task queue closed")]
    QueueClosed,
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("no store named {0} to resolve proxy")]
    UnknownStore(String),
    #[error("proxied payload not found: {0}")]
    MissingPayload(String),
    #[error("remote execution failed: {0}")]
    Remote(String),
    #[error("task worker failed: {0}")]
    Worker(String),
}

#[cfg(feature = "remote")]
impl From<reqwest::Error> for ExecError {
    fn from(e: reqwest::Error) -> Self {
        ExecError::Remote(e.to_string())
    }
}
