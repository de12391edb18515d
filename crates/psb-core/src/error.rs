use psb_exec::ExecError;
use psb_store::StoreError;
use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("exec error: {0}")]
    Exec(#[from] ExecError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("cannot aggregate an empty set of worker stats")]
    EmptyStats,

    #[error(
        "coordination mismatch: expected {expected} tasks, submitted {submitted}, received {received}"
    )]
    CoordinationMismatch {
        expected: usize,
        submitted: usize,
        received: usize,
    },

    #[error("worker {worker} failed: {reason}")]
    WorkerFailure { worker: usize, reason: String },

    #[error("worker stopped after another worker failed")]
    Stopped,

    #[error("key {0} missing from store")]
    MissingKey(String),

    #[error("task server failed: {0}")]
    Server(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
