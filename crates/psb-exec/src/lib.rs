mod error;
pub use error::{ExecError, ExecResult};

mod queue;
pub use queue::{ClientQueues, ResultSender, ServerQueues, queue_pair};

mod target;
pub use target::target_function;

pub mod server;
pub use server::{LocalTaskServer, TaskServer};
#[cfg(feature = "remote")]
pub use server::RemoteTaskServer;
