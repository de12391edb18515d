//! Task servers: the execution side of the task channel.
use std::future::Future;

use async_trait::async_trait;
use psb_model::{TaskRequest, TaskResult};
use tokio::task::JoinSet;
use tracing::debug;

use crate::{
    error::{ExecError, ExecResult},
    queue::ServerQueues,
};

mod local;
pub use local::LocalTaskServer;

#[cfg(feature = "remote")]
mod remote;
#[cfg(feature = "remote")]
pub use remote::RemoteTaskServer;

/// Execution backend consuming [`ServerQueues`].
#[async_trait]
pub trait TaskServer: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    /// Execute tasks until a kill signal arrives, then finish in-flight tasks and return.
    ///
    /// Task failures are reported as unsuccessful results, not as errors.
    async fn serve(&self, queues: ServerQueues) -> ExecResult<()>;
}

/// Run `execute` for every queued task on its own tokio task; returns the number of tasks run.
pub(crate) async fn dispatch<F, Fut>(
    server: &'static str,
    mut queues: ServerQueues,
    execute: F,
) -> ExecResult<usize>
where
    F: Fn(TaskRequest) -> Fut,
    Fut: Future<Output = TaskResult> + Send + 'static,
{
    let mut inflight = JoinSet::new();
    let mut count = 0usize;

    while let Some(request) = queues.get_task().await {
        let tx = queues.result_sender();
        let fut = execute(request);
        inflight.spawn(async move { tx.send(fut.await) });
        count += 1;

        // reap finished tasks so the set does not grow with the run
        while let Some(done) = inflight.try_join_next() {
            done.map_err(|e| ExecError::Worker(e.to_string()))??;
        }
    }

    debug!(target: "psb.exec.server", server, pending = inflight.len(), "draining in-flight tasks");
    while let Some(done) = inflight.join_next().await {
        done.map_err(|e| ExecError::Worker(e.to_string()))??;
    }
    debug!(target: "psb.exec.server", server, tasks = count, "task server stopped");
    Ok(count)
}
