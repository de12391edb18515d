use std::{sync::Arc, time::Duration};

use psb_model::{Payload, SizeBytes, TaskConfig, TaskRequest, TaskResult, Value, now_epoch};
use psb_store::Store;
use tokio::sync::{Mutex, mpsc};
use tracing::trace;

use crate::error::{ExecError, ExecResult};

enum Message {
    Task(TaskRequest),
    Kill,
}

/// Create a connected pair of client and server queues.
///
/// With a store, every input payload is proxied through it (threshold 0).
pub fn queue_pair(store: Option<Arc<dyn Store>>) -> (ClientQueues, ServerQueues) {
    let (req_tx, req_rx) = mpsc::unbounded_channel();
    let (res_tx, res_rx) = mpsc::unbounded_channel();

    let client = ClientQueues {
        requests: req_tx,
        results: Mutex::new(res_rx),
        store,
    };
    let server = ServerQueues {
        requests: req_rx,
        results: ResultSender(res_tx),
    };
    (client, server)
}

/// Client side of the task execution channel.
pub struct ClientQueues {
    requests: mpsc::UnboundedSender<Message>,
    results: Mutex<mpsc::UnboundedReceiver<TaskResult>>,
    store: Option<Arc<dyn Store>>,
}

impl ClientQueues {
    /// Submit one task. Does not wait for it to run.
    pub async fn send_inputs(
        &self,
        inputs: Payload,
        output_size_bytes: SizeBytes,
        sleep: Duration,
        task_info: TaskConfig,
    ) -> ExecResult<()> {
        let inputs = match &self.store {
            Some(store) => Value::Proxy(store.proxy(inputs.to_bytes()).await?),
            None => Value::Inline(inputs),
        };

        let request = TaskRequest {
            task_info,
            inputs,
            output_size_bytes,
            sleep,
            time_created: now_epoch(),
        };
        trace!(target: "psb.exec.queue", ?task_info, "send inputs");
        self.requests
            .send(Message::Task(request))
            .map_err(|_| ExecError::QueueClosed)
    }

    /// Block until the next result arrives.
    pub async fn get_result(&self) -> ExecResult<TaskResult> {
        let mut result = self
            .results
            .lock()
            .await
            .recv()
            .await
            .ok_or(ExecError::QueueClosed)?;
        result.time_result_received = now_epoch();
        Ok(result)
    }

    /// Ask the task server to stop once its queue is drained.
    pub fn send_kill_signal(&self) -> ExecResult<()> {
        trace!(target: "psb.exec.queue", "send kill signal");
        self.requests
            .send(Message::Kill)
            .map_err(|_| ExecError::QueueClosed)
    }

    pub fn store(&self) -> Option<&Arc<dyn Store>> {
        self.store.as_ref()
    }
}

/// Server side of the task execution channel.
pub struct ServerQueues {
    requests: mpsc::UnboundedReceiver<Message>,
    results: ResultSender,
}

impl ServerQueues {
    /// Next task, or `None` after a kill signal or once every client handle is gone.
    pub async fn get_task(&mut self) -> Option<TaskRequest> {
        match self.requests.recv().await? {
            Message::Task(request) => Some(request),
            Message::Kill => {
                trace!(target: "psb.exec.queue", "kill signal received");
                self.requests.close();
                None
            }
        }
    }

    pub fn send_result(&self, result: TaskResult) -> ExecResult<()> {
        self.results.send(result)
    }

    pub fn result_sender(&self) -> ResultSender {
        self.results.clone()
    }
}

/// Cloneable handle for returning results from concurrently running tasks.
#[derive(Clone)]
pub struct ResultSender(mpsc::UnboundedSender<TaskResult>);

impl ResultSender {
    pub fn send(&self, result: TaskResult) -> ExecResult<()> {
        self.0.send(result).map_err(|_| ExecError::QueueClosed)
    }
}
