use std::time::Duration;

use serde::Serialize;

use crate::{SizeBytes, TaskConfig, Value};

/// Task submission travelling from the client queues to a task server.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    /// Matrix cell this task belongs to; echoed back in the result.
    pub task_info: TaskConfig,
    /// Input payload, inline or proxied.
    pub inputs: Value,
    /// Size of the payload the task must return.
    pub output_size_bytes: SizeBytes,
    /// Simulated work performed by the task.
    pub sleep: Duration,
    /// Submission time (epoch seconds).
    pub time_created: f64,
}
