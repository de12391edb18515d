use serde::Serialize;

use crate::{ProxyRef, TaskConfig, TaskRequest, Value};

/// Completed task as returned by a task server.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    pub task_info: TaskConfig,
    pub inputs: Value,
    pub value: Value,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_info: Option<String>,
    /// Submission time (epoch seconds).
    pub time_created: f64,
    /// Time the client received the result (epoch seconds); `0.0` until received.
    pub time_result_received: f64,
    /// Time spent inside the target function.
    pub time_running_ms: f64,
}

impl TaskResult {
    /// Successful result for `request`.
    pub fn success(request: TaskRequest, value: Value, time_running_ms: f64) -> Self {
        Self {
            task_info: request.task_info,
            inputs: request.inputs,
            value,
            success: true,
            failure_info: None,
            time_created: request.time_created,
            time_result_received: 0.0,
            time_running_ms,
        }
    }

    /// Failed result for `request`; the value slot is left empty.
    pub fn failure(request: TaskRequest, reason: impl Into<String>, time_running_ms: f64) -> Self {
        Self {
            task_info: request.task_info,
            inputs: request.inputs,
            value: Value::Removed,
            success: false,
            failure_info: Some(reason.into()),
            time_created: request.time_created,
            time_result_received: 0.0,
            time_running_ms,
        }
    }

    /// Proxy reference carried by the value, if any.
    pub fn value_proxy(&self) -> Option<&ProxyRef> {
        self.value.as_proxy()
    }

    /// Submission-to-receipt latency, once the result has been received.
    pub fn round_trip_ms(&self) -> Option<f64> {
        (self.time_result_received > 0.0)
            .then(|| (self.time_result_received - self.time_created) * 1000.0)
    }

    /// Copy of this result with payload fields replaced by the redaction marker.
    pub fn redacted(&self) -> Self {
        Self {
            inputs: Value::Removed,
            value: Value::Removed,
            failure_info: self.failure_info.clone(),
            ..*self
        }
    }
}
