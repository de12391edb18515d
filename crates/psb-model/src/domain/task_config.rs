use serde::{Deserialize, Serialize};

use crate::SizeBytes;

/// One cell of the benchmark task matrix.
///
/// Produced by the matrix generator and echoed back untouched by the execution backend,
/// so every result can be attributed to the configuration that created it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskConfig {
    /// Size of the payload sent to the task.
    pub input_size_bytes: SizeBytes,
    /// Size of the payload the task returns.
    pub output_size_bytes: SizeBytes,
    /// Zero-based repetition of this (input, output) pair.
    pub repeat_index: usize,
}

impl TaskConfig {
    pub fn new(input_size_bytes: SizeBytes, output_size_bytes: SizeBytes, repeat_index: usize) -> Self {
        Self {
            input_size_bytes,
            output_size_bytes,
            repeat_index,
        }
    }
}
