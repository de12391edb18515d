use std::time::Duration;

use psb_model::SizeBytes;

use crate::matrix::TaskMatrix;

#[derive(Debug, Clone)]
pub struct RoundTripConfig {
    pub input_sizes: Vec<SizeBytes>,
    pub output_sizes: Vec<SizeBytes>,
    /// Repetitions of every (input, output) pair.
    pub task_repeat: usize,
    /// Simulated work inside each task.
    pub task_sleep: Duration,
    /// Send the same input payload to every task of an input size.
    pub reuse_inputs: bool,
}

impl Default for RoundTripConfig {
    fn default() -> Self {
        Self {
            input_sizes: Vec::new(),
            output_sizes: Vec::new(),
            task_repeat: 1,
            task_sleep: Duration::ZERO,
            reuse_inputs: false,
        }
    }
}

impl RoundTripConfig {
    pub fn matrix(&self) -> TaskMatrix {
        TaskMatrix::new(
            self.input_sizes.clone(),
            self.output_sizes.clone(),
            self.task_repeat,
            self.reuse_inputs,
        )
    }
}
