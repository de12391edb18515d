//! Task matrix generation.
//!
//! The matrix is walked input size (outer), output size (middle), repetition (inner).
use psb_model::{Payload, SizeBytes, TaskConfig};

/// Benchmark task matrix: input sizes × output sizes × repetitions.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskMatrix {
    input_sizes: Vec<SizeBytes>,
    output_sizes: Vec<SizeBytes>,
    repeat: usize,
    reuse_inputs: bool,
}

impl TaskMatrix {
    pub fn new(
        input_sizes: Vec<SizeBytes>,
        output_sizes: Vec<SizeBytes>,
        repeat: usize,
        reuse_inputs: bool,
    ) -> Self {
        Self {
            input_sizes,
            output_sizes,
            repeat,
            reuse_inputs,
        }
    }

    /// Number of tasks the matrix yields.
    pub fn len(&self) -> usize {
        self.repeat * self.input_sizes.len() * self.output_sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Task configurations in matrix order, without payloads.
    pub fn configs(&self) -> impl Iterator<Item = TaskConfig> + '_ {
        (0..self.len()).map(|i| self.config_at(i))
    }

    /// Task configurations paired with their input payloads.
    ///
    /// Each call starts a fresh walk of the matrix.
    pub fn tasks(&self) -> Tasks<'_> {
        Tasks {
            matrix: self,
            next: 0,
            shared: None,
        }
    }

    fn input_index(&self, i: usize) -> usize {
        i / (self.output_sizes.len() * self.repeat)
    }

    fn config_at(&self, i: usize) -> TaskConfig {
        let input = self.input_index(i);
        let output = (i / self.repeat) % self.output_sizes.len();
        TaskConfig::new(self.input_sizes[input], self.output_sizes[output], i % self.repeat)
    }
}

/// Iterator over `(TaskConfig, Payload)` pairs.
///
/// With input reuse, one payload is allocated per input size and shared by every task under it.
pub struct Tasks<'a> {
    matrix: &'a TaskMatrix,
    next: usize,
    shared: Option<(usize, Payload)>,
}

impl Iterator for Tasks<'_> {
    type Item = (TaskConfig, Payload);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.matrix.len() {
            return None;
        }
        let i = self.next;
        self.next += 1;

        let cfg = self.matrix.config_at(i);
        let payload = if self.matrix.reuse_inputs {
            let input = self.matrix.input_index(i);
            match &self.shared {
                Some((idx, payload)) if *idx == input => payload.clone(),
                _ => {
                    let payload = Payload::empty(cfg.input_size_bytes);
                    self.shared = Some((input, payload.clone()));
                    payload
                }
            }
        } else {
            Payload::empty(cfg.input_size_bytes)
        };
        Some((cfg, payload))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.matrix.len() - self.next.min(self.matrix.len());
        (left, Some(left))
    }
}

impl ExactSizeIterator for Tasks<'_> {}
