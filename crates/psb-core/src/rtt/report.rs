use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use psb_model::TaskResult;

use crate::error::CoreResult;

/// File written into the run directory.
pub const RESULTS_FILE: &str = "results.jsonl";

/// Outcome of a round-trip run.
#[derive(Debug, Clone)]
pub struct RoundTripReport {
    /// Received results in arrival order, payloads redacted.
    pub results: Vec<TaskResult>,
    /// Size of the task matrix.
    pub expected: usize,
    pub submitted: usize,
    /// The run was stopped before the matrix was exhausted.
    pub cancelled: bool,
}

impl RoundTripReport {
    pub fn failures(&self) -> usize {
        self.results.iter().filter(|r| !r.success).count()
    }

    /// Write one JSON object per result to `dir/results.jsonl`.
    pub fn write_jsonl(&self, dir: &Path) -> CoreResult<PathBuf> {
        let path = dir.join(RESULTS_FILE);
        let mut out = BufWriter::new(File::create(&path)?);
        for result in &self.results {
            serde_json::to_writer(&mut out, result)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;
        Ok(path)
    }
}
