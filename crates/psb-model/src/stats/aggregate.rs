use std::fmt;

use serde::{Deserialize, Serialize};

/// Statistics merged across all workers of a QPS run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub workers: usize,
    /// Elapsed time of the fastest worker.
    pub min_elapsed_ms: f64,
    /// Elapsed time of the slowest worker.
    pub max_elapsed_ms: f64,
    pub min_latency_ms: f64,
    pub max_latency_ms: f64,
    /// Mean of the per-worker averages.
    pub avg_latency_ms: f64,
    pub total_queries: u64,
    /// `total_queries` over the fastest worker's elapsed time.
    pub total_qps: f64,
}

impl fmt::Display for AggregateStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "complete {} queries across {} workers:",
            self.total_queries, self.workers
        )?;
        writeln!(
            f,
            "slowest worker elapsed time: {:.3} seconds",
            self.max_elapsed_ms / 1000.0
        )?;
        writeln!(
            f,
            "fastest worker elapsed time: {:.3} seconds",
            self.min_elapsed_ms / 1000.0
        )?;
        writeln!(f, "minimum request latency: {:.3} ms", self.min_latency_ms)?;
        writeln!(f, "maximum request latency: {:.3} ms", self.max_latency_ms)?;
        writeln!(f, "average request latency: {:.3} ms", self.avg_latency_ms)?;
        write!(f, "total QPS: {:.3}", self.total_qps)
    }
}
