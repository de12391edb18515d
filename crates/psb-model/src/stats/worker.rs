use serde::{Deserialize, Serialize};

/// Request statistics reported by a single load-generator worker.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Number of requests issued.
    pub queries: u64,
    /// Time from the synchronized start to the end of the request loop.
    pub total_elapsed_ms: f64,
    pub min_latency_ms: f64,
    pub max_latency_ms: f64,
    pub avg_latency_ms: f64,
}

impl Stats {
    /// Summarize per-request latencies. An empty sample set yields zero latencies.
    pub fn from_latencies(total_elapsed_ms: f64, latencies_ms: &[f64]) -> Self {
        if latencies_ms.is_empty() {
            return Self {
                total_elapsed_ms,
                ..Self::default()
            };
        }

        let (min, max, sum) = latencies_ms.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), &l| (min.min(l), max.max(l), sum + l),
        );

        Self {
            queries: latencies_ms.len() as u64,
            total_elapsed_ms,
            min_latency_ms: min,
            max_latency_ms: max,
            avg_latency_ms: sum / latencies_ms.len() as f64,
        }
    }
}
