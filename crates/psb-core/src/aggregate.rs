use psb_model::{AggregateStats, Stats};

use crate::error::{CoreError, CoreResult};

/// Merge per-worker statistics. Worker order does not matter.
///
/// `total_qps` is measured against the fastest worker's elapsed time and is `0.0` when that time
/// is zero.
pub fn aggregate(stats: &[Stats]) -> CoreResult<AggregateStats> {
    let first = stats.first().ok_or(CoreError::EmptyStats)?;

    let mut agg = AggregateStats {
        workers: stats.len(),
        min_elapsed_ms: first.total_elapsed_ms,
        max_elapsed_ms: first.total_elapsed_ms,
        min_latency_ms: first.min_latency_ms,
        max_latency_ms: first.max_latency_ms,
        avg_latency_ms: 0.0,
        total_queries: 0,
        total_qps: 0.0,
    };

    let mut avg_sum = 0.0;
    for s in stats {
        agg.min_elapsed_ms = agg.min_elapsed_ms.min(s.total_elapsed_ms);
        agg.max_elapsed_ms = agg.max_elapsed_ms.max(s.total_elapsed_ms);
        agg.min_latency_ms = agg.min_latency_ms.min(s.min_latency_ms);
        agg.max_latency_ms = agg.max_latency_ms.max(s.max_latency_ms);
        agg.total_queries += s.queries;
        avg_sum += s.avg_latency_ms;
    }
    agg.avg_latency_ms = avg_sum / stats.len() as f64;

    if agg.min_elapsed_ms > 0.0 {
        agg.total_qps = agg.total_queries as f64 / (agg.min_elapsed_ms / 1000.0);
    }
    Ok(agg)
}
