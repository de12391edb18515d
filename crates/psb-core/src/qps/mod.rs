//! Multi-worker QPS load generator.
//!
//! Every worker owns its own store connection, prepares its route, then sleeps until a start time
//! shared by all workers before issuing its first request. Worker statistics are merged with
//! [`aggregate`](crate::aggregate) once all workers have reported.
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant, SystemTime},
};

use psb_model::{AggregateStats, RouteKind, Stats};
use psb_store::StoreConnector;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    aggregate::aggregate,
    clock::{readable_time, wait_until},
    error::{CoreError, CoreResult},
};

mod routes;
use routes::RouteTest;

/// Head start given to workers so all of them are live before the first request.
pub const PROCESS_STARTUP_BUFFER: Duration = Duration::from_secs(5);

/// Time given to the remaining workers to clean up after one of them failed.
pub const CLEANUP_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct QpsConfig {
    pub route: RouteKind,
    /// Bytes per GET/SET payload; ignored by other routes.
    pub payload_size: usize,
    /// Requests per worker.
    pub queries: u64,
    /// Pause after every request.
    pub sleep: Duration,
    pub workers: usize,
    pub startup_buffer: Duration,
}

impl QpsConfig {
    pub fn new(route: RouteKind) -> Self {
        Self {
            route,
            payload_size: 0,
            queries: 100,
            sleep: Duration::ZERO,
            workers: 1,
            startup_buffer: PROCESS_STARTUP_BUFFER,
        }
    }
}

/// What a single worker reports back to the controller.
#[derive(Debug, Clone, Copy)]
pub struct WorkerRun {
    pub worker: usize,
    pub stats: Stats,
    /// Shared start time the worker waited for.
    pub start_time: SystemTime,
    /// Wall-clock time at which the worker issued its first request.
    pub first_request_at: SystemTime,
}

pub struct LoadGenerator {
    cfg: QpsConfig,
    connector: Arc<dyn StoreConnector>,
}

impl LoadGenerator {
    pub fn new(cfg: QpsConfig, connector: Arc<dyn StoreConnector>) -> Self {
        Self { cfg, connector }
    }

    /// Run every worker to completion and merge their statistics.
    pub async fn run(&self) -> CoreResult<AggregateStats> {
        let runs = self.run_workers().await?;

        let firsts = runs.iter().map(|r| r.first_request_at);
        if let (Some(earliest), Some(latest)) = (firsts.clone().min(), firsts.max()) {
            let skew = latest.duration_since(earliest).unwrap_or_default();
            debug!(target: "psb.core.qps", skew_ms = skew.as_secs_f64() * 1000.0, "first request skew");
        }

        let stats: Vec<Stats> = runs.iter().map(|r| r.stats).collect();
        aggregate(&stats)
    }

    /// Dispatch all workers against one shared start time and wait for every one of them.
    ///
    /// The first worker that fails stops the others; there is no partial result.
    pub async fn run_workers(&self) -> CoreResult<Vec<WorkerRun>> {
        let workers = self.cfg.workers;
        if workers == 0 {
            return Err(CoreError::InvalidConfig("at least one worker is required".into()));
        }

        info!(target: "psb.bench", route = %self.cfg.route, workers, "starting QPS test");
        let start_time = SystemTime::now() + self.cfg.startup_buffer;
        info!(target: "psb.bench", start = %readable_time(start_time), "starting test");

        let stop = CancellationToken::new();
        let mut set = JoinSet::new();
        let mut ids = HashMap::with_capacity(workers);
        for worker in 0..workers {
            let cfg = self.cfg.clone();
            let connector = Arc::clone(&self.connector);
            let stop = stop.clone();
            let handle = set.spawn(async move {
                run_worker(worker, cfg, connector, start_time, stop).await
            });
            ids.insert(handle.id(), worker);
        }
        info!(target: "psb.bench", workers, "initialized workers");

        let mut runs = Vec::with_capacity(workers);
        while let Some(joined) = set.join_next_with_id().await {
            let (id, outcome) = match joined {
                Ok((id, res)) => (id, res.map_err(|e| e.to_string())),
                Err(e) => (e.id(), Err(e.to_string())),
            };
            match outcome {
                Ok(run) => runs.push(run),
                Err(reason) => {
                    let worker = ids.get(&id).copied().unwrap_or_default();
                    stop_workers(set, &stop).await;
                    return Err(CoreError::WorkerFailure { worker, reason });
                }
            }
        }
        runs.sort_by_key(|r| r.worker);
        Ok(runs)
    }
}

/// Ask the remaining workers to stop and clean up; abort whatever is still running after
/// [`CLEANUP_GRACE`].
async fn stop_workers(mut set: JoinSet<CoreResult<WorkerRun>>, stop: &CancellationToken) {
    stop.cancel();
    let drained = tokio::time::timeout(CLEANUP_GRACE, async {
        while set.join_next().await.is_some() {}
    })
    .await;
    if drained.is_err() {
        warn!(target: "psb.core.qps", pending = set.len(), "workers did not stop in time; aborting");
        set.abort_all();
    }
}

/// Timed part of a worker run.
struct Measured {
    first_request_at: SystemTime,
    elapsed: Duration,
    latencies: Vec<f64>,
}

async fn run_worker(
    worker: usize,
    cfg: QpsConfig,
    connector: Arc<dyn StoreConnector>,
    start_time: SystemTime,
    stop: CancellationToken,
) -> CoreResult<WorkerRun> {
    let store = tokio::select! {
        _ = stop.cancelled() => return Err(CoreError::Stopped),
        store = connector.connect() => store?,
    };
    let test = RouteTest::prepare(cfg.route, store, cfg.payload_size).await?;

    // the key written by `prepare` is removed on every exit path
    let measured = measure(&test, &cfg, start_time, &stop).await;
    let cleaned = test.cleanup().await;
    let measured = measured?;
    cleaned?;

    let stats = Stats::from_latencies(measured.elapsed.as_secs_f64() * 1000.0, &measured.latencies);
    debug!(
        target: "psb.core.qps",
        worker,
        queries = stats.queries,
        elapsed_ms = stats.total_elapsed_ms,
        avg_latency_ms = stats.avg_latency_ms,
        "worker finished"
    );
    Ok(WorkerRun {
        worker,
        stats,
        start_time,
        first_request_at: measured.first_request_at,
    })
}

async fn measure(
    test: &RouteTest,
    cfg: &QpsConfig,
    start_time: SystemTime,
    stop: &CancellationToken,
) -> CoreResult<Measured> {
    tokio::select! {
        _ = stop.cancelled() => return Err(CoreError::Stopped),
        _ = wait_until(start_time) => {}
    }
    let first_request_at = SystemTime::now();

    let mut latencies = Vec::with_capacity(cfg.queries as usize);
    for _ in 0..cfg.queries {
        if stop.is_cancelled() {
            return Err(CoreError::Stopped);
        }
        let t = Instant::now();
        test.query().await?;
        latencies.push(t.elapsed().as_secs_f64() * 1000.0);

        test.reset().await?;
        if !cfg.sleep.is_zero() {
            tokio::time::sleep(cfg.sleep).await;
        }
    }
    let elapsed = SystemTime::now()
        .duration_since(start_time)
        .unwrap_or_default();

    Ok(Measured {
        first_request_at,
        elapsed,
        latencies,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use psb_store::{EndpointInfo, MemoryStore, Store, StoreConfig, StoreError};

    use super::*;

    fn config(route: RouteKind, workers: usize) -> QpsConfig {
        QpsConfig {
            payload_size: 32,
            queries: 5,
            workers,
            startup_buffer: Duration::from_millis(200),
            ..QpsConfig::new(route)
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn workers_start_together() {
        let lg = LoadGenerator::new(
            config(RouteKind::Exists, 4),
            Arc::new(StoreConfig::memory("qps")),
        );
        let runs = lg.run_workers().await.unwrap();
        assert_eq!(runs.len(), 4);

        let start = runs[0].start_time;
        for r in &runs {
            assert_eq!(r.start_time, start);
            assert!(r.first_request_at >= start);
        }

        let earliest = runs.iter().map(|r| r.first_request_at).min().unwrap();
        let latest = runs.iter().map(|r| r.first_request_at).max().unwrap();
        // spread comes from scheduling jitter, not from the startup buffer
        assert!(latest.duration_since(earliest).unwrap() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn every_route_completes_against_memory_store() {
        for route in RouteKind::ALL {
            let store = StoreConfig::memory("qps");
            let backing = match &store {
                StoreConfig::Memory(m) => m.clone(),
                _ => unreachable!(),
            };
            let agg = LoadGenerator::new(config(route, 2), Arc::new(store))
                .run()
                .await
                .unwrap();

            assert_eq!(agg.workers, 2, "{route}");
            assert_eq!(agg.total_queries, 10, "{route}");
            assert!(agg.min_latency_ms <= agg.max_latency_ms, "{route}");
            assert!(agg.min_elapsed_ms <= agg.max_elapsed_ms, "{route}");
            assert!(backing.is_empty().await, "{route} left keys behind");
        }
    }

    #[tokio::test]
    async fn zero_workers_is_rejected() {
        let lg = LoadGenerator::new(
            config(RouteKind::Get, 0),
            Arc::new(StoreConfig::memory("qps")),
        );
        assert!(matches!(lg.run().await, Err(CoreError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn zero_queries_reports_empty_stats() {
        let cfg = QpsConfig {
            queries: 0,
            ..config(RouteKind::Set, 1)
        };
        let agg = LoadGenerator::new(cfg, Arc::new(StoreConfig::memory("qps")))
            .run()
            .await
            .unwrap();
        assert_eq!(agg.total_queries, 0);
        assert_eq!(agg.total_qps, 0.0);
    }

    /// Hands out working stores except for the second connection.
    struct FlakyConnector {
        calls: AtomicUsize,
        store: MemoryStore,
    }

    #[async_trait]
    impl StoreConnector for FlakyConnector {
        async fn connect(&self) -> Result<Arc<dyn Store>, StoreError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 1 {
                return Err(StoreError::Closed("flaky".into()));
            }
            Ok(Arc::new(self.store.clone()))
        }
    }

    #[tokio::test]
    async fn failed_worker_fails_the_run() {
        let connector = FlakyConnector {
            calls: AtomicUsize::new(0),
            store: MemoryStore::new("qps"),
        };
        let err = LoadGenerator::new(config(RouteKind::Endpoint, 3), Arc::new(connector))
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::WorkerFailure { .. }));
    }

    /// First connection hangs; every later one fails.
    struct StalledThenFailing {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl StoreConnector for StalledThenFailing {
        async fn connect(&self) -> Result<Arc<dyn Store>, StoreError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_secs(30)).await;
            }
            Err(StoreError::Closed("stalled".into()))
        }
    }

    #[tokio::test]
    async fn failure_is_reported_without_waiting_for_stalled_workers() {
        let connector = StalledThenFailing {
            calls: AtomicUsize::new(0),
        };
        let started = Instant::now();
        let err = LoadGenerator::new(config(RouteKind::Exists, 2), Arc::new(connector))
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::WorkerFailure { .. }));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    /// Memory store whose reads fail.
    struct BrokenReads(MemoryStore);

    #[async_trait]
    impl Store for BrokenReads {
        fn name(&self) -> &str {
            self.0.name()
        }
        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StoreError> {
            Err(StoreError::Closed("broken reads".into()))
        }
        async fn set(&self, key: &str, data: Vec<u8>) -> Result<String, StoreError> {
            self.0.set(key, data).await
        }
        async fn exists(&self, key: &str) -> Result<bool, StoreError> {
            self.0.exists(key).await
        }
        async fn evict(&self, key: &str) -> Result<(), StoreError> {
            self.0.evict(key).await
        }
        async fn endpoint_info(&self) -> Result<EndpointInfo, StoreError> {
            self.0.endpoint_info().await
        }
        async fn close(&self) -> Result<(), StoreError> {
            self.0.close().await
        }
    }

    /// Second connection gets a store whose reads fail; all share one backing map.
    struct OneBrokenReader {
        calls: AtomicUsize,
        store: MemoryStore,
    }

    #[async_trait]
    impl StoreConnector for OneBrokenReader {
        async fn connect(&self) -> Result<Arc<dyn Store>, StoreError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 1 {
                return Ok(Arc::new(BrokenReads(self.store.clone())));
            }
            Ok(Arc::new(self.store.clone()))
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn failed_run_still_removes_every_worker_key() {
        let backing = MemoryStore::new("qps");
        let connector = OneBrokenReader {
            calls: AtomicUsize::new(0),
            store: backing.clone(),
        };
        let cfg = QpsConfig {
            queries: 10_000,
            sleep: Duration::from_millis(1),
            startup_buffer: Duration::from_millis(50),
            ..config(RouteKind::Get, 2)
        };

        let err = LoadGenerator::new(cfg, Arc::new(connector))
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::WorkerFailure { .. }));
        assert!(backing.is_empty().await);
    }
}
