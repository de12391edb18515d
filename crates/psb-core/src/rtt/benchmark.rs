use std::sync::Arc;

use psb_exec::{TaskServer, queue_pair};
use psb_store::Store;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::{
    error::{CoreError, CoreResult},
    rtt::{config::RoundTripConfig, report::RoundTripReport, thinker::RoundTrip},
};

/// Wires a task server, the client queues and the [`RoundTrip`] thinker into one run.
pub struct RoundTripBenchmark {
    cfg: RoundTripConfig,
    store: Option<Arc<dyn Store>>,
    cancel: CancellationToken,
}

impl RoundTripBenchmark {
    /// With a store, inputs and outputs travel as proxies through it.
    pub fn new(cfg: RoundTripConfig, store: Option<Arc<dyn Store>>) -> Self {
        Self {
            cfg,
            store,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the whole matrix against `server`.
    ///
    /// The server is always sent a kill signal and awaited, and the store closed, even when the
    /// thinker fails.
    pub async fn run(self, server: Box<dyn TaskServer>) -> CoreResult<RoundTripReport> {
        let (client, server_queues) = queue_pair(self.store.clone());
        let server_name = server.name();
        let handle = tokio::spawn(async move { server.serve(server_queues).await });

        let thinker = RoundTrip::new(client, &self.cfg).with_cancellation(self.cancel.clone());
        info!(
            target: "psb.bench",
            server = server_name,
            tasks = self.cfg.matrix().len(),
            proxied = self.store.is_some(),
            "starting round-trip benchmark"
        );
        let outcome = thinker.run().await;

        if let Err(e) = thinker.queues().send_kill_signal() {
            error!(target: "psb.core.rtt", error = %e, "failed to stop task server");
        }
        let served = match handle.await {
            Ok(res) => res.map_err(CoreError::from),
            Err(e) => Err(CoreError::Server(e.to_string())),
        };

        let closed = match &self.store {
            Some(store) => store.close().await,
            None => Ok(()),
        };
        if let Err(e) = &closed {
            error!(target: "psb.core.rtt", error = %e, "failed to close store");
        }

        // the run's own failure outranks a failed close
        let report = outcome?;
        served?;
        closed?;
        info!(
            target: "psb.bench",
            received = report.results.len(),
            failures = report.failures(),
            cancelled = report.cancelled,
            "round-trip benchmark finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use psb_exec::{ExecError, ExecResult, LocalTaskServer, ServerQueues};
    use psb_store::{EndpointInfo, MemoryStore, StoreError};

    use super::*;

    fn config() -> RoundTripConfig {
        RoundTripConfig {
            input_sizes: vec![100.0, 1000.0],
            output_sizes: vec![10.0],
            task_repeat: 2,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn runs_matrix_and_closes_store() {
        let store = MemoryStore::new("bench");
        let shared: Arc<dyn Store> = Arc::new(store.clone());
        let server = LocalTaskServer::new(Some(Arc::clone(&shared)));

        let report = RoundTripBenchmark::new(config(), Some(shared))
            .run(Box::new(server))
            .await
            .unwrap();

        assert_eq!(report.results.len(), 4);
        assert_eq!(report.failures(), 0);
        assert!(store.exists("anything").await.is_err());
    }

    #[tokio::test]
    async fn runs_without_store() {
        let report = RoundTripBenchmark::new(config(), None)
            .run(Box::new(LocalTaskServer::new(None)))
            .await
            .unwrap();
        assert_eq!(report.submitted, 4);
        assert!(!report.cancelled);
    }

    #[tokio::test]
    async fn cancelled_run_returns_partial_report() {
        let cfg = RoundTripConfig {
            task_repeat: 50,
            task_sleep: Duration::from_millis(10),
            ..config()
        };
        let bench = RoundTripBenchmark::new(cfg, None);
        let token = bench.cancellation();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            token.cancel();
        });

        let report = bench.run(Box::new(LocalTaskServer::new(None))).await.unwrap();
        assert!(report.cancelled);
        assert!(report.submitted < 100);
        assert_eq!(report.results.len(), report.submitted);
    }

    struct Broken;

    #[async_trait]
    impl TaskServer for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn serve(&self, _queues: ServerQueues) -> ExecResult<()> {
            Err(ExecError::Worker("no executors".into()))
        }
    }

    #[tokio::test]
    async fn failed_server_surfaces_as_error() {
        let err = RoundTripBenchmark::new(config(), None)
            .run(Box::new(Broken))
            .await
            .unwrap_err();
        // dropping the server queues closes the result channel first
        assert!(matches!(err, CoreError::Exec(_)));
    }

    /// Memory store whose `close` always fails.
    struct StuckOpen(MemoryStore);

    #[async_trait]
    impl Store for StuckOpen {
        fn name(&self) -> &str {
            self.0.name()
        }
        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
            self.0.get(key).await
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
            Err(StoreError::Closed("stuck".into()))
        }
    }

    #[tokio::test]
    async fn run_failure_is_kept_when_close_also_fails() {
        let store: Arc<dyn Store> = Arc::new(StuckOpen(MemoryStore::new("stuck")));
        let err = RoundTripBenchmark::new(config(), Some(store))
            .run(Box::new(Broken))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Exec(_)));
    }

    #[tokio::test]
    async fn close_failure_fails_an_otherwise_good_run() {
        let store: Arc<dyn Store> = Arc::new(StuckOpen(MemoryStore::new("stuck")));
        let server = LocalTaskServer::new(Some(Arc::clone(&store)));
        let err = RoundTripBenchmark::new(config(), Some(store))
            .run(Box::new(server))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Store(StoreError::Closed(_))));
    }
}
