use std::time::Duration;

use psb_exec::ClientQueues;
use psb_model::TaskResult;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    error::{CoreError, CoreResult},
    matrix::TaskMatrix,
    rtt::{config::RoundTripConfig, report::RoundTripReport},
    signal::AlternationSignal,
};

/// Producer/consumer pair driving the task matrix through the client queues.
pub struct RoundTrip {
    queues: ClientQueues,
    matrix: TaskMatrix,
    task_sleep: Duration,
    alternator: AlternationSignal,
    done: CancellationToken,
}

impl RoundTrip {
    pub fn new(queues: ClientQueues, cfg: &RoundTripConfig) -> Self {
        Self {
            queues,
            matrix: cfg.matrix(),
            task_sleep: cfg.task_sleep,
            alternator: AlternationSignal::new(),
            done: CancellationToken::new(),
        }
    }

    /// Use `token` as the stop request. The producer checks it before every submission.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.done = token;
        self
    }

    pub fn queues(&self) -> &ClientQueues {
        &self.queues
    }

    pub fn alternator(&self) -> &AlternationSignal {
        &self.alternator
    }

    /// Run producer and consumer to completion.
    ///
    /// Fails if the number of received results differs from the number of submissions,
    /// or if an uncancelled run submitted fewer tasks than the matrix holds.
    pub async fn run(&self) -> CoreResult<RoundTripReport> {
        let finished = CancellationToken::new();
        let (submitted, results) =
            tokio::try_join!(self.producer(&finished), self.consumer(&finished))?;

        let expected = self.matrix.len();
        let cancelled = self.done.is_cancelled();
        let received = results.len();
        if received != submitted || (!cancelled && submitted != expected) {
            return Err(CoreError::CoordinationMismatch {
                expected,
                submitted,
                received,
            });
        }

        debug!(
            target: "psb.core.rtt",
            sets = self.alternator.sets(),
            clears = self.alternator.clears(),
            "alternation finished"
        );
        Ok(RoundTripReport {
            results,
            expected,
            submitted,
            cancelled,
        })
    }

    async fn producer(&self, finished: &CancellationToken) -> CoreResult<usize> {
        // wakes the consumer when the producer exits early (cancelled or failed)
        let _finished = finished.clone().drop_guard();
        let mut submitted = 0usize;

        for (task_info, input) in self.matrix.tasks() {
            if self.done.is_cancelled() {
                info!(target: "psb.bench", submitted, "stop requested; producer exiting");
                break;
            }

            self.queues
                .send_inputs(input, task_info.output_size_bytes, self.task_sleep, task_info)
                .await?;
            submitted += 1;

            self.alternator.wait().await;
            self.alternator.clear();
        }
        Ok(submitted)
    }

    async fn consumer(&self, finished: &CancellationToken) -> CoreResult<Vec<TaskResult>> {
        let expected = self.matrix.len();
        let mut results = Vec::with_capacity(expected);

        for _ in 0..expected {
            let result = tokio::select! {
                biased;
                res = self.queues.get_result() => res?,
                // every submission has been answered once the producer is gone
                _ = finished.cancelled() => break,
            };

            if let Some(proxy) = result.value_proxy() {
                match self.queues.store() {
                    Some(store) if store.name() == proxy.store => store.evict(&proxy.key).await?,
                    _ => warn!(
                        target: "psb.core.rtt",
                        store = %proxy.store,
                        key = %proxy.key,
                        "result proxied through an unknown store; not evicted"
                    ),
                }
            }

            let result = result.redacted();
            info!(
                target: "psb.bench",
                input_size = result.task_info.input_size_bytes,
                output_size = result.task_info.output_size_bytes,
                repeat = result.task_info.repeat_index,
                success = result.success,
                round_trip_ms = result.round_trip_ms().unwrap_or_default(),
                running_ms = result.time_running_ms,
                "got result"
            );
            results.push(result);
            self.alternator.set();
        }
        Ok(results)
    }
}
