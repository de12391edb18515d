use std::{sync::Arc, time::Instant};

use async_trait::async_trait;
use psb_model::{TaskRequest, TaskResult};
use psb_store::Store;
use tracing::trace;

use crate::{error::ExecResult, queue::ServerQueues, server::TaskServer, target::target_function};

/// In-process task server running [`target_function`] on tokio tasks.
pub struct LocalTaskServer {
    name: &'static str,
    store: Option<Arc<dyn Store>>,
}

impl LocalTaskServer {
    pub fn new(store: Option<Arc<dyn Store>>) -> Self {
        Self {
            name: "local",
            store,
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

async fn execute(request: TaskRequest, store: Option<Arc<dyn Store>>) -> TaskResult {
    let start = Instant::now();
    let out = target_function(
        &request.inputs,
        request.output_size_bytes,
        request.sleep,
        store.as_deref(),
    )
    .await;
    let ms = start.elapsed().as_secs_f64() * 1000.0;

    match out {
        Ok(value) => {
            trace!(target: "psb.exec.local", task = ?request.task_info, ms, "task done");
            TaskResult::success(request, value, ms)
        }
        Err(e) => TaskResult::failure(request, e.to_string(), ms),
    }
}

#[async_trait]
impl TaskServer for LocalTaskServer {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn serve(&self, queues: ServerQueues) -> ExecResult<()> {
        let store = self.store.clone();
        super::dispatch(self.name, queues, move |request| execute(request, store.clone())).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use psb_model::{Payload, TaskConfig};
    use psb_store::MemoryStore;

    use super::*;
    use crate::queue::queue_pair;

    #[tokio::test]
    async fn executes_until_killed() {
        let (client, queues) = queue_pair(None);
        let server = LocalTaskServer::new(None);
        let handle = tokio::spawn(async move { server.serve(queues).await });

        for i in 0..3 {
            client
                .send_inputs(
                    Payload::empty(8.0),
                    16.0,
                    Duration::ZERO,
                    TaskConfig::new(8.0, 16.0, i),
                )
                .await
                .unwrap();
            let res = client.get_result().await.unwrap();
            assert!(res.success);
            assert_eq!(res.task_info.repeat_index, i);
        }

        client.send_kill_signal().unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn drains_inflight_tasks_after_kill() {
        let (client, queues) = queue_pair(None);
        let server = LocalTaskServer::new(None);

        client
            .send_inputs(
                Payload::empty(0.0),
                0.0,
                Duration::from_millis(50),
                TaskConfig::new(0.0, 0.0, 0),
            )
            .await
            .unwrap();
        client.send_kill_signal().unwrap();

        server.serve(queues).await.unwrap();
        assert!(client.get_result().await.unwrap().success);
    }

    #[tokio::test]
    async fn failures_become_unsuccessful_results() {
        // client proxies through a store the server does not know
        let (client, queues) = queue_pair(Some(Arc::new(MemoryStore::new("client-only"))));
        let server = LocalTaskServer::new(Some(Arc::new(MemoryStore::new("server"))));
        let handle = tokio::spawn(async move { server.serve(queues).await });

        client
            .send_inputs(
                Payload::empty(8.0),
                8.0,
                Duration::ZERO,
                TaskConfig::new(8.0, 8.0, 0),
            )
            .await
            .unwrap();
        let res = client.get_result().await.unwrap();
        assert!(!res.success);
        assert!(res.failure_info.unwrap().contains("client-only"));

        client.send_kill_signal().unwrap();
        handle.await.unwrap().unwrap();
    }
}
