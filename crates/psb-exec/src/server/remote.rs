use std::{sync::Arc, time::Instant};

use async_trait::async_trait;
use psb_model::{Payload, TaskRequest, TaskResult, Value};
use psb_store::Store;
use reqwest::{Url, header::CONTENT_TYPE};
use tracing::{debug, warn};

use crate::{
    error::{ExecError, ExecResult},
    queue::ServerQueues,
    server::TaskServer,
    target::resolve,
};

/// Name of the function the remote endpoint runs for every task.
const FUNCTION: &str = "target_function";

/// Task server forwarding every task to a remote execution endpoint over HTTP.
///
/// Each task is one `POST {address}/v1/run` carrying the input bytes as the body and
/// `endpoint`, `function`, `output_size` and `sleep` (seconds) as query parameters;
/// a 2xx response body is the task output.
pub struct RemoteTaskServer {
    inner: Arc<Remote>,
}

struct Remote {
    run_url: Url,
    endpoint: String,
    client: reqwest::Client,
    store: Option<Arc<dyn Store>>,
}

impl RemoteTaskServer {
    pub fn new(
        address: &str,
        endpoint: impl Into<String>,
        store: Option<Arc<dyn Store>>,
    ) -> ExecResult<Self> {
        let run_url = Url::parse(address)
            .and_then(|base| base.join("v1/run"))
            .map_err(|e| ExecError::Remote(format!("invalid address {address}: {e}")))?;

        Ok(Self {
            inner: Arc::new(Remote {
                run_url,
                endpoint: endpoint.into(),
                client: reqwest::Client::new(),
                store,
            }),
        })
    }
}

impl Remote {
    fn url_for(&self, request: &TaskRequest) -> Url {
        let mut url = self.run_url.clone();
        url.query_pairs_mut()
            .append_pair("endpoint", &self.endpoint)
            .append_pair("function", FUNCTION)
            .append_pair("output_size", &request.output_size_bytes.to_string())
            .append_pair("sleep", &request.sleep.as_secs_f64().to_string());
        url
    }

    async fn run(&self, request: &TaskRequest) -> ExecResult<Value> {
        let input = resolve(&request.inputs, self.store.as_deref()).await?;

        let resp = self
            .client
            .post(self.url_for(request))
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(input.to_bytes())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ExecError::Remote(format!("status {status}: {body}")));
        }

        let output = resp.bytes().await?;
        match &self.store {
            Some(store) => Ok(Value::Proxy(store.proxy(output.to_vec()).await?)),
            None => Ok(Value::Inline(Payload::from_bytes(&output))),
        }
    }

    async fn execute(self: Arc<Self>, request: TaskRequest) -> TaskResult {
        let start = Instant::now();
        let out = self.run(&request).await;
        let ms = start.elapsed().as_secs_f64() * 1000.0;

        match out {
            Ok(value) => TaskResult::success(request, value, ms),
            Err(e) => {
                warn!(target: "psb.exec.remote", task = ?request.task_info, error = %e, "remote task failed");
                TaskResult::failure(request, e.to_string(), ms)
            }
        }
    }
}

#[async_trait]
impl TaskServer for RemoteTaskServer {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn serve(&self, queues: ServerQueues) -> ExecResult<()> {
        debug!(target: "psb.exec.remote", endpoint = %self.inner.endpoint, url = %self.inner.run_url, "serving");
        let inner = Arc::clone(&self.inner);
        super::dispatch("remote", queues, move |request| {
            Arc::clone(&inner).execute(request)
        })
        .await?;
        Ok(())
    }
}
