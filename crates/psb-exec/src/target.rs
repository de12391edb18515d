use std::time::Duration;

use psb_model::{Payload, SizeBytes, Value};
use psb_store::Store;
use tracing::trace;

use crate::error::{ExecError, ExecResult};

/// Benchmark task body.
///
/// Resolves the input (a proxied input is fetched and then evicted from its store), sleeps to
/// simulate work and returns an empty payload of `output_size_bytes`. With a store the output is
/// proxied through it.
pub async fn target_function(
    inputs: &Value,
    output_size_bytes: SizeBytes,
    sleep: Duration,
    store: Option<&dyn Store>,
) -> ExecResult<Value> {
    let input = resolve(inputs, store).await?;
    trace!(target: "psb.exec.target", input_bytes = input.size_bytes(), "input resolved");

    if !sleep.is_zero() {
        tokio::time::sleep(sleep).await;
    }

    let output = Payload::empty(output_size_bytes);
    match store {
        Some(store) => Ok(Value::Proxy(store.proxy(output.to_bytes()).await?)),
        None => Ok(Value::Inline(output)),
    }
}

/// Materialize an input value.
pub(crate) async fn resolve(inputs: &Value, store: Option<&dyn Store>) -> ExecResult<Payload> {
    match inputs {
        Value::Inline(payload) => Ok(payload.clone()),
        Value::Proxy(proxy) => {
            let store = store
                .filter(|s| s.name() == proxy.store)
                .ok_or_else(|| ExecError::UnknownStore(proxy.store.clone()))?;
            let bytes = store
                .get(&proxy.key)
                .await?
                .ok_or_else(|| ExecError::MissingPayload(proxy.key.clone()))?;
            store.evict(&proxy.key).await?;
            Ok(Payload::from_bytes(&bytes))
        }
        Value::Removed => Ok(Payload::empty(0.0)),
    }
}
