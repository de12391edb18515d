use std::{path::PathBuf, sync::Arc, time::SystemTime};

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use psb_core::{RoundTripBenchmark, run_dir_name};
use psb_exec::{LocalTaskServer, RemoteTaskServer, TaskServer};
use psb_observe::{LoggerConfig, logger_init};
use psb_store::{Store, StoreConfig, StoreConnector};

mod args;
use args::{Backend, Cli, StoreArgs};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger_init(&LoggerConfig::from(cli.log.clone()))?;

    let cancel = CancellationToken::new();
    watch_ctrl_c(cancel.clone());
    run(&cli, cancel).await?;
    Ok(())
}

/// Run one benchmark as described by `cli`; returns the path of the written results file.
async fn run(cli: &Cli, cancel: CancellationToken) -> Result<PathBuf> {
    let run_dir = cli.output_dir.join(run_dir_name(SystemTime::now()));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("creating run directory {}", run_dir.display()))?;

    let store = connect_store(&cli.store).await?;
    let server = task_server(cli, store.clone())?;
    info!(
        target: "psb.bench",
        server = server.name(),
        run_dir = %run_dir.display(),
        "launching round-trip benchmark"
    );

    let report = RoundTripBenchmark::new(cli.config(), store)
        .with_cancellation(cancel)
        .run(server)
        .await?;
    let path = report.write_jsonl(&run_dir)?;
    info!(
        target: "psb.bench",
        results = report.results.len(),
        path = %path.display(),
        "results written"
    );
    Ok(path)
}

async fn connect_store(args: &StoreArgs) -> Result<Option<Arc<dyn Store>>> {
    let cfg = match args.ps_backend {
        None => return Ok(None),
        Some(Backend::Memory) => StoreConfig::memory("memory-store"),
        Some(Backend::Endpoint) => {
            let endpoint = args
                .ps_endpoint
                .clone()
                .context("--ps-endpoint is required for the endpoint backend")?;
            StoreConfig::endpoint("endpoint-store", &args.ps_address, endpoint)
        }
    };
    Ok(Some(cfg.connect().await?))
}

fn task_server(cli: &Cli, store: Option<Arc<dyn Store>>) -> Result<Box<dyn TaskServer>> {
    if cli.parsl {
        return Ok(Box::new(LocalTaskServer::new(store).with_name("parsl")));
    }
    let endpoint = cli
        .endpoint
        .clone()
        .context("--endpoint is required with --funcx")?;
    Ok(Box::new(RemoteTaskServer::new(
        &cli.funcx_address,
        endpoint,
        store,
    )?))
}

/// Stop submitting new tasks on the first Ctrl-C.
fn watch_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!(target: "psb.bench", "interrupt received; finishing the in-flight task");
                token.cancel();
            }
            Err(e) => warn!(target: "psb.bench", error = %e, "cannot listen for ctrl-c"),
        }
    });
}
