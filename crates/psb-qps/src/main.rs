use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use psb_core::LoadGenerator;
use psb_observe::{LoggerConfig, logger_init};
use psb_store::StoreConfig;

mod args;
use args::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger_init(&LoggerConfig::from(cli.log.clone()))?;

    let cfg = cli.config();
    info!(
        target: "psb.bench",
        "starting QPS for /{} with endpoint {}",
        cfg.route,
        cli.endpoint
    );

    let connector = StoreConfig::endpoint("store", &cli.address, cli.endpoint.clone());
    let stats = LoadGenerator::new(cfg, Arc::new(connector)).run().await?;

    info!(
        target: "psb.bench",
        total_queries = stats.total_queries,
        total_qps = stats.total_qps,
        "QPS test complete"
    );
    println!("{stats}");
    Ok(())
}
