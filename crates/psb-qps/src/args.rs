use std::time::Duration;

use clap::Parser;
use psb_core::QpsConfig;
use psb_model::RouteKind;
use psb_observe::{LogArgs, parse_seconds};
use psb_store::DEFAULT_ENDPOINT_ADDRESS;

/// Endpoint queries-per-second test.
#[derive(Debug, Parser)]
#[command(name = "psb-qps", version)]
pub struct Cli {
    /// Endpoint UUID.
    pub endpoint: String,

    /// Endpoint route to query (GET, SET, EXISTS, EVICT or ENDPOINT).
    #[arg(long)]
    pub route: RouteKind,

    /// Payload size in bytes for GET and SET queries.
    #[arg(long, default_value_t = 0)]
    pub payload_size: usize,

    /// Number of workers making queries.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub workers: u32,

    /// Seconds to sleep between queries.
    #[arg(long, default_value = "0", value_parser = parse_seconds)]
    pub sleep: Duration,

    /// Queries per worker.
    #[arg(long, default_value_t = 100)]
    pub queries: u64,

    /// Address of the local endpoint peer service.
    #[arg(long, default_value = DEFAULT_ENDPOINT_ADDRESS)]
    pub address: String,

    #[command(flatten)]
    pub log: LogArgs,
}

impl Cli {
    pub fn config(&self) -> QpsConfig {
        QpsConfig {
            payload_size: self.payload_size,
            queries: self.queries,
            sleep: self.sleep,
            workers: self.workers as usize,
            ..QpsConfig::new(self.route)
        }
    }
}
