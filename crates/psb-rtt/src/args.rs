use std::{path::PathBuf, time::Duration};

use clap::{ArgGroup, Parser, ValueEnum};
use psb_core::RoundTripConfig;
use psb_observe::{LogArgs, parse_seconds};
use psb_store::DEFAULT_ENDPOINT_ADDRESS;

/// Round-trip task latency benchmark.
#[derive(Debug, Parser)]
#[command(name = "psb-rtt", version)]
#[command(group(ArgGroup::new("backend").required(true).args(["funcx", "parsl"])))]
pub struct Cli {
    /// Execute tasks on a remote endpoint.
    #[arg(long, requires = "endpoint")]
    pub funcx: bool,

    /// Execute tasks in this process.
    #[arg(long)]
    pub parsl: bool,

    /// Remote endpoint executing the tasks.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Address of the remote execution service.
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    pub funcx_address: String,

    /// Task input sizes in bytes.
    #[arg(long, num_args = 1.., required = true)]
    pub input_sizes: Vec<f64>,

    /// Task output sizes in bytes.
    #[arg(long, num_args = 1.., required = true)]
    pub output_sizes: Vec<f64>,

    /// Repetitions of every task configuration.
    #[arg(long, default_value_t = 1)]
    pub task_repeat: usize,

    /// Seconds each task sleeps.
    #[arg(long, default_value = "0", value_parser = parse_seconds)]
    pub task_sleep: Duration,

    /// Send the same input to every task of an input size.
    #[arg(long)]
    pub reuse_inputs: bool,

    /// Parent directory of the run directory.
    #[arg(long, default_value = "runs")]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    Memory,
    Endpoint,
}

/// Store used to pass task inputs and outputs by reference.
#[derive(Debug, Clone, clap::Args)]
pub struct StoreArgs {
    /// Store backend; payloads travel inline when omitted.
    #[arg(long, value_enum)]
    pub ps_backend: Option<Backend>,

    /// Endpoint UUID for the endpoint backend.
    #[arg(long, required_if_eq("ps_backend", "endpoint"))]
    pub ps_endpoint: Option<String>,

    /// Address of the local endpoint peer service.
    #[arg(long, default_value = DEFAULT_ENDPOINT_ADDRESS)]
    pub ps_address: String,
}

impl Cli {
    pub fn config(&self) -> RoundTripConfig {
        RoundTripConfig {
            input_sizes: self.input_sizes.clone(),
            output_sizes: self.output_sizes.clone(),
            task_repeat: self.task_repeat,
            task_sleep: self.task_sleep,
            reuse_inputs: self.reuse_inputs,
        }
    }
}
