use std::path::PathBuf;

use clap::Args;

use crate::logger::{config::LoggerConfig, format::LoggerFormat};

/// Logging options shared by the benchmark binaries; embed with `#[command(flatten)]`.
#[derive(Debug, Clone, Args)]
pub struct LogArgs {
    /// Log filter directive, e.g. `info` or `psb.bench=info,warn`.
    #[arg(long = "log-level", default_value = "info")]
    pub level: String,

    /// Log output format (text, json, journald).
    #[arg(long = "log-format", default_value = "text")]
    pub format: LoggerFormat,

    /// Append logs to this file instead of stdout.
    #[arg(long = "log-file")]
    pub file: Option<PathBuf>,
}

impl From<LogArgs> for LoggerConfig {
    fn from(args: LogArgs) -> Self {
        LoggerConfig {
            format: args.format,
            level: args.level,
            file: args.file,
            ..Default::default()
        }
    }
}
