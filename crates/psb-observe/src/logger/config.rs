use std::{io::IsTerminal, path::PathBuf};

use crate::logger::format::LoggerFormat;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// `EnvFilter` directive, e.g. `info` or `psb_core=debug,info`.
    pub level: String,
    pub with_targets: bool,
    pub use_color: bool,
    /// Append logs to this file instead of stdout. Ignored by journald.
    pub file: Option<PathBuf>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        let use_color = cfg!(test) || std::io::stdout().is_terminal();
        Self {
            format: LoggerFormat::Text,
            level: "info".to_string(),
            with_targets: true,
            use_color,
            file: None,
        }
    }
}
