use std::{fmt, str::FromStr};

use crate::logger::error::LoggerError;

/// Output encoding of log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerFormat {
    /// Human-readable lines, colored on a terminal.
    Text,
    /// One JSON object per record.
    Json,
    /// systemd journal; Linux with the `journald` feature only.
    Journald,
}

impl LoggerFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoggerFormat::Text => "text",
            LoggerFormat::Json => "json",
            LoggerFormat::Journald => "journald",
        }
    }
}

impl fmt::Display for LoggerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoggerFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("text") {
            return Ok(LoggerFormat::Text);
        }
        if s.eq_ignore_ascii_case("json") {
            return Ok(LoggerFormat::Json);
        }
        if s.eq_ignore_ascii_case("journald") || s.eq_ignore_ascii_case("journal") {
            if cfg!(all(target_os = "linux", feature = "journald")) {
                return Ok(LoggerFormat::Journald);
            }
            return Err(LoggerError::JournaldNotSupported);
        }
        Err(LoggerError::InvalidFormat(s.to_string()))
    }
}
