use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("invalid log format {0:?}, expected text, json or journald")]
    InvalidFormat(String),
    #[error("journald output needs Linux and the `journald` feature")]
    JournaldNotSupported,
    #[error("a global logger is already installed")]
    AlreadyInitialized,
    #[error("logger initialization failed: {0}")]
    InitializationFailed(String),
    #[error("invalid log level directive: {0}")]
    InvalidLogLevel(String),
    #[error("cannot open log file {path}: {reason}")]
    LogFile { path: String, reason: String },
}
