use std::{fs::OpenOptions, path::Path, sync::Mutex};

use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, fmt, fmt::time::OffsetTime, fmt::writer::BoxMakeWriter, layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::logger::{config::LoggerConfig, error::LoggerError};

pub struct Logger;

impl Logger {
    pub fn text(cfg: &LoggerConfig) -> Result<(), LoggerError> {
        let filter = mk_filter(&cfg.level)?;
        let writer = mk_writer(cfg.file.as_deref())?;
        let fmt_layer = fmt::layer()
            .with_ansi(cfg.use_color && cfg.file.is_none())
            .with_target(cfg.with_targets)
            .with_timer(mk_timer())
            .with_writer(writer);

        let subscriber = tracing_subscriber::registry().with(filter).with(fmt_layer);
        init_with(subscriber)
    }

    pub fn json(cfg: &LoggerConfig) -> Result<(), LoggerError> {
        let filter = mk_filter(&cfg.level)?;
        let writer = mk_writer(cfg.file.as_deref())?;
        let fmt_layer = fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(cfg.with_targets)
            .with_timer(mk_timer())
            .with_writer(writer);

        let subscriber = tracing_subscriber::registry().with(filter).with(fmt_layer);
        init_with(subscriber)
    }

    pub fn journald(cfg: &LoggerConfig) -> Result<(), LoggerError> {
        let filter = mk_filter(&cfg.level)?;
        mk_journald(filter)
    }
}

fn mk_filter(level: &str) -> Result<EnvFilter, LoggerError> {
    EnvFilter::try_new(level).map_err(|_| LoggerError::InvalidLogLevel(level.to_string()))
}

fn mk_timer() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

fn mk_writer(file: Option<&Path>) -> Result<BoxMakeWriter, LoggerError> {
    let Some(path) = file else {
        return Ok(BoxMakeWriter::new(std::io::stdout));
    };
    let f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| LoggerError::LogFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    Ok(BoxMakeWriter::new(Mutex::new(f)))
}

fn as_error(e: impl std::fmt::Display) -> LoggerError {
    let s = e.to_string();
    if s.contains("SetGlobalDefaultError") || s.contains("global default trace dispatcher") {
        LoggerError::AlreadyInitialized
    } else {
        LoggerError::InitializationFailed(s)
    }
}

fn init_with<S>(subscriber: S) -> Result<(), LoggerError>
where
    S: Subscriber + Send + Sync + 'static,
{
    subscriber.try_init().map_err(as_error)
}

#[cfg(all(target_os = "linux", feature = "journald"))]
fn mk_journald(filter: EnvFilter) -> Result<(), LoggerError> {
    let journald = tracing_journald::layer()
        .map_err(|e| LoggerError::InitializationFailed(format!("journald: {e}")))?;
    let subscriber = tracing_subscriber::registry().with(filter).with(journald);
    init_with(subscriber)
}

#[cfg(not(all(target_os = "linux", feature = "journald")))]
fn mk_journald(_filter: EnvFilter) -> Result<(), LoggerError> {
    Err(LoggerError::JournaldNotSupported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_level_is_rejected() {
        assert!(matches!(
            mk_filter("psb=notalevel"),
            Err(LoggerError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn text_layer_accepts_local_timer() {
        let writer = mk_writer(None).unwrap();
        let layer = fmt::layer().with_timer(mk_timer()).with_writer(writer);
        let subscriber = tracing_subscriber::registry()
            .with(mk_filter("info").unwrap())
            .with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "psb.observe", "timer check");
        });
    }

    #[test]
    fn log_file_is_created() {
        let path = std::env::temp_dir().join(format!("psb-observe-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);

        assert!(mk_writer(Some(&path)).is_ok());
        assert!(path.exists());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn unwritable_log_file_fails() {
        let path = Path::new("/nonexistent-dir/psb/observe.log");
        assert!(matches!(
            mk_writer(Some(path)),
            Err(LoggerError::LogFile { .. })
        ));
    }
}
