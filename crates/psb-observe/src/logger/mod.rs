#[cfg(feature = "cli")]
mod args;
mod config;
mod error;
mod format;
mod log;

#[cfg(feature = "cli")]
pub use args::LogArgs;
pub use config::LoggerConfig;
pub use error::LoggerError;
pub use format::LoggerFormat;

/// Install the global tracing subscriber described by `cfg`.
pub fn logger_init(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    match cfg.format {
        LoggerFormat::Text => log::Logger::text(cfg)?,
        LoggerFormat::Json => log::Logger::json(cfg)?,
        LoggerFormat::Journald => log::Logger::journald(cfg)?,
    }
    tracing::debug!(
        target: "psb.observe",
        format = %cfg.format,
        level = %cfg.level,
        file = ?cfg.file,
        "logger initialized"
    );
    Ok(())
}
