mod logger;
pub use logger::*;

#[cfg(feature = "cli")]
mod cli;
#[cfg(feature = "cli")]
pub use cli::parse_seconds;
