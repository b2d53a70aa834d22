//! Subscriber initialization

use apienvelope_core::LogLevel;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Initialize logging at `level`, writing to stderr
///
/// Returns `false` if a global subscriber was already installed, in which
/// case nothing changes.
pub fn init_logging(level: LogLevel) -> bool {
    let subscriber = tracing_subscriber::registry()
        .with(level_filter(level))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true));

    tracing::subscriber::set_global_default(subscriber).is_ok()
}

/// Initialize logging from `RUST_LOG`, falling back to `default_level`
///
/// `RUST_LOG` accepts full directives (`apienvelope_transport=debug`).
/// Returns `false` if a global subscriber was already installed.
pub fn init_logging_from_env(default_level: LogLevel) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level_filter(default_level).into()));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true));

    tracing::subscriber::set_global_default(subscriber).is_ok()
}

/// Initialize logging as the CLI expects: `RUST_LOG` wins when set
pub fn init_logging_with_env_override(level: LogLevel) -> bool {
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        init_logging_from_env(level)
    } else {
        init_logging(level)
    }
}

fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Trace => LevelFilter::TRACE,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Off => LevelFilter::OFF,
    }
}
