//! apienvelope-core - Error types, cause chains, and configuration
//!
//! This crate provides the foundational types shared by the envelope codec:
//! - [`EnvelopeError`] for decode and encode failures
//! - [`Wrapped`] and [`ResultExt`] for attaching context to errors
//! - [`render_chain`] for flattening a cause chain into `"outer: inner"` form
//! - [`EnvelopeConfig`] for codec configuration

mod chain;
mod config;
mod error;

pub use chain::{ResultExt, Wrapped, render_chain, root_cause};
pub use config::{DEFAULT_FALLBACK_MESSAGE, EnvelopeConfig};
pub use error::{EnvelopeError, EnvelopeResult};

/// Log levels understood by the logging layer and configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    /// Parse a level name, case-insensitively (`"warn"` and `"warning"` both work)
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            "off" | "none" => Some(LogLevel::Off),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Off => write!(f, "OFF"),
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        EnvelopeConfig, EnvelopeError, EnvelopeResult, LogLevel, ResultExt, Wrapped,
        render_chain,
    };
}
