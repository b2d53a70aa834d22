//! Codec configuration types

use crate::LogLevel;
use serde::{Deserialize, Serialize};

/// Text written in place of a response when it cannot be serialized
pub const DEFAULT_FALLBACK_MESSAGE: &str = "internal system error";

/// Configuration for the envelope codec
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeConfig {
    /// Text written instead of JSON when a response fails to serialize
    ///
    /// Clients must tolerate this plain-text body on the degraded path.
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,

    /// Pretty-print responses (default: compact)
    #[serde(default)]
    pub pretty: bool,

    /// Largest request accepted by `open`, in bytes (default: unlimited)
    #[serde(default)]
    pub max_request_bytes: Option<u64>,

    /// Initial log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_fallback_message() -> String {
    DEFAULT_FALLBACK_MESSAGE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            fallback_message: default_fallback_message(),
            pretty: false,
            max_request_bytes: None,
            log_level: default_log_level(),
        }
    }
}

impl EnvelopeConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration from JSON bytes
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes)
    }

    /// Set the fallback text
    pub fn with_fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }

    /// Enable or disable pretty-printed output
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Limit request size
    pub fn with_max_request_bytes(mut self, limit: u64) -> Self {
        self.max_request_bytes = Some(limit);
        self
    }

    /// The configured log level, falling back to `Info` for unknown names
    pub fn log_level(&self) -> LogLevel {
        LogLevel::parse(&self.log_level).unwrap_or(LogLevel::Info)
    }
}

#[cfg(test)]
#[path = "config/config_tests.rs"]
mod config_tests;
