//! Codec configuration loading for the CLI

use anyhow::{Context, Result};
use apienvelope_core::EnvelopeConfig;
use std::path::Path;

/// Load codec configuration from a TOML file, or defaults when no file is given
///
/// ```toml
/// fallback_message = "internal system error"
/// pretty = false
/// max_request_bytes = 1048576
/// log_level = "info"
/// ```
pub fn load(path: Option<&Path>) -> Result<EnvelopeConfig> {
    let Some(path) = path else {
        return Ok(EnvelopeConfig::default());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {:?}", path))?;

    parse(&content)
}

/// Parse codec configuration from TOML text
pub fn parse(content: &str) -> Result<EnvelopeConfig> {
    toml::from_str(content).context("Failed to parse config")
}
