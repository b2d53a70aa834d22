//! apienvelope-logging - Tracing subscriber setup
//!
//! This crate provides:
//! - [`init_logging`] installing a stderr subscriber at a fixed level
//! - [`init_logging_from_env`] honoring `RUST_LOG` directives
//! - [`init_logging_with_env_override`] picking between the two

mod layer;

pub use apienvelope_core::LogLevel;
pub use layer::{init_logging, init_logging_from_env, init_logging_with_env_override};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{LogLevel, init_logging, init_logging_from_env};
}
