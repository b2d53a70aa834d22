//! # apienvelope
//!
//! A minimal envelope convention for JSON API messages.
//!
//! Requests carry an application-level `method` and an opaque `body`.
//! Responses carry a `status` of `"OK"` or `"Error"` plus either a `message`
//! or a `body`:
//!
//! ```text
//! {"method": "GET", "body": {"id": 1234}}
//! {"status": "OK", "message": "deleted"}
//! {"status": "Error", "message": "load user: not found"}
//! {"status": "OK", "body": {"id": 1234, "name": "Ada"}}
//! ```
//!
//! ## Handling a Request
//!
//! ```
//! use apienvelope::prelude::*;
//!
//! #[derive(Deserialize)]
//! struct Lookup {
//!     id: u64,
//! }
//!
//! #[derive(Serialize)]
//! struct User {
//!     id: u64,
//!     name: &'static str,
//! }
//!
//! fn handle(input: &[u8], out: &mut Vec<u8>) {
//!     let env = match open_envelope(input) {
//!         Ok(env) => env,
//!         Err(err) => return send_error(out, &err),
//!     };
//!     match env.method.as_str() {
//!         "GET" => match env.body_as::<Lookup>().context("bad lookup") {
//!             Ok(lookup) => send_result(out, &User { id: lookup.id, name: "Ada" }),
//!             Err(err) => send_error(out, &err),
//!         },
//!         "DELETE" => send_success(out, "deleted"),
//!         other => send_error(out, &Wrapped::new("unknown method", other.to_string())),
//!     }
//! }
//!
//! let mut out = Vec::new();
//! handle(br#"{"method":"GET","body":{"id":7}}"#, &mut out);
//! assert_eq!(out, br#"{"status":"OK","body":{"id":7,"name":"Ada"}}"#);
//!
//! let mut out = Vec::new();
//! handle(br#"{"method":"PATCH","body":null}"#, &mut out);
//! assert_eq!(out, br#"{"status":"Error","message":"unknown method: PATCH"}"#);
//! ```
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports from:
//! - [`apienvelope_core`] - Errors, cause chains, configuration
//! - [`apienvelope_transport`] - Envelope types and the codec
//! - [`apienvelope_logging`] - Tracing subscriber setup

// Re-export core types
pub use apienvelope_core::{
    DEFAULT_FALLBACK_MESSAGE, EnvelopeConfig, EnvelopeError, EnvelopeResult, LogLevel, ResultExt,
    Wrapped, render_chain, root_cause,
};

// Re-export the codec
pub use apienvelope_transport::{
    CONTENT_TYPE_JSON, EnvelopeCodec, JsonCodec, RequestEnvelope, ResponseEnvelope,
    ResponseStatus, open_envelope, open_envelope_async, send_error, send_error_async, send_result,
    send_result_async, send_success, send_success_async,
};

// Re-export logging setup
pub use apienvelope_logging::{
    init_logging, init_logging_from_env, init_logging_with_env_override,
};

// Re-export common dependencies that handler authors need
pub use serde;
pub use serde_json;
pub use tracing;

/// Prelude module for convenient imports.
///
/// Use `use apienvelope::prelude::*;` to import commonly used items.
///
/// This includes:
/// - Envelope types: `RequestEnvelope`, `ResponseEnvelope`, `ResponseStatus`
/// - Operations: `open_envelope`, `send_success`, `send_error`, `send_result`
/// - Errors: `EnvelopeError`, `Wrapped`, `ResultExt`
/// - Serde derives: `Serialize`, `Deserialize`
pub mod prelude {
    pub use crate::{
        EnvelopeCodec, EnvelopeConfig, EnvelopeError, EnvelopeResult, RequestEnvelope,
        ResponseEnvelope, ResponseStatus, ResultExt, Wrapped, open_envelope, send_error,
        send_result, send_success,
    };

    // Serde derives (commonly needed for body types)
    pub use serde::{Deserialize, Serialize};
}
