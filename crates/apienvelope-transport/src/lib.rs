//! apienvelope-transport - JSON request/response envelope codec
//!
//! This crate provides:
//! - [`RequestEnvelope`] holding a `method` and an unparsed `body`
//! - [`open_envelope`] and the `send_*` functions for reading requests and
//!   writing the three response shapes
//! - [`EnvelopeCodec`] for configured use, including fallible `try_send_*`
//! - [`ResponseEnvelope`] for clients decoding responses
//! - Tokio variants of the operations behind the `tokio` feature
//!
//! ```
//! use apienvelope_transport::{open_envelope, send_result};
//!
//! let env = open_envelope(&br#"{"method":"GET","body":{"id":1234}}"#[..]).unwrap();
//! assert_eq!(env.method, "GET");
//!
//! let mut out = Vec::new();
//! send_result(&mut out, &env.body);
//! assert_eq!(out, br#"{"status":"OK","body":{"id":1234}}"#);
//! ```

mod codec;
mod envelope;
mod exchange;

#[cfg(feature = "tokio")]
mod async_io;

pub use codec::{CONTENT_TYPE_JSON, JsonCodec};
pub use envelope::{RequestEnvelope, ResponseEnvelope, ResponseStatus};
pub use exchange::{EnvelopeCodec, open_envelope, send_error, send_result, send_success};

#[cfg(feature = "tokio")]
pub use async_io::{open_envelope_async, send_error_async, send_result_async, send_success_async};

pub use apienvelope_core::{EnvelopeConfig, EnvelopeError, EnvelopeResult};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        EnvelopeCodec, EnvelopeConfig, EnvelopeError, EnvelopeResult, RequestEnvelope,
        ResponseEnvelope, ResponseStatus, open_envelope, send_error, send_result, send_success,
    };
}
