//! Error types for envelope decoding and encoding

use thiserror::Error;

/// Result type alias for envelope operations
pub type EnvelopeResult<T> = Result<T, EnvelopeError>;

/// Error type for envelope operations
///
/// `Read`, `Parse` and `TooLarge` are returned when opening a request
/// envelope. `Encode` and `Write` only surface from the fallible `try_send_*`
/// functions; the plain `send_*` functions log them and degrade instead.
/// `Response` and `Remote` are for clients reading a response envelope.
#[derive(Error, Debug)]
pub enum EnvelopeError {
    /// The request stream could not be read to completion
    #[error("request read failed: {0}")]
    Read(#[source] std::io::Error),

    /// The request bytes were not a JSON envelope
    #[error("request unmarshal failed: {0}")]
    Parse(#[source] serde_json::Error),

    /// The request exceeded the configured size limit
    #[error("request exceeds {limit} bytes")]
    TooLarge { limit: u64 },

    /// A response could not be serialized
    #[error("response marshal failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// A serialized response could not be written
    #[error("response write failed: {0}")]
    Write(#[source] std::io::Error),

    /// A response could not be decoded on the client side
    #[error("response unmarshal failed: {0}")]
    Response(#[source] serde_json::Error),

    /// A response carried the `Error` status; holds the server's message
    #[error("{0}")]
    Remote(String),
}

impl EnvelopeError {
    /// Whether the error came from decoding a request
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            EnvelopeError::Read(_) | EnvelopeError::Parse(_) | EnvelopeError::TooLarge { .. }
        )
    }
}
