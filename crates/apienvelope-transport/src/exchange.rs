//! Opening request envelopes and sending response envelopes
//!
//! The `send_*` functions never fail from the caller's point of view. If a
//! response cannot be serialized, the failure is logged and the configured
//! fallback text (`internal system error` by default) is written instead of
//! JSON. Callers that need to react to the failure use the `try_send_*`
//! methods on [`EnvelopeCodec`].

use crate::codec::JsonCodec;
use crate::envelope::{MessageReply, RequestEnvelope, ResultReply};
use apienvelope_core::{EnvelopeConfig, EnvelopeError, EnvelopeResult, render_chain, root_cause};
use serde::Serialize;
use std::error::Error;
use std::io::{Read, Write};

/// Envelope codec bound to a configuration
///
/// Holds no per-call state, so one codec can serve any number of concurrent
/// callers as long as each brings its own reader and writer.
#[derive(Debug, Clone)]
pub struct EnvelopeCodec {
    json: JsonCodec,
    config: EnvelopeConfig,
}

impl Default for EnvelopeCodec {
    fn default() -> Self {
        Self::new(EnvelopeConfig::default())
    }
}

impl EnvelopeCodec {
    /// Create a codec from configuration
    pub fn new(config: EnvelopeConfig) -> Self {
        let json = if config.pretty {
            JsonCodec::pretty()
        } else {
            JsonCodec::new()
        };
        Self { json, config }
    }

    /// The configuration this codec was built from
    pub fn config(&self) -> &EnvelopeConfig {
        &self.config
    }

    /// Content type of every response this codec writes
    pub fn content_type(&self) -> &'static str {
        self.json.content_type()
    }

    /// Read `reader` to the end and decode it as a request envelope
    pub fn open<R: Read>(&self, reader: R) -> EnvelopeResult<RequestEnvelope> {
        let buf = self.read_request(reader)?;
        self.decode_request(&buf)
    }

    fn read_request<R: Read>(&self, mut reader: R) -> EnvelopeResult<Vec<u8>> {
        let mut buf = Vec::new();
        match self.config.max_request_bytes {
            Some(limit) => {
                reader
                    .take(limit.saturating_add(1))
                    .read_to_end(&mut buf)
                    .map_err(EnvelopeError::Read)?;
                check_request_size(buf.len(), limit)?;
            }
            None => {
                reader.read_to_end(&mut buf).map_err(EnvelopeError::Read)?;
            }
        }
        Ok(buf)
    }

    pub(crate) fn decode_request(&self, buf: &[u8]) -> EnvelopeResult<RequestEnvelope> {
        let envelope: RequestEnvelope = self.json.decode(buf).map_err(EnvelopeError::Parse)?;
        tracing::debug!(
            method = %envelope.method,
            body_len = envelope.body_str().len(),
            "opened request envelope"
        );
        Ok(envelope)
    }

    /// Write `{"status":"OK","message":message}`, degrading on failure
    pub fn send_success<W: Write>(&self, writer: W, message: &str) {
        let encoded = self.encode_success(message);
        self.deliver(writer, encoded, None);
    }

    /// Write `{"status":"Error","message":<cause chain>}`, degrading on failure
    pub fn send_error<W: Write>(&self, writer: W, err: &(dyn Error + 'static)) {
        let encoded = self.encode_error(err);
        self.deliver(writer, encoded, Some(err));
    }

    /// Write `{"status":"OK","body":body}`, degrading on failure
    pub fn send_result<W: Write, T: Serialize + ?Sized>(&self, writer: W, body: &T) {
        let encoded = self.encode_result(body);
        self.deliver(writer, encoded, None);
    }

    /// Write a success-message response, returning any failure
    pub fn try_send_success<W: Write>(&self, writer: W, message: &str) -> EnvelopeResult<()> {
        let buf = self.encode_success(message)?;
        write_response(writer, &buf)
    }

    /// Write an error response, returning any failure
    pub fn try_send_error<W: Write>(
        &self,
        writer: W,
        err: &(dyn Error + 'static),
    ) -> EnvelopeResult<()> {
        let buf = self.encode_error(err)?;
        write_response(writer, &buf)
    }

    /// Write a result response, returning any failure
    pub fn try_send_result<W: Write, T: Serialize + ?Sized>(
        &self,
        writer: W,
        body: &T,
    ) -> EnvelopeResult<()> {
        let buf = self.encode_result(body)?;
        write_response(writer, &buf)
    }

    pub(crate) fn encode_success(&self, message: &str) -> EnvelopeResult<Vec<u8>> {
        self.json
            .encode(&MessageReply::ok(message))
            .map_err(EnvelopeError::Encode)
    }

    pub(crate) fn encode_error(&self, err: &(dyn Error + 'static)) -> EnvelopeResult<Vec<u8>> {
        let message = render_chain(err);
        self.json
            .encode(&MessageReply::error(&message))
            .map_err(EnvelopeError::Encode)
    }

    pub(crate) fn encode_result<T: Serialize + ?Sized>(
        &self,
        body: &T,
    ) -> EnvelopeResult<Vec<u8>> {
        self.json
            .encode(&ResultReply::ok(body))
            .map_err(EnvelopeError::Encode)
    }

    /// The bytes to put on the wire: the encoded response, or the fallback
    pub(crate) fn payload_or_fallback(
        &self,
        encoded: EnvelopeResult<Vec<u8>>,
        original: Option<&(dyn Error + 'static)>,
    ) -> Vec<u8> {
        match encoded {
            Ok(buf) => buf,
            Err(err) => {
                log_encode_failure(&err, original);
                self.config.fallback_message.clone().into_bytes()
            }
        }
    }

    fn deliver<W: Write>(
        &self,
        writer: W,
        encoded: EnvelopeResult<Vec<u8>>,
        original: Option<&(dyn Error + 'static)>,
    ) {
        let payload = self.payload_or_fallback(encoded, original);
        if let Err(err) = write_response(writer, &payload) {
            tracing::warn!(error = %err, "dropping response envelope");
        }
    }
}

pub(crate) fn check_request_size(len: usize, limit: u64) -> EnvelopeResult<()> {
    if len as u64 > limit {
        return Err(EnvelopeError::TooLarge { limit });
    }
    Ok(())
}

fn write_response<W: Write>(mut writer: W, payload: &[u8]) -> EnvelopeResult<()> {
    writer.write_all(payload).map_err(EnvelopeError::Write)
}

pub(crate) fn log_encode_failure(err: &EnvelopeError, original: Option<&(dyn Error + 'static)>) {
    let root = root_cause(err);
    tracing::error!(
        error = %render_chain(err),
        root_cause = %root,
        "response marshal failed, writing fallback text"
    );
    if let Some(original) = original {
        tracing::error!(
            original_error = %render_chain(original),
            original_root_cause = %root_cause(original),
            "error being reported was lost"
        );
    }
}

/// Read a request envelope using the default configuration
pub fn open_envelope<R: Read>(reader: R) -> EnvelopeResult<RequestEnvelope> {
    EnvelopeCodec::default().open(reader)
}

/// Write a success-message response using the default configuration
pub fn send_success<W: Write>(writer: W, message: &str) {
    EnvelopeCodec::default().send_success(writer, message)
}

/// Write an error response using the default configuration
pub fn send_error<W: Write>(writer: W, err: &(dyn Error + 'static)) {
    EnvelopeCodec::default().send_error(writer, err)
}

/// Write a result response using the default configuration
pub fn send_result<W: Write, T: Serialize + ?Sized>(writer: W, body: &T) {
    EnvelopeCodec::default().send_result(writer, body)
}

#[cfg(test)]
#[path = "exchange/exchange_tests.rs"]
mod exchange_tests;
