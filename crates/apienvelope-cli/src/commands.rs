//! Subcommand implementations
//!
//! Each command takes its input and output streams explicitly so it can be
//! driven from tests with in-memory buffers.

use anyhow::{Context, Result, bail};
use apienvelope_core::{EnvelopeError, Wrapped, render_chain};
use apienvelope_transport::{EnvelopeCodec, ResponseEnvelope};
use serde_json::value::RawValue;
use std::io::{Read, Write};

/// Decode a request envelope and print its method and raw body on two lines
pub fn open<R: Read, W: Write>(codec: &EnvelopeCodec, input: R, mut out: W) -> Result<()> {
    let env = codec.open(input).context("failed to open envelope")?;
    writeln!(out, "{}", env.method)?;
    writeln!(out, "{}", env.body_str())?;
    Ok(())
}

/// Write a success-message envelope
pub fn success<W: Write>(codec: &EnvelopeCodec, message: &str, out: W) -> Result<()> {
    codec.try_send_success(out, message)?;
    Ok(())
}

/// Write an error envelope whose message chain is `messages`, outermost first
pub fn error<W: Write>(codec: &EnvelopeCodec, messages: &[String], out: W) -> Result<()> {
    let err = build_chain(messages)?;
    codec.try_send_error(out, &*err)?;
    Ok(())
}

/// Write a result envelope carrying `json` as its body
pub fn result<W: Write>(codec: &EnvelopeCodec, json: &str, out: W) -> Result<()> {
    let body: Box<RawValue> =
        serde_json::from_str(json).context("result body is not valid JSON")?;
    codec.try_send_result(out, &body)?;
    Ok(())
}

/// Decode a response envelope and print its message or body
///
/// An `Error` response is printed and then reported as a failure.
pub fn inspect<R: Read, W: Write>(mut input: R, mut out: W) -> Result<()> {
    let mut buf = Vec::new();
    input
        .read_to_end(&mut buf)
        .context("failed to read response")?;

    let response = ResponseEnvelope::from_bytes(&buf).context("failed to decode response")?;
    if let Some(message) = response.error_message() {
        writeln!(out, "Error: {}", message)?;
        return Err(EnvelopeError::Remote(message.to_string()).into());
    }

    match (&response.message, &response.body) {
        (_, Some(body)) => writeln!(out, "{}", body.get())?,
        (Some(message), None) => writeln!(out, "{}", message)?,
        (None, None) => writeln!(out, "{}", response.status)?,
    }
    Ok(())
}

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Build a `Wrapped` chain from messages, outermost first
fn build_chain(messages: &[String]) -> Result<BoxError> {
    let Some((root, contexts)) = messages.split_last() else {
        bail!("at least one error message is required");
    };

    let mut err: BoxError = root.clone().into();
    for context in contexts.iter().rev() {
        err = Box::new(Wrapped::new(context.clone(), err));
    }
    tracing::debug!(chain = %render_chain(&*err), "built error chain");
    Ok(err)
}
