//! Tokio variants of the envelope operations
//!
//! Same wire behavior as the blocking functions, over `AsyncRead` and
//! `AsyncWrite` streams. Errors passed to `send_error_async` must be
//! `Send + Sync` so the returned future can be spawned.

use crate::envelope::RequestEnvelope;
use crate::exchange::{EnvelopeCodec, check_request_size};
use apienvelope_core::{EnvelopeError, EnvelopeResult};
use serde::Serialize;
use std::error::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

impl EnvelopeCodec {
    /// Read `reader` to the end and decode it as a request envelope
    pub async fn open_async<R: AsyncRead + Unpin>(
        &self,
        mut reader: R,
    ) -> EnvelopeResult<RequestEnvelope> {
        let mut buf = Vec::new();
        match self.config().max_request_bytes {
            Some(limit) => {
                reader
                    .take(limit.saturating_add(1))
                    .read_to_end(&mut buf)
                    .await
                    .map_err(EnvelopeError::Read)?;
                check_request_size(buf.len(), limit)?;
            }
            None => {
                reader
                    .read_to_end(&mut buf)
                    .await
                    .map_err(EnvelopeError::Read)?;
            }
        }
        self.decode_request(&buf)
    }

    /// Write a success-message response, degrading on failure
    pub async fn send_success_async<W: AsyncWrite + Unpin>(&self, writer: W, message: &str) {
        let payload = self.payload_or_fallback(self.encode_success(message), None);
        deliver_async(writer, &payload).await;
    }

    /// Write an error response, degrading on failure
    pub async fn send_error_async<W: AsyncWrite + Unpin>(
        &self,
        writer: W,
        err: &(dyn Error + Send + Sync + 'static),
    ) {
        let payload = {
            let err: &(dyn Error + 'static) = err;
            self.payload_or_fallback(self.encode_error(err), Some(err))
        };
        deliver_async(writer, &payload).await;
    }

    /// Write a result response, degrading on failure
    pub async fn send_result_async<W: AsyncWrite + Unpin, T: Serialize + ?Sized>(
        &self,
        writer: W,
        body: &T,
    ) {
        let payload = self.payload_or_fallback(self.encode_result(body), None);
        deliver_async(writer, &payload).await;
    }
}

async fn deliver_async<W: AsyncWrite + Unpin>(mut writer: W, payload: &[u8]) {
    if let Err(err) = writer.write_all(payload).await {
        tracing::warn!(error = %err, "dropping response envelope");
    }
}

/// Read a request envelope using the default configuration
pub async fn open_envelope_async<R: AsyncRead + Unpin>(
    reader: R,
) -> EnvelopeResult<RequestEnvelope> {
    EnvelopeCodec::default().open_async(reader).await
}

/// Write a success-message response using the default configuration
pub async fn send_success_async<W: AsyncWrite + Unpin>(writer: W, message: &str) {
    EnvelopeCodec::default()
        .send_success_async(writer, message)
        .await
}

/// Write an error response using the default configuration
pub async fn send_error_async<W: AsyncWrite + Unpin>(
    writer: W,
    err: &(dyn Error + Send + Sync + 'static),
) {
    EnvelopeCodec::default().send_error_async(writer, err).await
}

/// Write a result response using the default configuration
pub async fn send_result_async<W: AsyncWrite + Unpin, T: Serialize + ?Sized>(
    writer: W,
    body: &T,
) {
    EnvelopeCodec::default().send_result_async(writer, body).await
}
