//! Request and response envelope types
//!
//! Every non-blob API message is wrapped in one of these shapes:
//!
//! ```text
//! request:          {"method": "GET", "body": {"id": 1234}}
//! success-message:  {"status": "OK", "message": "saved"}
//! error:            {"status": "Error", "message": "load user: not found"}
//! result:           {"status": "OK", "body": {"id": 1234, "name": "Ada"}}
//! ```
//!
//! Clients must check the top-level status before parsing a response body.

use apienvelope_core::{EnvelopeError, EnvelopeResult, render_chain};
use serde::de::{DeserializeOwned, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::value::{RawValue, to_raw_value};
use std::fmt;

/// JSON text reported for a request whose body is missing or `null`
const NULL_BODY: &str = "null";

/// Request envelope carrying an application method and an opaque body
///
/// The body is kept as raw JSON text, exactly as it appeared in the input,
/// so each method handler can parse it into its own type.
///
/// Decoding accepts only a JSON object. Field names match case-insensitively
/// (`"Method"` fills `method`), unknown fields are ignored and a repeated
/// field keeps its last value.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RequestEnvelope {
    /// Application-level command name (e.g., "GET", "user.create")
    ///
    /// A request without a `method` field, or with `"method": null`,
    /// decodes to an empty string.
    pub method: String,

    /// Method-specific payload, unparsed
    pub body: Option<Box<RawValue>>,
}

impl RequestEnvelope {
    /// Create a new request envelope from an already-encoded body
    pub fn new(method: impl Into<String>, body: Box<RawValue>) -> Self {
        Self {
            method: method.into(),
            body: Some(body),
        }
    }

    /// Create from a method and serializable body
    pub fn from_typed<T: Serialize + ?Sized>(
        method: impl Into<String>,
        body: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(method, to_raw_value(body)?))
    }

    /// The body as raw JSON text (`null` when absent)
    pub fn body_str(&self) -> &str {
        self.body.as_deref().map_or(NULL_BODY, RawValue::get)
    }

    /// The body as raw JSON bytes (`null` when absent)
    pub fn body_bytes(&self) -> &[u8] {
        self.body_str().as_bytes()
    }

    /// Deserialize the body to a typed value
    pub fn body_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(self.body_str())
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Deserialize from bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }
}

impl<'de> Deserialize<'de> for RequestEnvelope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RequestEnvelopeVisitor)
    }
}

/// Object-only visitor; arrays, strings, numbers and `null` are type errors
struct RequestEnvelopeVisitor;

impl<'de> Visitor<'de> for RequestEnvelopeVisitor {
    type Value = RequestEnvelope;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a request envelope object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut env = RequestEnvelope::default();
        while let Some(key) = map.next_key::<String>()? {
            if key.eq_ignore_ascii_case("method") {
                if let Some(method) = map.next_value::<Option<String>>()? {
                    env.method = method;
                }
            } else if key.eq_ignore_ascii_case("body") {
                env.body = map.next_value()?;
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(env)
    }
}

/// Top-level response discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    /// Request completed successfully
    #[serde(rename = "OK")]
    Ok,
    /// Request failed; the response carries a message
    #[serde(rename = "Error")]
    Error,
}

impl ResponseStatus {
    /// Wire representation of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStatus::Ok => "OK",
            ResponseStatus::Error => "Error",
        }
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outgoing `{"status", "message"}` response, borrowed from the caller
#[derive(Debug, Serialize)]
pub(crate) struct MessageReply<'a> {
    status: ResponseStatus,
    message: &'a str,
}

impl<'a> MessageReply<'a> {
    pub(crate) fn ok(message: &'a str) -> Self {
        Self {
            status: ResponseStatus::Ok,
            message,
        }
    }

    pub(crate) fn error(message: &'a str) -> Self {
        Self {
            status: ResponseStatus::Error,
            message,
        }
    }
}

/// Outgoing `{"status": "OK", "body"}` response, borrowed from the caller
#[derive(Debug, Serialize)]
pub(crate) struct ResultReply<'a, T: ?Sized> {
    status: ResponseStatus,
    body: &'a T,
}

impl<'a, T: Serialize + ?Sized> ResultReply<'a, T> {
    pub(crate) fn ok(body: &'a T) -> Self {
        Self {
            status: ResponseStatus::Ok,
            body,
        }
    }
}

/// A decoded response envelope, as seen by a client
///
/// Covers all three response shapes: `message` is set for success-message
/// and error responses, `body` for result responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Response status
    pub status: ResponseStatus,

    /// Informational or error message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Result payload, unparsed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Box<RawValue>>,
}

impl ResponseEnvelope {
    /// Create a success-message response
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Ok,
            message: Some(message.into()),
            body: None,
        }
    }

    /// Create an error response with a preformatted message
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: Some(message.into()),
            body: None,
        }
    }

    /// Create an error response from an error and its cause chain
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        Self::error(render_chain(err))
    }

    /// Create a result response from a serializable value
    pub fn result<T: Serialize + ?Sized>(body: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            status: ResponseStatus::Ok,
            message: None,
            body: Some(to_raw_value(body)?),
        })
    }

    /// Check if this is a success response
    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Ok
    }

    /// The server's error message, if this is an error response
    pub fn error_message(&self) -> Option<&str> {
        match self.status {
            ResponseStatus::Error => Some(self.message.as_deref().unwrap_or_default()),
            ResponseStatus::Ok => None,
        }
    }

    /// Get the body if present
    ///
    /// This does not look at the status; use [`into_result`](Self::into_result)
    /// to turn error responses into errors first.
    pub fn body_as<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        match &self.body {
            Some(raw) => Ok(Some(serde_json::from_str(raw.get())?)),
            None => Ok(None),
        }
    }

    /// Check the status, then decode the body
    ///
    /// An `Error` status becomes [`EnvelopeError::Remote`] with the server's
    /// message; a body that does not fit `T` becomes
    /// [`EnvelopeError::Response`].
    pub fn into_result<T: DeserializeOwned>(self) -> EnvelopeResult<Option<T>> {
        if let Some(message) = self.error_message() {
            return Err(EnvelopeError::Remote(message.to_string()));
        }
        self.body_as().map_err(EnvelopeError::Response)
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Deserialize from bytes
    ///
    /// Fails on the plain-text fallback written when a server could not
    /// serialize its response.
    pub fn from_bytes(data: &[u8]) -> EnvelopeResult<Self> {
        serde_json::from_slice(data).map_err(EnvelopeError::Response)
    }
}
