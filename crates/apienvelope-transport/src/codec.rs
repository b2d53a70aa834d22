//! JSON codec used for every envelope on the wire

use serde::{Serialize, de::DeserializeOwned};

/// Content type of every envelope, success or error
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// JSON codec implementation using serde_json
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    /// Whether to pretty-print output (default: false for efficiency)
    pretty: bool,
}

impl JsonCodec {
    /// Create a new compact JSON codec
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Create a JSON codec that pretty-prints output
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Encode a value to bytes
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, serde_json::Error> {
        if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        }
    }

    /// Decode bytes to a value
    pub fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, serde_json::Error> {
        serde_json::from_slice(data)
    }

    /// Get the content type for this codec
    pub fn content_type(&self) -> &'static str {
        CONTENT_TYPE_JSON
    }
}
