//! Wire response shapes.

use serde::Deserialize;

/// Fallback message when a non-2xx body carries no usable `error` field.
pub const GENERIC_API_ERROR: &str = "API request failed.";

/// Body of a successful `POST /v1/validate/batch`.
///
/// Items stay as raw JSON so one malformed entry does not sink the batch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchResponse {
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
}

/// Body of a non-2xx response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Extract the server's message from raw bytes, or the generic fallback.
    pub fn message_from(bytes: &[u8]) -> String {
        serde_json::from_slice::<ErrorBody>(bytes)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_API_ERROR.to_string())
    }
}
