//! Validation client error types.

/// Errors from the validation client.
///
/// Every variant is a returned value; nothing here panics. Callers that gate
/// submissions treat all of them the same way (fail-open).
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    /// Address is empty or fails sanitization.
    #[error("invalid email address: {0:?}")]
    InvalidEmail(String),

    /// No API key configured.
    #[error("missing API key: MAILODDS_API_KEY not set")]
    MissingApiKey,

    /// Batch input had no usable addresses.
    #[error("no valid emails provided")]
    NoEmails,

    /// Base URL could not be parsed.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Transport-level failure, timeouts included.
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response from the service.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// 2xx response whose body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}

impl ClientError {
    /// Whether the failure is about local setup rather than the remote service.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ClientError::MissingApiKey | ClientError::InvalidBaseUrl(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Network(format!("request timeout: {err}"))
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<ClientError> for mailodds_core::Error {
    fn from(err: ClientError) -> Self {
        use mailodds_core::Error;

        match err {
            ClientError::InvalidEmail(_) => Error::InvalidEmail(err.to_string()),
            ClientError::MissingApiKey => Error::NoApiKey(err.to_string()),
            ClientError::NoEmails => Error::NoEmails(err.to_string()),
            ClientError::InvalidBaseUrl(msg) => Error::InvalidInput(msg),
            ClientError::Network(msg) => Error::Network(msg),
            ClientError::Api { status, message } => Error::Api { status, message },
            ClientError::Parse(msg) => Error::Serialization(msg),
        }
    }
}
