//! Unified error types for mailodds.
//!
//! Display strings carry a stable `CODE:` prefix so tool output stays greppable.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the mailodds crates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty email list).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Email address failed sanitization.
    #[error("INVALID_EMAIL: {0}")]
    InvalidEmail(String),

    /// No API key configured.
    #[error("NO_API_KEY: {0}")]
    NoApiKey(String),

    /// Batch request had no usable addresses left after filtering.
    #[error("NO_EMAILS: {0}")]
    NoEmails(String),

    /// Transport-level failure (DNS, TCP, TLS, timeout).
    #[error("NETWORK_ERROR: {0}")]
    Network(String),

    /// Remote service answered with a non-2xx status.
    #[error("API_ERROR: {message} (status {status})")]
    Api { status: u16, message: String },

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Stored value could not be encoded or decoded.
    #[error("CACHE_ERROR: serialization failed: {0}")]
    Serialization(String),

    /// Requested record does not exist.
    #[error("NOT_FOUND: {0}")]
    NotFound(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::InvalidEmail(msg) => (-32602, msg.clone()),
            Error::NoApiKey(msg) => (-32009, msg.clone()),
            Error::NoEmails(msg) => (-32602, msg.clone()),
            Error::Network(msg) => (-32006, msg.clone()),
            Error::Api { status, message } => (-32008, format!("HTTP {status}: {message}")),
            Error::NotFound(msg) => (-32001, msg.clone()),
            Error::Database(e) => (-32002, e.to_string()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
            Error::Serialization(msg) => (-32002, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotFound("identity 42".to_string());
        assert!(err.to_string().contains("NOT_FOUND"));
        assert!(err.to_string().contains("identity 42"));

        let err = Error::Api { status: 401, message: "Invalid API key".to_string() };
        assert_eq!(err.to_string(), "API_ERROR: Invalid API key (status 401)");
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::InvalidEmail("not-an-email".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32602);

        let err = Error::Network("connection refused".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32006);
    }

    #[test]
    fn test_serde_error_conversion() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        assert!(matches!(Error::from(err), Error::Serialization(_)));
    }
}
