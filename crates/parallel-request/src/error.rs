//! Error types for parallel-request
//!
//! Only failures that stop a whole batch show up here. A request that fails
//! on its own (DNS, refused connection, timeout, error status) is reported
//! inline in its result and never becomes an [`Error`].

use parallel_request_transport::TransportError;
use thiserror::Error;

/// Result type alias for operations that can fail with a batch-level error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for parallel-request.
#[derive(Debug, Error)]
pub enum Error {
    /// The network transport cannot be set up in this environment.
    #[error("Transport unavailable: {0}")]
    TransportUnavailable(String),

    /// A configured header name is not valid HTTP.
    #[error("Invalid HTTP header name: {0}")]
    InvalidHeaderName(String),

    /// A configured header value is not valid HTTP.
    #[error("Invalid HTTP header value: {0}")]
    InvalidHeaderValue(String),

    /// Invalid configuration value.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
        /// The configuration key involved, if any
        key: Option<String>,
    },

    /// The private runtime for blocking sends could not be created.
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Configuration error tied to a key.
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// `true` when the batch never started because the environment lacks a
    /// usable transport.
    pub fn is_environment(&self) -> bool {
        matches!(self, Self::TransportUnavailable(_) | Self::Runtime(_))
    }
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::ClientInit(msg) => Self::TransportUnavailable(msg),
            TransportError::InvalidHeaderName(msg) => Self::InvalidHeaderName(msg),
            TransportError::InvalidHeaderValue(msg) => Self::InvalidHeaderValue(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_init_maps_to_transport_unavailable() {
        let err: Error = TransportError::ClientInit("no TLS backend".into()).into();

        assert!(matches!(err, Error::TransportUnavailable(_)));
        assert!(err.is_environment());
        assert_eq!(err.to_string(), "Transport unavailable: no TLS backend");
    }

    #[test]
    fn test_invalid_header_mapping() {
        let name: Error = TransportError::InvalidHeaderName("'Bad Name'".into()).into();
        let value: Error = TransportError::InvalidHeaderValue("'X-Id'".into()).into();

        assert!(matches!(name, Error::InvalidHeaderName(_)));
        assert!(matches!(value, Error::InvalidHeaderValue(_)));
        assert!(!value.is_environment());
    }

    #[test]
    fn test_config_error_carries_key() {
        let err = Error::config("PARALLEL_REQUEST_DELAY_US", "not a number");

        match err {
            Error::Config { key, message } => {
                assert_eq!(key.as_deref(), Some("PARALLEL_REQUEST_DELAY_US"));
                assert_eq!(message, "not a number");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
