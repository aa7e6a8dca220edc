//! Transport error types
//!
//! Two kinds of failure live here. [`TransportError`] is fatal for a whole
//! batch: the transport could not be set up at all. [`TransferFailure`] is
//! the per-request kind, classified into an [`ErrorCode`] and carried inline
//! in that request's result.

use crate::codes::ErrorCode;
use std::error::Error as StdError;
use std::fmt;

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors that prevent a batch from starting
#[derive(Debug)]
pub enum TransportError {
    /// The HTTP client could not be initialized
    ClientInit(String),

    /// A configured header name is invalid
    InvalidHeaderName(String),

    /// A configured header value is invalid
    InvalidHeaderValue(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientInit(msg) => write!(f, "HTTP client initialization failed: {}", msg),
            Self::InvalidHeaderName(msg) => write!(f, "Invalid header name: {}", msg),
            Self::InvalidHeaderValue(msg) => write!(f, "Invalid header value: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

/// A classified per-request failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferFailure {
    /// Transfer error number
    pub code: ErrorCode,
    /// Human-readable description
    pub message: String,
}

impl TransferFailure {
    /// Create a failure with an explicit code
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Failure for a URL that does not parse
    pub fn malformed_url(url: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::URL_MALFORMAT,
            format!("URL using bad/illegal format or missing URL: {url} ({reason})"),
        )
    }

    /// Failure for a scheme the transport does not speak
    pub fn unsupported_protocol(scheme: &str) -> Self {
        Self::new(
            ErrorCode::UNSUPPORTED_PROTOCOL,
            format!("Protocol \"{scheme}\" not supported"),
        )
    }

    /// Failure for a response status outside 2xx
    pub fn http_status(status: u16) -> Self {
        Self::new(
            ErrorCode::HTTP_RETURNED_ERROR,
            format!("The requested URL returned error: {status}"),
        )
    }
}

impl fmt::Display for TransferFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl From<&reqwest::Error> for TransferFailure {
    fn from(err: &reqwest::Error) -> Self {
        let detail = error_chain(err);
        let host = err
            .url()
            .and_then(|u| u.host_str())
            .unwrap_or_default()
            .to_string();

        if err.is_timeout() {
            return Self::new(
                ErrorCode::OPERATION_TIMEDOUT,
                format!("Operation timed out: {detail}"),
            );
        }
        if err.is_redirect() {
            return Self::new(
                ErrorCode::TOO_MANY_REDIRECTS,
                format!("Maximum redirects followed: {detail}"),
            );
        }
        if err.is_builder() {
            return Self::new(ErrorCode::URL_MALFORMAT, detail);
        }
        if err.is_connect() {
            let lower = detail.to_ascii_lowercase();
            return if lower.contains("dns error")
                || lower.contains("failed to lookup address")
                || lower.contains("name or service not known")
                || lower.contains("no such host")
            {
                Self::new(
                    ErrorCode::COULDNT_RESOLVE_HOST,
                    format!("Could not resolve host: {host}"),
                )
            } else if lower.contains("certificate") {
                Self::new(ErrorCode::SSL_CACERT, detail)
            } else if lower.contains("tls") || lower.contains("ssl") || lower.contains("handshake")
            {
                Self::new(ErrorCode::SSL_CONNECT_ERROR, detail)
            } else {
                Self::new(
                    ErrorCode::COULDNT_CONNECT,
                    format!("Failed to connect to {host}: {detail}"),
                )
            };
        }
        if err.is_decode() {
            return Self::new(ErrorCode::BAD_CONTENT_ENCODING, detail);
        }
        if err.is_request() {
            return Self::new(ErrorCode::SEND_ERROR, detail);
        }
        Self::new(ErrorCode::RECV_ERROR, detail)
    }
}

impl From<reqwest::Error> for TransferFailure {
    fn from(err: reqwest::Error) -> Self {
        Self::from(&err)
    }
}

/// Join an error and its sources into one line.
fn error_chain(err: &dyn StdError) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}
