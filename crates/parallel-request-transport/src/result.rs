//! Per-request transfer outcome

use crate::codes::ErrorCode;
use crate::headers::CapturedHeaders;
use bytes::Bytes;

/// Outcome of one transfer.
///
/// Starts empty when the adapter is dispatched and is filled in as the
/// transfer completes. A status of `0` means no HTTP response was received.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResult {
    /// Position in the batch
    pub index: usize,

    /// HTTP status, `0` when none was received
    pub status_code: u16,

    /// Transfer error number, [`ErrorCode::OK`] on success
    pub error_code: ErrorCode,

    /// Transfer error text, empty on success
    pub error_message: String,

    /// Final URL after redirects, or the requested URL
    pub effective_url: String,

    /// `Content-Type` of the response
    pub content_type: Option<String>,

    /// Advertised response length, `-1` when unknown
    pub content_length: i64,

    /// Wall-clock time of the transfer in seconds
    pub total_time_seconds: f64,

    /// Outbound header block, when captured
    pub request_headers: Option<CapturedHeaders>,

    /// Inbound header block, when captured
    pub response_headers: Option<CapturedHeaders>,

    /// Response body
    pub body: Bytes,
}

impl TransportResult {
    /// Empty result for the transfer at `index` targeting `url`.
    pub fn new(index: usize, url: impl Into<String>) -> Self {
        Self {
            index,
            status_code: 0,
            error_code: ErrorCode::OK,
            error_message: String::new(),
            effective_url: url.into(),
            content_type: None,
            content_length: -1,
            total_time_seconds: 0.0,
            request_headers: None,
            response_headers: None,
            body: Bytes::new(),
        }
    }

    /// Record a transfer error.
    pub fn fail(&mut self, code: ErrorCode, message: impl Into<String>) {
        self.error_code = code;
        self.error_message = message.into();
    }

    /// `true` when an HTTP response was received
    pub fn has_response(&self) -> bool {
        self.status_code != 0
    }

    /// `true` when the transfer carries an error number
    pub fn is_error(&self) -> bool {
        !self.error_code.is_ok()
    }

    /// `true` for a 2xx response without transfer error
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code) && !self.is_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_result_is_empty() {
        let result = TransportResult::new(3, "http://host/");

        assert_eq!(result.index, 3);
        assert_eq!(result.status_code, 0);
        assert_eq!(result.content_length, -1);
        assert_eq!(result.effective_url, "http://host/");
        assert!(!result.has_response());
        assert!(!result.is_error());
        assert!(!result.is_success());
    }

    #[test]
    fn test_fail_records_code_and_message() {
        let mut result = TransportResult::new(0, "http://host/");
        result.status_code = 500;
        result.fail(ErrorCode::HTTP_RETURNED_ERROR, "The requested URL returned error: 500");

        assert!(result.is_error());
        assert!(result.has_response());
        assert!(!result.is_success());
    }
}
