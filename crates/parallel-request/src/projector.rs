//! Result projection
//!
//! Shapes a finished [`TransportResult`] according to the requested
//! [`Verbosity`]:
//!
//! | Verbosity | Shape |
//! |---|---|
//! | `StatusOnly` | status code |
//! | `None` | raw body |
//! | `Info` | `{code, debug, response}` |
//! | `DetailedInfo` | `{code, info: {headers, url, content_type, content_length, total_time, debug, message}, response}` |

use bytes::Bytes;
use parallel_request_transport::{CapturedHeaders, TransportResult, Verbosity};
use serde::{Serialize, Serializer};

/// Message used when no response arrived and the transport gave no reason.
pub const MESSAGE_UNKNOWN_FAILURE: &str = "The requested URL returned error: Unknown";

/// Message used when the transfer finished without a transport error.
pub const MESSAGE_FINISHED: &str = "Request URL finished";

/// One shaped result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Projected {
    /// HTTP status only
    Status(u16),
    /// Raw response body
    Body(#[serde(serialize_with = "serialize_body")] Bytes),
    /// Status, symbolic error name and body
    Info(InfoResult),
    /// Full transfer details
    Detailed(DetailedResult),
}

impl Projected {
    /// HTTP status, for every shape but [`Projected::Body`]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(code) => Some(*code),
            Self::Body(_) => None,
            Self::Info(info) => Some(info.code),
            Self::Detailed(detailed) => Some(detailed.code),
        }
    }

    /// Response body, for every shape but [`Projected::Status`]
    pub fn body(&self) -> Option<&Bytes> {
        match self {
            Self::Status(_) => None,
            Self::Body(body) => Some(body),
            Self::Info(info) => Some(&info.response),
            Self::Detailed(detailed) => Some(&detailed.response),
        }
    }

    /// The info shape, if this is one
    pub fn as_info(&self) -> Option<&InfoResult> {
        match self {
            Self::Info(info) => Some(info),
            _ => None,
        }
    }

    /// The detailed shape, if this is one
    pub fn as_detailed(&self) -> Option<&DetailedResult> {
        match self {
            Self::Detailed(detailed) => Some(detailed),
            _ => None,
        }
    }
}

/// Result shape for [`Verbosity::Info`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoResult {
    /// HTTP status, `0` when none was received
    pub code: u16,
    /// Symbolic name of the transfer error number
    pub debug: String,
    /// Response body
    #[serde(serialize_with = "serialize_body")]
    pub response: Bytes,
}

/// Result shape for [`Verbosity::DetailedInfo`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedResult {
    /// HTTP status, `0` when none was received
    pub code: u16,
    /// Transfer details
    pub info: TransferInfo,
    /// Response body
    #[serde(serialize_with = "serialize_body")]
    pub response: Bytes,
}

/// Transfer details of a [`DetailedResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferInfo {
    /// Captured header blocks
    pub headers: HeaderPair,
    /// Effective URL
    pub url: String,
    /// Response `Content-Type`
    pub content_type: Option<String>,
    /// Advertised response length, `-1` when unknown
    pub content_length: i64,
    /// Transfer time in seconds
    pub total_time: f64,
    /// `CURLcode [N]: NAME`
    pub debug: String,
    /// Transport error text, or a fallback
    pub message: String,
}

/// Both captured header blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeaderPair {
    /// Outbound headers
    pub request: CapturedHeaders,
    /// Inbound headers
    pub response: CapturedHeaders,
}

/// Shape one finished transfer.
pub fn project(result: TransportResult, verbosity: Verbosity) -> Projected {
    match verbosity {
        Verbosity::StatusOnly => Projected::Status(result.status_code),
        Verbosity::None => Projected::Body(result.body),
        Verbosity::Info => Projected::Info(InfoResult {
            code: result.status_code,
            debug: result.error_code.name().to_string(),
            response: result.body,
        }),
        Verbosity::DetailedInfo => {
            let message = detail_message(&result);
            Projected::Detailed(DetailedResult {
                code: result.status_code,
                info: TransferInfo {
                    headers: HeaderPair {
                        request: result.request_headers.unwrap_or_default(),
                        response: result.response_headers.unwrap_or_default(),
                    },
                    url: result.effective_url,
                    content_type: result.content_type,
                    content_length: result.content_length,
                    total_time: result.total_time_seconds,
                    debug: result.error_code.to_string(),
                    message,
                },
                response: result.body,
            })
        }
    }
}

/// Transport error text if any; otherwise a message telling a missing
/// response apart from a finished one.
fn detail_message(result: &TransportResult) -> String {
    if !result.error_message.is_empty() {
        result.error_message.clone()
    } else if result.status_code == 0 {
        MESSAGE_UNKNOWN_FAILURE.to_string()
    } else {
        MESSAGE_FINISHED.to_string()
    }
}

fn serialize_body<S: Serializer>(body: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(body))
}
