//! Transfer error numbers and their symbolic names
//!
//! Error numbers follow the libcurl `CURLcode` enumeration so that results
//! stay comparable with tooling that speaks curl. Only the numbering and the
//! names are borrowed; classification of actual failures happens in
//! [`crate::error::TransferFailure`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel returned for numbers missing from the table.
pub const UNKNOWN: &str = "Unknown";

/// A transfer error number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorCode(pub u32);

impl ErrorCode {
    /// No error.
    pub const OK: Self = Self(0);
    /// The URL used a scheme the transport does not speak.
    pub const UNSUPPORTED_PROTOCOL: Self = Self(1);
    /// The URL could not be parsed.
    pub const URL_MALFORMAT: Self = Self(3);
    /// The host name could not be resolved.
    pub const COULDNT_RESOLVE_HOST: Self = Self(6);
    /// The TCP connection could not be established.
    pub const COULDNT_CONNECT: Self = Self(7);
    /// The server answered with a failure status and failing on error was on.
    pub const HTTP_RETURNED_ERROR: Self = Self(22);
    /// The operation exceeded its time budget.
    pub const OPERATION_TIMEDOUT: Self = Self(28);
    /// TLS handshake failed.
    pub const SSL_CONNECT_ERROR: Self = Self(35);
    /// Redirect limit reached.
    pub const TOO_MANY_REDIRECTS: Self = Self(47);
    /// Sending request data failed.
    pub const SEND_ERROR: Self = Self(55);
    /// Receiving response data failed.
    pub const RECV_ERROR: Self = Self(56);
    /// Peer certificate could not be verified.
    pub const SSL_CACERT: Self = Self(60);
    /// The response body used an encoding that could not be decoded.
    pub const BAD_CONTENT_ENCODING: Self = Self(61);

    /// Symbolic name for this number, or [`UNKNOWN`].
    pub fn name(self) -> &'static str {
        symbolic_name(self.0)
    }

    /// `true` for [`ErrorCode::OK`].
    pub fn is_ok(self) -> bool {
        self == Self::OK
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CURLcode [{}]: {}", self.0, self.name())
    }
}

impl From<u32> for ErrorCode {
    fn from(code: u32) -> Self {
        Self(code)
    }
}

/// Resolve an error number to its symbolic name.
///
/// Unknown numbers resolve to [`UNKNOWN`].
pub fn symbolic_name(code: u32) -> &'static str {
    match code {
        0 => "CURLE_OK",
        1 => "CURLE_UNSUPPORTED_PROTOCOL",
        2 => "CURLE_FAILED_INIT",
        3 => "CURLE_URL_MALFORMAT",
        4 => "CURLE_URL_MALFORMAT_USER",
        5 => "CURLE_COULDNT_RESOLVE_PROXY",
        6 => "CURLE_COULDNT_RESOLVE_HOST",
        7 => "CURLE_COULDNT_CONNECT",
        8 => "CURLE_FTP_WEIRD_SERVER_REPLY",
        9 => "CURLE_REMOTE_ACCESS_DENIED",
        11 => "CURLE_FTP_WEIRD_PASS_REPLY",
        13 => "CURLE_FTP_WEIRD_PASV_REPLY",
        14 => "CURLE_FTP_WEIRD_227_FORMAT",
        15 => "CURLE_FTP_CANT_GET_HOST",
        17 => "CURLE_FTP_COULDNT_SET_TYPE",
        18 => "CURLE_PARTIAL_FILE",
        19 => "CURLE_FTP_COULDNT_RETR_FILE",
        21 => "CURLE_QUOTE_ERROR",
        22 => "CURLE_HTTP_RETURNED_ERROR",
        23 => "CURLE_WRITE_ERROR",
        25 => "CURLE_UPLOAD_FAILED",
        26 => "CURLE_READ_ERROR",
        27 => "CURLE_OUT_OF_MEMORY",
        28 => "CURLE_OPERATION_TIMEDOUT",
        30 => "CURLE_FTP_PORT_FAILED",
        31 => "CURLE_FTP_COULDNT_USE_REST",
        33 => "CURLE_RANGE_ERROR",
        34 => "CURLE_HTTP_POST_ERROR",
        35 => "CURLE_SSL_CONNECT_ERROR",
        36 => "CURLE_BAD_DOWNLOAD_RESUME",
        37 => "CURLE_FILE_COULDNT_READ_FILE",
        38 => "CURLE_LDAP_CANNOT_BIND",
        39 => "CURLE_LDAP_SEARCH_FAILED",
        41 => "CURLE_FUNCTION_NOT_FOUND",
        42 => "CURLE_ABORTED_BY_CALLBACK",
        43 => "CURLE_BAD_FUNCTION_ARGUMENT",
        45 => "CURLE_INTERFACE_FAILED",
        47 => "CURLE_TOO_MANY_REDIRECTS",
        48 => "CURLE_UNKNOWN_TELNET_OPTION",
        49 => "CURLE_TELNET_OPTION_SYNTAX",
        51 => "CURLE_PEER_FAILED_VERIFICATION",
        52 => "CURLE_GOT_NOTHING",
        53 => "CURLE_SSL_ENGINE_NOTFOUND",
        54 => "CURLE_SSL_ENGINE_SETFAILED",
        55 => "CURLE_SEND_ERROR",
        56 => "CURLE_RECV_ERROR",
        58 => "CURLE_SSL_CERTPROBLEM",
        59 => "CURLE_SSL_CIPHER",
        60 => "CURLE_SSL_CACERT",
        61 => "CURLE_BAD_CONTENT_ENCODING",
        62 => "CURLE_LDAP_INVALID_URL",
        63 => "CURLE_FILESIZE_EXCEEDED",
        64 => "CURLE_USE_SSL_FAILED",
        65 => "CURLE_SEND_FAIL_REWIND",
        66 => "CURLE_SSL_ENGINE_INITFAILED",
        67 => "CURLE_LOGIN_DENIED",
        68 => "CURLE_TFTP_NOTFOUND",
        69 => "CURLE_TFTP_PERM",
        70 => "CURLE_REMOTE_DISK_FULL",
        71 => "CURLE_TFTP_ILLEGAL",
        72 => "CURLE_TFTP_UNKNOWNID",
        73 => "CURLE_REMOTE_FILE_EXISTS",
        74 => "CURLE_TFTP_NOSUCHUSER",
        75 => "CURLE_CONV_FAILED",
        76 => "CURLE_CONV_REQD",
        77 => "CURLE_SSL_CACERT_BADFILE",
        78 => "CURLE_REMOTE_FILE_NOT_FOUND",
        79 => "CURLE_SSH",
        80 => "CURLE_SSL_SHUTDOWN_FAILED",
        81 => "CURLE_AGAIN",
        82 => "CURLE_SSL_CRL_BADFILE",
        83 => "CURLE_SSL_ISSUER_ERROR",
        84 => "CURLE_FTP_PRET_FAILED",
        85 => "CURLE_RTSP_CSEQ_ERROR",
        86 => "CURLE_RTSP_SESSION_ERROR",
        87 => "CURLE_FTP_BAD_FILE_LIST",
        88 => "CURLE_CHUNK_FAILED",
        _ => UNKNOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "CURLE_OK")]
    #[case(6, "CURLE_COULDNT_RESOLVE_HOST")]
    #[case(22, "CURLE_HTTP_RETURNED_ERROR")]
    #[case(28, "CURLE_OPERATION_TIMEDOUT")]
    #[case(60, "CURLE_SSL_CACERT")]
    #[case(88, "CURLE_CHUNK_FAILED")]
    fn test_known_codes(#[case] code: u32, #[case] name: &str) {
        assert_eq!(symbolic_name(code), name);
    }

    #[rstest]
    #[case(10)]
    #[case(57)]
    #[case(89)]
    #[case(u32::MAX)]
    fn test_unknown_codes(#[case] code: u32) {
        assert_eq!(symbolic_name(code), UNKNOWN);
    }

    #[test]
    fn test_display_matches_debug_line() {
        assert_eq!(ErrorCode::OK.to_string(), "CURLcode [0]: CURLE_OK");
        assert_eq!(
            ErrorCode::COULDNT_CONNECT.to_string(),
            "CURLcode [7]: CURLE_COULDNT_CONNECT"
        );
    }

    #[test]
    fn test_constants_resolve() {
        for code in [
            ErrorCode::UNSUPPORTED_PROTOCOL,
            ErrorCode::URL_MALFORMAT,
            ErrorCode::COULDNT_RESOLVE_HOST,
            ErrorCode::HTTP_RETURNED_ERROR,
            ErrorCode::SSL_CONNECT_ERROR,
            ErrorCode::TOO_MANY_REDIRECTS,
            ErrorCode::SEND_ERROR,
            ErrorCode::RECV_ERROR,
            ErrorCode::BAD_CONTENT_ENCODING,
        ] {
            assert_ne!(code.name(), UNKNOWN);
        }
        assert!(ErrorCode::OK.is_ok());
        assert!(!ErrorCode::RECV_ERROR.is_ok());
    }
}
