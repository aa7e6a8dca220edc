//! Transport trait
//!
//! The scheduler drives transfers through this seam, so any implementation
//! that can turn a [`TransferJob`] into a [`TransportResult`] can stand in for
//! the HTTP transport.

use crate::descriptor::RequestDescriptor;
use crate::result::TransportResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Level of detail requested for each result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    /// Raw body only
    #[default]
    None,
    /// Status code only; the body is never transferred
    StatusOnly,
    /// Status, symbolic error name and body
    Info,
    /// Everything, including captured header blocks
    DetailedInfo,
}

impl Verbosity {
    /// `true` when the response body is not wanted
    pub fn skips_body(self) -> bool {
        self == Self::StatusOnly
    }

    /// `true` when header blocks are captured
    pub fn captures_headers(self) -> bool {
        self == Self::DetailedInfo
    }

    /// `true` when non-2xx statuses must carry an error number
    pub fn fails_on_http_error(self) -> bool {
        self == Self::DetailedInfo
    }
}

/// One unit of work handed to a [`Transport`].
#[derive(Debug, Clone, Copy)]
pub struct TransferJob<'a> {
    /// Position in the batch
    pub index: usize,
    /// What to send
    pub descriptor: &'a RequestDescriptor,
    /// Requested level of detail
    pub verbosity: Verbosity,
    /// Url-encode form payloads instead of sending multipart
    pub encoded_post: bool,
}

impl<'a> TransferJob<'a> {
    /// Create a job for `descriptor` at `index`
    pub fn new(index: usize, descriptor: &'a RequestDescriptor) -> Self {
        Self {
            index,
            descriptor,
            verbosity: Verbosity::default(),
            encoded_post: false,
        }
    }

    /// Set the verbosity
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set url-encoding of form payloads
    pub fn with_encoded_post(mut self, encoded_post: bool) -> Self {
        self.encoded_post = encoded_post;
        self
    }
}

/// Executes single transfers.
///
/// Implementations never fail outright: every problem is recorded on the
/// returned result so that one request cannot abort its batch.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Run one transfer to completion
    async fn execute(&self, job: TransferJob<'_>) -> TransportResult;
}
