//! # parallel-request
//!
//! Concurrent batch HTTP dispatcher:
//! - Every request of a batch in flight at once, driven from one task
//! - Results correlated back to submission order
//! - Four result shapes, from a bare status code to full transfer details
//! - Per-request failures reported inline with curl-compatible error numbers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use parallel_request::{HttpInfo, ParallelRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let response = ParallelRequest::new()
//!         .set_request(vec!["https://example.com/a", "https://example.com/b"])
//!         .set_http_info(HttpInfo::Detail)
//!         .send()
//!         .await?;
//!
//!     if let Some(json) = response.get_response_json()? {
//!         println!("{json}");
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Re-export commonly used types
pub use client::{HttpInfo, ParallelRequest};
pub use config::{DispatcherConfig, DispatcherConfigBuilder};
pub use error::{Error, Result};
pub use projector::{DetailedResult, HeaderPair, InfoResult, Projected, TransferInfo};
pub use response::{BatchResult, Response};
pub use scheduler::BatchScheduler;

pub use parallel_request_transport::{
    BatchRequest, BodyPayload, CapturedHeaders, ErrorCode, FormFields, RequestDescriptor,
    Transport, TransportOptions, TransportOptionsBuilder, TransportResult, Verbosity,
    symbolic_name,
};

// Re-export key dependencies for convenience
pub use async_trait::async_trait;

// Module declarations
pub mod client;
pub mod config;
pub mod error;
pub mod observability;
pub mod projector;
pub mod response;
pub mod scheduler;

/// Prelude module for common imports
///
/// # Examples
///
/// ```rust
/// use parallel_request::prelude::*;
/// ```
pub mod prelude {

    pub use crate::{
        BatchResult, DispatcherConfig, Error, HttpInfo, ParallelRequest, Projected, Response,
        Result, TransportOptions, Verbosity,
    };
}

/// Crate version, automatically updated from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
