//! Transport layer for parallel-request
//!
//! Everything needed to run a single HTTP transfer and describe its outcome.
//! The batch scheduler in `parallel-request` drives many of these at once.
//!
//! # Architecture
//!
//! - **Descriptors**: what to send, as a tagged variant
//! - **Options**: caller options and their resolution against defaults
//! - **Transport trait**: the seam the scheduler drives transfers through
//! - **HTTP transport**: reqwest-backed implementation of that trait

#![deny(unsafe_code)]
#![warn(missing_docs)]
//! - **Error codes**: curl-compatible error numbering and symbolic names
//! - **Header capture**: line-based parsing of header blocks
//!
//! # Usage
//!
//! ```ignore
//! use parallel_request_transport::{HttpTransport, RequestDescriptor, TransferJob, Transport};
//!
//! let transport = HttpTransport::new()?;
//! let descriptor = RequestDescriptor::plain("https://example.com/");
//! let result = transport.execute(TransferJob::new(0, &descriptor)).await;
//! println!("{} {}", result.status_code, result.error_code);
//! ```

pub mod codes;
pub mod descriptor;
pub mod error;
pub mod headers;
pub mod http;
pub mod options;
pub mod result;
pub mod traits;

// Re-export commonly used types
pub use codes::{ErrorCode, symbolic_name};
pub use descriptor::{BatchRequest, BodyPayload, FormFields, RequestDescriptor};
pub use error::{Result, TransferFailure, TransportError};
pub use headers::{CapturedHeaders, HeaderLine};
pub use http::HttpTransport;
pub use options::{ResolvedOptions, TransportOptions, TransportOptionsBuilder};
pub use result::TransportResult;
pub use traits::{TransferJob, Transport, Verbosity};
