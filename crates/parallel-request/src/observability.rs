//! Centralized observability utilities for structured logging
//!
//! Batch-level and per-transfer log lines are produced here so the scheduler
//! stays free of formatting concerns.

use parallel_request_transport::{TransportResult, Verbosity};
use std::time::{Duration, Instant};
use tracing::{Span, debug, info, info_span, trace, warn};
use uuid::Uuid;

/// Batch metadata for structured logging
#[derive(Debug, Clone)]
pub struct BatchMetadata {
    /// Correlation id of this send
    pub batch_id: Uuid,
    /// Number of descriptors
    pub size: usize,
    /// Requested verbosity
    pub verbosity: Verbosity,
}

impl BatchMetadata {
    /// Create metadata for a new batch
    pub fn new(size: usize, verbosity: Verbosity) -> Self {
        Self {
            batch_id: Uuid::new_v4(),
            size,
            verbosity,
        }
    }

    /// Span covering the whole batch
    pub fn span(&self) -> Span {
        info_span!(
            "batch",
            batch_id = %self.batch_id,
            size = self.size,
            verbosity = ?self.verbosity,
        )
    }

    /// Log the batch being dispatched
    pub fn log_start(&self) {
        debug!(size = self.size, "Dispatching batch");
    }

    /// Log the batch outcome
    pub fn log_finish(&self, failed: usize, elapsed: Duration) {
        info!(
            size = self.size,
            failed,
            elapsed_ms = elapsed.as_millis(),
            "Batch finished"
        );
    }
}

/// Per-transfer metadata for structured logging
#[derive(Debug, Clone)]
pub struct TransferMetadata<'a> {
    result: &'a TransportResult,
}

impl<'a> TransferMetadata<'a> {
    /// Wrap a finished result
    pub fn new(result: &'a TransportResult) -> Self {
        Self { result }
    }

    /// Log the finished transfer at a level matching its outcome
    pub fn log(&self) {
        let r = self.result;
        let elapsed_ms = (r.total_time_seconds * 1000.0) as u64;
        if r.is_error() {
            warn!(
                index = r.index,
                url = %r.effective_url,
                status = r.status_code,
                code = r.error_code.0,
                error = %r.error_message,
                elapsed_ms,
                "Transfer finished with error"
            );
        } else {
            info!(
                index = r.index,
                url = %r.effective_url,
                status = r.status_code,
                body_size = r.body.len(),
                elapsed_ms,
                "Transfer finished"
            );
        }
    }
}

/// Log an idle tick of the driver loop
pub fn log_idle(in_flight: usize, delay: Duration) {
    trace!(
        in_flight,
        delay_us = delay.as_micros(),
        "No transfer ready; waiting again"
    );
}

/// Timer for measuring batch duration
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    /// Start a new timer
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Time elapsed since start
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
