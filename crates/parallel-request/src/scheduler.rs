//! Batch scheduler
//!
//! Runs every descriptor of a batch concurrently through one multiplexing
//! driver and hands back results in submission order.
//!
//! All transfers of a batch are polled from a single `FuturesUnordered` on
//! the caller's task. There is no window: every descriptor is in flight at
//! once, so callers that need a bound on concurrency chunk their batches.

use crate::config::DispatcherConfig;
use crate::error::Result;
use crate::observability::{BatchMetadata, RequestTimer, TransferMetadata, log_idle};
use crate::projector::project;
use crate::response::BatchResult;
use futures::FutureExt;
use futures::stream::{FuturesUnordered, StreamExt};
use parallel_request_transport::{
    BatchRequest, ErrorCode, HttpTransport, TransferJob, Transport, TransportOptions,
    TransportResult, Verbosity,
};
use std::time::Duration;
use tracing::Instrument;

/// Drives batches of transfers to completion.
#[derive(Debug, Clone, Default)]
pub struct BatchScheduler {
    config: DispatcherConfig,
}

impl BatchScheduler {
    /// Create a scheduler with the given configuration
    pub fn new(config: DispatcherConfig) -> Self {
        Self { config }
    }

    /// Scheduler configuration
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Send a batch over HTTP and shape the results.
    ///
    /// A fresh transport is built for every call, so nothing is shared
    /// between batches. Returns `Ok(None)` for an empty batch.
    ///
    /// # Errors
    ///
    /// Fails only when the transport cannot be built (for instance an
    /// invalid custom header, or no usable TLS backend). Individual request
    /// failures are reported inside the results.
    pub async fn send(
        &self,
        batch: &BatchRequest,
        options: &TransportOptions,
        verbosity: Verbosity,
        encoded_post: bool,
    ) -> Result<Option<BatchResult>> {
        let transport = HttpTransport::with_options(options.resolve())?;
        Ok(self
            .dispatch(&transport, batch, verbosity, encoded_post)
            .await)
    }

    /// Run a batch through any transport and shape the results.
    pub async fn dispatch<T>(
        &self,
        transport: &T,
        batch: &BatchRequest,
        verbosity: Verbosity,
        encoded_post: bool,
    ) -> Option<BatchResult>
    where
        T: Transport + ?Sized,
    {
        let results = self.drive(transport, batch, verbosity, encoded_post).await;
        BatchResult::collapse(
            results
                .into_iter()
                .map(|result| project(result, verbosity))
                .collect(),
        )
    }

    /// Run a batch through any transport; raw results in index order.
    ///
    /// Waits on completions. While nothing completes, an idle tick is
    /// recorded every `delay_time` (a zero delay disables the tick). With a
    /// deadline configured, transfers still in flight when it passes are
    /// dropped and reported as timed out.
    pub async fn drive<T>(
        &self,
        transport: &T,
        batch: &BatchRequest,
        verbosity: Verbosity,
        encoded_post: bool,
    ) -> Vec<TransportResult>
    where
        T: Transport + ?Sized,
    {
        let metadata = BatchMetadata::new(batch.len(), verbosity);
        let span = metadata.span();

        async move {
            metadata.log_start();
            let timer = RequestTimer::start();
            let delay = self.config.delay_time;
            let deadline = self
                .config
                .deadline
                .map(|budget| (budget, tokio::time::Instant::now() + budget));

            let mut slots: Vec<Option<TransportResult>> = (0..batch.len()).map(|_| None).collect();

            let mut in_flight: FuturesUnordered<_> = batch
                .iter()
                .map(|(index, descriptor)| {
                    let job = TransferJob::new(index, descriptor)
                        .with_verbosity(verbosity)
                        .with_encoded_post(encoded_post);
                    transport.execute(job).map(move |result| (index, result))
                })
                .collect();

            loop {
                let deadline_reached = async {
                    match deadline {
                        Some((_, at)) => tokio::time::sleep_until(at).await,
                        None => std::future::pending::<()>().await,
                    }
                };

                tokio::select! {
                    biased;

                    next = in_flight.next() => match next {
                        Some((index, mut result)) => {
                            // Slot by the index handed out, whatever the transport reports
                            result.index = index;
                            TransferMetadata::new(&result).log();
                            slots[index] = Some(result);
                        }
                        None => break,
                    },
                    _ = deadline_reached => break,
                    _ = tokio::time::sleep(delay), if !delay.is_zero() => {
                        log_idle(in_flight.len(), delay);
                    }
                }
            }

            // Dropping unfinished transfers releases their connections
            drop(in_flight);

            let results: Vec<TransportResult> = slots
                .into_iter()
                .enumerate()
                .map(|(index, slot)| {
                    slot.unwrap_or_else(|| {
                        let budget = deadline.map(|(budget, _)| budget).unwrap_or_default();
                        deadline_exceeded(batch, index, budget, timer.elapsed())
                    })
                })
                .collect();

            let failed = results.iter().filter(|r| r.is_error()).count();
            metadata.log_finish(failed, timer.elapsed());
            results
        }
        .instrument(span)
        .await
    }
}

fn deadline_exceeded(
    batch: &BatchRequest,
    index: usize,
    budget: Duration,
    elapsed: Duration,
) -> TransportResult {
    let url = batch.get(index).map(|d| d.url()).unwrap_or_default();
    let mut result = TransportResult::new(index, url);
    result.fail(
        ErrorCode::OPERATION_TIMEDOUT,
        format!("Batch deadline of {} ms exceeded", budget.as_millis()),
    );
    result.total_time_seconds = elapsed.as_secs_f64();
    TransferMetadata::new(&result).log();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projector::Projected;
    use async_trait::async_trait;
    use bytes::Bytes;
    use parallel_request_transport::RequestDescriptor;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Finishes each transfer after `delays[index]` and tracks how many ran
    /// at the same time.
    struct FakeTransport {
        delays: Vec<Duration>,
        running: AtomicUsize,
        peak: AtomicUsize,
    }

    impl FakeTransport {
        fn new(delays_ms: &[u64]) -> Self {
            Self {
                delays: delays_ms.iter().copied().map(Duration::from_millis).collect(),
                running: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn execute(&self, job: TransferJob<'_>) -> TransportResult {
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            tokio::time::sleep(self.delays[job.index]).await;
            self.running.fetch_sub(1, Ordering::SeqCst);

            let mut result = TransportResult::new(job.index, job.descriptor.url());
            result.status_code = 200 + job.index as u16;
            result.body = Bytes::from(job.descriptor.url().to_string());
            result
        }
    }

    fn batch(n: usize) -> BatchRequest {
        (0..n)
            .map(|i| RequestDescriptor::plain(format!("http://host/{i}")))
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_follow_submission_order() {
        // Later submissions finish first
        let transport = FakeTransport::new(&[30, 20, 10]);
        let scheduler = BatchScheduler::default();

        let results = scheduler
            .drive(&transport, &batch(3), Verbosity::None, false)
            .await;

        let indices: Vec<_> = results.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(results[2].effective_url, "http://host/2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_transfer_runs_concurrently() {
        let transport = FakeTransport::new(&[50; 8]);
        let scheduler = BatchScheduler::default();

        scheduler
            .drive(&transport, &batch(8), Verbosity::None, false)
            .await;

        assert_eq!(transport.peak.load(Ordering::SeqCst), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_request_collapses() {
        let transport = FakeTransport::new(&[5]);
        let scheduler = BatchScheduler::default();

        let result = scheduler
            .dispatch(&transport, &batch(1), Verbosity::StatusOnly, false)
            .await
            .unwrap();

        assert_eq!(result, BatchResult::Single(Projected::Status(200)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_multiple_requests_are_keyed_by_index() {
        let transport = FakeTransport::new(&[5, 1]);
        let scheduler = BatchScheduler::default();

        let result = scheduler
            .dispatch(&transport, &batch(2), Verbosity::StatusOnly, false)
            .await
            .unwrap();

        assert_eq!(result.get(0), Some(&Projected::Status(200)));
        assert_eq!(result.get(1), Some(&Projected::Status(201)));
    }

    #[tokio::test]
    async fn test_empty_batch_produces_nothing() {
        let transport = FakeTransport::new(&[]);
        let scheduler = BatchScheduler::default();

        let result = scheduler
            .dispatch(&transport, &BatchRequest::new(), Verbosity::None, false)
            .await;

        assert_eq!(result, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_marks_unfinished_transfers() {
        let transport = FakeTransport::new(&[10, 60_000]);
        let scheduler = BatchScheduler::new(
            DispatcherConfig::builder()
                .deadline(Duration::from_millis(100))
                .build(),
        );

        let results = scheduler
            .drive(&transport, &batch(2), Verbosity::Info, false)
            .await;

        assert!(!results[0].is_error());
        assert_eq!(results[1].status_code, 0);
        assert_eq!(results[1].error_code, ErrorCode::OPERATION_TIMEDOUT);
        assert_eq!(results[1].error_message, "Batch deadline of 100 ms exceeded");
        assert_eq!(results[1].effective_url, "http://host/1");
    }

    /// Reports every result as index 0.
    struct MislabelingTransport;

    #[async_trait]
    impl Transport for MislabelingTransport {
        async fn execute(&self, job: TransferJob<'_>) -> TransportResult {
            let mut result = TransportResult::new(99, job.descriptor.url());
            result.status_code = 200;
            result
        }
    }

    #[tokio::test]
    async fn test_results_are_slotted_by_assigned_index() {
        let scheduler = BatchScheduler::default();

        let results = scheduler
            .drive(&MislabelingTransport, &batch(3), Verbosity::None, false)
            .await;

        let indices: Vec<_> = results.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        let urls: Vec<_> = results.iter().map(|r| r.effective_url.as_str()).collect();
        assert_eq!(urls, vec!["http://host/0", "http://host/1", "http://host/2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_long_delay_does_not_hold_back_completions() {
        let transport = FakeTransport::new(&[20, 40]);
        let scheduler = BatchScheduler::new(
            DispatcherConfig::builder()
                .delay_time(Duration::from_secs(3600))
                .build(),
        );

        let started = tokio::time::Instant::now();
        let results = scheduler
            .drive(&transport, &batch(2), Verbosity::None, false)
            .await;

        assert_eq!(results.len(), 2);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_delay_still_completes() {
        let transport = FakeTransport::new(&[20, 40]);
        let scheduler = BatchScheduler::new(
            DispatcherConfig::builder()
                .delay_time(Duration::ZERO)
                .build(),
        );

        let results = scheduler
            .drive(&transport, &batch(2), Verbosity::None, false)
            .await;

        assert_eq!(results.len(), 2);
    }
}
