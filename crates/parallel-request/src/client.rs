//! Builder facade for sending batches

use std::time::Duration;

use bytes::Bytes;
use parallel_request_transport::{
    BatchRequest, FormFields, RequestDescriptor, TransportOptions, Verbosity,
};

use crate::{
    config::DispatcherConfig,
    error::Result,
    response::Response,
    scheduler::BatchScheduler,
};

/// How much transfer detail each result carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HttpInfo {
    /// Bare body only
    #[default]
    Off,
    /// Status, symbolic error name and body
    Basic,
    /// Full transfer details including captured headers
    Detail,
}

impl From<bool> for HttpInfo {
    fn from(enabled: bool) -> Self {
        if enabled { Self::Basic } else { Self::Off }
    }
}

/// Batch of HTTP requests sent concurrently.
///
/// Every setter consumes and returns the builder, so a batch reads as one
/// chain. The builder can be sent any number of times; each send is
/// independent of the previous ones.
///
/// # Example
///
/// ```rust,no_run
/// use parallel_request::ParallelRequest;
///
/// # async fn example() -> parallel_request::Result<()> {
/// let response = ParallelRequest::new()
///     .add_request("https://example.com/a", [("q", "1")], false)
///     .add_request_raw("https://example.com/b", "a=1&b=2")
///     .set_http_info(true)
///     .send()
///     .await?;
///
/// println!("{}", response.get_response_json()?.unwrap_or_default());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParallelRequest {
    request: BatchRequest,
    options: TransportOptions,
    http_status_only: bool,
    http_info: HttpInfo,
    encoded: bool,
    config: DispatcherConfig,
}

impl ParallelRequest {
    /// Create an empty batch with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the scheduler configuration.
    ///
    /// With the `env` feature, [`DispatcherConfig::from_env`] gives a
    /// configuration read from the environment.
    pub fn with_config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the whole batch.
    ///
    /// Accepts a single URL, a single descriptor, or a list of either.
    pub fn set_request(mut self, request: impl Into<BatchRequest>) -> Self {
        self.request = request.into();
        self
    }

    /// Append a request built from `url` and `params`.
    ///
    /// Empty `params` give a plain request. Otherwise `form_as_data` posts
    /// them as a form body; without it they are appended to the URL as a
    /// query string.
    pub fn add_request(
        mut self,
        url: impl Into<String>,
        params: impl Into<FormFields>,
        form_as_data: bool,
    ) -> Self {
        let params = params.into();
        let descriptor = if params.is_empty() {
            RequestDescriptor::plain(url)
        } else if form_as_data {
            RequestDescriptor::form(url, params)
        } else {
            RequestDescriptor::query(url, &params)
        };
        self.request.push(descriptor);
        self
    }

    /// Append a request posting `body` exactly as given
    pub fn add_request_raw(mut self, url: impl Into<String>, body: impl Into<Bytes>) -> Self {
        self.request.push(RequestDescriptor::raw(url, body));
        self
    }

    /// Replace the transport options.
    ///
    /// Non-empty options replace the batch defaults entirely, so a body is
    /// only returned when `return_body` is set.
    pub fn set_options(mut self, options: TransportOptions) -> Self {
        self.options = options;
        self
    }

    /// Return only status codes. Takes precedence over [`Self::set_http_info`].
    pub fn set_http_status_only(mut self, status_only: bool) -> Self {
        self.http_status_only = status_only;
        self
    }

    /// Choose the amount of transfer detail
    pub fn set_http_info(mut self, info: impl Into<HttpInfo>) -> Self {
        self.http_info = info.into();
        self
    }

    /// Send form bodies urlencoded instead of as multipart
    pub fn set_encoded(mut self, encoded: bool) -> Self {
        self.encoded = encoded;
        self
    }

    /// Set the idle delay of the driver loop.
    ///
    /// Only controls how often an idle tick is logged while nothing
    /// completes. Completions are handled as soon as they happen, whatever
    /// the delay.
    pub fn set_delay_time(mut self, delay: Duration) -> Self {
        self.config.delay_time = delay;
        self
    }

    /// Give the whole batch a time budget
    pub fn set_deadline(mut self, deadline: Duration) -> Self {
        self.config.deadline = Some(deadline);
        self
    }

    /// The batch as built so far
    pub fn request(&self) -> &BatchRequest {
        &self.request
    }

    /// Verbosity the flags resolve to
    pub fn verbosity(&self) -> Verbosity {
        if self.http_status_only {
            return Verbosity::StatusOnly;
        }
        match self.http_info {
            HttpInfo::Detail => Verbosity::DetailedInfo,
            HttpInfo::Basic => Verbosity::Info,
            HttpInfo::Off => Verbosity::None,
        }
    }

    /// Send the batch and wait for every request.
    ///
    /// # Errors
    ///
    /// Fails only when the batch cannot start (see [`Error`](crate::Error)). Requests that
    /// fail individually are reported inside the response.
    pub async fn send(&self) -> Result<Response> {
        let scheduler = BatchScheduler::new(self.config.clone());
        let result = scheduler
            .send(&self.request, &self.options, self.verbosity(), self.encoded)
            .await?;
        Ok(Response::new(result))
    }

    /// Blocking version of [`Self::send`] for synchronous callers.
    ///
    /// Runs on a private current-thread runtime, so it must not be called
    /// from inside an async context.
    #[cfg(feature = "blocking")]
    pub fn send_blocking(&self) -> Result<Response> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| crate::Error::Runtime(e.to_string()))?;
        runtime.block_on(self.send())
    }
}
