//! Configuration for the batch dispatcher

use std::time::Duration;

/// Default fallback delay of the driver loop (10 ms).
pub const DEFAULT_DELAY_TIME: Duration = Duration::from_micros(10_000);

/// Environment variable for the fallback delay, in microseconds.
pub const ENV_DELAY_US: &str = "PARALLEL_REQUEST_DELAY_US";

/// Environment variable for the batch deadline, in milliseconds.
pub const ENV_DEADLINE_MS: &str = "PARALLEL_REQUEST_DEADLINE_MS";

/// Scheduler configuration.
///
/// Controls how the multiplexing driver waits, not how individual requests
/// behave; per-request behavior lives in
/// [`TransportOptions`](crate::TransportOptions).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// How long the driver waits for a completion before recording an idle
    /// tick and waiting again. Logging only: it never delays a completion.
    pub delay_time: Duration,

    /// Overall budget for one batch; `None` waits for every transfer
    pub deadline: Option<Duration>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            delay_time: DEFAULT_DELAY_TIME,
            deadline: None,
        }
    }
}

impl DispatcherConfig {
    /// Create a builder.
    pub fn builder() -> DispatcherConfigBuilder {
        DispatcherConfigBuilder::default()
    }

    /// Load configuration from environment variables.
    ///
    /// This will look for:
    /// - `PARALLEL_REQUEST_DELAY_US` for the fallback delay (microseconds)
    /// - `PARALLEL_REQUEST_DEADLINE_MS` for the batch deadline (milliseconds)
    ///
    /// A `.env` file in the working directory is loaded first when present.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self, crate::error::Error> {
        use std::env;

        let _ = dotenvy::dotenv();
        let mut config = Self::default();

        if let Ok(delay) = env::var(ENV_DELAY_US) {
            config.delay_time = Duration::from_micros(parse_env(ENV_DELAY_US, &delay)?);
        }

        if let Ok(deadline) = env::var(ENV_DEADLINE_MS) {
            config.deadline = Some(Duration::from_millis(parse_env(ENV_DEADLINE_MS, &deadline)?));
        }

        Ok(config)
    }
}

#[cfg(feature = "env")]
fn parse_env(key: &str, value: &str) -> Result<u64, crate::error::Error> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| crate::error::Error::config(key, format!("'{}' is not a number: {}", value, e)))
}

/// Builder for creating DispatcherConfig with a fluent API.
#[derive(Debug, Default)]
pub struct DispatcherConfigBuilder {
    config: DispatcherConfig,
}

impl DispatcherConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback delay (idle tick interval, logging only).
    pub fn delay_time(mut self, delay: Duration) -> Self {
        self.config.delay_time = delay;
        self
    }

    /// Set the batch deadline.
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.config.deadline = Some(deadline);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> DispatcherConfig {
        self.config
    }
}
