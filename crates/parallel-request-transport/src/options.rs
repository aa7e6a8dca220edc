//! Transport options
//!
//! [`TransportOptions`] is what the caller supplies; [`ResolvedOptions`] is
//! what the transport actually runs with. Resolution follows one rule: an
//! empty option set gets the scheduler defaults, a non-empty one replaces
//! them wholesale and falls back to the transport's native defaults for
//! anything left unset. Nothing is merged.

use derive_builder::Builder;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::warn;

/// Redirect hop limit used when following is enabled without a limit.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Caller-supplied transport options for one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
pub struct TransportOptions {
    /// Buffer the response body and return it
    #[builder(default, setter(into, strip_option))]
    pub return_body: Option<bool>,

    /// Prepend the raw response header block to the body
    #[builder(default, setter(into, strip_option))]
    pub include_header: Option<bool>,

    /// Follow `Location` redirects
    #[builder(default, setter(into, strip_option))]
    pub follow_redirects: Option<bool>,

    /// Redirect hop limit when following
    #[builder(default, setter(into, strip_option))]
    pub max_redirects: Option<usize>,

    /// Per-request timeout
    #[builder(default, setter(into, strip_option))]
    pub timeout: Option<Duration>,

    /// Connect timeout
    #[builder(default, setter(into, strip_option))]
    pub connect_timeout: Option<Duration>,

    /// `User-Agent` header value
    #[builder(default, setter(into, strip_option))]
    pub user_agent: Option<String>,

    /// Surface non-2xx statuses as transfer errors
    #[builder(default, setter(into, strip_option))]
    pub fail_on_error: Option<bool>,

    /// Extra request headers
    #[builder(default, setter(custom))]
    pub custom_headers: BTreeMap<String, String>,

    /// Transport knobs addressed by name; applied last
    #[builder(default, setter(custom))]
    pub overrides: BTreeMap<String, String>,
}

impl TransportOptions {
    /// Create a builder for transport options.
    pub fn builder() -> TransportOptionsBuilder {
        TransportOptionsBuilder::default()
    }

    /// `true` when the caller set nothing at all
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Work out the options the transport runs with.
    pub fn resolve(&self) -> ResolvedOptions {
        if self.is_empty() {
            return ResolvedOptions::scheduler_defaults();
        }
        let mut resolved = ResolvedOptions::native_defaults();

        if let Some(v) = self.return_body {
            resolved.return_body = v;
        }
        if let Some(v) = self.include_header {
            resolved.include_header = v;
        }
        if let Some(v) = self.follow_redirects {
            resolved.follow_redirects = v;
        }
        if let Some(v) = self.max_redirects {
            resolved.max_redirects = v;
        }
        if self.timeout.is_some() {
            resolved.timeout = self.timeout;
        }
        if self.connect_timeout.is_some() {
            resolved.connect_timeout = self.connect_timeout;
        }
        if self.user_agent.is_some() {
            resolved.user_agent = self.user_agent.clone();
        }
        if let Some(v) = self.fail_on_error {
            resolved.fail_on_error = v;
        }
        resolved.custom_headers = self.custom_headers.clone();

        for (key, value) in &self.overrides {
            resolved.apply_override(key, value);
        }

        resolved
    }
}

impl TransportOptionsBuilder {
    /// Add an extra request header
    pub fn custom_header(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.custom_headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Set a transport knob by name.
    ///
    /// See [`ResolvedOptions::apply_override`] for the recognized keys.
    pub fn override_option(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.overrides
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Options the transport runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    /// Buffer and return the body
    pub return_body: bool,
    /// Prepend the header block to the body
    pub include_header: bool,
    /// Follow redirects
    pub follow_redirects: bool,
    /// Redirect hop limit
    pub max_redirects: usize,
    /// Per-request timeout
    pub timeout: Option<Duration>,
    /// Connect timeout
    pub connect_timeout: Option<Duration>,
    /// `User-Agent` header value
    pub user_agent: Option<String>,
    /// Treat non-2xx statuses as transfer errors
    pub fail_on_error: bool,
    /// Restrict the client to HTTP/1.1
    pub http1_only: bool,
    /// Skip certificate verification
    pub accept_invalid_certs: bool,
    /// Extra request headers
    pub custom_headers: BTreeMap<String, String>,
}

impl ResolvedOptions {
    /// Defaults used when the caller supplied no options.
    pub fn scheduler_defaults() -> Self {
        Self {
            return_body: true,
            ..Self::native_defaults()
        }
    }

    /// Transport defaults, used when caller options replace the scheduler's.
    pub fn native_defaults() -> Self {
        Self {
            return_body: false,
            include_header: false,
            follow_redirects: false,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            timeout: None,
            connect_timeout: None,
            user_agent: None,
            fail_on_error: false,
            http1_only: false,
            accept_invalid_certs: false,
            custom_headers: BTreeMap::new(),
        }
    }

    /// Apply one named override.
    ///
    /// Recognized keys: `user_agent`, `timeout_ms`, `connect_timeout_ms`,
    /// `max_redirects`, `follow_redirects`, `fail_on_error`, `http1_only`,
    /// `accept_invalid_certs`, `return_body`, `include_header`. Unknown keys
    /// and unparsable values are logged and ignored.
    pub fn apply_override(&mut self, key: &str, value: &str) {
        let applied = match key {
            "user_agent" => {
                self.user_agent = Some(value.to_string());
                true
            }
            "timeout_ms" => parse_millis(value).map(|d| self.timeout = Some(d)).is_some(),
            "connect_timeout_ms" => parse_millis(value)
                .map(|d| self.connect_timeout = Some(d))
                .is_some(),
            "max_redirects" => value
                .trim()
                .parse::<usize>()
                .ok()
                .map(|n| self.max_redirects = n)
                .is_some(),
            "follow_redirects" => set_flag(&mut self.follow_redirects, value),
            "fail_on_error" => set_flag(&mut self.fail_on_error, value),
            "http1_only" => set_flag(&mut self.http1_only, value),
            "accept_invalid_certs" => set_flag(&mut self.accept_invalid_certs, value),
            "return_body" => set_flag(&mut self.return_body, value),
            "include_header" => set_flag(&mut self.include_header, value),
            _ => {
                warn!(key, value, "Ignoring unknown transport override");
                return;
            }
        };

        if !applied {
            warn!(key, value, "Ignoring transport override with unparsable value");
        }
    }
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        Self::scheduler_defaults()
    }
}

fn parse_millis(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_millis)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn set_flag(slot: &mut bool, value: &str) -> bool {
    parse_flag(value).map(|v| *slot = v).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_empty_options_use_scheduler_defaults() {
        let resolved = TransportOptions::default().resolve();

        assert!(resolved.return_body);
        assert!(!resolved.include_header);
        assert!(!resolved.follow_redirects);
        assert!(!resolved.fail_on_error);
    }

    #[test]
    fn test_any_option_replaces_defaults_without_merging() {
        let options = TransportOptions::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        let resolved = options.resolve();

        // return_body was not set, so the transport's native default applies
        assert!(!resolved.return_body);
        assert_eq!(resolved.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_custom_header_alone_counts_as_custom_options() {
        let options = TransportOptions::builder()
            .custom_header("X-Trace", "1")
            .build()
            .unwrap();

        assert!(!options.is_empty());
        let resolved = options.resolve();
        assert!(!resolved.return_body);
        assert_eq!(resolved.custom_headers.get("X-Trace").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_overrides_take_precedence_over_typed_options() {
        let options = TransportOptions::builder()
            .return_body(true)
            .follow_redirects(false)
            .override_option("follow_redirects", "yes")
            .override_option("max_redirects", "3")
            .override_option("timeout_ms", "250")
            .build()
            .unwrap();

        let resolved = options.resolve();

        assert!(resolved.return_body);
        assert!(resolved.follow_redirects);
        assert_eq!(resolved.max_redirects, 3);
        assert_eq!(resolved.timeout, Some(Duration::from_millis(250)));
    }

    #[rstest]
    #[case("no_such_knob", "1")]
    #[case("timeout_ms", "soon")]
    #[case("http1_only", "maybe")]
    fn test_bad_overrides_are_ignored(#[case] key: &str, #[case] value: &str) {
        let mut resolved = ResolvedOptions::native_defaults();
        resolved.apply_override(key, value);

        assert_eq!(resolved, ResolvedOptions::native_defaults());
    }

    #[rstest]
    #[case("1", Some(true))]
    #[case("TRUE", Some(true))]
    #[case(" off ", Some(false))]
    #[case("", None)]
    fn test_parse_flag(#[case] input: &str, #[case] expected: Option<bool>) {
        assert_eq!(parse_flag(input), expected);
    }
}
