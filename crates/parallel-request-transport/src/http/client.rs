//! HTTP transport client
//!
//! One [`HttpTransport`] is built per batch from the batch's resolved
//! options. It owns the reqwest client that every adapter of the batch
//! shares, so connections live exactly as long as the batch.

use crate::error::{Result, TransportError};
use crate::options::ResolvedOptions;
use http::header::{ACCEPT, USER_AGENT};
use http::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client as ReqwestClient;
use reqwest::redirect::Policy;
use std::sync::Arc;

/// HTTP transport implementation
///
/// Handles:
/// - Redirect policy (off unless asked for)
/// - Per-request and connect timeouts
/// - Custom headers on every request
/// - TLS verification switches
#[derive(Clone)]
pub struct HttpTransport {
    pub(crate) client: Arc<ReqwestClient>,
    pub(crate) options: Arc<ResolvedOptions>,
    pub(crate) headers: HeaderMap,
    /// Headers the client adds to every request it sends
    pub(crate) client_headers: HeaderMap,
}

impl HttpTransport {
    /// Create a new HTTP transport with the scheduler defaults
    pub fn new() -> Result<Self> {
        Self::with_options(ResolvedOptions::default())
    }

    /// Create a new HTTP transport for the given options
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidHeaderName`] or
    /// [`TransportError::InvalidHeaderValue`] for a custom header that is not
    /// valid HTTP, and [`TransportError::ClientInit`] when the underlying
    /// client cannot be built in this environment.
    pub fn with_options(options: ResolvedOptions) -> Result<Self> {
        let headers = header_map(&options)?;
        let client_headers = client_header_map(&options)?;

        let redirect = if options.follow_redirects {
            Policy::limited(options.max_redirects)
        } else {
            Policy::none()
        };

        let mut builder = ReqwestClient::builder()
            .redirect(redirect)
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .default_headers(client_headers.clone());

        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = options.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if options.http1_only {
            builder = builder.http1_only();
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::ClientInit(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            options: Arc::new(options),
            headers,
            client_headers,
        })
    }

    /// Get a reference to the underlying reqwest client
    pub fn reqwest_client(&self) -> Arc<ReqwestClient> {
        self.client.clone()
    }

    /// Options this transport runs with
    pub fn options(&self) -> &ResolvedOptions {
        &self.options
    }
}

fn client_header_map(options: &ResolvedOptions) -> Result<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(2);
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    if let Some(agent) = &options.user_agent {
        let value = HeaderValue::try_from(agent.as_str())
            .map_err(|e| TransportError::InvalidHeaderValue(format!("'user-agent': {}", e)))?;
        headers.insert(USER_AGENT, value);
    }
    Ok(headers)
}

fn header_map(options: &ResolvedOptions) -> Result<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(options.custom_headers.len());
    for (name, value) in &options.custom_headers {
        let header_name = HeaderName::try_from(name.as_str())
            .map_err(|e| TransportError::InvalidHeaderName(format!("'{}': {}", name, e)))?;
        let header_value = HeaderValue::try_from(value.as_str())
            .map_err(|e| TransportError::InvalidHeaderValue(format!("'{}': {}", name, e)))?;
        headers.append(header_name, header_value);
    }
    Ok(headers)
}
