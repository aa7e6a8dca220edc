//! Per-request transfer over HTTP
//!
//! Turns one [`TransferJob`] into one [`TransportResult`]. The method comes
//! from the descriptor: a payload means POST, no payload means GET, or HEAD
//! when only the status is wanted.

use super::client::HttpTransport;
use crate::descriptor::BodyPayload;
use crate::error::TransferFailure;
use crate::headers::{CapturedHeaders, format_block};
use crate::result::TransportResult;
use crate::traits::{TransferJob, Transport};
use async_trait::async_trait;
use bytes::BytesMut;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, HOST};
use http::{HeaderMap, HeaderValue, Method};
use reqwest::multipart::Form;
use std::time::Instant;
use tracing::debug;
use url::{Position, Url};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, job: TransferJob<'_>) -> TransportResult {
        let started = Instant::now();
        let mut result = TransportResult::new(job.index, job.descriptor.url());

        if let Err(failure) = self.transfer(&job, &mut result).await {
            debug!(
                index = job.index,
                url = %result.effective_url,
                code = failure.code.0,
                error = %failure.message,
                "Transfer failed"
            );
            result.fail(failure.code, failure.message);
        }

        result.total_time_seconds = started.elapsed().as_secs_f64();
        result
    }
}

impl HttpTransport {
    async fn transfer(
        &self,
        job: &TransferJob<'_>,
        result: &mut TransportResult,
    ) -> Result<(), TransferFailure> {
        let url = job.descriptor.url();
        let url = Url::parse(url).map_err(|e| TransferFailure::malformed_url(url, e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TransferFailure::unsupported_protocol(url.scheme()));
        }

        let payload = job.descriptor.body();
        let method = match payload {
            Some(_) => Method::POST,
            None if job.verbosity.skips_body() => Method::HEAD,
            None => Method::GET,
        };

        let mut builder = self
            .client
            .request(method.clone(), url.clone())
            .headers(self.headers.clone());

        builder = match payload {
            Some(BodyPayload::Form(fields)) if job.encoded_post => {
                let builder = if self.headers.contains_key(CONTENT_TYPE) {
                    builder
                } else {
                    builder.header(CONTENT_TYPE, FORM_URLENCODED)
                };
                builder.body(fields.url_encode())
            }
            Some(BodyPayload::Form(fields)) => {
                let form = fields.iter().fold(Form::new(), |form, (name, value)| {
                    form.text(name.to_string(), value.to_string())
                });
                builder.multipart(form)
            }
            Some(BodyPayload::Raw(bytes)) => {
                let builder = if self.headers.contains_key(CONTENT_TYPE) {
                    builder
                } else {
                    builder.header(CONTENT_TYPE, FORM_URLENCODED)
                };
                builder.body(bytes.clone())
            }
            None => builder,
        };

        let request = builder.build()?;

        debug!(
            index = job.index,
            method = %method,
            url = %url,
            body_size = request.body().and_then(|b| b.as_bytes()).map(<[u8]>::len),
            "Dispatching transfer"
        );

        if job.verbosity.captures_headers() {
            result.request_headers = Some(request_header_block(&request, &self.client_headers));
        }

        let response = self.client.execute(request).await?;

        let status = response.status();
        result.status_code = status.as_u16();
        result.effective_url = response.url().to_string();
        result.content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        result.content_length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(-1);

        let wants_block = job.verbosity.captures_headers() || self.options.include_header;
        let header_block = wants_block.then(|| {
            format_block(
                &format!("{:?} {}", response.version(), status),
                response.headers(),
            )
        });
        if job.verbosity.captures_headers() {
            result.response_headers = header_block.as_deref().map(CapturedHeaders::parse);
        }

        let http_failure = (job.verbosity.fails_on_http_error() || self.options.fail_on_error)
            && !status.is_success();

        if job.verbosity.skips_body() || !self.options.return_body {
            // Dropping the response releases the connection without reading
            drop(response);
        } else {
            let body = response.bytes().await?;
            result.body = match header_block.filter(|_| self.options.include_header) {
                Some(block) => {
                    let mut joined = BytesMut::with_capacity(block.len() + body.len());
                    joined.extend_from_slice(block.as_bytes());
                    joined.extend_from_slice(&body);
                    joined.freeze()
                }
                None => body,
            };
        }

        if http_failure {
            return Err(TransferFailure::http_status(result.status_code));
        }

        debug!(
            index = job.index,
            status = result.status_code,
            body_size = result.body.len(),
            "Transfer completed"
        );

        Ok(())
    }
}

/// Reconstruct the outbound header block of a built request.
///
/// The client adds `Host`, its own defaults and the length header on the
/// wire; they are rendered here so the captured block matches what was sent.
/// A request header overrides a client default of the same name.
fn request_header_block(
    request: &reqwest::Request,
    client_headers: &HeaderMap,
) -> CapturedHeaders {
    let url = request.url();
    let target = &url[Position::BeforePath..Position::AfterQuery];
    let start_line = format!("{} {} HTTP/1.1", request.method(), target);

    let mut headers =
        HeaderMap::with_capacity(request.headers().len() + client_headers.len() + 2);
    let host = match url.port() {
        Some(port) => format!("{}:{}", url.host_str().unwrap_or_default(), port),
        None => url.host_str().unwrap_or_default().to_string(),
    };
    if let Ok(value) = HeaderValue::from_str(&host) {
        headers.insert(HOST, value);
    }
    for (name, value) in client_headers {
        if !request.headers().contains_key(name) {
            headers.append(name.clone(), value.clone());
        }
    }
    for (name, value) in request.headers() {
        headers.append(name.clone(), value.clone());
    }
    if let Some(len) = request.body().and_then(|b| b.as_bytes()).map(<[u8]>::len) {
        headers.insert(CONTENT_LENGTH, HeaderValue::from(len));
    }

    CapturedHeaders::parse(&format_block(&start_line, &headers))
}
