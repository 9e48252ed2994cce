//! Network execution of resolved requests.
//!
//! # Design
//! `Transport` is the only seam that touches the network. The validator
//! never sees it, and tests can swap in a canned implementation. The ureq
//! transport is blocking and never retries: a failed call surfaces as
//! `HarnessError::Network` immediately.

use std::time::Duration;

use ureq::typestate::WithBody;

use crate::error::HarnessError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Executes one request and returns the response as data. Non-2xx statuses
/// are responses, not errors.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HarnessError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HarnessError> {
        (**self).send(request)
    }
}

/// Blocking HTTP/1.1 transport backed by a ureq agent with a fixed global
/// timeout.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HarnessError> {
        let url = request.url.as_str();
        let network_error = |e: ureq::Error| HarnessError::Network {
            url: request.url.clone(),
            message: e.to_string(),
        };

        let body = request.body.as_deref();
        let result = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(url), &request.headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(url), &request.headers).call(),
            HttpMethod::Post => send_body(with_headers(self.agent.post(url), &request.headers), body),
            HttpMethod::Put => send_body(with_headers(self.agent.put(url), &request.headers), body),
            HttpMethod::Patch => send_body(with_headers(self.agent.patch(url), &request.headers), body),
        };
        let mut response = result.map_err(network_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_vec().map_err(network_error)?;

        tracing::trace!(%url, status, bytes = body.len(), "transport round-trip complete");
        Ok(HttpResponse { status, headers, body })
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send_body(
    builder: ureq::RequestBuilder<WithBody>,
    body: Option<&str>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}
