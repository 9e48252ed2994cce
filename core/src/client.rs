//! Request/validate round-trips over a pluggable transport.
//!
//! # Design
//! `ContractClient` holds the shared, read-only parts of a test class: a
//! base request spec, a base response expectation, the path options and
//! the transport. Each call merges the per-test spec and expectation over
//! those bases, so tests only state what differs.

use serde_json::Value;

use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::http::{HttpRequest, HttpResponse};
use crate::path::{JsonPath, PathOptions};
use crate::spec::RequestSpec;
use crate::transport::{Transport, UreqTransport};
use crate::validate::{ResponseExpectation, Validator};

#[derive(Debug, Clone)]
pub struct ContractClient<T = UreqTransport> {
    transport: T,
    request_spec: RequestSpec,
    response_spec: ResponseExpectation,
    validator: Validator,
}

impl ContractClient<UreqTransport> {
    /// A ureq-backed client with the configured base URI, timeout and path
    /// strictness.
    pub fn from_config(config: &HarnessConfig) -> Self {
        ContractClient::new(UreqTransport::new(config.timeout()))
            .with_request_spec(config.request_spec())
            .with_path_options(config.path_options())
    }
}

impl<T: Transport> ContractClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            request_spec: RequestSpec::default(),
            response_spec: ResponseExpectation::default(),
            validator: Validator::new(),
        }
    }

    #[must_use]
    pub fn with_request_spec(mut self, spec: RequestSpec) -> Self {
        self.request_spec = spec;
        self
    }

    #[must_use]
    pub fn with_response_spec(mut self, spec: ResponseExpectation) -> Self {
        self.response_spec = spec;
        self
    }

    #[must_use]
    pub fn with_path_options(mut self, options: PathOptions) -> Self {
        self.validator = self.validator.with_path_options(options);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Merge `spec` over the base request spec and resolve it.
    pub fn build_request(&self, spec: &RequestSpec) -> Result<HttpRequest, HarnessError> {
        self.request_spec.merge(spec).to_request()
    }

    /// Send one request. No status interpretation happens here.
    pub fn execute(&self, spec: &RequestSpec) -> Result<HttpResponse, HarnessError> {
        let merged = self.request_spec.merge(spec);
        let request = merged.to_request()?;

        if merged.logs_all() {
            tracing::info!(
                method = %request.method,
                url = %request.url,
                headers = ?request.headers,
                body = request.body.as_deref().unwrap_or(""),
                "request"
            );
        } else {
            tracing::debug!(method = %request.method, url = %request.url, "request");
        }

        let response = self.transport.send(&request)?;

        if merged.logs_all() {
            tracing::info!(
                status = response.status,
                headers = ?response.headers,
                body = %response.body_text(),
                "response"
            );
        } else {
            tracing::debug!(status = response.status, bytes = response.body.len(), "response");
        }
        Ok(response)
    }

    /// Validate `response` against the base expectation merged with
    /// `expectation`.
    pub fn validate(&self, response: &HttpResponse, expectation: &ResponseExpectation) -> Result<(), HarnessError> {
        self.validator
            .validate(response, &self.response_spec.merge(expectation))
    }

    /// Send `spec` and validate the response; returns the response so the
    /// caller can extract more from it.
    pub fn check(&self, spec: &RequestSpec, expectation: &ResponseExpectation) -> Result<HttpResponse, HarnessError> {
        let response = self.execute(spec)?;
        self.validate(&response, expectation)?;
        Ok(response)
    }

    /// Evaluate `path` against the JSON body of `response`.
    pub fn extract(&self, response: &HttpResponse, path: &str) -> Result<Value, HarnessError> {
        let document: Value =
            serde_json::from_slice(&response.body).map_err(|e| HarnessError::Parse(e.to_string()))?;
        let value = JsonPath::parse(path)?.evaluate_with(&document, self.validator.path_options())?;
        Ok(value)
    }
}
