//! Error types for the harness.
//!
//! # Design
//! `Network`, `Parse` and `InvalidRequest` abort a check immediately.
//! `Assertions` is the batched outcome of a validation run and carries every
//! failed expectation, so one failing test reports everything it violated.

use thiserror::Error;

use crate::path::PathError;
use crate::validate::AssertionFailure;

/// Errors returned by the request builder, transport, validator and client.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The transport could not complete the call (DNS, connect, timeout).
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    /// The response body had to be JSON and was not.
    #[error("response body is not valid JSON: {0}")]
    Parse(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The request spec cannot be resolved into a concrete request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// One or more expectations did not hold.
    #[error("{} expectation(s) failed:\n{}", .0.len(), render_failures(.0))]
    Assertions(Vec<AssertionFailure>),

    /// A path expression could not be parsed or evaluated.
    #[error(transparent)]
    Path(#[from] PathError),

    /// A configuration value could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl HarnessError {
    /// The collected failures, if this is an assertion error.
    pub fn failures(&self) -> &[AssertionFailure] {
        match self {
            HarnessError::Assertions(failures) => failures,
            _ => &[],
        }
    }
}

fn render_failures(failures: &[AssertionFailure]) -> String {
    failures
        .iter()
        .map(|failure| format!("  - {failure}"))
        .collect::<Vec<_>>()
        .join("\n")
}
