//! Declarative HTTP contract testing.
//!
//! # Overview
//! Compose a request from a reusable base spec plus per-test overrides,
//! send it, and check the response against a list of expectations: status
//! code, whole-body matchers, and JSON path expressions such as
//! `filhos.name` or `salary.findAll{it != null}.sum()` paired with
//! Hamcrest-style matchers.
//!
//! # Design
//! - `RequestSpec` resolves to plain-data `HttpRequest`; a `Transport`
//!   turns it into a plain-data `HttpResponse` (host-does-IO pattern).
//! - Validation is a pure function of the response and the expectation
//!   list, and reports every failure at once.
//! - Path expressions parse into a small AST with a pure evaluator.
//!
//! ```no_run
//! use restcheck_core::{ContractClient, Matcher, RequestSpec, ResponseExpectation, UreqTransport};
//!
//! let client = ContractClient::new(UreqTransport::default())
//!     .with_request_spec(RequestSpec::new().base_uri("http://restapi.wcaquino.me"));
//! client.check(
//!     &RequestSpec::new().get("/users/1"),
//!     &ResponseExpectation::new()
//!         .status(200)
//!         .body("id", Matcher::equals(1))
//!         .body("name", Matcher::contains("Silva")),
//! )?;
//! # Ok::<(), restcheck_core::HarnessError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod matcher;
pub mod path;
pub mod spec;
pub mod transport;
pub mod validate;
mod value;

pub use client::ContractClient;
pub use config::HarnessConfig;
pub use error::HarnessError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use matcher::{JsonKind, Matcher};
pub use path::{evaluate, JsonPath, PathError, PathOptions};
pub use spec::{build, RequestSpec};
pub use transport::{Transport, UreqTransport};
pub use validate::{validate, AssertionFailure, BodyAssertion, FailureKind, ResponseExpectation, Validator};
pub use value::loose_eq;
