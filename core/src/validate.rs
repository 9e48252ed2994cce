//! Response validation against declarative expectations.
//!
//! # Design
//! An expectation is an explicit list built before the response arrives:
//! an optional status code, matchers over the raw body text, and
//! (path, matcher) pairs over the parsed JSON body. Validation runs the whole
//! list and reports every failure at once. Only an unparseable body aborts
//! early, since no path can be evaluated without a document.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HarnessError;
use crate::http::HttpResponse;
use crate::matcher::Matcher;
use crate::path::{JsonPath, PathOptions};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyAssertion {
    pub path: String,
    pub matcher: Matcher,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseExpectation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Matchers applied to the whole body as a string.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub body: Vec<Matcher>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub body_assertions: Vec<BodyAssertion>,
}

impl ResponseExpectation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, code: u16) -> Self {
        self.status_code = Some(code);
        self
    }

    /// Expect the whole body text to satisfy `matcher`.
    pub fn body_text(mut self, matcher: Matcher) -> Self {
        self.body.push(matcher);
        self
    }

    /// Expect the value at `path` in the JSON body to satisfy `matcher`.
    pub fn body(mut self, path: impl Into<String>, matcher: Matcher) -> Self {
        self.body_assertions.push(BodyAssertion {
            path: path.into(),
            matcher,
        });
        self
    }

    /// Layer `overrides` on top of `self`: an override status wins, matcher
    /// lists run base first.
    pub fn merge(&self, overrides: &ResponseExpectation) -> ResponseExpectation {
        ResponseExpectation {
            status_code: overrides.status_code.or(self.status_code),
            body: self.body.iter().chain(&overrides.body).cloned().collect(),
            body_assertions: self
                .body_assertions
                .iter()
                .chain(&overrides.body_assertions)
                .cloned()
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    StatusMismatch,
    BodyMismatch,
    /// The path could not be parsed or evaluated.
    PathError,
}

/// One violated expectation, with enough context to diagnose it without
/// re-running: the path (if any), the expectation and the actual value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssertionFailure {
    pub kind: FailureKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub expected: String,
    pub actual: String,
}

impl AssertionFailure {
    fn status(expected: u16, actual: u16) -> Self {
        Self {
            kind: FailureKind::StatusMismatch,
            path: None,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, &self.path) {
            (FailureKind::StatusMismatch, _) => {
                write!(f, "expected status code {} but was {}", self.expected, self.actual)
            }
            (FailureKind::PathError, Some(path)) => {
                write!(f, "JSON path {path}: {} (expected {})", self.actual, self.expected)
            }
            (_, Some(path)) => {
                write!(f, "JSON path {path}: expected {}, actual {}", self.expected, self.actual)
            }
            (_, None) => write!(f, "response body: expected {}, actual {}", self.expected, self.actual),
        }
    }
}

/// Runs expectations against responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    options: PathOptions,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_path_options(mut self, options: PathOptions) -> Self {
        self.options = options;
        self
    }

    pub fn path_options(&self) -> PathOptions {
        self.options
    }

    /// Check `response` against `expectation`.
    ///
    /// Returns `HarnessError::Parse` if a path assertion is present and the
    /// body is not JSON, and `HarnessError::Assertions` with every failure
    /// otherwise.
    pub fn validate(&self, response: &HttpResponse, expectation: &ResponseExpectation) -> Result<(), HarnessError> {
        let mut failures = Vec::new();

        if let Some(expected) = expectation.status_code {
            if expected != response.status {
                failures.push(AssertionFailure::status(expected, response.status));
            }
        }

        if !expectation.body.is_empty() {
            let text = Value::String(response.body_text());
            let lossy = !response.body_is_utf8();
            if lossy {
                tracing::debug!(bytes = response.body.len(), "body is not valid UTF-8, matching its lossy decoding");
            }
            for matcher in &expectation.body {
                if !matcher.matches(&text) {
                    let actual = if lossy {
                        format!("{text} (body is not valid UTF-8; invalid bytes shown as U+FFFD)")
                    } else {
                        text.to_string()
                    };
                    failures.push(AssertionFailure {
                        kind: FailureKind::BodyMismatch,
                        path: None,
                        expected: matcher.to_string(),
                        actual,
                    });
                }
            }
        }

        if !expectation.body_assertions.is_empty() {
            let document: Value = serde_json::from_slice(&response.body)
                .map_err(|e| HarnessError::Parse(format!("{e} (status {})", response.status)))?;
            for assertion in &expectation.body_assertions {
                if let Some(failure) = self.check_path(&document, assertion) {
                    failures.push(failure);
                }
            }
        }

        if failures.is_empty() {
            tracing::debug!(status = response.status, "response satisfied all expectations");
            return Ok(());
        }
        for failure in &failures {
            tracing::debug!(kind = ?failure.kind, path = ?failure.path, expected = %failure.expected, actual = %failure.actual, "expectation failed");
        }
        Err(HarnessError::Assertions(failures))
    }

    fn check_path(&self, document: &Value, assertion: &BodyAssertion) -> Option<AssertionFailure> {
        let path_failure = |message: String| AssertionFailure {
            kind: FailureKind::PathError,
            path: Some(assertion.path.clone()),
            expected: assertion.matcher.to_string(),
            actual: message,
        };

        let path = match JsonPath::parse(&assertion.path) {
            Ok(path) => path,
            Err(e) => return Some(path_failure(e.to_string())),
        };
        let actual = match path.evaluate_with(document, self.options) {
            Ok(actual) => actual,
            Err(e) => return Some(path_failure(e.to_string())),
        };

        if assertion.matcher.matches(&actual) {
            None
        } else {
            Some(AssertionFailure {
                kind: FailureKind::BodyMismatch,
                path: Some(assertion.path.clone()),
                expected: assertion.matcher.to_string(),
                actual: actual.to_string(),
            })
        }
    }
}

/// Validate with default (lenient) path options.
pub fn validate(response: &HttpResponse, expectation: &ResponseExpectation) -> Result<(), HarnessError> {
    Validator::new().validate(response, expectation)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn json_response(status: u16, body: &str) -> HttpResponse {
        HttpResponse::new(status, body).with_header("content-type", "application/json")
    }

    #[test]
    fn first_level_fields_pass() {
        let response = json_response(200, r#"{"id":1,"name":"João Silva","age":30}"#);
        let expectation = ResponseExpectation::new()
            .status(200)
            .body("id", Matcher::equals(1))
            .body("name", Matcher::contains("Silva"))
            .body("age", Matcher::greater_than(18));
        validate(&response, &expectation).unwrap();
    }

    #[test]
    fn status_mismatch_is_a_single_failure() {
        let response = json_response(404, r#"{"error":"Usuário inexistente"}"#);
        let err = validate(&response, &ResponseExpectation::new().status(200)).unwrap_err();
        assert_eq!(
            err.failures(),
            &[AssertionFailure {
                kind: FailureKind::StatusMismatch,
                path: None,
                expected: "200".to_string(),
                actual: "404".to_string(),
            }]
        );
    }

    #[test]
    fn reports_every_failure_not_just_the_first() {
        let response = json_response(201, r#"{"id":7,"name":"José","age":50}"#);
        let expectation = ResponseExpectation::new()
            .status(200)
            .body("id", Matcher::is_null())
            .body("name", Matcher::equals("José"))
            .body("age", Matcher::less_than(18));
        let err = validate(&response, &expectation).unwrap_err();
        let kinds: Vec<_> = err.failures().iter().map(|f| (f.kind, f.path.clone())).collect();
        assert_eq!(
            kinds,
            vec![
                (FailureKind::StatusMismatch, None),
                (FailureKind::BodyMismatch, Some("id".to_string())),
                (FailureKind::BodyMismatch, Some("age".to_string())),
            ]
        );
        assert_eq!(err.failures()[1].expected, "null");
        assert_eq!(err.failures()[1].actual, "7");
        assert!(err.to_string().starts_with("3 expectation(s) failed:"));
    }

    #[test]
    fn non_json_body_with_path_assertions_is_fatal() {
        let response = HttpResponse::new(200, "Ola Mundo!");
        let err = validate(&response, &ResponseExpectation::new().body("id", Matcher::is_not_null())).unwrap_err();
        assert!(matches!(err, HarnessError::Parse(_)));
    }

    #[test]
    fn non_json_body_without_path_assertions_is_fine() {
        let response = HttpResponse::new(200, "Ola Mundo!");
        let expectation = ResponseExpectation::new()
            .status(200)
            .body_text(Matcher::equals("Ola Mundo!"))
            .body_text(Matcher::contains("Mundo"))
            .body_text(!Matcher::is_null());
        validate(&response, &expectation).unwrap();
    }

    #[test]
    fn whole_body_mismatch_has_no_path() {
        let response = HttpResponse::new(200, "Ola Mundo!");
        let err = validate(&response, &ResponseExpectation::new().body_text(Matcher::equals("Hello"))).unwrap_err();
        let failure = &err.failures()[0];
        assert_eq!(failure.kind, FailureKind::BodyMismatch);
        assert_eq!(failure.path, None);
        assert_eq!(failure.to_string(), "response body: expected is \"Hello\", actual \"Ola Mundo!\"");
    }

    #[test]
    fn bad_paths_are_collected_as_path_errors() {
        let response = json_response(200, r#"[{"age":30}]"#);
        let expectation = ResponseExpectation::new()
            .body("findAll{it.age >", Matcher::has_size(1))
            .body("find{it.age > 99}", Matcher::is_not_null())
            .body("$", Matcher::has_size(1));
        let err = validate(&response, &expectation).unwrap_err();
        let failures = err.failures();
        assert_eq!(failures.len(), 2);
        assert!(failures.iter().all(|f| f.kind == FailureKind::PathError));
        assert!(failures[1].actual.contains("matched no element"));
    }

    #[test]
    fn strict_validator_flags_missing_fields() {
        let response = json_response(200, r#"{"id":1}"#);
        let expectation = ResponseExpectation::new().body("salary", Matcher::is_null());
        validate(&response, &expectation).unwrap();

        let err = Validator::new()
            .with_path_options(PathOptions::strict())
            .validate(&response, &expectation)
            .unwrap_err();
        assert_eq!(err.failures()[0].kind, FailureKind::PathError);
        assert!(err.failures()[0].actual.contains("field `salary` does not exist"));
    }

    #[test]
    fn merge_keeps_base_assertions_first() {
        let base = ResponseExpectation::new().status(200).body("id", Matcher::is_not_null());
        let overrides = ResponseExpectation::new().status(201).body("name", Matcher::equals("José"));
        let merged = base.merge(&overrides);
        assert_eq!(merged.status_code, Some(201));
        let paths: Vec<_> = merged.body_assertions.iter().map(|a| a.path.as_str()).collect();
        assert_eq!(paths, vec!["id", "name"]);
        assert_eq!(base.merge(&ResponseExpectation::new()).status_code, Some(200));
    }

    #[test]
    fn new_is_lenient_default() {
        assert_eq!(Validator::new().path_options(), Validator::default().path_options());
        assert!(!Validator::new().path_options().strict);
    }

    #[test]
    fn invalid_utf8_body_is_flagged_in_failure() {
        let response = HttpResponse::new(200, vec![b'O', b'l', b'a', 0xff]);
        let err = validate(
            &response,
            &ResponseExpectation::new().body_text(Matcher::equals("Ola")),
        )
        .unwrap_err();
        let failure = &err.failures()[0];
        assert_eq!(failure.kind, FailureKind::BodyMismatch);
        assert!(failure.actual.starts_with("\"Ola\u{fffd}\""), "{}", failure.actual);
        assert!(failure.actual.contains("not valid UTF-8"), "{}", failure.actual);
    }

    #[test]
    fn valid_utf8_body_failure_has_plain_actual() {
        let response = HttpResponse::new(200, "Ola Mundo!");
        let err = validate(
            &response,
            &ResponseExpectation::new().body_text(Matcher::equals("Adeus")),
        )
        .unwrap_err();
        assert_eq!(err.failures()[0].actual, "\"Ola Mundo!\"");
    }
}
