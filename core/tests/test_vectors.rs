//! Run request building, path evaluation and validation against the JSON
//! vectors stored in `test-vectors/`.
//!
//! Each vector file holds a list of named `cases`. Values are compared with
//! `loose_eq` so `2500` and `2500.0` are the same number.

use restcheck_core::{
    evaluate, loose_eq, FailureKind, HarnessError, HttpMethod, HttpResponse, PathError, PathOptions, RequestSpec,
    ResponseExpectation, Validator,
};
use serde_json::Value;

fn load(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_vectors() {
    let vectors = load(include_str!("../../test-vectors/requests.json"));
    let base: RequestSpec = serde_json::from_value(vectors["base"].clone()).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let overrides: RequestSpec = serde_json::from_value(case["overrides"].clone()).unwrap();
        let result = base.merge(&overrides).to_request();

        if let Some(kind) = case.get("expected_error") {
            assert_eq!(kind.as_str(), Some("invalid_request"), "{name}: unknown error kind");
            assert!(matches!(result, Err(HarnessError::InvalidRequest(_))), "{name}: {result:?}");
            continue;
        }

        let req = result.unwrap_or_else(|e| panic!("{name}: {e}"));
        let expected = &case["expected_request"];
        let method: HttpMethod = serde_json::from_value(expected["method"].clone()).unwrap();
        assert_eq!(req.method, method, "{name}: method");
        assert_eq!(req.url, expected["url"].as_str().unwrap(), "{name}: url");

        let headers: Vec<(String, String)> = serde_json::from_value(expected["headers"].clone()).unwrap();
        assert_eq!(req.headers, headers, "{name}: headers");
        assert_eq!(req.body.as_deref(), expected["body"].as_str(), "{name}: body");
    }
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

#[test]
fn path_vectors() {
    let vectors = load(include_str!("../../test-vectors/paths.json"));
    let document = &vectors["document"];

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let path = case["path"].as_str().unwrap();
        let options = PathOptions {
            strict: case["strict"].as_bool().unwrap_or(false),
        };
        let result = evaluate(document, path, options);

        match case.get("error").and_then(Value::as_str) {
            Some("parse") => assert!(matches!(result, Err(PathError::Parse { .. })), "{name}: {result:?}"),
            Some("eval") => assert!(matches!(result, Err(PathError::Eval { .. })), "{name}: {result:?}"),
            Some(other) => panic!("{name}: unknown error kind {other}"),
            None => {
                let actual = result.unwrap_or_else(|e| panic!("{name}: {e}"));
                let expected = &case["expected"];
                assert!(loose_eq(&actual, expected), "{name}: expected {expected}, got {actual}");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Expectations
// ---------------------------------------------------------------------------

fn canned_response(spec: &Value) -> HttpResponse {
    let status = u16::try_from(spec["status"].as_u64().unwrap()).unwrap();
    match spec.get("text") {
        Some(text) => HttpResponse::new(status, text.as_str().unwrap()).with_header("content-type", "text/plain"),
        None => HttpResponse::new(status, spec["json"].to_string()).with_header("content-type", "application/json"),
    }
}

#[test]
fn expectation_vectors() {
    let vectors = load(include_str!("../../test-vectors/expectations.json"));
    let validator = Validator::new();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = canned_response(&case["response"]);
        let expectation: ResponseExpectation = serde_json::from_value(case["expectation"].clone()).unwrap();
        let result = validator.validate(&response, &expectation);

        if let Some(kind) = case.get("expected_error") {
            assert_eq!(kind.as_str(), Some("parse"), "{name}: unknown error kind");
            assert!(matches!(result, Err(HarnessError::Parse(_))), "{name}: {result:?}");
            continue;
        }

        let expected: Vec<FailureKind> = serde_json::from_value(case["failures"].clone()).unwrap();
        let actual: Vec<FailureKind> = match &result {
            Ok(()) => Vec::new(),
            Err(err) => err.failures().iter().map(|failure| failure.kind).collect(),
        };
        assert_eq!(actual, expected, "{name}: {result:?}");
    }
}
