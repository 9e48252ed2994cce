//! Reusable request specifications.
//!
//! # Design
//! Every field of `RequestSpec` is optional so the same type serves as a
//! shared base (base URI, common headers) and as a per-test override
//! (method, path, body). `merge` layers an override on a base field by
//! field; `to_request` resolves the result into a concrete `HttpRequest`.

use serde::{Deserialize, Serialize};

use crate::error::HarnessError;
use crate::http::{HttpMethod, HttpRequest};

const CONTENT_TYPE: &str = "content-type";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
    /// Relative to `base_uri`, or an absolute `http(s)://` URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Log the full request and response at `info` instead of `debug`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_all: Option<bool>,
}

impl RequestSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = Some(base_uri.into());
        self
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn get(self, path: impl Into<String>) -> Self {
        self.method(HttpMethod::Get).path(path)
    }

    pub fn post(self, path: impl Into<String>) -> Self {
        self.method(HttpMethod::Post).path(path)
    }

    pub fn put(self, path: impl Into<String>) -> Self {
        self.method(HttpMethod::Put).path(path)
    }

    pub fn delete(self, path: impl Into<String>) -> Self {
        self.method(HttpMethod::Delete).path(path)
    }

    pub fn patch(self, path: impl Into<String>) -> Self {
        self.method(HttpMethod::Patch).path(path)
    }

    /// Set a header, replacing any existing header with the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        set_header(&mut self.headers, name.into(), value.into());
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `payload` as the body. Sets `application/json` unless a
    /// content type was already chosen.
    pub fn json_body<T: Serialize + ?Sized>(mut self, payload: &T) -> Result<Self, HarnessError> {
        let body = serde_json::to_string(payload).map_err(|e| HarnessError::Serialization(e.to_string()))?;
        self.body = Some(body);
        if self.content_type.is_none() {
            self.content_type = Some("application/json".to_string());
        }
        Ok(self)
    }

    pub fn log_all(mut self, enabled: bool) -> Self {
        self.log_all = Some(enabled);
        self
    }

    /// Layer `overrides` on top of `self`. Set override fields win; headers
    /// are merged by case-insensitive name.
    pub fn merge(&self, overrides: &RequestSpec) -> RequestSpec {
        let mut headers = self.headers.clone();
        for (name, value) in &overrides.headers {
            set_header(&mut headers, name.clone(), value.clone());
        }
        RequestSpec {
            base_uri: overrides.base_uri.clone().or_else(|| self.base_uri.clone()),
            method: overrides.method.or(self.method),
            path: overrides.path.clone().or_else(|| self.path.clone()),
            headers,
            content_type: overrides.content_type.clone().or_else(|| self.content_type.clone()),
            body: overrides.body.clone().or_else(|| self.body.clone()),
            log_all: overrides.log_all.or(self.log_all),
        }
    }

    pub fn logs_all(&self) -> bool {
        self.log_all.unwrap_or(false)
    }

    /// Resolve into a concrete request. The method defaults to GET and
    /// `content_type` replaces any explicit `content-type` header.
    pub fn to_request(&self) -> Result<HttpRequest, HarnessError> {
        let path = self.path.as_deref().unwrap_or("");
        let url = if is_absolute(path) {
            path.to_string()
        } else {
            let base = self.base_uri.as_deref().ok_or_else(|| {
                HarnessError::InvalidRequest(format!("relative path `{path}` needs a base URI"))
            })?;
            if !is_absolute(base) {
                return Err(HarnessError::InvalidRequest(format!(
                    "base URI `{base}` must start with http:// or https://"
                )));
            }
            join(base, path)
        };

        let mut headers = self.headers.clone();
        if let Some(content_type) = &self.content_type {
            set_header(&mut headers, CONTENT_TYPE.to_string(), content_type.clone());
        }

        Ok(HttpRequest {
            method: self.method.unwrap_or_default(),
            url,
            headers,
            body: self.body.clone(),
        })
    }
}

/// Merge `overrides` onto `base`; see [`RequestSpec::merge`].
pub fn build(base: &RequestSpec, overrides: &RequestSpec) -> RequestSpec {
    base.merge(overrides)
}

fn is_absolute(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn join(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}

fn set_header(headers: &mut Vec<(String, String)>, name: String, value: String) {
    match headers.iter_mut().find(|(key, _)| key.eq_ignore_ascii_case(&name)) {
        Some(slot) => *slot = (name, value),
        None => headers.push((name, value)),
    }
}
