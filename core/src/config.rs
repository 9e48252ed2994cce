//! Harness configuration from the environment.
//!
//! | Variable                 | Default | Meaning                                   |
//! |--------------------------|---------|-------------------------------------------|
//! | `RESTCHECK_BASE_URI`     | unset   | Base URI for relative request paths       |
//! | `RESTCHECK_TIMEOUT_MS`   | `10000` | Global transport timeout in milliseconds  |
//! | `RESTCHECK_STRICT_PATHS` | `false` | Fail on missing fields in path expressions |

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::HarnessError;
use crate::path::PathOptions;
use crate::spec::RequestSpec;

pub const ENV_BASE_URI: &str = "RESTCHECK_BASE_URI";
pub const ENV_TIMEOUT_MS: &str = "RESTCHECK_TIMEOUT_MS";
pub const ENV_STRICT_PATHS: &str = "RESTCHECK_STRICT_PATHS";

const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    #[serde(default)]
    pub base_uri: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub strict_paths: bool,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_uri: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            strict_paths: false,
        }
    }
}

impl HarnessConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, HarnessError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HarnessError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let timeout_ms = match get(ENV_TIMEOUT_MS) {
            Some(value) => value
                .parse()
                .map_err(|_| HarnessError::Config(format!("{ENV_TIMEOUT_MS} must be a whole number, got `{value}`")))?,
            None => DEFAULT_TIMEOUT_MS,
        };
        let strict_paths = match get(ENV_STRICT_PATHS) {
            Some(value) => parse_bool(ENV_STRICT_PATHS, &value)?,
            None => false,
        };
        Ok(Self {
            base_uri: get(ENV_BASE_URI),
            timeout_ms,
            strict_paths,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn path_options(&self) -> PathOptions {
        PathOptions {
            strict: self.strict_paths,
        }
    }

    /// Base request spec carrying the configured base URI, if any.
    pub fn request_spec(&self) -> RequestSpec {
        RequestSpec {
            base_uri: self.base_uri.clone(),
            ..RequestSpec::default()
        }
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, HarnessError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(HarnessError::Config(format!("{name} must be a boolean, got `{value}`"))),
    }
}
