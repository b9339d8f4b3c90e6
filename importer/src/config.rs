//! Process-wide configuration.
//!
//! Built once at startup from the environment (after loading an optional
//! `.env` file) and read-only for the rest of the run.

use std::env;
use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};

/// Base URL of the WordPress REST API, e.g. `https://blog.example/wp-json/wp/v2`.
pub const BASE_URL_VAR: &str = "WP_BASE_URL";

/// Pre-encoded credentials sent as `Authorization: Basic <key>`.
pub const API_KEY_VAR: &str = "WP_API_KEY";

/// Author id assigned to every imported post.
pub const AUTHOR_ID_VAR: &str = "DEFAULT_AUTHOR_ID";

/// Optional per-request timeout in seconds.
pub const TIMEOUT_VAR: &str = "WP_TIMEOUT_SECS";

/// Run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// API base URL without trailing slash.
    pub base_url: String,
    /// Value placed after `Basic ` in the authorization header.
    pub api_key: String,
    /// Author of every post created by this run.
    pub author_id: u64,
    /// Per-request timeout. `None` keeps the HTTP client default.
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, author_id: u64) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            author_id,
            timeout: None,
        }
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Load configuration from the process environment.
    ///
    /// The binary loads `.env` into the environment before calling this.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingVar(name))
        };

        let base_url = required(BASE_URL_VAR)?;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: BASE_URL_VAR,
                message: format!("'{}' is not an http(s) URL", base_url),
            });
        }

        let api_key = required(API_KEY_VAR)?;

        let author_id =
            author_id_from_lookup(&lookup)?.ok_or(ConfigError::MissingVar(AUTHOR_ID_VAR))?;

        let mut config = Self::new(base_url, api_key, author_id);

        if let Some(raw) = lookup(TIMEOUT_VAR).filter(|v| !v.trim().is_empty()) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidValue {
                    var: TIMEOUT_VAR,
                    message: format!("'{}': {}", raw, e),
                })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Full URL of an API route such as `posts` or `tags`.
    pub fn endpoint(&self, route: &str) -> String {
        format!("{}/{}", self.base_url, route.trim_start_matches('/'))
    }

    /// Authorization header value sent on every API call.
    pub fn authorization(&self) -> String {
        format!("Basic {}", self.api_key)
    }
}

/// `DEFAULT_AUTHOR_ID` from the process environment, `None` when unset or blank.
pub fn author_id_from_env() -> ConfigResult<Option<u64>> {
    author_id_from_lookup(&|name: &str| env::var(name).ok())
}

fn author_id_from_lookup<F>(lookup: &F) -> ConfigResult<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(AUTHOR_ID_VAR).filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|e| ConfigError::InvalidValue {
            var: AUTHOR_ID_VAR,
            message: format!("'{}': {}", raw.trim(), e),
        })
}
