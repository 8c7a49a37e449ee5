//! Resolved configuration for one handler.
//!
//! Built from an `xhttp-core::HttpConfig` (the user-facing TOML config) or
//! assembled directly with the builder methods.

use std::time::Duration;

use xhttp_core::DEFAULT_HTTP_REQUEST_LIMIT;
use xhttp_core::config::HttpConfig;

#[derive(Debug, Clone)]
pub struct HandlerConfig {
    /// Permitted destination hosts. `None` means unrestricted.
    pub allowed_hosts: Option<Vec<String>>,
    /// Lifetime request ceiling (default: 10).
    pub max_requests: u32,
    /// Per-request transport timeout. No timeout when `None`.
    pub timeout: Option<Duration>,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            allowed_hosts: None,
            max_requests: DEFAULT_HTTP_REQUEST_LIMIT,
            timeout: None,
        }
    }
}

impl HandlerConfig {
    pub fn from_http_config(config: &HttpConfig) -> Self {
        let Some(http) = config.http.as_ref() else {
            return Self::default();
        };
        Self {
            allowed_hosts: http.allowed_hosts.clone(),
            max_requests: http.max_requests.unwrap_or(DEFAULT_HTTP_REQUEST_LIMIT),
            timeout: http.timeout_ms.map(Duration::from_millis),
        }
    }

    /// Builder method: restrict destinations to `hosts`.
    pub fn with_allowed_hosts<I, S>(self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_hosts: Some(hosts.into_iter().map(Into::into).collect()),
            ..self
        }
    }

    /// Builder method: set the lifetime request ceiling.
    pub fn with_max_requests(self, max_requests: u32) -> Self {
        Self {
            max_requests,
            ..self
        }
    }

    /// Builder method: set a transport timeout.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..self
        }
    }
}
