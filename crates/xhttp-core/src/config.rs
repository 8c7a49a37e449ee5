//! xhttp.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::MAX_HTTP_REQUEST_LIMIT;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    pub http: Option<HttpSection>,
}

/// The `[http]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpSection {
    /// Hostnames (or absolute URLs) the guest may reach. Absent means unrestricted.
    pub allowed_hosts: Option<Vec<String>>,
    /// Lifetime request ceiling per guest instance.
    pub max_requests: Option<u32>,
    /// Optional per-request transport timeout in milliseconds.
    pub timeout_ms: Option<u64>,
}

impl HttpConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: HttpConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject ceilings the embedding layer would refuse.
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(max) = self.http.as_ref().and_then(|h| h.max_requests) {
            anyhow::ensure!(max > 0, "http.max_requests must be at least 1");
            anyhow::ensure!(
                max <= MAX_HTTP_REQUEST_LIMIT,
                "http.max_requests {max} exceeds the maximum of {MAX_HTTP_REQUEST_LIMIT}"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_section() {
        let toml_str = r#"
[http]
allowed_hosts = ["management.azure.com", "https://example.com"]
max_requests = 100
timeout_ms = 2500
"#;
        let config = HttpConfig::from_toml_str(toml_str).unwrap();
        let http = config.http.unwrap();
        assert_eq!(http.allowed_hosts.unwrap().len(), 2);
        assert_eq!(http.max_requests, Some(100));
        assert_eq!(http.timeout_ms, Some(2500));
    }

    #[test]
    fn test_parse_empty_document() {
        let config = HttpConfig::from_toml_str("").unwrap();
        assert!(config.http.is_none());
    }

    #[test]
    fn test_rejects_ceiling_above_maximum() {
        let err = HttpConfig::from_toml_str("[http]\nmax_requests = 501\n").unwrap_err();
        assert!(err.to_string().contains("exceeds the maximum of 500"));
    }

    #[test]
    fn test_rejects_zero_ceiling() {
        assert!(HttpConfig::from_toml_str("[http]\nmax_requests = 0\n").is_err());
    }

    #[test]
    fn test_accepts_ceiling_at_maximum() {
        let config = HttpConfig::from_toml_str("[http]\nmax_requests = 500\n").unwrap();
        assert_eq!(config.http.unwrap().max_requests, Some(500));
    }

    #[test]
    fn test_toml_round_trip_keeps_hosts() {
        let config = HttpConfig {
            http: Some(HttpSection {
                allowed_hosts: Some(vec!["api.local".to_string()]),
                max_requests: Some(5),
                timeout_ms: None,
            }),
        };
        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("api.local"));
        let parsed = HttpConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed.http.unwrap().max_requests, Some(5));
    }
}
