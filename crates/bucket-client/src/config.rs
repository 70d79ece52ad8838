//! Configuration for the store client.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result};

/// Store location used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string for store requests.
const USER_AGENT_VALUE: &str = concat!("bucket/", env!("CARGO_PKG_VERSION"));

/// Settings for reaching the array store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the store API, e.g. `http://localhost:8000/api`.
    pub api_url: String,

    /// Per-request timeout.
    pub timeout_secs: u64,

    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: USER_AGENT_VALUE.to_string(),
        }
    }
}

impl ClientConfig {
    /// Load settings from a JSON file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GatewayError::InvalidConfig(format!("failed to read {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            GatewayError::InvalidConfig(format!("failed to parse {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Override the store URL.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Check that the URL is an absolute http(s) URL and the timeout is set.
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(self.base_url())
            .map_err(|e| GatewayError::InvalidConfig(format!("api_url '{}': {e}", self.api_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(GatewayError::InvalidConfig(format!(
                "api_url '{}' must use http or https",
                self.api_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(GatewayError::InvalidConfig(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Store URL without trailing slashes.
    pub fn base_url(&self) -> &str {
        self.api_url.trim().trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.base_url(), "http://localhost:8000/api");
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let config = ClientConfig::default().with_api_url("https://example.org/api//");
        assert_eq!(config.base_url(), "https://example.org/api");
    }

    #[test]
    fn test_rejects_bad_urls() {
        for url in ["", "not a url", "ftp://example.org/api"] {
            let config = ClientConfig::default().with_api_url(url);
            assert!(
                matches!(config.validate(), Err(GatewayError::InvalidConfig(_))),
                "{url:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let config = ClientConfig::default().with_timeout_secs(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_keeps_defaults_for_missing_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"api_url": "http://store.local/api/"}}"#).unwrap();

        let config = ClientConfig::load(file.path()).unwrap();

        assert_eq!(config.base_url(), "http://store.local/api");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }
}
