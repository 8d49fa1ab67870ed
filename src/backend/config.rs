//! Backend service configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where the extraction and analysis services live and how to reach them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL shared by both services
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path of the text extraction endpoint
    #[serde(default = "default_upload_path")]
    pub upload_path: String,
    /// Path of the analysis endpoint
    #[serde(default = "default_analyze_path")]
    pub analyze_path: String,
    /// Transport timeout for a single request, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_upload_path() -> String {
    "/upload".to_string()
}

fn default_analyze_path() -> String {
    "/analyze".to_string()
}

fn default_request_timeout() -> u64 {
    300
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::base_default().with_env_overrides()
    }
}

impl BackendConfig {
    /// Base default without env overrides.
    pub fn base_default() -> Self {
        Self {
            base_url: default_base_url(),
            upload_path: default_upload_path(),
            analyze_path: default_analyze_path(),
            request_timeout: default_request_timeout(),
        }
    }

    /// Check if the config equals the default (for skip_serializing_if).
    pub fn is_default(&self) -> bool {
        *self == Self::base_default()
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `LEXISHIELD_BACKEND_URL`: base URL of the backend
    /// - `LEXISHIELD_UPLOAD_PATH`: extraction endpoint path
    /// - `LEXISHIELD_ANALYZE_PATH`: analysis endpoint path
    /// - `LEXISHIELD_REQUEST_TIMEOUT`: request timeout in seconds
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("LEXISHIELD_BACKEND_URL") {
            self.base_url = val;
        }
        if let Ok(val) = std::env::var("LEXISHIELD_UPLOAD_PATH") {
            self.upload_path = val;
        }
        if let Ok(val) = std::env::var("LEXISHIELD_ANALYZE_PATH") {
            self.analyze_path = val;
        }
        if let Ok(val) = std::env::var("LEXISHIELD_REQUEST_TIMEOUT") {
            if let Ok(n) = val.parse() {
                self.request_timeout = n;
            }
        }
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Full URL of the extraction endpoint.
    pub fn upload_url(&self) -> String {
        join_url(&self.base_url, &self.upload_path)
    }

    /// Full URL of the analysis endpoint.
    pub fn analyze_url(&self) -> String {
        join_url(&self.base_url, &self.analyze_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_default() {
        let config = BackendConfig::base_default();
        assert_eq!(config.upload_url(), "http://localhost:5000/upload");
        assert_eq!(config.analyze_url(), "http://localhost:5000/analyze");
        assert_eq!(config.timeout(), Duration::from_secs(300));
        assert!(config.is_default());
    }

    #[test]
    fn test_url_joining_tolerates_slashes() {
        let config = BackendConfig::base_default().with_base_url("https://api.example.com/v1/");
        assert_eq!(config.upload_url(), "https://api.example.com/v1/upload");

        let mut config = BackendConfig::base_default().with_base_url("http://host:8080");
        config.analyze_path = "analyze".to_string();
        assert_eq!(config.analyze_url(), "http://host:8080/analyze");
        assert!(!config.is_default());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: BackendConfig = toml::from_str("base_url = \"http://10.0.0.2:5000\"").unwrap();
        assert_eq!(config.base_url, "http://10.0.0.2:5000");
        assert_eq!(config.upload_path, "/upload");
        assert_eq!(config.request_timeout, 300);
    }
}
