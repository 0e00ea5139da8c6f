//! Application configuration
//!
//! Configuration loaded from .pr-review.toml file.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{DEFAULT_API_URL, DEFAULT_HOST};

/// Application configuration loaded from .pr-review.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Endpoint of the suggestions proxy (`POST` with `{ codeDiff }`)
    #[serde(default = "default_suggestions_url")]
    pub suggestions_url: String,

    /// GitHub REST API base URL
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,

    /// Host whose pull request pages are recognised in tab URLs
    #[serde(default = "default_github_host")]
    pub github_host: String,

    /// How long cached suggestions are served without refetching
    #[serde(default = "default_fresh_ttl_secs")]
    pub fresh_ttl_secs: u64,

    /// Hard ceiling after which cache entries are swept from storage
    #[serde(default = "default_retention_ttl_secs")]
    pub retention_ttl_secs: u64,
}

fn default_suggestions_url() -> String {
    "http://localhost:3000/api/suggestions".to_string()
}

fn default_github_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_github_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_fresh_ttl_secs() -> u64 {
    5 * 60
}

fn default_retention_ttl_secs() -> u64 {
    24 * 60 * 60
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            suggestions_url: default_suggestions_url(),
            github_api_url: default_github_api_url(),
            github_host: default_github_host(),
            fresh_ttl_secs: default_fresh_ttl_secs(),
            retention_ttl_secs: default_retention_ttl_secs(),
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        if let Some(content) = crate::load_config_file() {
            match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded app config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }

    pub fn fresh_ttl(&self) -> Duration {
        Duration::from_secs(self.fresh_ttl_secs)
    }

    pub fn retention_ttl(&self) -> Duration {
        Duration::from_secs(self.retention_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(
            config.suggestions_url,
            "http://localhost:3000/api/suggestions"
        );
        assert_eq!(config.github_api_url, "https://api.github.com");
        assert_eq!(config.github_host, "github.com");
        assert_eq!(config.fresh_ttl(), Duration::from_secs(300));
        assert_eq!(config.retention_ttl(), Duration::from_secs(86_400));
    }

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            suggestions_url = "https://review.example.com/api/suggestions"
            fresh_ttl_secs = 60
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(
            config.suggestions_url,
            "https://review.example.com/api/suggestions"
        );
        assert_eq!(config.fresh_ttl_secs, 60);
        // untouched fields fall back to defaults
        assert_eq!(config.retention_ttl_secs, 86_400);
        assert_eq!(config.github_host, "github.com");
    }

    #[test]
    fn test_config_deserialize_empty() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
