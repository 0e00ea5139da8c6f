//! Environment configuration

use anyhow::{Context, Result};
use std::net::SocketAddr;

pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// `None` keeps the server up but every review request fails
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub addr: SocketAddr,
}

impl ProxyConfig {
    /// Read from the process environment (after `.env` has been loaded)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read through `lookup`; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let addr = var("PR_REVIEW_PROXY_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr
            .parse()
            .with_context(|| format!("Invalid PR_REVIEW_PROXY_ADDR: {addr}"))?;

        Ok(Self {
            api_key: var("OPENAI_API_KEY"),
            api_url: var("OPENAI_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            model: var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ProxyConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_key, None);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.addr, "127.0.0.1:3000".parse().unwrap());
    }

    #[test]
    fn test_overrides() {
        let config = ProxyConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_API_URL", "http://localhost:9000/v1/chat/completions"),
            ("OPENAI_MODEL", "gpt-4o"),
            ("PR_REVIEW_PROXY_ADDR", "0.0.0.0:8080"),
        ]))
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.addr.port(), 8080);
    }

    #[test]
    fn test_blank_key_is_unset() {
        let config = ProxyConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "  ")])).unwrap();
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn test_invalid_addr() {
        let err = ProxyConfig::from_lookup(lookup(&[("PR_REVIEW_PROXY_ADDR", "nowhere")]))
            .unwrap_err();
        assert!(err.to_string().contains("PR_REVIEW_PROXY_ADDR"));
    }
}
