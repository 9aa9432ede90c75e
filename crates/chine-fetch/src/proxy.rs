//! Proxy settings, opaque to the engine.
//!
//! The engine never interprets these; they are carried from
//! configuration to the fetcher implementation, which is where the
//! anti-bot transport concern lives.

use chine_core::ProxyConfig;
use serde::{Deserialize, Serialize};

/// Upstream proxy settings handed through to fetcher implementations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxySettings {
    /// Proxy hostname
    pub host: String,
    /// Proxy port
    pub port: u16,
    /// Optional username
    pub username: Option<String>,
    /// Optional password
    pub password: Option<String>,
}

impl From<&ProxyConfig> for ProxySettings {
    fn from(config: &ProxyConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_roundtrip() {
        let proxy = ProxySettings {
            host: "proxy.example.com".to_string(),
            port: 8000,
            username: Some("user".to_string()),
            password: None,
        };
        let json = serde_json::to_string(&proxy).expect("serialize proxy");
        let parsed: ProxySettings = serde_json::from_str(&json).expect("deserialize proxy");
        assert_eq!(parsed, proxy);
    }

    #[test]
    fn test_from_config() {
        let config = ProxyConfig {
            host: "proxy.example.com".to_string(),
            port: 8000,
            username: None,
            password: None,
        };
        let settings = ProxySettings::from(&config);
        assert_eq!(settings.host, "proxy.example.com");
        assert_eq!(settings.port, 8000);
    }
}
