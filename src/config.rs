//! Runtime configuration
//!
//! Credentials and listen address come from the environment. A missing API
//! key is a degraded-but-running condition: the corresponding source reports
//! `not configured` instead of the process refusing to start.

use serde::{Deserialize, Serialize};

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Bind address for the local API
    pub listen_addr: String,
    /// Google Safe Browsing API key
    pub gsb_api_key: Option<String>,
    /// VirusTotal API key
    pub virustotal_api_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            gsb_api_key: None,
            virustotal_api_key: None,
        }
    }
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        let config = Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            gsb_api_key: env_key("GSB_API_KEY"),
            virustotal_api_key: env_key("VIRUSTOTAL_API_KEY"),
        };

        if config.gsb_api_key.is_none() {
            tracing::warn!("GSB_API_KEY not set, Safe Browsing lookups will report errors");
        }
        if config.virustotal_api_key.is_none() {
            tracing::warn!("VIRUSTOTAL_API_KEY not set, VirusTotal analysis will report errors");
        }

        config
    }
}

fn env_key(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
