//! Google Safe Browsing v4 client
//!
//! One-shot `threatMatches:find` lookup. An empty match list is a meaningful
//! clean result, distinct from any error. The client never retries; a failed
//! lookup is reported as-is.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SourceError;
use crate::normalize::CandidateUrl;
use crate::SourceOutcome;

const GSB_API_BASE: &str = "https://safebrowsing.googleapis.com/v4";

const CLIENT_ID: &str = "urlguard";

const THREAT_TYPES: [&str; 4] = [
    "MALWARE",
    "SOCIAL_ENGINEERING",
    "UNWANTED_SOFTWARE",
    "POTENTIALLY_HARMFUL_APPLICATION",
];

/// Safe Browsing client tuning
#[derive(Debug, Clone)]
pub struct SafeBrowsingConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for SafeBrowsingConfig {
    fn default() -> Self {
        Self {
            base_url: GSB_API_BASE.to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

/// Google Safe Browsing API client
pub struct SafeBrowsingClient {
    api_key: Option<String>,
    client: reqwest::Client,
    config: SafeBrowsingConfig,
}

impl SafeBrowsingClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_config(api_key, SafeBrowsingConfig::default())
    }

    pub fn with_config(api_key: Option<String>, config: SafeBrowsingConfig) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Look up a URL against the threat lists.
    ///
    /// Returns the raw match records; an empty vec means no known threats.
    pub async fn check(&self, url: &CandidateUrl) -> SourceOutcome<Vec<ThreatMatch>> {
        let Some(api_key) = &self.api_key else {
            tracing::warn!("Safe Browsing API key not configured, skipping lookup");
            return Err(SourceError::NotConfigured);
        };

        let endpoint = format!("{}/threatMatches:find?key={}", self.config.base_url, api_key);
        let payload = FindRequest::for_url(url);

        tracing::debug!(url = %url, "Checking URL with Safe Browsing");
        let resp = self
            .client
            .post(&endpoint)
            .timeout(self.config.timeout)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "Safe Browsing API error");
            return Err(SourceError::HttpStatus(status.as_u16()));
        }

        let body: FindResponse = resp
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        tracing::debug!(matches = body.matches.len(), "Safe Browsing check completed");
        Ok(body.matches)
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FindRequest {
    client: ClientInfo,
    threat_info: ThreatInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientInfo {
    client_id: String,
    client_version: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThreatInfo {
    threat_types: Vec<String>,
    platform_types: Vec<String>,
    threat_entry_types: Vec<String>,
    threat_entries: Vec<ThreatEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatEntry {
    pub url: String,
}

impl FindRequest {
    fn for_url(url: &CandidateUrl) -> Self {
        Self {
            client: ClientInfo {
                client_id: CLIENT_ID.to_string(),
                client_version: env!("CARGO_PKG_VERSION").to_string(),
            },
            threat_info: ThreatInfo {
                threat_types: THREAT_TYPES.iter().map(|s| s.to_string()).collect(),
                platform_types: vec!["ANY_PLATFORM".to_string()],
                threat_entry_types: vec!["URL".to_string()],
                threat_entries: vec![ThreatEntry {
                    url: url.as_str().to_string(),
                }],
            },
        }
    }
}

/// A 2xx response with no body (or no `matches` key) is a clean result
#[derive(Debug, Default, Deserialize)]
struct FindResponse {
    #[serde(default)]
    matches: Vec<ThreatMatch>,
}

/// One threat-list match record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatMatch {
    pub threat_type: String,
    pub platform_type: Option<String>,
    pub threat_entry_type: Option<String>,
    pub threat: ThreatEntry,
}

// =============================================================================
// Tests
// =============================================================================
