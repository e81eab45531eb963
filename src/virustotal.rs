//! VirusTotal v3 client
//!
//! Submit-then-poll state machine: POST the URL for analysis, then poll
//! `/analyses/{id}` until the report completes. A `queued` status re-polls
//! after an exponential backoff (2s, doubling, capped at 30s); the budget is
//! three poll attempts total. The wait only happens between a `queued`
//! observation and the next poll, never before the first one.
//!
//! The doubled delay is capped so a raised poll budget cannot produce
//! runaway waits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SourceError;
use crate::normalize::CandidateUrl;
use crate::SourceOutcome;

const VT_API_BASE: &str = "https://www.virustotal.com/api/v3";

/// VirusTotal client tuning
#[derive(Debug, Clone)]
pub struct VirusTotalConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Poll attempts before giving up on a queued analysis
    pub max_poll_attempts: u32,
    /// Delay before the first re-poll; doubles each round
    pub poll_initial_delay: Duration,
    /// Ceiling on the doubled delay
    pub poll_delay_cap: Duration,
}

impl Default for VirusTotalConfig {
    fn default() -> Self {
        Self {
            base_url: VT_API_BASE.to_string(),
            timeout: Duration::from_secs(15),
            max_poll_attempts: 3,
            poll_initial_delay: Duration::from_secs(2),
            poll_delay_cap: Duration::from_secs(30),
        }
    }
}

/// VirusTotal API client
pub struct VirusTotalClient {
    api_key: Option<String>,
    client: reqwest::Client,
    config: VirusTotalConfig,
}

/// Identifier returned by the submission step, plus polling-loop state.
/// Lives for one polling loop only; never reused across requests.
struct AnalysisHandle {
    id: String,
    attempts: u32,
    delay: Duration,
}

impl VirusTotalClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_config(api_key, VirusTotalConfig::default())
    }

    pub fn with_config(api_key: Option<String>, config: VirusTotalConfig) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Submit a URL for analysis and poll until the report completes.
    pub async fn check(&self, url: &CandidateUrl) -> SourceOutcome<AnalysisStats> {
        let Some(api_key) = &self.api_key else {
            tracing::warn!("VirusTotal API key not configured, skipping analysis");
            return Err(SourceError::NotConfigured);
        };

        let handle = self.submit(url, api_key).await?;
        self.poll(handle, api_key).await
    }

    async fn submit(&self, url: &CandidateUrl, api_key: &str) -> Result<AnalysisHandle, SourceError> {
        tracing::debug!(url = %url, "Submitting URL to VirusTotal");
        let resp = self
            .client
            .post(format!("{}/urls", self.config.base_url))
            .timeout(self.config.timeout)
            .header("x-apikey", api_key)
            .form(&[("url", url.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "VirusTotal submission error");
            return Err(SourceError::SubmitFailed(status.as_u16()));
        }

        let body: SubmitResponse = resp
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        let id = body
            .data
            .and_then(|d| d.id)
            .ok_or(SourceError::MissingAnalysisId)?;

        Ok(AnalysisHandle {
            id,
            attempts: 0,
            delay: self.config.poll_initial_delay,
        })
    }

    async fn poll(&self, mut handle: AnalysisHandle, api_key: &str) -> SourceOutcome<AnalysisStats> {
        loop {
            handle.attempts += 1;
            tracing::debug!(attempt = handle.attempts, id = %handle.id, "Retrieving VirusTotal analysis");

            let resp = self
                .client
                .get(format!("{}/analyses/{}", self.config.base_url, handle.id))
                .timeout(self.config.timeout)
                .header("x-apikey", api_key)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                tracing::error!(status = status.as_u16(), "VirusTotal analysis retrieval error");
                return Err(SourceError::PollFailed(status.as_u16()));
            }

            let report: AnalysisReport = resp
                .json()
                .await
                .map_err(|e| SourceError::Parse(e.to_string()))?;

            let attrs = report.data.attributes;
            match attrs.status.as_str() {
                "completed" => {
                    tracing::debug!(stats = ?attrs.stats, "VirusTotal analysis completed");
                    return Ok(attrs.stats);
                }
                "queued" => {
                    if handle.attempts >= self.config.max_poll_attempts {
                        tracing::warn!("Analysis still queued after max poll attempts");
                        return Err(SourceError::StillProcessing);
                    }
                    tracing::debug!(delay = ?handle.delay, "Analysis queued, backing off");
                    tokio::time::sleep(handle.delay).await;
                    handle.delay = next_delay(handle.delay, self.config.poll_delay_cap);
                }
                other => {
                    tracing::error!(status = other, "Unexpected analysis status");
                    return Err(SourceError::UnexpectedStatus(other.to_string()));
                }
            }
        }
    }
}

/// Exponential backoff step with a ceiling
fn next_delay(delay: Duration, cap: Duration) -> Duration {
    (delay * 2).min(cap)
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    data: Option<SubmitData>,
}

#[derive(Debug, Deserialize)]
struct SubmitData {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnalysisReport {
    data: AnalysisData,
}

#[derive(Debug, Deserialize)]
struct AnalysisData {
    attributes: AnalysisAttributes,
}

#[derive(Debug, Deserialize)]
struct AnalysisAttributes {
    #[serde(default)]
    status: String,
    #[serde(default)]
    stats: AnalysisStats,
}

/// Per-category detection counts from a completed analysis
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisStats {
    pub malicious: u32,
    pub suspicious: u32,
    pub harmless: u32,
    pub undetected: u32,
    #[serde(default)]
    pub timeout: u32,
}

// =============================================================================
// Tests
// =============================================================================
