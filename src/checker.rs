//! Check orchestration
//!
//! Sequences normalization, the fan-out to both reputation sources, and
//! classification. The two source queries have no data dependency and run
//! concurrently; each is wrapped in an overall deadline so a slow backend
//! cannot hang the request past the worst-case polling window.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::classify::classify;
use crate::config::AppConfig;
use crate::error::{CheckError, SourceError};
use crate::normalize::normalize_and_validate;
use crate::safe_browsing::{SafeBrowsingClient, ThreatMatch};
use crate::virustotal::{AnalysisStats, VirusTotalClient};
use crate::{SourceOutcome, Verdict};

/// Ceiling on one source query, sized to cover submission plus the full
/// poll/backoff schedule with headroom.
const SOURCE_DEADLINE: Duration = Duration::from_secs(90);

/// Full result of one check request
#[derive(Debug, Clone)]
pub struct CheckReport {
    /// The normalized URL that was actually queried
    pub url: String,
    pub verdict: Verdict,
    pub safe_browsing: SourceOutcome<Vec<ThreatMatch>>,
    pub virustotal: SourceOutcome<AnalysisStats>,
    pub checked_at: DateTime<Utc>,
}

/// Threat verification orchestrator
pub struct UrlChecker {
    safe_browsing: SafeBrowsingClient,
    virustotal: VirusTotalClient,
    source_deadline: Duration,
}

impl UrlChecker {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            safe_browsing: SafeBrowsingClient::new(config.gsb_api_key.clone()),
            virustotal: VirusTotalClient::new(config.virustotal_api_key.clone()),
            source_deadline: SOURCE_DEADLINE,
        }
    }

    pub fn with_clients(safe_browsing: SafeBrowsingClient, virustotal: VirusTotalClient) -> Self {
        Self {
            safe_browsing,
            virustotal,
            source_deadline: SOURCE_DEADLINE,
        }
    }

    /// Check one URL. Stateless; every call is independent.
    ///
    /// Only validation failures surface as `Err`; every backend failure is
    /// folded into the verdict.
    pub async fn check(&self, raw_url: &str) -> Result<CheckReport, CheckError> {
        let url = normalize_and_validate(raw_url)?;
        tracing::info!(url = %url, "Checking URL");

        let (safe_browsing, virustotal) = tokio::join!(
            bounded(self.source_deadline, self.safe_browsing.check(&url)),
            bounded(self.source_deadline, self.virustotal.check(&url)),
        );

        let verdict = classify(&safe_browsing, &virustotal);
        tracing::info!(status = ?verdict.status, "URL check completed");

        Ok(CheckReport {
            url: url.into_string(),
            verdict,
            safe_browsing,
            virustotal,
            checked_at: Utc::now(),
        })
    }
}

/// Safety net: cap a source query at the orchestrator deadline
async fn bounded<T>(
    deadline: Duration,
    query: impl Future<Output = SourceOutcome<T>>,
) -> SourceOutcome<T> {
    match tokio::time::timeout(deadline, query).await {
        Ok(outcome) => outcome,
        Err(_) => Err(SourceError::Timeout),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::safe_browsing::SafeBrowsingConfig;
    use crate::virustotal::VirusTotalConfig;
    use crate::VerdictStatus;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn checker_against(server: &MockServer) -> UrlChecker {
        UrlChecker::with_clients(
            SafeBrowsingClient::with_config(
                Some("k".into()),
                SafeBrowsingConfig {
                    base_url: server.uri(),
                    timeout: Duration::from_secs(5),
                },
            ),
            VirusTotalClient::with_config(
                Some("k".into()),
                VirusTotalConfig {
                    base_url: server.uri(),
                    timeout: Duration::from_secs(5),
                    poll_initial_delay: Duration::from_millis(10),
                    ..Default::default()
                },
            ),
        )
    }

    #[tokio::test]
    async fn test_report_assembly_clean_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/threatMatches:find"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/urls"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"id": "a1"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/analyses/a1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"attributes": {"status": "completed", "stats": {
                    "malicious": 0, "suspicious": 0, "harmless": 70, "undetected": 5
                }}}
            })))
            .mount(&server)
            .await;

        let report = checker_against(&server).check("example.com").await.unwrap();
        assert_eq!(report.url, "http://example.com");
        assert_eq!(report.verdict.status, VerdictStatus::Safe);
        assert!(report.safe_browsing.as_ref().unwrap().is_empty());
        assert_eq!(report.virustotal.as_ref().unwrap().harmless, 70);
    }

    #[tokio::test]
    async fn test_backend_failures_degrade_to_unknown() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/threatMatches:find"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/urls"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let report = checker_against(&server).check("example.com").await.unwrap();
        assert_eq!(report.verdict.status, VerdictStatus::Unknown);
        assert_eq!(report.safe_browsing, Err(SourceError::HttpStatus(503)));
        assert_eq!(report.virustotal, Err(SourceError::SubmitFailed(503)));
    }

    #[tokio::test]
    async fn test_invalid_url_skips_backends() {
        let server = MockServer::start().await;
        let checker = checker_against(&server);

        assert_eq!(checker.check("").await.unwrap_err(), CheckError::EmptyUrl);
        assert_eq!(
            checker.check("not a url").await.unwrap_err(),
            CheckError::InvalidUrl
        );
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
