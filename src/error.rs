//! Error types for urlguard

use thiserror::Error;

/// Failure of a single reputation source query.
///
/// These never abort a request: the orchestrator records them per source and
/// classification degrades to `unknown`. Display text is the wire-facing
/// reason string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Credential absent; the query is skipped entirely
    #[error("API key not configured")]
    NotConfigured,

    /// Transport-level timeout
    #[error("Request timeout")]
    Timeout,

    /// Transport-level connection failure
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered a lookup with a non-2xx status
    #[error("API request failed: {0}")]
    HttpStatus(u16),

    /// Analysis submission was refused with a non-2xx status
    #[error("Submission failed: {0}")]
    SubmitFailed(u16),

    /// Analysis retrieval answered with a non-2xx status
    #[error("Analysis retrieval failed: {0}")]
    PollFailed(u16),

    /// Backend answered 2xx but the body did not parse
    #[error("Invalid response: {0}")]
    Parse(String),

    /// Submission accepted but no analysis identifier was returned
    #[error("No analysis ID received")]
    MissingAnalysisId,

    /// Backend reported a status value outside its documented protocol
    #[error("Analysis failed with status: {0}")]
    UnexpectedStatus(String),

    /// Polling budget exhausted while the analysis was still queued
    #[error("Analysis timeout - still processing")]
    StillProcessing,
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Input validation failure. The only error that reaches the caller directly;
/// no backend is contacted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error("URL is required")]
    EmptyUrl,

    #[error("Invalid URL format")]
    InvalidUrl,
}
