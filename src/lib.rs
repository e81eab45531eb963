//! URL Threat Verification Service
//!
//! Accepts a candidate URL and determines a risk verdict by consulting two
//! independent reputation backends: Google Safe Browsing (synchronous match
//! lookup) and VirusTotal (asynchronous submit-then-poll analysis).
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      URL THREAT VERIFICATION                     │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   raw URL                                                        │
//! │      │                                                           │
//! │      ▼                                                           │
//! │ ┌───────────────┐                                                │
//! │ │  Normalizer   │  trim, force http/https, validate host         │
//! │ └───────┬───────┘                                                │
//! │         ▼                                                        │
//! │ ┌───────────────┐     ┌──────────────────┐  ┌─────────────────┐ │
//! │ │  Orchestrator │────▶│ Safe Browsing v4 │  │  VirusTotal v3  │ │
//! │ │  (fan-out)    │     │  one-shot lookup │  │  submit + poll  │ │
//! │ └───────┬───────┘     └────────┬─────────┘  └────────┬────────┘ │
//! │         │                      └─────────┬───────────┘          │
//! │         ▼                                ▼                       │
//! │ ┌───────────────┐              ┌──────────────────┐             │
//! │ │  Classifier   │◀─────────────│  SourceOutcomes  │             │
//! │ └───────┬───────┘              └──────────────────┘             │
//! │         ▼                                                        │
//! │   safe | suspicious | malicious | unknown                        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

pub mod api;
pub mod checker;
pub mod classify;
pub mod config;
pub mod error;
pub mod normalize;
pub mod safe_browsing;
pub mod virustotal;

pub use checker::{CheckReport, UrlChecker};
pub use config::AppConfig;
pub use error::{CheckError, SourceError};
pub use normalize::CandidateUrl;

// =============================================================================
// Verdict Types
// =============================================================================

/// Outcome of querying one reputation source. Every failure below the
/// orchestrator is captured here instead of aborting the request.
pub type SourceOutcome<T> = Result<T, error::SourceError>;

/// Four-way risk classification returned per request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictStatus {
    Safe,
    Suspicious,
    Malicious,
    Unknown,
}

/// Final classification plus a human-readable explanation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub status: VerdictStatus,
    pub reason: String,
}
