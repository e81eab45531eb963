//! Verdict classification
//!
//! Deterministic, total merge of both source outcomes. An explicit threat
//! signal from either source always dominates; a failed source never counts
//! as a clean signal, so errors without a threat signal degrade to `unknown`
//! rather than `safe`.

use crate::safe_browsing::ThreatMatch;
use crate::virustotal::AnalysisStats;
use crate::{SourceOutcome, Verdict, VerdictStatus};

/// Detection count above which VirusTotal alone marks a URL malicious
const MALICIOUS_THRESHOLD: u32 = 2;

/// Merge both source outcomes into a verdict. Never fails; ambiguity
/// degrades to `unknown`.
pub fn classify(
    safe_browsing: &SourceOutcome<Vec<ThreatMatch>>,
    virustotal: &SourceOutcome<AnalysisStats>,
) -> Verdict {
    let threat_count = safe_browsing.as_ref().map(Vec::len).unwrap_or(0);
    let (malicious, suspicious) = virustotal
        .as_ref()
        .map(|stats| (stats.malicious, stats.suspicious))
        .unwrap_or((0, 0));

    if threat_count > 0 || malicious > MALICIOUS_THRESHOLD {
        return Verdict {
            status: VerdictStatus::Malicious,
            reason: "Multiple security threats detected".to_string(),
        };
    }

    if malicious > 0 || suspicious > 0 {
        return Verdict {
            status: VerdictStatus::Suspicious,
            reason: format!(
                "Potential threats detected ({} detections)",
                malicious + suspicious
            ),
        };
    }

    if safe_browsing.is_ok() && virustotal.is_ok() {
        return Verdict {
            status: VerdictStatus::Safe,
            reason: "No threats detected by security services".to_string(),
        };
    }

    Verdict {
        status: VerdictStatus::Unknown,
        reason: "Unable to verify - service errors encountered".to_string(),
    }
}

// =============================================================================
// Tests
// =============================================================================
