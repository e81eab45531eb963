//! URL normalization and validation
//!
//! Canonicalizes the candidate URL before any network call: trims whitespace,
//! forces an http/https scheme, and checks the host against a DNS-name /
//! localhost / dotted-quad grammar. Pure; the only terminal failure path of a
//! check request.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::CheckError;

/// Accepted URL shape: http/https scheme, DNS labels (2+ char TLD),
/// `localhost`, or IPv4, optional port, optional path/query.
const URL_PATTERN: &str = r"(?i)^https?://(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+[A-Z]{2,}\.?|localhost|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})(?::\d+)?(?:/?|[/?]\S+)$";

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(URL_PATTERN).expect("URL pattern is valid"))
}

/// A validated, normalized absolute URL. Always carries a scheme and host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateUrl(String);

impl CandidateUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CandidateUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize and validate a raw URL string.
///
/// A missing scheme is defaulted to `http://` *before* validation so the
/// grammar runs against the exact form that will be queried.
pub fn normalize_and_validate(raw: &str) -> Result<CandidateUrl, CheckError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CheckError::EmptyUrl);
    }

    let normalized = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    if !url_regex().is_match(&normalized) {
        return Err(CheckError::InvalidUrl);
    }

    Ok(CandidateUrl(normalized))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_prepended_when_missing() {
        let url = normalize_and_validate("example.com").unwrap();
        assert_eq!(url.as_str(), "http://example.com");
    }

    #[test]
    fn test_explicit_scheme_preserved() {
        let url = normalize_and_validate("https://example.com/path?q=1").unwrap();
        assert_eq!(url.as_str(), "https://example.com/path?q=1");
    }

    #[test]
    fn test_whitespace_trimmed() {
        let url = normalize_and_validate("  example.com  ").unwrap();
        assert_eq!(url.as_str(), "http://example.com");
    }

    #[test]
    fn test_empty_input_rejected() {
        assert_eq!(normalize_and_validate(""), Err(CheckError::EmptyUrl));
        assert_eq!(normalize_and_validate("   "), Err(CheckError::EmptyUrl));
    }

    #[test]
    fn test_localhost_and_ipv4_accepted() {
        assert!(normalize_and_validate("localhost:8080").is_ok());
        assert!(normalize_and_validate("http://127.0.0.1/admin").is_ok());
    }

    #[test]
    fn test_port_and_query_accepted() {
        assert!(normalize_and_validate("example.com:8443/a/b?x=y&z=1").is_ok());
    }

    #[test]
    fn test_invalid_hosts_rejected() {
        assert_eq!(
            normalize_and_validate("not a url"),
            Err(CheckError::InvalidUrl)
        );
        // Single-label host without a TLD
        assert_eq!(
            normalize_and_validate("example"),
            Err(CheckError::InvalidUrl)
        );
        // One-character TLD
        assert_eq!(
            normalize_and_validate("example.c"),
            Err(CheckError::InvalidUrl)
        );
        // Non-http scheme is not recognized, so the prefixed form fails
        assert_eq!(
            normalize_and_validate("ftp://example.com"),
            Err(CheckError::InvalidUrl)
        );
    }

    #[test]
    fn test_hyphenated_and_multi_label_hosts() {
        assert!(normalize_and_validate("sub-domain.example.co.uk").is_ok());
        assert_eq!(
            normalize_and_validate("-leading.example.com"),
            Err(CheckError::InvalidUrl)
        );
    }
}
