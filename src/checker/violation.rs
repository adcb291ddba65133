// src/checker/violation.rs
// =============================================================================
// Typed results of checking one URL.
//
// - Violation: an expectation the URL did not meet. Every variant carries the
//   fields it needs and renders to exactly one report line. Faults (the URL
//   could not be checked at all) are reported the same way so one bad URL
//   never hides the rest of its chunk.
// - CheckError: why a check could not complete. The worker turns these into
//   Violation::Fault entries.
// =============================================================================

use serde::Serialize;
use thiserror::Error;

/// One reportable problem found while checking a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    #[error("URL {url} doesn't respond with {expected}. Instead: {actual}")]
    StatusMismatch { url: String, expected: u16, actual: u16 },

    #[error(
        "URL {url} doesn't redirect to {expected}. Instead: {}",
        .actual.as_deref().unwrap_or("no Location header")
    )]
    RedirectMismatch {
        url: String,
        expected: String,
        actual: Option<String>,
    },

    #[error("URL {url} doesn't have a title")]
    MissingTitle { url: String },

    #[error("URL {url} doesn't contain canonical link.")]
    MissingCanonical { url: String },

    #[error("URL {url} has canonical link {href}, expected {expected}")]
    CanonicalMismatch {
        url: String,
        href: String,
        expected: String,
    },

    #[error(
        "URL {url} doesn't contain language '{expected}' in html tag. Found: {}",
        .found.as_deref().unwrap_or("nothing")
    )]
    LanguageMismatch {
        url: String,
        expected: String,
        found: Option<String>,
    },

    #[error("URL {url} probably contains an include error.")]
    IncludeError { url: String },

    #[error("URL {url} has {count} validation errors. See {report_url}")]
    ValidatorFailed {
        url: String,
        count: usize,
        report_url: String,
    },

    #[error("Fault while checking URL {url}: {cause}")]
    Fault { url: String, cause: String },
}

impl Violation {
    /// The URL this violation was found on
    pub fn url(&self) -> &str {
        match self {
            Violation::StatusMismatch { url, .. }
            | Violation::RedirectMismatch { url, .. }
            | Violation::MissingTitle { url }
            | Violation::MissingCanonical { url }
            | Violation::CanonicalMismatch { url, .. }
            | Violation::LanguageMismatch { url, .. }
            | Violation::IncludeError { url }
            | Violation::ValidatorFailed { url, .. }
            | Violation::Fault { url, .. } => url,
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, Violation::Fault { .. })
    }
}

/// Why a URL could not be checked.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("validator at {endpoint} failed: {reason}")]
    Validator { endpoint: String, reason: String },
}

impl CheckError {
    /// Short cause for the report instead of reqwest's full error chain.
    pub fn describe(&self) -> String {
        match self {
            CheckError::Transport(e) if e.is_timeout() => "request timed out".to_string(),
            CheckError::Transport(e) if e.is_connect() => {
                format!("connection failed ({})", root_cause(e))
            }
            CheckError::Transport(e) => format!("request failed ({})", root_cause(e)),
            other => other.to_string(),
        }
    }
}

// The innermost error usually names the real problem (DNS, refused, TLS...)
fn root_cause(error: &(dyn std::error::Error + 'static)) -> String {
    let mut current = error;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mismatch_message() {
        let v = Violation::StatusMismatch {
            url: "http://localhost/a".to_string(),
            expected: 200,
            actual: 404,
        };
        assert_eq!(
            v.to_string(),
            "URL http://localhost/a doesn't respond with 200. Instead: 404"
        );
    }

    #[test]
    fn test_redirect_mismatch_without_location() {
        let v = Violation::RedirectMismatch {
            url: "http://localhost/old".to_string(),
            expected: "http://localhost/new".to_string(),
            actual: None,
        };
        assert_eq!(
            v.to_string(),
            "URL http://localhost/old doesn't redirect to http://localhost/new. Instead: no Location header"
        );
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let v = Violation::MissingTitle {
            url: "http://localhost/".to_string(),
        };
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["kind"], "missing_title");
        assert_eq!(json["url"], "http://localhost/");
    }

    #[test]
    fn test_validator_error_describes_itself() {
        let err = CheckError::Validator {
            endpoint: "http://localhost:8888/".to_string(),
            reason: "HTTP 500".to_string(),
        };
        assert_eq!(
            err.describe(),
            "validator at http://localhost:8888/ failed: HTTP 500"
        );
    }

    #[test]
    fn test_fault_is_fault() {
        let v = Violation::Fault {
            url: "http://localhost/".to_string(),
            cause: "connection refused".to_string(),
        };
        assert!(v.is_fault());
        assert_eq!(v.url(), "http://localhost/");
    }
}
