// src/input/model.rs
// =============================================================================
// The CheckSpec is the immutable input record for one URL.
//
// A spec runs in exactly one of two modes:
// - Content: the page is fetched and every page rule runs against it
// - Redirect: only the Location header is compared to the expected target
//
// The mode is decided solely by whether an expected redirect target is set.
// =============================================================================

use std::fmt;

/// One row of the input table: a URL and how it is expected to respond.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSpec {
    /// The full URL to request
    pub url: String,
    /// The HTTP status the response must match exactly
    pub expected_status: u16,
    /// Expected `Location` header value, if this URL should redirect
    pub expected_redirect: Option<String>,
}

/// Which set of checks applies to a spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckMode<'a> {
    /// Run the full rule set against the page body
    Content,
    /// Only compare the Location header against this target
    Redirect(&'a str),
}

impl CheckSpec {
    // Builds a spec, folding an empty redirect target into "no redirect"
    pub fn new(url: impl Into<String>, expected_status: u16, expected_redirect: Option<String>) -> Self {
        CheckSpec {
            url: url.into(),
            expected_status,
            expected_redirect: expected_redirect.filter(|target| !target.is_empty()),
        }
    }

    pub fn mode(&self) -> CheckMode<'_> {
        match self.expected_redirect.as_deref() {
            Some(target) if !target.is_empty() => CheckMode::Redirect(target),
            _ => CheckMode::Content,
        }
    }
}

impl fmt::Display for CheckSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode() {
            CheckMode::Content => write!(f, "{} (expect {})", self.url, self.expected_status),
            CheckMode::Redirect(target) => write!(
                f,
                "{} (expect {} -> {})",
                self.url, self.expected_status, target
            ),
        }
    }
}
