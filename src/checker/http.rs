// src/checker/http.rs
// =============================================================================
// This module checks one URL against its CheckSpec.
//
// Steps for every spec:
// 1. GET the URL without following redirects
// 2. Compare the status code; a mismatch is the only violation reported
// 3. Redirect mode: compare the Location header with the expected target
// 4. Content mode: run every page rule, plus the external validator if one
//    is configured
//
// Certificate policy:
// - Verification is always on, except for loopback hosts (localhost,
//   *.localhost, 127.0.0.0/8, ::1), which commonly serve self-signed certs
// - The choice is made per URL: a Checker owns one strict client and one
//   loopback client and picks between them
// - The validator gets a third client that follows redirects; its
//   certificate rule depends on whether the validator itself is loopback
//
// Rust concepts:
// - async/await: For network I/O
// - Result<T, E>: Err only when the page could not be fetched at all
// - Pattern matching on CheckMode to pick the checks
// =============================================================================

use anyhow::{Context, Result};
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::{Host, Url};

use super::html::check_page;
use super::validator::validate_html;
use super::violation::{CheckError, Violation};
use crate::input::{CheckMode, CheckSpec};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Settings shared read-only by every worker.
#[derive(Debug, Clone)]
pub struct CheckSettings {
    /// Base address of a Nu Html Checker; enables the validation rule
    pub validator_url: Option<String>,
    /// Value the root element's `lang` attribute must have
    pub language: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for CheckSettings {
    fn default() -> Self {
        CheckSettings {
            validator_url: None,
            language: "de".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Runs the checks for single CheckSpecs.
///
/// Each worker builds its own Checker, so connections are never shared
/// between chunks.
pub struct Checker {
    strict: Client,
    loopback: Client,
    // Only built when a validator is configured
    validator: Option<Client>,
    settings: CheckSettings,
}

impl Checker {
    pub fn new(settings: CheckSettings) -> Result<Self> {
        let strict = client_builder(&settings)
            .build()
            .context("Failed to create HTTP client")?;

        // Loopback hosts only: self-signed certificates are accepted here
        let loopback = client_builder(&settings)
            .danger_accept_invalid_certs(true)
            .build()
            .context("Failed to create loopback HTTP client")?;

        // The validator may sit behind a redirect (e.g. /nu -> /nu/), so its
        // client follows redirects. Same certificate rule as for pages.
        let validator = match &settings.validator_url {
            Some(endpoint) => Some(
                Client::builder()
                    .timeout(settings.timeout)
                    .redirect(Policy::limited(10))
                    .user_agent(USER_AGENT)
                    .danger_accept_invalid_certs(is_loopback_url(endpoint))
                    .build()
                    .context("Failed to create validator HTTP client")?,
            ),
            None => None,
        };

        Ok(Checker {
            strict,
            loopback,
            validator,
            settings,
        })
    }

    /// Checks one spec and returns every violation found.
    ///
    /// An `Err` means the page itself could not be fetched (network failure,
    /// unreadable body). A failing validator is reported as a Fault next to
    /// the page rule violations instead.
    pub async fn check(&self, spec: &CheckSpec) -> Result<Vec<Violation>, CheckError> {
        info!("Checking {}...", spec);

        let response = self.client_for(&spec.url).get(&spec.url).send().await?;

        let actual = response.status().as_u16();
        if actual != spec.expected_status {
            return Ok(vec![Violation::StatusMismatch {
                url: spec.url.clone(),
                expected: spec.expected_status,
                actual,
            }]);
        }

        match spec.mode() {
            CheckMode::Redirect(target) => Ok(check_redirect(&spec.url, target, &response)
                .into_iter()
                .collect()),
            CheckMode::Content => self.check_content(&spec.url, response).await,
        }
    }

    // Full rule set over the page body
    async fn check_content(
        &self,
        url: &str,
        response: Response,
    ) -> Result<Vec<Violation>, CheckError> {
        let body = response.text().await?;
        debug!("Fetched {} byte(s) from {}", body.len(), url);

        let mut violations = check_page(&body, url, &self.settings.language);

        if let (Some(endpoint), Some(client)) = (&self.settings.validator_url, &self.validator) {
            match validate_html(client, endpoint, url).await {
                Ok(found) => violations.extend(found),
                // Keep the page rule results, the validator is one rule of many
                Err(e) => {
                    warn!("Validator failed for {}: {}", url, e);
                    violations.push(Violation::Fault {
                        url: url.to_string(),
                        cause: e.describe(),
                    });
                }
            }
        }

        Ok(violations)
    }

    fn client_for(&self, url: &str) -> &Client {
        if is_loopback_url(url) {
            &self.loopback
        } else {
            &self.strict
        }
    }
}

// Both page clients share everything except the certificate policy
fn client_builder(settings: &CheckSettings) -> reqwest::ClientBuilder {
    Client::builder()
        .timeout(settings.timeout)
        .redirect(Policy::none())
        .user_agent(USER_AGENT)
}

// Compares the Location header with the expected redirect target.
// A missing header is reported as a mismatch.
fn check_redirect(url: &str, expected: &str, response: &Response) -> Option<Violation> {
    let location = response
        .headers()
        .get(LOCATION)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());

    if location.as_deref() == Some(expected) {
        return None;
    }

    Some(Violation::RedirectMismatch {
        url: url.to_string(),
        expected: expected.to_string(),
        actual: location,
    })
}

/// Whether `url` points at a loopback host.
///
/// Unparsable URLs are never loopback, so they get the strict client.
pub fn is_loopback_url(url: &str) -> bool {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };

    match parsed.host() {
        Some(Host::Domain(domain)) => domain == "localhost" || domain.ends_with(".localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Policy::none() for the page clients?
//    - We want to SEE the 301/302 and its Location header
//    - Following it would hand us the target page's status instead
//
// 2. Why two clients instead of one?
//    - reqwest sets certificate checking per client, not per request
//    - Keeping a strict and a loopback client lets us choose per URL
//
// 3. What does `?` do on send().await?
//    - reqwest::Error converts into CheckError::Transport via #[from]
//    - The worker then reports it as a Fault for this URL only
// -----------------------------------------------------------------------------
