// src/checker/validator.rs
// =============================================================================
// External HTML validation through a Nu Html Checker instance
// (https://validator.w3.org/nu/ or a local one, e.g. http://localhost:8888/).
//
// Protocol:
//   GET <validator>?doc=<checked url>&out=json
//   -> { "messages": [ ... ] }
//
// Any message counts as a failure. The human-readable report is the same
// query with out=html.
// =============================================================================

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::violation::{CheckError, Violation};

// Only the message count matters, so messages stay untyped
#[derive(Debug, Deserialize)]
struct ValidatorResponse {
    messages: Vec<serde_json::Value>,
}

/// Asks the validator at `endpoint` to check `url`.
///
/// Returns a violation when the validator reported any message, and an error
/// when the validator could not be reached or answered with something other
/// than its JSON report.
pub async fn validate_html(
    client: &Client,
    endpoint: &str,
    url: &str,
) -> Result<Option<Violation>, CheckError> {
    let response = client
        .get(endpoint)
        .query(&[("doc", url), ("out", "json")])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(CheckError::Validator {
            endpoint: endpoint.to_string(),
            reason: format!("HTTP {}", status.as_u16()),
        });
    }

    // Grab the final request URL before .json() consumes the response
    let report_url = response.url().as_str().replace("out=json", "out=html");

    let report: ValidatorResponse =
        response.json().await.map_err(|e| CheckError::Validator {
            endpoint: endpoint.to_string(),
            reason: format!("unreadable report: {}", e),
        })?;

    debug!("Validator reported {} message(s) for {}", report.messages.len(), url);

    if report.messages.is_empty() {
        return Ok(None);
    }

    Ok(Some(Violation::ValidatorFailed {
        url: url.to_string(),
        count: report.messages.len(),
        report_url,
    }))
}
