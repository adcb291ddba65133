// src/input/table.rs
// =============================================================================
// Reads CheckSpecs from the comma-delimited input table.
//
// Expected layout (header row required):
//
//   full_url,expected_status_code,expected_redirect_target
//   http://localhost/about,200,
//   http://localhost/old,301,http://localhost/new
//
// Fields may be quoted with '|' when they contain commas.
// =============================================================================

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use super::model::CheckSpec;

// Raw row as it appears in the file, before validation
#[derive(Debug, Deserialize)]
struct Row {
    full_url: String,
    expected_status_code: String,
    #[serde(default)]
    expected_redirect_target: Option<String>,
}

/// Reads every CheckSpec from the table at `path`.
pub fn read_check_specs(path: &Path) -> Result<Vec<CheckSpec>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Could not open input table {}", path.display()))?;

    let specs = parse_check_specs(file)
        .with_context(|| format!("Invalid input table {}", path.display()))?;

    debug!("Read {} check spec(s) from {}", specs.len(), path.display());
    Ok(specs)
}

/// Parses CheckSpecs from any reader holding the table contents.
///
/// Fails on the first row with an empty URL or a status code that is not a
/// base-10 integer; the error names the line.
pub fn parse_check_specs<R: Read>(input: R) -> Result<Vec<CheckSpec>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .quote(b'|')
        .has_headers(true)
        .from_reader(input);

    let mut specs = Vec::new();

    for (index, row) in reader.deserialize::<Row>().enumerate() {
        // +1 for the header, +1 because lines are 1-based
        let line = index + 2;
        let row = row.with_context(|| format!("Malformed row on line {}", line))?;
        specs.push(row_to_spec(row, line)?);
    }

    Ok(specs)
}

fn row_to_spec(row: Row, line: usize) -> Result<CheckSpec> {
    let url = row.full_url.trim();
    if url.is_empty() {
        return Err(anyhow!("Empty full_url on line {}", line));
    }

    let status_text = row.expected_status_code.trim();
    let expected_status: u16 = status_text.parse().map_err(|_| {
        anyhow!(
            "expected_status_code '{}' on line {} is not a status code",
            status_text,
            line
        )
    })?;

    let redirect = row
        .expected_redirect_target
        .map(|target| target.trim().to_string());

    Ok(CheckSpec::new(url, expected_status, redirect))
}
