// src/report.rs
// =============================================================================
// Renders a finished BatchReport.
//
// Text layout (fixed order):
//   --- 1.234 seconds ---
//   Everything went fine!
// or
//   --- 1.234 seconds ---
//   ==== !! 2 ERROR(S) OCCURRED !! =====
//   <one message per line>
//
// With --json the same information is printed as one JSON document, each
// violation tagged with its kind and carrying its rendered message.
// =============================================================================

use anyhow::Result;
use serde::Serialize;

use crate::batch::BatchReport;
use crate::checker::Violation;

// JSON view of a report
#[derive(Serialize)]
struct JsonReport<'a> {
    elapsed_seconds: f64,
    checked: usize,
    error_count: usize,
    fault_count: usize,
    errors: Vec<JsonEntry<'a>>,
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    #[serde(flatten)]
    violation: &'a Violation,
    message: String,
}

/// Prints the report to stdout, as text or JSON.
pub fn print_report(report: &BatchReport, json: bool) -> Result<()> {
    if json {
        println!("{}", render_json(report)?);
    } else {
        print!("{}", render_text(report));
    }
    Ok(())
}

pub fn render_text(report: &BatchReport) -> String {
    let mut out = format!("--- {:.3} seconds ---\n", report.elapsed.as_secs_f64());

    if report.is_clean() {
        out.push_str("Everything went fine!\n");
        return out;
    }

    out.push_str(&format!(
        "==== !! {} ERROR(S) OCCURRED !! =====\n",
        report.violations.len()
    ));
    for violation in &report.violations {
        out.push_str(&violation.to_string());
        out.push('\n');
    }
    out
}

pub fn render_json(report: &BatchReport) -> Result<String> {
    let view = JsonReport {
        elapsed_seconds: report.elapsed.as_secs_f64(),
        checked: report.checked,
        error_count: report.violations.len(),
        fault_count: report.fault_count(),
        errors: report
            .violations
            .iter()
            .map(|violation| JsonEntry {
                violation,
                message: violation.to_string(),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&view)?)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why do render_* return String instead of printing?
//    - Tests can compare the exact output
//    - print_report() is the only place that touches stdout
//
// 2. What does #[serde(flatten)] do here?
//    - The violation's own fields (kind, url, expected, ...) are merged into
//      the entry next to "message", instead of nesting them
// -----------------------------------------------------------------------------
