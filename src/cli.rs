// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// The long flags keep their snake_case spelling (--csv_file, ...) so existing
// CI scripts keep working; kebab-case aliases are accepted too.
//
// Rust concepts:
// - Derive macros: clap generates the whole parser from the struct below
// - Option<T>: Flags the user may leave out
// - PathBuf: An owned file system path
// =============================================================================

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::checker::CheckSettings;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "route-guardian",
    version,
    about = "Checks a list of URLs for status codes, redirects, titles, canonical links and valid HTML",
    long_about = "route-guardian reads a table of URLs with their expected status codes and \
                  redirect targets, checks them in parallel and reports every violation. \
                  It's meant for regression-checking a site after a deployment."
)]
pub struct Cli {
    /// The CSV file containing the URLs to check
    ///
    /// Columns: full_url, expected_status_code, expected_redirect_target
    ///
    /// Required: there is no default, clap errors out when it is missing
    #[arg(long = "csv_file", visible_alias = "csv-file", value_name = "PATH")]
    pub csv_file: PathBuf,

    /// Validate each page with this Nu Html Checker instance
    ///
    /// Example values: "https://validator.w3.org/nu/" or "http://localhost:8888/"
    #[arg(long = "nu_validator_url", visible_alias = "nu-validator-url", value_name = "URL")]
    pub nu_validator_url: Option<String>,

    /// How many workers check URLs in parallel
    ///
    /// The URL list is split into this many chunks, one per worker.
    /// Zero is rejected by parse_worker_count below.
    #[arg(
        long = "thread_amount",
        visible_alias = "thread-amount",
        default_value_t = 10,
        value_parser = parse_worker_count
    )]
    pub thread_amount: usize,

    /// Language code the <html lang="..."> attribute must have
    #[arg(long, default_value = "de")]
    pub language: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30, value_name = "SECS")]
    pub timeout: u64,

    /// Output the report in JSON format instead of text
    #[arg(long)]
    pub json: bool,

    /// Log per-chunk and per-page details to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The settings every worker checks with
    ///
    /// An empty --nu_validator_url counts as "no validator"
    pub fn check_settings(&self) -> CheckSettings {
        CheckSettings {
            validator_url: self
                .nu_validator_url
                .clone()
                .filter(|url| !url.trim().is_empty()),
            language: self.language.clone(),
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

// Custom clap value parser: a whole number of at least 1
// Returning Err(String) makes clap print our message next to the flag name
fn parse_worker_count(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(count) => Ok(count),
        Err(_) => Err(format!("'{}' is not a whole number", value)),
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why long = "csv_file" instead of just #[arg(long)]?
//    - #[arg(long)] would turn csv_file into --csv-file
//    - We want the underscore spelling, so we name the flag explicitly
//    - visible_alias keeps the kebab-case spelling working as well
//
// 2. default_value_t vs default_value?
//    - default_value_t takes a typed Rust value (10, 30)
//    - default_value takes a string that clap parses like user input ("de")
//
// 3. Why doesn't Cli hand out its fields directly to the workers?
//    - Workers only need CheckSettings, not CLI-only things like --json
//    - check_settings() builds that smaller struct once
// -----------------------------------------------------------------------------
