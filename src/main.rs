// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Read the CheckSpecs from the input table
// 3. Check them all on the worker pool
// 4. Print the report
// 5. Exit with proper code (0 = no errors, 1 = errors found, 2 = fatal error)
//
// Rust concepts used:
// - async/await: Every worker waits on network requests
// - Result<T, E>: For error handling (T = success type, E = error type)
// - Arc: Shares the read-only settings between worker tasks
// =============================================================================

// Module declarations - tells Rust about our other source files
mod batch;     // src/batch/ - partitioning and the worker pool
mod checker;   // src/checker/ - per-URL checks and page rules
mod cli;       // src/cli.rs - command-line parsing
mod input;     // src/input/ - CheckSpec and the input table reader
mod logging;   // src/logging.rs - tracing setup
mod report;    // src/report.rs - text and JSON report rendering

// anyhow::Result is like std::result::Result but simpler for applications
// It lets us return any error type with the ? operator
use anyhow::Result;
use clap::Parser;  // Parser trait enables the parse() method
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use cli::Cli;

// The #[tokio::main] attribute transforms our async main into a real main function
// It creates a tokio runtime and runs our async code inside it
#[tokio::main]
async fn main() {
    // Run our application logic and capture the exit code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = every URL met its expectations
//   Ok(1) = at least one violation was reported
//   Err   = the batch could not run (exit code 2)
async fn run() -> Result<i32> {
    // The clock covers the whole run, reading the input included
    let started = Instant::now();

    // Parse command-line arguments into our Cli struct
    // This will automatically handle --help, --version, etc.
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    // Read every CheckSpec up front; a bad row stops us before any request
    let specs = input::read_check_specs(&cli.csv_file)?;
    info!(
        "Loaded {} URL(s) from {}",
        specs.len(),
        cli.csv_file.display()
    );

    // Workers only read the settings, so one shared copy is enough
    let settings = Arc::new(cli.check_settings());
    let report = batch::run_batch(specs, settings, cli.thread_amount, started).await?;

    // Print results and determine exit code
    report::print_report(&report, cli.json)?;

    if report.is_clean() {
        Ok(0)  // Exit code 0 = all good
    } else {
        Ok(1)  // Exit code 1 = violations found
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why split main() and run()?
//    - main() can't easily return our own exit codes AND use the ? operator
//    - run() uses ? everywhere, main() turns the outcome into an exit code
//
// 2. Why is Instant::now() the very first line?
//    - The elapsed time in the report should include reading the input,
//      not just the network part
//
// 3. What is Arc?
//    - "Atomically Reference Counted" pointer
//    - Cloning an Arc just bumps a counter, every worker points at the
//      same CheckSettings
//    - Needed because tokio::spawn requires owned ('static) data
// -----------------------------------------------------------------------------
