// src/batch/pool.rs
// =============================================================================
// Runs a batch of CheckSpecs on a fixed pool of workers.
//
// How it works:
// 1. Split the specs into one contiguous chunk per worker (see partition.rs)
// 2. Spawn one tokio task per chunk; each task checks its specs one after
//    another, in input order, with its own HTTP clients
// 3. Wait for every task, then flatten the per-chunk violations in chunk
//    order
//
// Chunks share nothing but the read-only settings, so no locks are needed.
// A URL that cannot be checked becomes a Fault entry and its chunk carries
// on with the next URL.
// =============================================================================

use anyhow::{Context, Result};
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::partition::partition;
use crate::checker::{CheckSettings, Checker, Violation};
use crate::input::CheckSpec;

/// Everything a finished batch found, in deterministic order.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Violations ordered by (chunk, position within chunk)
    pub violations: Vec<Violation>,
    /// Number of specs that were checked
    pub checked: usize,
    /// Wall-clock time from `started` to the last worker finishing
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn fault_count(&self) -> usize {
        self.violations.iter().filter(|v| v.is_fault()).count()
    }
}

/// Checks every spec using `workers` concurrent workers.
///
/// `started` is when the batch began (before the input was read), so the
/// report's elapsed time covers the whole run.
///
/// Fails only when a worker could not run at all (its HTTP clients could
/// not be built, or it panicked). Per-URL problems, including network
/// failures, end up in the report.
pub async fn run_batch(
    specs: Vec<CheckSpec>,
    settings: Arc<CheckSettings>,
    workers: usize,
    started: Instant,
) -> Result<BatchReport> {
    let checked = specs.len();

    // Static chunks, decided once; there is no shared work queue
    let chunks = partition(specs, workers);
    info!("Checking {} URL(s) with {} worker(s)", checked, chunks.len());

    // Spawn one task per chunk
    // Each task gets its own Arc clone (cheap: just a counter bump)
    let handles: Vec<_> = chunks
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| {
            let settings = Arc::clone(&settings);
            tokio::spawn(async move { check_chunk(index, chunk, &settings).await })
        })
        .collect();

    // Barrier: nothing is aggregated until every chunk is done
    let results = join_all(handles).await;

    // Flatten in chunk order; join_all keeps the order of the handles
    // The outer Result is the JoinError (panic), the inner one check_chunk's
    let mut violations = Vec::new();
    for (index, result) in results.into_iter().enumerate() {
        let chunk_violations = result
            .with_context(|| format!("Worker for chunk {} panicked", index))?
            .with_context(|| format!("Worker for chunk {} failed", index))?;
        violations.extend(chunk_violations);
    }

    Ok(BatchReport {
        violations,
        checked,
        elapsed: started.elapsed(),
    })
}

// One worker: check the chunk's specs strictly in order
async fn check_chunk(
    index: usize,
    chunk: Vec<CheckSpec>,
    settings: &CheckSettings,
) -> Result<Vec<Violation>> {
    // More workers than URLs: skip building clients for nothing
    if chunk.is_empty() {
        debug!("Chunk {} is empty", index);
        return Ok(Vec::new());
    }

    // This worker's own clients, never shared with another chunk
    let checker = Checker::new(settings.clone())?;
    let mut violations = Vec::new();

    // Strictly sequential: the next URL waits for the previous one
    for spec in &chunk {
        match checker.check(spec).await {
            Ok(found) => {
                for violation in &found {
                    debug!(url = violation.url(), "{}", violation);
                }
                violations.extend(found);
            }
            Err(e) => {
                // Report the fault and carry on with the rest of the chunk
                warn!("Could not check {}: {}", spec.url, e);
                violations.push(Violation::Fault {
                    url: spec.url.clone(),
                    cause: e.describe(),
                });
            }
        }
    }

    debug!(
        "Chunk {} finished: {} URL(s), {} violation(s)",
        index,
        chunk.len(),
        violations.len()
    );
    Ok(violations)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. tokio::spawn vs a plain future?
//    - A spawned task can run on another thread of the runtime
//    - That is what makes the chunks run in parallel
//    - Spawned futures must own their data ('static), hence the Arc
//
// 2. What does join_all do?
//    - Waits for every JoinHandle and returns their results in the same
//      order as the handles, no matter which task finished first
//    - That order is what keeps the report deterministic
//
// 3. Why `??` style (two with_context calls)?
//    - JoinHandle::await gives Result<T, JoinError>
//    - T is itself a Result from check_chunk
//    - We unwrap both layers, each with its own message
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Mock, Server, ServerGuard};

    // The mocks are returned so they stay registered for the whole test
    async fn page_server() -> (ServerGuard, Vec<Mock>) {
        let mut server = Server::new_async().await;
        let good = format!(
            r#"<html lang="de"><head><title>Fine</title><link rel="canonical" href="{}/fine"></head></html>"#,
            server.url()
        );
        let mocks = vec![
            server
                .mock("GET", "/fine")
                .with_status(200)
                .with_body(good)
                .create_async()
                .await,
            server
                .mock("GET", "/bare")
                .with_status(200)
                .with_body("<html><head></head><body></body></html>")
                .create_async()
                .await,
            server
                .mock("GET", "/missing")
                .with_status(404)
                .create_async()
                .await,
        ];
        (server, mocks)
    }

    fn specs(base: &str) -> Vec<CheckSpec> {
        vec![
            CheckSpec::new(format!("{}/fine", base), 200, None),
            CheckSpec::new(format!("{}/missing", base), 200, None),
            // Nothing listens on port 1
            CheckSpec::new("http://127.0.0.1:1/down", 200, None),
            CheckSpec::new(format!("{}/bare", base), 200, None),
            CheckSpec::new(format!("{}/missing", base), 404, None),
        ]
    }

    fn describe(report: &BatchReport) -> Vec<String> {
        report.violations.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_empty_batch_is_clean() {
        let report = run_batch(
            Vec::new(),
            Arc::new(CheckSettings::default()),
            10,
            Instant::now(),
        )
        .await
        .unwrap();
        assert!(report.is_clean());
        assert_eq!(report.checked, 0);
    }

    #[tokio::test]
    async fn test_elapsed_time_counts_from_batch_start() {
        // A batch that began five seconds ago (e.g. while reading the input)
        let started = match Instant::now().checked_sub(Duration::from_secs(5)) {
            Some(started) => started,
            // Monotonic clock younger than five seconds, nothing to measure
            None => return,
        };
        let report = run_batch(
            Vec::new(),
            Arc::new(CheckSettings::default()),
            2,
            started,
        )
        .await
        .unwrap();

        assert!(report.elapsed >= Duration::from_secs(5));
        assert!(report.elapsed <= started.elapsed());
    }

    #[tokio::test]
    async fn test_violations_keep_input_order() {
        let (server, _mocks) = page_server().await;
        let report = run_batch(
            specs(&server.url()),
            Arc::new(CheckSettings::default()),
            2,
            Instant::now(),
        )
        .await
        .unwrap();

        assert_eq!(report.checked, 5);
        let urls: Vec<&str> = report.violations.iter().map(|v| v.url()).collect();
        let missing = format!("{}/missing", server.url());
        let bare = format!("{}/bare", server.url());
        assert_eq!(
            urls,
            vec![
                missing.as_str(),
                "http://127.0.0.1:1/down",
                bare.as_str(),
                bare.as_str(),
                bare.as_str(),
                // The 404 was expected, so the rules ran on its empty body
                missing.as_str(),
                missing.as_str(),
                missing.as_str(),
            ]
        );
        assert!(matches!(
            report.violations.last(),
            Some(Violation::MissingTitle { .. })
        ));
    }

    #[tokio::test]
    async fn test_fault_does_not_stop_its_chunk() {
        let (server, _mocks) = page_server().await;
        // One worker: the unreachable URL sits in the middle of the only chunk
        let report = run_batch(
            specs(&server.url()),
            Arc::new(CheckSettings::default()),
            1,
            Instant::now(),
        )
        .await
        .unwrap();

        assert_eq!(report.fault_count(), 1);
        assert!(report.violations[1].is_fault());
        // The /bare page after the fault was still checked
        assert!(report
            .violations
            .iter()
            .any(|v| matches!(v, Violation::MissingTitle { .. })));
    }

    #[tokio::test]
    async fn test_order_is_stable_across_worker_counts() {
        let (server, _mocks) = page_server().await;
        let settings = Arc::new(CheckSettings::default());

        let single = run_batch(
            specs(&server.url()),
            Arc::clone(&settings),
            1,
            Instant::now(),
        )
        .await
        .unwrap();
        let many = run_batch(
            specs(&server.url()),
            Arc::clone(&settings),
            4,
            Instant::now(),
        )
        .await
        .unwrap();
        let more_workers_than_urls = run_batch(
            specs(&server.url()),
            settings,
            12,
            Instant::now(),
        )
        .await
        .unwrap();

        assert_eq!(describe(&single), describe(&many));
        assert_eq!(describe(&single), describe(&more_workers_than_urls));
    }
}
