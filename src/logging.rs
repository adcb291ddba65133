// src/logging.rs
// =============================================================================
// Logging setup.
//
// Logs go to stderr so stdout only ever carries the report. RUST_LOG wins
// over the defaults below when it is set.
// =============================================================================

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// By default every URL is logged before it is requested; `verbose` adds
/// per-chunk and per-page detail.
pub fn init_logging(verbose: bool) -> Result<()> {
    let default_filter = if verbose {
        "warn,route_guardian=debug"
    } else {
        "warn,route_guardian=info"
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    tracing::debug!("route-guardian logging initialized");
    Ok(())
}
