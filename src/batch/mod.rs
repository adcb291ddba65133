// src/batch/mod.rs
// =============================================================================
// This module runs a whole batch of CheckSpecs.
//
// - partition: splits the specs into one static chunk per worker
// - pool: runs the chunks concurrently and aggregates their violations
// =============================================================================

mod partition;
mod pool;

pub use pool::{run_batch, BatchReport};
