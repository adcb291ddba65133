// src/input/mod.rs
// =============================================================================
// This module holds the input side of a batch: the CheckSpec record and the
// reader that builds CheckSpecs from the comma-delimited input table.
// =============================================================================

mod model;
mod table;

pub use model::{CheckMode, CheckSpec};
pub use table::read_check_specs;
