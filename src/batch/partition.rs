// src/batch/partition.rs
// =============================================================================
// Splits the spec list into one contiguous chunk per worker.
//
// Chunk i covers [round(N/W * i), round(N/W * (i+1))). Rounding is half to
// even on the exact fraction N*i/W, so the boundaries never drift with
// floating point error. Consequences:
// - concatenating the chunks in order gives back the input exactly
// - chunk sizes differ by at most one
// - with fewer items than workers some chunks are empty
// =============================================================================

use std::ops::Range;

/// Index ranges of the `workers` chunks for a list of `len` items.
///
/// `workers` must be at least 1.
pub fn partition_bounds(len: usize, workers: usize) -> Vec<Range<usize>> {
    assert!(workers > 0, "cannot partition across zero workers");

    (0..workers)
        .map(|i| boundary(len, workers, i)..boundary(len, workers, i + 1))
        .collect()
}

/// Moves `items` into `workers` contiguous chunks, keeping their order.
pub fn partition<T>(items: Vec<T>, workers: usize) -> Vec<Vec<T>> {
    let bounds = partition_bounds(items.len(), workers);
    let mut items = items.into_iter();

    bounds
        .into_iter()
        .map(|range| items.by_ref().take(range.len()).collect())
        .collect()
}

// round(len * i / workers), ties to even
fn boundary(len: usize, workers: usize, i: usize) -> usize {
    let numerator = len * i;
    let quotient = numerator / workers;
    let twice_remainder = 2 * (numerator % workers);

    if twice_remainder > workers || (twice_remainder == workers && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why integers instead of (len as f64 / workers as f64 * i).round()?
//    - The exact fraction never lands "just below" a .5 because of float
//      error, so boundaries are the same on every platform
//
// 2. What does items.by_ref().take(n) do?
//    - by_ref() borrows the iterator instead of consuming it
//    - take(n) pulls the next n items, the rest stay for the next chunk
//    - So every item is moved exactly once, no cloning
// -----------------------------------------------------------------------------
