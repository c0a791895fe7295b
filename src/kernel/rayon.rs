//! Rayon-parallel row scans (feature-gated).
//!
//! Rows are evaluated independently and collected back in row order, so
//! merging the results sequentially reproduces the raster-order tie-break
//! of the sequential scan exactly.

use rayon::prelude::*;

/// Evaluates `scan_row` for rows `0..rows` on the rayon pool.
pub(crate) fn scan_rows_par<T, F>(rows: usize, scan_row: F) -> Vec<Option<T>>
where
    T: Send,
    F: Fn(usize) -> Option<T> + Sync + Send,
{
    (0..rows).into_par_iter().map(scan_row).collect()
}
