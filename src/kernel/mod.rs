//! Matching engines.
//!
//! Both engines implement [`Matcher`]: given a screen and a prepared scale
//! space they return at most one candidate per scale, in scale order. The
//! per-scale candidate is the best placement in raster order with
//! first-seen tie-breaking.

use crate::candidate::Candidate;
use crate::image::RawImage;
use crate::scale::ScaleSpace;
use crate::util::ClickMatchResult;
use std::fmt;

#[cfg(feature = "correlation")]
pub mod correlation;
pub mod diff;

#[cfg(feature = "rayon")]
pub(crate) mod rayon;

#[cfg(feature = "correlation")]
pub use correlation::CorrelationMatcher;
pub use diff::DiffMatcher;

/// Identifies a matching engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EngineKind {
    /// Normalized cross-correlation on grayscale intensities.
    Correlation,
    /// Per-pixel difference ratio on RGBA samples.
    Diff,
}

impl EngineKind {
    /// Returns a stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Correlation => "correlation",
            EngineKind::Diff => "diff",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-call scan configuration.
#[derive(Clone, Copy, Debug)]
pub struct ScanParams {
    /// Confidence threshold of the call. The diff engine derives its
    /// per-channel tolerance from it.
    pub confidence: f32,
    /// Scan placement rows in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

/// A template matching strategy.
pub trait Matcher: Send + Sync {
    /// Returns which engine this is.
    fn kind(&self) -> EngineKind;

    /// Searches every level of `space` inside `screen`.
    ///
    /// Returns one candidate per level that has at least one valid
    /// placement, in level order.
    fn search(
        &self,
        screen: &RawImage,
        space: &ScaleSpace,
        params: ScanParams,
    ) -> ClickMatchResult<Vec<Candidate>>;
}

/// Evaluates `scan_row` for rows `0..rows`, sequentially or in parallel,
/// returning the per-row results in row order.
#[cfg(feature = "rayon")]
pub(crate) fn scan_rows<T, F>(rows: usize, parallel: bool, scan_row: F) -> Vec<Option<T>>
where
    T: Send,
    F: Fn(usize) -> Option<T> + Sync + Send,
{
    if parallel {
        self::rayon::scan_rows_par(rows, scan_row)
    } else {
        (0..rows).map(scan_row).collect()
    }
}

#[cfg(not(feature = "rayon"))]
pub(crate) fn scan_rows<T, F>(rows: usize, _parallel: bool, scan_row: F) -> Vec<Option<T>>
where
    F: Fn(usize) -> Option<T>,
{
    (0..rows).map(scan_row).collect()
}
