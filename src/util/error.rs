//! Error types for clickmatch.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for clickmatch operations.
pub type Result<T> = std::result::Result<T, ClickMatchError>;

/// Errors surfaced by the matching engine and the click flow.
///
/// Scales or placements that do not fit the screen are never reported here;
/// they are dropped from the search space instead.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ClickMatchError {
    /// The correlation engine was requested explicitly but is not available.
    #[error("correlation engine requested but not available")]
    CapabilityUnavailable,
    /// The reference image path does not resolve to a file.
    #[error("reference image not found at path: {}", .path.display())]
    ReferenceNotFound { path: PathBuf },
    /// Matching finished but no candidate reached the confidence threshold.
    #[error(
        "no matching image found with confidence >= {confidence:.2}, best match: {}",
        format_best(.best_score)
    )]
    NoMatch {
        confidence: f32,
        best_score: Option<f32>,
    },
    /// Image dimensions are zero or inconsistent with the buffer.
    #[error("invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Provided buffer is too small for the requested dimensions.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Image decoding or file access failed.
    #[error("image I/O failed: {reason}")]
    ImageIo { reason: String },
    /// The host failed to capture the screen or dispatch a click.
    #[error("host action failed: {reason}")]
    Host { reason: String },
}

fn format_best(best_score: &Option<f32>) -> String {
    match best_score {
        Some(score) => format!("{score:.2}"),
        None => "none".to_string(),
    }
}
