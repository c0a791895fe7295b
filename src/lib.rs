//! clickmatch locates a reference image inside a captured screen so UI
//! automation can click on content that has no structural selector.
//!
//! Two engines share one contract: a normalized-correlation search on
//! grayscale intensities (feature `correlation`, on by default) and a
//! portable pixel-difference sliding window. Both scan every scale of the
//! reference and report the best placement; [`MatchEngine`] picks the engine
//! and applies the confidence threshold. Row-parallel scans are available
//! via the `rayon` feature, and PNG/JPEG decoding plus the click flow via
//! `image-io`.

pub mod candidate;
#[cfg(feature = "image-io")]
pub mod click;
pub mod engine;
pub mod image;
pub mod kernel;
pub mod scale;
mod trace;
pub mod util;

pub use candidate::{select_best, BestCandidate, Candidate, ClickPoint, MatchOutcome};
#[cfg(feature = "image-io")]
pub use click::{click_by_matching_image, ScreenHost};
pub use engine::{
    Capability, EngineSelector, MatchEngine, MatchOptions, DEFAULT_CONFIDENCE, DEFAULT_SCALES,
};
pub use image::{LumaImage, RawImage};
#[cfg(feature = "correlation")]
pub use kernel::CorrelationMatcher;
pub use kernel::{DiffMatcher, EngineKind, Matcher, ScanParams};
pub use scale::{Exclusion, ScaleSpace, ScaledReference};
pub use util::{ClickMatchError, ClickMatchResult};
