//! Per-call matching options.

use crate::util::{ClickMatchError, ClickMatchResult};
use std::fmt;
use std::str::FromStr;

/// Scales searched when none are given.
pub const DEFAULT_SCALES: [f64; 6] = [1.0, 0.9, 0.8, 0.7, 0.6, 0.5];

/// Confidence threshold used when none is given.
pub const DEFAULT_CONFIDENCE: f32 = 0.7;

/// Which engine a call should run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EngineSelector {
    /// Correlation only; fails when it is not available.
    Primary,
    /// Pixel difference only; always available.
    Fallback,
    /// Correlation when available, pixel difference otherwise.
    #[default]
    Auto,
}

impl EngineSelector {
    /// Returns a stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineSelector::Primary => "primary",
            EngineSelector::Fallback => "fallback",
            EngineSelector::Auto => "auto",
        }
    }
}

impl fmt::Display for EngineSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineSelector {
    type Err = ClickMatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" => Ok(EngineSelector::Primary),
            "fallback" => Ok(EngineSelector::Fallback),
            "auto" => Ok(EngineSelector::Auto),
            _ => Err(ClickMatchError::InvalidInput(
                "engine must be one of primary, fallback, auto",
            )),
        }
    }
}

/// Options for a single match call.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchOptions {
    /// Minimum accepted score, within `[0, 1]`.
    pub confidence: f32,
    /// Scale factors applied to the reference, searched in order.
    pub scales: Vec<f64>,
    /// Engine selection policy.
    pub engine: EngineSelector,
    /// Scan placement rows in parallel when the `rayon` feature is enabled.
    pub parallel: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            confidence: DEFAULT_CONFIDENCE,
            scales: DEFAULT_SCALES.to_vec(),
            engine: EngineSelector::Auto,
            parallel: false,
        }
    }
}

impl MatchOptions {
    /// Sets the confidence threshold.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    /// Replaces the scale set.
    pub fn with_scales(mut self, scales: impl Into<Vec<f64>>) -> Self {
        self.scales = scales.into();
        self
    }

    /// Sets the engine selector.
    pub fn with_engine(mut self, engine: EngineSelector) -> Self {
        self.engine = engine;
        self
    }

    /// Enables or disables row-parallel scans.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Checks that the options describe a runnable search.
    pub fn validate(&self) -> ClickMatchResult<()> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(ClickMatchError::InvalidInput(
                "confidence must be within [0, 1]",
            ));
        }
        Ok(())
    }
}
