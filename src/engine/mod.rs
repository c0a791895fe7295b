//! Matching facade: engine selection, scale loop, and final decision.
//!
//! Whether the correlation engine can run is decided once, when the engine
//! is built, from an injected [`Capability`]. Each call then resolves its
//! [`EngineSelector`] against that capability, runs the chosen matcher over
//! the whole scale space in a single pass, and reduces the per-scale
//! candidates to one [`MatchOutcome`]. Nothing is retried or cached.

mod options;

pub use options::{EngineSelector, MatchOptions, DEFAULT_CONFIDENCE, DEFAULT_SCALES};

use crate::candidate::{select_best, MatchOutcome};
use crate::image::RawImage;
#[cfg(feature = "correlation")]
use crate::kernel::CorrelationMatcher;
use crate::kernel::{DiffMatcher, EngineKind, Matcher, ScanParams};
use crate::scale::ScaleSpace;
use crate::trace::{trace_event, trace_span};
use crate::util::{ClickMatchError, ClickMatchResult};

/// Whether the correlation engine may be used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// The correlation engine is present.
    Available,
    /// Only the pixel-difference engine may run.
    Unavailable,
}

impl Capability {
    /// Reports what this build supports.
    ///
    /// The correlation engine is present when the `correlation` feature is
    /// compiled in.
    pub fn probe() -> Self {
        if cfg!(feature = "correlation") {
            Capability::Available
        } else {
            Capability::Unavailable
        }
    }
}

/// Template matching facade.
#[derive(Clone, Debug)]
pub struct MatchEngine {
    #[cfg(feature = "correlation")]
    correlation: Option<CorrelationMatcher>,
    diff: DiffMatcher,
}

impl MatchEngine {
    /// Builds an engine with an explicit capability.
    ///
    /// `Capability::Available` has no effect in builds without the
    /// `correlation` feature.
    pub fn new(capability: Capability) -> Self {
        #[cfg(not(feature = "correlation"))]
        let _ = capability;
        Self {
            #[cfg(feature = "correlation")]
            correlation: (capability == Capability::Available).then(CorrelationMatcher::new),
            diff: DiffMatcher::new(),
        }
    }

    /// Builds an engine with the capability of this build.
    pub fn probe() -> Self {
        Self::new(Capability::probe())
    }

    /// Returns the capability the engine was built with.
    pub fn capability(&self) -> Capability {
        if self.primary().is_some() {
            Capability::Available
        } else {
            Capability::Unavailable
        }
    }

    fn primary(&self) -> Option<&dyn Matcher> {
        #[cfg(feature = "correlation")]
        {
            self.correlation.as_ref().map(|m| m as &dyn Matcher)
        }
        #[cfg(not(feature = "correlation"))]
        {
            None
        }
    }

    /// Picks the matcher for `selector`.
    ///
    /// Only `Primary` can fail, with `CapabilityUnavailable`. `Auto` falls
    /// back to the pixel-difference engine silently.
    pub fn resolve(&self, selector: EngineSelector) -> ClickMatchResult<&dyn Matcher> {
        let matcher = match selector {
            EngineSelector::Primary => self
                .primary()
                .ok_or(ClickMatchError::CapabilityUnavailable)?,
            EngineSelector::Fallback => &self.diff as &dyn Matcher,
            EngineSelector::Auto => self.primary().unwrap_or(&self.diff as &dyn Matcher),
        };
        trace_event!(
            "engine_selected",
            selector = selector.as_str(),
            engine = matcher.kind().as_str()
        );
        Ok(matcher)
    }

    /// Returns the engine `selector` would run, without running it.
    pub fn engine_for(&self, selector: EngineSelector) -> ClickMatchResult<EngineKind> {
        self.resolve(selector).map(|matcher| matcher.kind())
    }

    /// Locates `reference` inside `screen`.
    pub fn match_image(
        &self,
        screen: &RawImage,
        reference: &RawImage,
        options: &MatchOptions,
    ) -> ClickMatchResult<MatchOutcome> {
        options.validate()?;
        let matcher = self.resolve(options.engine)?;
        let _span = trace_span!(
            "match_image",
            engine = matcher.kind().as_str(),
            screen_width = screen.width(),
            screen_height = screen.height()
        )
        .entered();

        let space = ScaleSpace::build(reference, &options.scales, screen.width(), screen.height())?;
        let params = ScanParams {
            confidence: options.confidence,
            parallel: options.parallel,
        };
        let candidates = matcher.search(screen, &space, params)?;
        let outcome = select_best(candidates, options.confidence);

        trace_event!(
            "match_outcome",
            accepted = outcome.is_accepted(),
            best_score = outcome.best_score().unwrap_or(f32::NAN)
        );
        Ok(outcome)
    }

    /// Loads the reference from `reference_path` and locates it in `screen`.
    ///
    /// A path that does not resolve to a file fails with `ReferenceNotFound`
    /// before any matching work.
    #[cfg(feature = "image-io")]
    pub fn match_path<P: AsRef<std::path::Path>>(
        &self,
        screen: &RawImage,
        reference_path: P,
        options: &MatchOptions,
    ) -> ClickMatchResult<MatchOutcome> {
        let reference = crate::image::io::load_reference(reference_path)?;
        self.match_image(screen, &reference, options)
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::probe()
    }
}
