//! Candidate placements and best-match selection.
//!
//! Candidates are reduced in the order they are produced: scales in request
//! order, and placements in raster order within a scale. A candidate only
//! replaces the running best when its score is strictly greater, so ties
//! resolve to the earliest candidate seen.

use crate::util::{ClickMatchError, ClickMatchResult};

/// A scored placement of the reference inside the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Left edge in screen pixels.
    pub x: usize,
    /// Top edge in screen pixels.
    pub y: usize,
    /// Matcher score, higher is better.
    pub score: f32,
    /// Scale factor of the reference that produced this placement.
    pub scale: f64,
    /// Width of the resized reference.
    pub width: usize,
    /// Height of the resized reference.
    pub height: usize,
}

impl Candidate {
    /// Returns the center of the placement, rounding down.
    pub fn center(&self) -> ClickPoint {
        ClickPoint {
            x: (self.x + self.width / 2) as u32,
            y: (self.y + self.height / 2) as u32,
        }
    }
}

/// Screen coordinate to click at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClickPoint {
    pub x: u32,
    pub y: u32,
}

/// Final decision of a match call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MatchOutcome {
    /// The best candidate reached the confidence threshold.
    Accepted {
        center: ClickPoint,
        score: f32,
        scale: f64,
    },
    /// No candidate reached the threshold.
    ///
    /// `best_score` is `None` when no placement could be scored at all.
    Rejected { best_score: Option<f32> },
}

impl MatchOutcome {
    /// Returns true for `Accepted`.
    pub fn is_accepted(&self) -> bool {
        matches!(self, MatchOutcome::Accepted { .. })
    }

    /// Returns the click point of an accepted match.
    pub fn center(&self) -> Option<ClickPoint> {
        match self {
            MatchOutcome::Accepted { center, .. } => Some(*center),
            MatchOutcome::Rejected { .. } => None,
        }
    }

    /// Returns the best score observed, accepted or not.
    pub fn best_score(&self) -> Option<f32> {
        match self {
            MatchOutcome::Accepted { score, .. } => Some(*score),
            MatchOutcome::Rejected { best_score } => *best_score,
        }
    }

    /// Converts a rejection into `NoMatch`, keeping the best score observed.
    pub fn require(self, confidence: f32) -> ClickMatchResult<ClickPoint> {
        match self {
            MatchOutcome::Accepted { center, .. } => Ok(center),
            MatchOutcome::Rejected { best_score } => Err(ClickMatchError::NoMatch {
                confidence,
                best_score,
            }),
        }
    }
}

/// Running best candidate with first-seen tie-breaking.
#[derive(Clone, Copy, Debug, Default)]
pub struct BestCandidate {
    best: Option<Candidate>,
}

impl BestCandidate {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers a candidate; keeps it only if it beats the current best.
    ///
    /// Returns true when the candidate became the new best.
    pub fn push(&mut self, candidate: Candidate) -> bool {
        let better = match &self.best {
            Some(best) => candidate.score > best.score,
            None => true,
        };
        if better {
            self.best = Some(candidate);
        }
        better
    }

    /// Offers an optional candidate.
    pub fn merge(&mut self, candidate: Option<Candidate>) {
        if let Some(candidate) = candidate {
            self.push(candidate);
        }
    }

    /// Consumes the tracker and returns the best candidate.
    pub fn into_best(self) -> Option<Candidate> {
        self.best
    }

    /// Applies the confidence threshold to the best candidate.
    pub fn into_outcome(self, confidence: f32) -> MatchOutcome {
        match self.best {
            Some(best) if best.score >= confidence => MatchOutcome::Accepted {
                center: best.center(),
                score: best.score,
                scale: best.scale,
            },
            Some(best) => MatchOutcome::Rejected {
                best_score: Some(best.score),
            },
            None => MatchOutcome::Rejected { best_score: None },
        }
    }
}

/// Reduces candidates in iteration order into a single outcome.
pub fn select_best<I>(candidates: I, confidence: f32) -> MatchOutcome
where
    I: IntoIterator<Item = Candidate>,
{
    let mut best = BestCandidate::new();
    for candidate in candidates {
        best.push(candidate);
    }
    best.into_outcome(confidence)
}
