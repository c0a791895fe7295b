//! Zero-mean normalized cross-correlation on grayscale intensities.
//!
//! For a template `T` and an equally sized screen window `I` of `n` pixels:
//!
//! ```text
//! num   = n * Σ(T·I) - ΣT · ΣI
//! var_t = n * Σ(T²) - (ΣT)²
//! var_i = n * Σ(I²) - (ΣI)²
//! score = num / sqrt(var_t · var_i)
//! ```
//!
//! All sums are exact integers: window sums come from summed-area tables and
//! the dot product is accumulated in `u64`. A perfect correlation is
//! recognised exactly and reported as `1.0`, so an identical sub-region passes
//! any threshold up to and including `1.0`.
//!
//! Correlation is undefined when either side has zero variance. A flat
//! template scores `1.0` on a flat window of the same intensity and `0.0`
//! anywhere else; a flat window under a textured template scores `0.0`.

use crate::candidate::{BestCandidate, Candidate};
use crate::image::luma::SummedArea;
use crate::image::{LumaImage, RawImage};
use crate::kernel::{scan_rows, EngineKind, Matcher, ScanParams};
use crate::scale::ScaleSpace;
use crate::trace::{trace_detail, trace_span};
use crate::util::ClickMatchResult;

/// Precomputed template statistics for correlation scans.
pub struct CorrelationPlan {
    luma: LumaImage,
    count: i128,
    sum: u64,
    var: i128,
}

impl CorrelationPlan {
    /// Builds a plan from a (resized) reference image.
    pub fn new(reference: &RawImage) -> Self {
        let luma = reference.to_luma();
        let (sum, sum_sq) = luma.moments();
        let count = (luma.width() * luma.height()) as i128;
        let var = count * i128::from(sum_sq) - i128::from(sum) * i128::from(sum);
        Self {
            luma,
            count,
            sum,
            var,
        }
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.luma.width()
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.luma.height()
    }

    /// Returns true when every template pixel has the same intensity.
    pub fn is_flat(&self) -> bool {
        self.var == 0
    }
}

/// Grayscale screen with its summed-area tables.
pub struct CorrelationScreen {
    luma: LumaImage,
    table: SummedArea,
}

impl CorrelationScreen {
    /// Converts the screen once for all scales.
    pub fn new(screen: &RawImage) -> Self {
        let luma = screen.to_luma();
        let table = SummedArea::new(&luma);
        Self { luma, table }
    }

    /// Returns the screen width in pixels.
    pub fn width(&self) -> usize {
        self.luma.width()
    }

    /// Returns the screen height in pixels.
    pub fn height(&self) -> usize {
        self.luma.height()
    }

    fn dot_at(&self, plan: &CorrelationPlan, x: usize, y: usize) -> u64 {
        let width = plan.width();
        let screen = self.luma.as_slice();
        let stride = self.luma.width();
        let mut dot = 0u64;
        for (ty, tpl_row) in plan.luma.as_slice().chunks_exact(width).enumerate() {
            let start = (y + ty) * stride + x;
            let img_row = &screen[start..start + width];
            dot += tpl_row
                .iter()
                .zip(img_row)
                .map(|(&t, &i)| u64::from(t) * u64::from(i))
                .sum::<u64>();
        }
        dot
    }

    /// Scores the placement of `plan` with top-left corner `(x, y)`.
    ///
    /// The caller guarantees the placement lies inside the screen.
    pub fn score_at(&self, plan: &CorrelationPlan, x: usize, y: usize) -> f32 {
        let (sum_i, sum_sq_i) = self.table.window(x, y, plan.width(), plan.height());
        let sum_i_wide = i128::from(sum_i);
        let var_i = plan.count * i128::from(sum_sq_i) - sum_i_wide * sum_i_wide;

        if plan.is_flat() {
            return if var_i == 0 && sum_i == plan.sum {
                1.0
            } else {
                0.0
            };
        }
        if var_i == 0 {
            return 0.0;
        }

        let dot = i128::from(self.dot_at(plan, x, y));
        let num = plan.count * dot - i128::from(plan.sum) * sum_i_wide;
        if num > 0 {
            let exact = num
                .checked_mul(num)
                .zip(plan.var.checked_mul(var_i))
                .is_some_and(|(lhs, rhs)| lhs == rhs);
            if exact {
                return 1.0;
            }
        }

        let denom = (plan.var as f64).sqrt() * (var_i as f64).sqrt();
        (num as f64 / denom).clamp(-1.0, 1.0) as f32
    }

    /// Finds the best placement of one template, or `None` if it does not fit.
    pub fn best_placement(
        &self,
        plan: &CorrelationPlan,
        scale: f64,
        parallel: bool,
    ) -> Option<Candidate> {
        let (tpl_width, tpl_height) = (plan.width(), plan.height());
        if tpl_width > self.width() || tpl_height > self.height() {
            return None;
        }
        let max_x = self.width() - tpl_width;
        let max_y = self.height() - tpl_height;

        let rows = scan_rows(max_y + 1, parallel, |y| {
            let mut row_best = BestCandidate::new();
            for x in 0..=max_x {
                row_best.push(Candidate {
                    x,
                    y,
                    score: self.score_at(plan, x, y),
                    scale,
                    width: tpl_width,
                    height: tpl_height,
                });
            }
            row_best.into_best()
        });

        let mut best = BestCandidate::new();
        for row_best in rows {
            best.merge(row_best);
        }
        best.into_best()
    }
}

/// Primary engine: normalized cross-correlation across the scale space.
#[derive(Clone, Copy, Debug, Default)]
pub struct CorrelationMatcher;

impl CorrelationMatcher {
    /// Creates the matcher.
    pub fn new() -> Self {
        Self
    }
}

impl Matcher for CorrelationMatcher {
    fn kind(&self) -> EngineKind {
        EngineKind::Correlation
    }

    fn search(
        &self,
        screen: &RawImage,
        space: &ScaleSpace,
        params: ScanParams,
    ) -> ClickMatchResult<Vec<Candidate>> {
        let _span = trace_span!("correlation_search", levels = space.levels().len()).entered();

        let prepared = CorrelationScreen::new(screen);
        let mut out = Vec::with_capacity(space.levels().len());
        for level in space.levels() {
            let plan = CorrelationPlan::new(level.image());
            if let Some(candidate) = prepared.best_placement(&plan, level.scale(), params.parallel)
            {
                trace_detail!(
                    "scale_best",
                    scale = candidate.scale,
                    x = candidate.x,
                    y = candidate.y,
                    score = candidate.score
                );
                out.push(candidate);
            }
        }
        Ok(out)
    }
}
