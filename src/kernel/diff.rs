//! Brute-force pixel-difference matching.
//!
//! Every placement of the reference inside the screen is compared pixel by
//! pixel in RGBA. A pixel differs when any channel differs by more than
//! `floor((1 - confidence) * 255)`, and a placement scores
//! `1 - differing / (width * height)` over the reference-sized window only.
//!
//! Cost is `O(placements · reference pixels)` per scale. Within a row of
//! placements, counting stops as soon as a placement can no longer beat the
//! row's best, which leaves the winner and its score unchanged.

use crate::candidate::Candidate;
use crate::image::RawImage;
use crate::kernel::{scan_rows, EngineKind, Matcher, ScanParams};
use crate::scale::ScaleSpace;
use crate::trace::{trace_detail, trace_span};
use crate::util::ClickMatchResult;

const CHANNELS: usize = 4;

/// Slack added before flooring the tolerance. An `f32` confidence such as
/// `0.6` widens to slightly more than its decimal value, which would
/// otherwise floor one step low.
const THRESHOLD_SLACK: f64 = 1e-4;

/// Per-channel tolerance derived from a confidence threshold.
pub fn channel_threshold(confidence: f32) -> u8 {
    ((1.0 - f64::from(confidence)) * 255.0 + THRESHOLD_SLACK)
        .floor()
        .clamp(0.0, 255.0) as u8
}

/// Returns true when any channel differs by more than `threshold`.
pub fn pixels_differ(a: &[u8], b: &[u8], threshold: u8) -> bool {
    a.iter().zip(b).any(|(&ca, &cb)| ca.abs_diff(cb) > threshold)
}

/// Counts differing pixels of the window at `(x, y)`.
///
/// Returns `None` as soon as the count reaches `limit`; a returned count is
/// always strictly below it.
fn count_differing(
    screen: &RawImage,
    reference: &RawImage,
    x: usize,
    y: usize,
    threshold: u8,
    limit: usize,
) -> Option<usize> {
    let row_len = reference.width() * CHANNELS;
    let stride = screen.width() * CHANNELS;
    let screen_data = screen.as_slice();
    let mut count = 0usize;

    for (ty, ref_row) in reference.as_slice().chunks_exact(row_len).enumerate() {
        let start = (y + ty) * stride + x * CHANNELS;
        let screen_row = &screen_data[start..start + row_len];
        for (s_px, r_px) in screen_row
            .chunks_exact(CHANNELS)
            .zip(ref_row.chunks_exact(CHANNELS))
        {
            if pixels_differ(s_px, r_px, threshold) {
                count += 1;
                if count >= limit {
                    return None;
                }
            }
        }
    }

    (count < limit).then_some(count)
}

/// Best `(x, differing)` in placement row `y`, earliest on ties.
fn best_in_row(
    screen: &RawImage,
    reference: &RawImage,
    y: usize,
    threshold: u8,
) -> Option<(usize, usize)> {
    let max_x = screen.width() - reference.width();
    let mut best: Option<(usize, usize)> = None;
    for x in 0..=max_x {
        let limit = best.map_or(usize::MAX, |(_, count)| count);
        if let Some(count) = count_differing(screen, reference, x, y, threshold, limit) {
            best = Some((x, count));
        }
    }
    best
}

/// Finds the best placement of `reference` inside `screen`.
///
/// Both images are compared in RGBA. Returns `None` when the reference does
/// not fit.
pub fn best_placement(
    screen: &RawImage,
    reference: &RawImage,
    confidence: f32,
    scale: f64,
    parallel: bool,
) -> Option<Candidate> {
    let (ref_width, ref_height) = reference.dimensions();
    if ref_width > screen.width() || ref_height > screen.height() {
        return None;
    }
    let threshold = channel_threshold(confidence);
    let max_y = screen.height() - ref_height;
    let screen = screen.as_rgba();
    let reference = reference.as_rgba();

    let rows = scan_rows(max_y + 1, parallel, |y| {
        best_in_row(&screen, &reference, y, threshold)
    });

    let mut best: Option<(usize, usize, usize)> = None;
    for (y, row_best) in rows.into_iter().enumerate() {
        if let Some((x, count)) = row_best {
            if best.map_or(true, |(_, _, best_count)| count < best_count) {
                best = Some((x, y, count));
            }
        }
    }

    let area = (ref_width * ref_height) as f64;
    best.map(|(x, y, count)| Candidate {
        x,
        y,
        score: (1.0 - count as f64 / area) as f32,
        scale,
        width: ref_width,
        height: ref_height,
    })
}

/// Fallback engine: sliding-window pixel difference, no native dependency.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiffMatcher;

impl DiffMatcher {
    /// Creates the matcher.
    pub fn new() -> Self {
        Self
    }
}

impl Matcher for DiffMatcher {
    fn kind(&self) -> EngineKind {
        EngineKind::Diff
    }

    fn search(
        &self,
        screen: &RawImage,
        space: &ScaleSpace,
        params: ScanParams,
    ) -> ClickMatchResult<Vec<Candidate>> {
        let _span = trace_span!("diff_search", levels = space.levels().len()).entered();

        let screen = screen.as_rgba();
        let mut out = Vec::with_capacity(space.levels().len());
        for level in space.levels() {
            let reference = level.image().as_rgba();
            let found = best_placement(
                &screen,
                &reference,
                params.confidence,
                level.scale(),
                params.parallel,
            );
            if let Some(candidate) = found {
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

#[cfg(test)]
mod tests {
    use super::{best_placement, channel_threshold, count_differing, pixels_differ};
    use crate::image::RawImage;

    #[test]
    fn threshold_floors_the_looseness() {
        assert_eq!(channel_threshold(1.0), 0);
        assert_eq!(channel_threshold(0.7), 76);
        assert_eq!(channel_threshold(0.5), 127);
        assert_eq!(channel_threshold(0.0), 255);
    }

    #[test]
    fn threshold_follows_decimal_confidence() {
        assert_eq!(channel_threshold(0.6), 102);
        assert_eq!(channel_threshold(0.2), 204);
        assert_eq!(channel_threshold(0.9), 25);
        assert_eq!(channel_threshold(0.95), 12);
        assert_eq!(channel_threshold(0.8), 51);
    }

    #[test]
    fn difference_at_tolerance_still_matches() {
        let screen = RawImage::filled(2, 2, &[10, 20, 30, 255]).unwrap();
        let reference = RawImage::filled(2, 2, &[112, 122, 132, 255]).unwrap();
        let best = best_placement(&screen, &reference, 0.6, 1.0, false).unwrap();
        assert_eq!(best.score, 1.0);

        let best = best_placement(&screen, &reference, 0.61, 1.0, false).unwrap();
        assert_eq!(best.score, 0.0);
    }

    #[test]
    fn any_channel_over_threshold_differs() {
        assert!(!pixels_differ(&[10, 10, 10, 255], &[20, 0, 15, 255], 10));
        assert!(pixels_differ(&[10, 10, 10, 255], &[21, 10, 10, 255], 10));
        assert!(pixels_differ(&[10, 10, 10, 255], &[10, 10, 10, 0], 10));
    }

    #[test]
    fn count_stops_at_limit() {
        let screen = RawImage::filled(4, 4, &[0, 0, 0, 255]).unwrap();
        let reference = RawImage::filled(2, 2, &[255, 255, 255, 255]).unwrap();
        assert_eq!(count_differing(&screen, &reference, 0, 0, 0, usize::MAX), Some(4));
        assert_eq!(count_differing(&screen, &reference, 0, 0, 0, 4), None);
        assert_eq!(count_differing(&screen, &reference, 0, 0, 0, 0), None);
    }

    #[test]
    fn score_is_windowed_ratio() {
        let mut screen = RawImage::filled(6, 3, &[0, 0, 0, 255]).unwrap().into_raw();
        // Three of the four pixels of the 2x2 window at (3, 1) are white.
        for (x, y) in [(3, 1), (4, 1), (3, 2)] {
            let idx = (y * 6 + x) * 4;
            screen[idx..idx + 3].copy_from_slice(&[255, 255, 255]);
        }
        let screen = RawImage::from_rgba(screen, 6, 3).unwrap();
        let reference = RawImage::filled(2, 2, &[255, 255, 255, 255]).unwrap();

        let best = best_placement(&screen, &reference, 1.0, 1.0, false).unwrap();
        assert_eq!((best.x, best.y), (3, 1));
        assert_eq!(best.score, 0.75);
    }

    #[test]
    fn ties_resolve_to_first_in_raster_order() {
        let screen = RawImage::filled(5, 5, &[7, 7, 7, 255]).unwrap();
        let reference = RawImage::filled(2, 2, &[7, 7, 7, 255]).unwrap();
        let best = best_placement(&screen, &reference, 0.9, 1.0, false).unwrap();
        assert_eq!((best.x, best.y, best.score), (0, 0, 1.0));
    }

    #[test]
    fn oversized_reference_has_no_placement() {
        let screen = RawImage::filled(5, 5, &[0, 0, 0, 255]).unwrap();
        let reference = RawImage::filled(5, 6, &[0, 0, 0, 255]).unwrap();
        assert!(best_placement(&screen, &reference, 0.7, 1.0, false).is_none());
    }
}
