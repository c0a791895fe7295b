#![cfg(feature = "rayon")]

use clickmatch::{EngineSelector, MatchEngine, MatchOptions, RawImage};

fn make_image(width: usize, height: usize, seed: usize) -> RawImage {
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            let value = ((x * 11 + seed) ^ (y * 3) ^ (x * y)) & 0xFF;
            data.extend_from_slice(&[value as u8, (value as u8).wrapping_mul(7), (x + y) as u8]);
        }
    }
    RawImage::new(data, width, height, 3).unwrap()
}

fn assert_parallel_matches_sequential(selector: EngineSelector) {
    let screen = make_image(72, 54, 0);
    let engine = MatchEngine::probe();

    let references = [
        screen.crop(31, 17, 16, 12).unwrap(),
        make_image(14, 10, 5),
        make_image(90, 10, 1),
    ];
    for reference in &references {
        for confidence in [0.6, 0.9] {
            let sequential = MatchOptions::default()
                .with_engine(selector)
                .with_confidence(confidence)
                .with_scales([1.0, 0.8, 0.6]);
            let parallel = sequential.clone().with_parallel(true);

            let a = engine.match_image(&screen, reference, &sequential).unwrap();
            let b = engine.match_image(&screen, reference, &parallel).unwrap();
            assert_eq!(a, b, "engine {selector} confidence {confidence}");
        }
    }
}

#[cfg(feature = "correlation")]
#[test]
fn parallel_matches_sequential_correlation() {
    assert_parallel_matches_sequential(EngineSelector::Primary);
}

#[test]
fn parallel_matches_sequential_diff() {
    assert_parallel_matches_sequential(EngineSelector::Fallback);
}
