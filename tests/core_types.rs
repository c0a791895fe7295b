use clickmatch::scale::resize_bilinear;
use clickmatch::{
    Capability, ClickMatchError, ClickPoint, EngineKind, EngineSelector, Exclusion, MatchEngine,
    MatchOptions, MatchOutcome, RawImage, ScaleSpace,
};

#[test]
fn raw_image_rejects_invalid_dimensions() {
    let err = RawImage::new(Vec::new(), 0, 3, 1).unwrap_err();
    assert_eq!(
        err,
        ClickMatchError::InvalidDimensions {
            width: 0,
            height: 3,
        }
    );

    let err = RawImage::filled(3, 0, &[0, 0, 0]).unwrap_err();
    assert_eq!(
        err,
        ClickMatchError::InvalidDimensions {
            width: 3,
            height: 0,
        }
    );
}

#[test]
fn raw_image_rejects_small_buffer_and_bad_channels() {
    let err = RawImage::from_rgba(vec![0u8; 15], 2, 2).unwrap_err();
    assert_eq!(err, ClickMatchError::BufferTooSmall { needed: 16, got: 15 });

    let err = RawImage::new(vec![0u8; 5], 1, 1, 5).unwrap_err();
    assert!(matches!(err, ClickMatchError::InvalidInput(_)));
}

#[test]
fn rgba_conversion_expands_every_layout() {
    let gray = RawImage::new(vec![10, 20], 2, 1, 1).unwrap();
    assert_eq!(gray.to_rgba().as_slice(), &[10, 10, 10, 255, 20, 20, 20, 255]);

    let gray_alpha = RawImage::new(vec![10, 128], 1, 1, 2).unwrap();
    assert_eq!(gray_alpha.to_rgba().as_slice(), &[10, 10, 10, 128]);

    let rgb = RawImage::new(vec![1, 2, 3], 1, 1, 3).unwrap();
    assert_eq!(rgb.to_rgba().as_slice(), &[1, 2, 3, 255]);
    assert_eq!(rgb.to_rgba().channels(), 4);
}

#[test]
fn crop_and_pixel_access_agree() {
    let data: Vec<u8> = (0u8..24).collect();
    let img = RawImage::new(data, 4, 2, 3).unwrap();
    assert_eq!(img.pixel(1, 1).unwrap(), &[15, 16, 17]);
    assert!(img.pixel(4, 0).is_none());

    let crop = img.crop(1, 1, 2, 1).unwrap();
    assert_eq!(crop.as_slice(), &[15, 16, 17, 18, 19, 20]);
    assert!(img.crop(3, 0, 2, 1).is_err());
}

#[test]
fn resize_halves_constant_image_exactly() {
    let img = RawImage::filled(8, 6, &[40, 80, 120, 255]).unwrap();
    let half = resize_bilinear(&img, 4, 3).unwrap();
    assert_eq!(half, RawImage::filled(4, 3, &[40, 80, 120, 255]).unwrap());
    assert_eq!(resize_bilinear(&img, 8, 6).unwrap(), img);
}

#[test]
fn scale_space_floors_and_excludes() {
    let reference = RawImage::filled(30, 30, &[200]).unwrap();
    let space = ScaleSpace::build(&reference, &[1.0, 0.9, 0.7, 0.02], 25, 25).unwrap();

    let dims: Vec<_> = space
        .levels()
        .iter()
        .map(|l| (l.scale(), l.image().dimensions()))
        .collect();
    assert_eq!(dims, vec![(0.7, (21, 21))]);
    assert_eq!(
        space.excluded(),
        &[
            (1.0, Exclusion::ExceedsScreen),
            (0.9, Exclusion::ExceedsScreen),
            (0.02, Exclusion::ZeroSize),
        ]
    );
}

#[test]
fn outcome_require_maps_rejection_to_no_match() {
    let accepted = MatchOutcome::Accepted {
        center: ClickPoint { x: 4, y: 9 },
        score: 0.93,
        scale: 0.8,
    };
    assert_eq!(accepted.require(0.9), Ok(ClickPoint { x: 4, y: 9 }));

    let rejected = MatchOutcome::Rejected {
        best_score: Some(0.42),
    };
    let err = rejected.require(0.9).unwrap_err();
    assert_eq!(
        err.to_string(),
        "no matching image found with confidence >= 0.90, best match: 0.42"
    );
}

#[test]
fn capability_probe_follows_features() {
    let expected = if cfg!(feature = "correlation") {
        Capability::Available
    } else {
        Capability::Unavailable
    };
    assert_eq!(Capability::probe(), expected);
    assert_eq!(MatchEngine::probe().capability(), expected);
}

#[test]
fn unavailable_capability_fails_primary_only() {
    let engine = MatchEngine::new(Capability::Unavailable);
    let screen = RawImage::filled(10, 10, &[0, 0, 0]).unwrap();
    let reference = RawImage::filled(2, 2, &[0, 0, 0]).unwrap();

    let primary = MatchOptions::default().with_engine(EngineSelector::Primary);
    assert_eq!(
        engine.match_image(&screen, &reference, &primary),
        Err(ClickMatchError::CapabilityUnavailable)
    );

    assert_eq!(engine.engine_for(EngineSelector::Auto), Ok(EngineKind::Diff));
    let outcome = engine
        .match_image(&screen, &reference, &MatchOptions::default())
        .unwrap();
    assert_eq!(
        outcome,
        MatchOutcome::Accepted {
            center: ClickPoint { x: 1, y: 1 },
            score: 1.0,
            scale: 1.0,
        }
    );
}
