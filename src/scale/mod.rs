//! Scale space of resized reference images.
//!
//! Each requested scale resizes the reference to
//! `floor(width * scale) x floor(height * scale)`. Scales that are not
//! positive and finite, that collapse a dimension to zero, or that produce a
//! reference larger than the screen are excluded and recorded; they never
//! fail the search. Surviving levels keep the order of the requested scales,
//! which downstream selection relies on for tie-breaking.

mod resize;

pub use resize::resize_bilinear;

use crate::image::RawImage;
use crate::trace::trace_detail;
use crate::util::ClickMatchResult;

/// Slack added before flooring so decimal scales such as `0.9` are not
/// rounded down by binary representation error.
const DIM_EPSILON: f64 = 1e-9;

/// Why a scale was left out of the search space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exclusion {
    /// The scale is zero, negative, or not finite.
    InvalidScale,
    /// The resized reference has a zero dimension.
    ZeroSize,
    /// The resized reference does not fit inside the screen.
    ExceedsScreen,
}

impl Exclusion {
    /// Returns a stable snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Exclusion::InvalidScale => "invalid_scale",
            Exclusion::ZeroSize => "zero_size",
            Exclusion::ExceedsScreen => "exceeds_screen",
        }
    }
}

/// Reference image resized for one scale.
#[derive(Clone, Debug)]
pub struct ScaledReference {
    scale: f64,
    image: RawImage,
}

impl ScaledReference {
    /// Returns the scale factor that produced this level.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Returns the resized reference.
    pub fn image(&self) -> &RawImage {
        &self.image
    }
}

/// Ordered set of resized references that fit a given screen.
#[derive(Clone, Debug)]
pub struct ScaleSpace {
    levels: Vec<ScaledReference>,
    excluded: Vec<(f64, Exclusion)>,
}

impl ScaleSpace {
    /// Builds the scale space for `reference` against a screen size.
    pub fn build(
        reference: &RawImage,
        scales: &[f64],
        screen_width: usize,
        screen_height: usize,
    ) -> ClickMatchResult<Self> {
        let mut levels = Vec::with_capacity(scales.len());
        let mut excluded = Vec::new();

        for &scale in scales {
            let (width, height) = match fit_scale(
                reference.dimensions(),
                scale,
                screen_width,
                screen_height,
            ) {
                Ok(size) => size,
                Err(reason) => {
                    excluded.push((scale, reason));
                    trace_detail!("scale_excluded", scale = scale, reason = reason.as_str());
                    continue;
                }
            };
            let image = resize_bilinear(reference, width, height)?;
            levels.push(ScaledReference { scale, image });
        }

        Ok(Self { levels, excluded })
    }

    /// Returns the usable levels in request order.
    pub fn levels(&self) -> &[ScaledReference] {
        &self.levels
    }

    /// Returns excluded scales with their reasons, in request order.
    pub fn excluded(&self) -> &[(f64, Exclusion)] {
        &self.excluded
    }

    /// Returns true when no scale survived.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Lists the scales `build` would exclude, without resizing anything.
    pub fn exclusions<'a>(
        reference_size: (usize, usize),
        scales: &'a [f64],
        screen_width: usize,
        screen_height: usize,
    ) -> impl Iterator<Item = (f64, Exclusion)> + 'a {
        scales.iter().filter_map(move |&scale| {
            fit_scale(reference_size, scale, screen_width, screen_height)
                .err()
                .map(|reason| (scale, reason))
        })
    }
}

fn fit_scale(
    reference_size: (usize, usize),
    scale: f64,
    screen_width: usize,
    screen_height: usize,
) -> Result<(usize, usize), Exclusion> {
    let (width, height) = scaled_size(reference_size, scale)?;
    if width > screen_width || height > screen_height {
        return Err(Exclusion::ExceedsScreen);
    }
    Ok((width, height))
}

/// Computes the resized dimensions for `scale`.
pub fn scaled_size(
    (width, height): (usize, usize),
    scale: f64,
) -> Result<(usize, usize), Exclusion> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(Exclusion::InvalidScale);
    }
    let scaled = |dim: usize| (dim as f64 * scale + DIM_EPSILON).floor() as usize;
    let size = (scaled(width), scaled(height));
    if size.0 == 0 || size.1 == 0 {
        return Err(Exclusion::ZeroSize);
    }
    Ok(size)
}
