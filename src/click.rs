//! Click-by-image flow on top of a host that can capture and click.
//!
//! The host owns screenshot transport and pointer dispatch; this module only
//! sequences them around a match.

use crate::candidate::ClickPoint;
use crate::engine::{MatchEngine, MatchOptions};
use crate::image::io::{decode_image, load_reference};
use crate::trace::{trace_event, trace_span};
use crate::util::{ClickMatchError, ClickMatchResult};
use std::fmt::Display;
use std::path::Path;

/// Screen capture and pointer dispatch provided by an automation host.
pub trait ScreenHost {
    /// Host-side failure.
    type Error: Display;

    /// Captures the current screen as an encoded raster (PNG or JPEG).
    fn capture_screen(&mut self) -> Result<Vec<u8>, Self::Error>;

    /// Clicks at a point in screen coordinates.
    fn click_at(&mut self, point: ClickPoint) -> Result<(), Self::Error>;
}

fn host_error<E: Display>(err: E) -> ClickMatchError {
    ClickMatchError::Host {
        reason: err.to_string(),
    }
}

/// Finds `reference_path` on the current screen and clicks its center.
///
/// The reference is loaded and the engine resolved before the screen is
/// captured, so a missing file or an unavailable engine never triggers a
/// capture. Exactly one capture is taken. A rejected match fails with
/// `NoMatch` and no click is dispatched.
pub fn click_by_matching_image<H, P>(
    host: &mut H,
    engine: &MatchEngine,
    reference_path: P,
    options: &MatchOptions,
) -> ClickMatchResult<ClickPoint>
where
    H: ScreenHost + ?Sized,
    P: AsRef<Path>,
{
    let reference_path = reference_path.as_ref();
    let _span = trace_span!("click_by_matching_image", reference = %reference_path.display())
        .entered();

    let reference = load_reference(reference_path)?;
    options.validate()?;
    engine.resolve(options.engine)?;

    let bytes = host.capture_screen().map_err(host_error)?;
    let screen = decode_image(&bytes)?;

    let point = engine
        .match_image(&screen, &reference, options)?
        .require(options.confidence)?;
    host.click_at(point).map_err(host_error)?;
    trace_event!("clicked", x = point.x, y = point.y);
    Ok(point)
}
