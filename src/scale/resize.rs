//! Deterministic bilinear resampling of interleaved images.

use crate::image::RawImage;
use crate::util::ClickMatchResult;

/// Source sample position and blend weight for one destination coordinate.
#[derive(Clone, Copy)]
struct Tap {
    i0: usize,
    i1: usize,
    frac: f32,
}

/// Maps destination pixel centers onto the source axis.
///
/// Centers are aligned (`src = (dst + 0.5) * src_len / dst_len - 0.5`) and
/// clamped to the valid range, so edges replicate instead of reading outside.
fn taps(src_len: usize, dst_len: usize) -> Vec<Tap> {
    let ratio = src_len as f32 / dst_len as f32;
    let max = (src_len - 1) as f32;
    (0..dst_len)
        .map(|d| {
            let pos = ((d as f32 + 0.5) * ratio - 0.5).clamp(0.0, max);
            let i0 = pos.floor() as usize;
            let i1 = (i0 + 1).min(src_len - 1);
            Tap {
                i0,
                i1,
                frac: pos - i0 as f32,
            }
        })
        .collect()
}

/// Resizes an image with bilinear interpolation.
///
/// Every channel is interpolated independently and rounded to the nearest
/// integer. Resizing to the original dimensions returns an exact copy.
pub fn resize_bilinear(
    src: &RawImage,
    dst_width: usize,
    dst_height: usize,
) -> ClickMatchResult<RawImage> {
    if (dst_width, dst_height) == src.dimensions() {
        return Ok(src.clone());
    }
    if dst_width == 0 || dst_height == 0 {
        return RawImage::new(Vec::new(), dst_width, dst_height, src.channels());
    }

    let channels = src.channels();
    let x_taps = taps(src.width(), dst_width);
    let y_taps = taps(src.height(), dst_height);
    let data = src.as_slice();
    let stride = src.width() * channels;
    let mut out = Vec::with_capacity(dst_width * dst_height * channels);

    for ty in &y_taps {
        let row0 = &data[ty.i0 * stride..(ty.i0 + 1) * stride];
        let row1 = &data[ty.i1 * stride..(ty.i1 + 1) * stride];
        for tx in &x_taps {
            let w00 = (1.0 - tx.frac) * (1.0 - ty.frac);
            let w10 = tx.frac * (1.0 - ty.frac);
            let w01 = (1.0 - tx.frac) * ty.frac;
            let w11 = tx.frac * ty.frac;
            for c in 0..channels {
                let a = row0[tx.i0 * channels + c] as f32;
                let b = row0[tx.i1 * channels + c] as f32;
                let d = row1[tx.i0 * channels + c] as f32;
                let e = row1[tx.i1 * channels + c] as f32;
                let value = a * w00 + b * w10 + d * w01 + e * w11;
                out.push(value.round().clamp(0.0, 255.0) as u8);
            }
        }
    }

    RawImage::new(out, dst_width, dst_height, channels)
}

#[cfg(test)]
mod tests {
    use super::resize_bilinear;
    use crate::image::RawImage;

    #[test]
    fn same_size_is_identity() {
        let data: Vec<u8> = (0u8..24).collect();
        let img = RawImage::new(data, 2, 3, 4).unwrap();
        assert_eq!(resize_bilinear(&img, 2, 3).unwrap(), img);
    }

    #[test]
    fn halving_averages_neighbours() {
        let img = RawImage::new(vec![0, 100, 200, 100], 4, 1, 1).unwrap();
        let half = resize_bilinear(&img, 2, 1).unwrap();
        assert_eq!(half.as_slice(), &[50, 150]);
    }

    #[test]
    fn flat_images_stay_flat() {
        let img = RawImage::filled(40, 40, &[200, 10, 30, 255]).unwrap();
        for size in [36, 32, 28, 24, 20] {
            let out = resize_bilinear(&img, size, size).unwrap();
            assert_eq!(out, RawImage::filled(size, size, &[200, 10, 30, 255]).unwrap());
        }
    }

    #[test]
    fn upscaling_replicates_edges() {
        let img = RawImage::new(vec![10, 90], 2, 1, 1).unwrap();
        let up = resize_bilinear(&img, 4, 1).unwrap();
        assert_eq!(up.as_slice(), &[10, 30, 70, 90]);
    }
}
