//! Grayscale intensity planes and summed-area tables.
//!
//! Conversion uses the BT.601 weights in integer arithmetic:
//! `luma = (299 R + 587 G + 114 B + 500) / 1000`. Gray inputs use their first
//! channel as-is and alpha never contributes, so the result depends only on
//! the color samples and is reproducible across platforms.

use crate::image::RawImage;

/// Owned contiguous grayscale image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LumaImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl LumaImage {
    /// Derives the intensity plane of a raster image.
    pub fn from_raw(img: &RawImage) -> Self {
        let data = match img.channels() {
            1 | 2 => img
                .as_slice()
                .chunks_exact(img.channels())
                .map(|px| px[0])
                .collect(),
            _ => img
                .as_slice()
                .chunks_exact(img.channels())
                .map(|px| luma_601(px[0], px[1], px[2]))
                .collect(),
        };
        Self {
            data,
            width: img.width(),
            height: img.height(),
        }
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the row-major intensity samples.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Returns row `y`.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.data.get(start..start + self.width)
    }

    /// Returns `(sum, sum of squares)` over all samples.
    pub fn moments(&self) -> (u64, u64) {
        self.data.iter().fold((0u64, 0u64), |(sum, sum_sq), &v| {
            let v = u64::from(v);
            (sum + v, sum_sq + v * v)
        })
    }
}

/// Fixed-point BT.601 luminance.
pub fn luma_601(r: u8, g: u8, b: u8) -> u8 {
    let weighted = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
    ((weighted + 500) / 1000) as u8
}

/// Summed-area tables of intensities and squared intensities.
///
/// Tables have one extra leading row and column of zeros so a window sum is
/// four lookups with no edge cases.
pub struct SummedArea {
    stride: usize,
    sum: Vec<u64>,
    sum_sq: Vec<u64>,
}

impl SummedArea {
    /// Builds the tables for a grayscale image.
    pub fn new(img: &LumaImage) -> Self {
        let stride = img.width() + 1;
        let len = stride * (img.height() + 1);
        let mut sum = vec![0u64; len];
        let mut sum_sq = vec![0u64; len];

        for (y, row) in img.data.chunks_exact(img.width()).enumerate() {
            let mut row_sum = 0u64;
            let mut row_sum_sq = 0u64;
            for (x, &value) in row.iter().enumerate() {
                let v = u64::from(value);
                row_sum += v;
                row_sum_sq += v * v;
                let idx = (y + 1) * stride + x + 1;
                sum[idx] = sum[idx - stride] + row_sum;
                sum_sq[idx] = sum_sq[idx - stride] + row_sum_sq;
            }
        }

        Self {
            stride,
            sum,
            sum_sq,
        }
    }

    /// Returns `(sum, sum of squares)` for the window at `(x, y)`.
    ///
    /// The caller guarantees the window lies inside the image.
    pub fn window(&self, x: usize, y: usize, width: usize, height: usize) -> (u64, u64) {
        let top_left = y * self.stride + x;
        let top_right = top_left + width;
        let bottom_left = (y + height) * self.stride + x;
        let bottom_right = bottom_left + width;
        let sum = self.sum[bottom_right] + self.sum[top_left]
            - self.sum[top_right]
            - self.sum[bottom_left];
        let sum_sq = self.sum_sq[bottom_right] + self.sum_sq[top_left]
            - self.sum_sq[top_right]
            - self.sum_sq[bottom_left];
        (sum, sum_sq)
    }
}

#[cfg(test)]
mod tests {
    use super::{luma_601, LumaImage, SummedArea};
    use crate::image::RawImage;

    #[test]
    fn luma_weights_are_fixed() {
        assert_eq!(luma_601(0, 0, 0), 0);
        assert_eq!(luma_601(255, 255, 255), 255);
        assert_eq!(luma_601(255, 0, 0), 76);
        assert_eq!(luma_601(0, 255, 0), 150);
        assert_eq!(luma_601(0, 0, 255), 29);
    }

    #[test]
    fn luma_ignores_alpha() {
        let opaque = RawImage::from_rgba(vec![40, 80, 120, 255], 1, 1).unwrap();
        let clear = RawImage::from_rgba(vec![40, 80, 120, 0], 1, 1).unwrap();
        assert_eq!(opaque.to_luma(), clear.to_luma());
    }

    #[test]
    fn summed_area_matches_direct_sums() {
        let data: Vec<u8> = (0u8..20).map(|v| v.wrapping_mul(37)).collect();
        let img = RawImage::new(data, 5, 4, 1).unwrap().to_luma();
        let table = SummedArea::new(&img);

        for (x, y, w, h) in [(0, 0, 5, 4), (1, 1, 3, 2), (4, 3, 1, 1), (2, 0, 2, 4)] {
            let mut sum = 0u64;
            let mut sum_sq = 0u64;
            for yy in y..y + h {
                for &v in &img.row(yy).unwrap()[x..x + w] {
                    sum += u64::from(v);
                    sum_sq += u64::from(v) * u64::from(v);
                }
            }
            assert_eq!(table.window(x, y, w, h), (sum, sum_sq));
        }
    }

    #[test]
    fn moments_cover_whole_plane() {
        let img = LumaImage::from_raw(&RawImage::new(vec![1, 2, 3, 4], 2, 2, 1).unwrap());
        assert_eq!(img.moments(), (10, 30));
    }
}
