//! Decoded raster images shared by capture, reference, and matching.
//!
//! `RawImage` stores interleaved `u8` samples in row-major order, top to
//! bottom, with one to four channels per pixel. Images are immutable once
//! constructed; conversions return new buffers.

use crate::util::{ClickMatchError, ClickMatchResult};
use std::borrow::Cow;

#[cfg(feature = "image-io")]
pub mod io;
pub mod luma;

pub use luma::LumaImage;

/// Owned interleaved raster image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
    channels: usize,
}

impl RawImage {
    /// Creates an image from interleaved samples.
    ///
    /// `channels` is 1 (gray), 2 (gray + alpha), 3 (RGB) or 4 (RGBA), and
    /// `data` must hold exactly `width * height * channels` samples.
    pub fn new(
        data: Vec<u8>,
        width: usize,
        height: usize,
        channels: usize,
    ) -> ClickMatchResult<Self> {
        if !(1..=4).contains(&channels) {
            return Err(ClickMatchError::InvalidInput("channels must be within 1..=4"));
        }
        let needed = required_len(width, height, channels)?;
        if data.len() < needed {
            return Err(ClickMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(ClickMatchError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Creates a four-channel RGBA image.
    pub fn from_rgba(data: Vec<u8>, width: usize, height: usize) -> ClickMatchResult<Self> {
        Self::new(data, width, height, 4)
    }

    /// Creates an image where every pixel has the same samples.
    pub fn filled(width: usize, height: usize, pixel: &[u8]) -> ClickMatchResult<Self> {
        let channels = pixel.len();
        if !(1..=4).contains(&channels) {
            return Err(ClickMatchError::InvalidInput("channels must be within 1..=4"));
        }
        let count = required_len(width, height, 1)?;
        let data = pixel.repeat(count);
        Self::new(data, width, height, channels)
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of interleaved channels per pixel.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns the raw interleaved samples.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the image and returns its samples.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Returns the interleaved samples of row `y`.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let row_len = self.width * self.channels;
        let start = y * row_len;
        self.data.get(start..start + row_len)
    }

    /// Returns the samples of the pixel at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<&[u8]> {
        if x >= self.width {
            return None;
        }
        let row = self.row(y)?;
        let start = x * self.channels;
        row.get(start..start + self.channels)
    }

    /// Returns an RGBA copy of the image.
    ///
    /// Gray is replicated across the color channels; missing alpha is opaque.
    pub fn to_rgba(&self) -> RawImage {
        if self.channels == 4 {
            return self.clone();
        }
        let mut out = Vec::with_capacity(self.width * self.height * 4);
        for px in self.data.chunks_exact(self.channels) {
            let rgba = match *px {
                [g] => [g, g, g, u8::MAX],
                [g, a] => [g, g, g, a],
                [r, g, b] => [r, g, b, u8::MAX],
                _ => [px[0], px[1], px[2], px[3]],
            };
            out.extend_from_slice(&rgba);
        }
        RawImage {
            data: out,
            width: self.width,
            height: self.height,
            channels: 4,
        }
    }

    /// Borrows the image when it is already RGBA, converts it otherwise.
    pub fn as_rgba(&self) -> Cow<'_, RawImage> {
        if self.channels == 4 {
            Cow::Borrowed(self)
        } else {
            Cow::Owned(self.to_rgba())
        }
    }

    /// Returns the grayscale intensity plane of the image.
    pub fn to_luma(&self) -> LumaImage {
        LumaImage::from_raw(self)
    }

    /// Copies the `width` x `height` region with top-left corner `(x, y)`.
    pub fn crop(&self, x: usize, y: usize, width: usize, height: usize) -> ClickMatchResult<Self> {
        let fits_x = x.checked_add(width).is_some_and(|end| end <= self.width);
        let fits_y = y.checked_add(height).is_some_and(|end| end <= self.height);
        if width == 0 || height == 0 || !fits_x || !fits_y {
            return Err(ClickMatchError::InvalidDimensions { width, height });
        }
        let mut data = Vec::with_capacity(width * height * self.channels);
        for row in self.data.chunks_exact(self.width * self.channels).skip(y).take(height) {
            data.extend_from_slice(&row[x * self.channels..(x + width) * self.channels]);
        }
        Self::new(data, width, height, self.channels)
    }
}

fn required_len(width: usize, height: usize, channels: usize) -> ClickMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(ClickMatchError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(channels))
        .ok_or(ClickMatchError::InvalidDimensions { width, height })
}
