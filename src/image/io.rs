//! Decoding helpers built on the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::RawImage;
use crate::util::{ClickMatchError, ClickMatchResult};
use std::path::Path;

/// Converts a dynamic image into a four-channel `RawImage`.
pub fn raw_from_dynamic_image(img: &image::DynamicImage) -> ClickMatchResult<RawImage> {
    let rgba = img.to_rgba8();
    let width = rgba.width() as usize;
    let height = rgba.height() as usize;
    RawImage::from_rgba(rgba.into_raw(), width, height)
}

/// Decodes an encoded raster (PNG or JPEG) such as a screen capture.
pub fn decode_image(bytes: &[u8]) -> ClickMatchResult<RawImage> {
    let img = image::load_from_memory(bytes).map_err(|err| ClickMatchError::ImageIo {
        reason: err.to_string(),
    })?;
    raw_from_dynamic_image(&img)
}

/// Loads a reference image from disk.
///
/// A path that is not an existing file fails with `ReferenceNotFound`
/// without touching the decoder.
pub fn load_reference<P: AsRef<Path>>(path: P) -> ClickMatchResult<RawImage> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(ClickMatchError::ReferenceNotFound {
            path: path.to_path_buf(),
        });
    }
    let img = image::open(path).map_err(|err| ClickMatchError::ImageIo {
        reason: err.to_string(),
    })?;
    raw_from_dynamic_image(&img)
}

/// Encodes an image as PNG bytes.
pub fn encode_png(img: &RawImage) -> ClickMatchResult<Vec<u8>> {
    let rgba = img.to_rgba();
    let buffer = image::RgbaImage::from_raw(
        rgba.width() as u32,
        rgba.height() as u32,
        rgba.into_raw(),
    )
    .ok_or(ClickMatchError::InvalidInput("pixel buffer does not match dimensions"))?;
    let mut out = std::io::Cursor::new(Vec::new());
    buffer
        .write_to(&mut out, image::ImageFormat::Png)
        .map_err(|err| ClickMatchError::ImageIo {
            reason: err.to_string(),
        })?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::{decode_image, encode_png, load_reference};
    use crate::image::RawImage;
    use crate::util::ClickMatchError;

    #[test]
    fn png_bytes_decode_to_rgba() {
        let img = RawImage::new(vec![0, 64, 128, 255], 2, 2, 1).unwrap();
        let bytes = encode_png(&img).unwrap();
        let decoded = decode_image(&bytes).unwrap();
        assert_eq!(decoded, img.to_rgba());
    }

    #[test]
    fn garbage_bytes_are_an_io_error() {
        let err = decode_image(b"not an image").unwrap_err();
        assert!(matches!(err, ClickMatchError::ImageIo { .. }));
    }

    #[test]
    fn missing_reference_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.png");
        let err = load_reference(&path).unwrap_err();
        assert_eq!(err, ClickMatchError::ReferenceNotFound { path });
    }
}
