//! Image decoding using the `image` crate.

use crate::error::{Error, Result};
use image::{ImageError, RgbImage};
use std::path::Path;
use tracing::debug;

/// Decode in-memory image data to RGB.
///
/// The format is detected from the content, not from `name`, which is only
/// used in error messages.
pub fn decode_image(bytes: &[u8], name: &str) -> Result<RgbImage> {
    let decoded = image::load_from_memory(bytes).map_err(|e| Error::ImageDecode {
        name: name.to_string(),
        source: e,
    })?;
    debug!(
        "Decoded {name}: {}x{} ({:?})",
        decoded.width(),
        decoded.height(),
        decoded.color()
    );
    Ok(decoded.to_rgb8())
}

/// Read and decode an image file to RGB.
pub fn load_image(path: &Path) -> Result<RgbImage> {
    let name = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|e| Error::ImageDecode {
        name: name.clone(),
        source: ImageError::IoError(e),
    })?;
    decode_image(&bytes, &name)
}

/// Reject images with either side shorter than `min_size`.
pub fn validate_dimensions(image: &RgbImage, min_size: u32) -> Result<()> {
    let (width, height) = image.dimensions();
    if width < min_size || height < min_size {
        return Err(Error::ImageTooSmall {
            width,
            height,
            min: min_size,
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};
    use std::io::Cursor;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(w, h, Rgb([10, 20, 30]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let img = decode_image(&png_bytes(12, 7), "fish.png").unwrap();
        assert_eq!(img.dimensions(), (12, 7));
        assert_eq!(img.get_pixel(3, 3), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_decode_garbage() {
        let err = decode_image(b"definitely not an image", "notes.txt").unwrap_err();
        assert!(matches!(err, Error::ImageDecode { ref name, .. } if name == "notes.txt"));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load_image(Path::new("/nonexistent/fish.jpg")),
            Err(Error::ImageDecode { .. })
        ));
    }

    #[test]
    fn test_validate_dimensions() {
        assert!(validate_dimensions(&RgbImage::new(100, 100), 100).is_ok());
        assert!(matches!(
            validate_dimensions(&RgbImage::new(99, 400), 100),
            Err(Error::ImageTooSmall {
                width: 99,
                height: 400,
                min: 100
            })
        ));
    }
}
