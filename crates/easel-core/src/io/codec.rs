//! Detection, decoding and encoding through the `image` codecs.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::raster::Raster;
use crate::{ImageError, ImageFormat};

/// Sniff the container format from the leading bytes.
///
/// # Errors
///
/// Returns [`ImageError::UnsupportedFormat`] when the bytes are not a
/// recognizable image or name a format outside [`ImageFormat`].
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, ImageError> {
    let codec = image::guess_format(bytes)
        .map_err(|_| ImageError::UnsupportedFormat("unrecognized image data".to_string()))?;

    ImageFormat::from_codec(codec)
        .ok_or_else(|| ImageError::UnsupportedFormat(format!("{:?}", codec).to_lowercase()))
}

/// Decode encoded bytes into a raster, returning the detected format.
///
/// Images that carry an alpha channel keep it on save.
pub fn decode(bytes: &[u8]) -> Result<(Raster, ImageFormat), ImageError> {
    let format = detect_format(bytes)?;

    let image = image::load_from_memory_with_format(bytes, format.to_codec())
        .map_err(|e| ImageError::Decode(e.to_string()))?;

    Ok((Raster::from_dynamic(image), format))
}

/// Encode a raster in `format`.
///
/// The alpha channel is written only when the format can store it and the
/// raster's save-alpha flag is set. `quality` (clamped to 1..=100) only
/// affects JPEG; WEBP output is lossless.
pub fn encode(raster: &Raster, format: ImageFormat, quality: u8) -> Result<Vec<u8>, ImageError> {
    let keep_alpha = format.supports_alpha() && raster.alpha_policy().save_alpha;
    let mut buffer = Vec::new();

    if format.is_lossy() {
        let rgb = raster.to_dynamic(false).into_rgb8();
        let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
        encoder
            .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
            .map_err(|e| ImageError::Encode(e.to_string()))?;
    } else {
        raster
            .to_dynamic(keep_alpha)
            .write_to(&mut Cursor::new(&mut buffer), format.to_codec())
            .map_err(|e| ImageError::Encode(e.to_string()))?;
    }

    Ok(buffer)
}
