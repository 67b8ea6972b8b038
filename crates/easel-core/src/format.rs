//! Supported container formats and their per-format data.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ImageError;

/// The closed set of formats a handle can load, convert to and save.
///
/// Each variant carries its canonical extension, MIME type and whether it
/// can store an alpha channel, so operations query the variant instead of
/// repeating per-format case lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ImageFormat {
    Bmp,
    #[default]
    Jpeg,
    Gif,
    Png,
    Webp,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 5] = [
        ImageFormat::Bmp,
        ImageFormat::Jpeg,
        ImageFormat::Gif,
        ImageFormat::Png,
        ImageFormat::Webp,
    ];

    /// Canonical file extension, without the dot.
    pub const fn extension(self) -> &'static str {
        match self {
            ImageFormat::Bmp => "bmp",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Gif => "gif",
            ImageFormat::Png => "png",
            ImageFormat::Webp => "webp",
        }
    }

    pub const fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Png => "image/png",
            ImageFormat::Webp => "image/webp",
        }
    }

    /// Whether the format can store transparency.
    pub const fn supports_alpha(self) -> bool {
        matches!(self, ImageFormat::Gif | ImageFormat::Png | ImageFormat::Webp)
    }

    /// Whether the quality setting affects the encoded output.
    pub const fn is_lossy(self) -> bool {
        matches!(self, ImageFormat::Jpeg)
    }

    /// Parse an extension token.
    ///
    /// Case-insensitive; surrounding spaces and dots are ignored and
    /// `jpg`, `jpe` and `jpeg` all name JPEG.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::UnsupportedFormat`] for any other token.
    pub fn from_extension(token: &str) -> Result<Self, ImageError> {
        let normalized = token
            .trim_matches(|c: char| c == ' ' || c == '.')
            .to_ascii_lowercase();

        match normalized.as_str() {
            "bmp" => Ok(ImageFormat::Bmp),
            "png" => Ok(ImageFormat::Png),
            "gif" => Ok(ImageFormat::Gif),
            "webp" => Ok(ImageFormat::Webp),
            "jpg" | "jpe" | "jpeg" => Ok(ImageFormat::Jpeg),
            _ => Err(ImageError::UnsupportedFormat(token.to_string())),
        }
    }

    /// Map from the codec library's format enum.
    pub fn from_codec(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Bmp => Some(ImageFormat::Bmp),
            image::ImageFormat::Jpeg => Some(ImageFormat::Jpeg),
            image::ImageFormat::Gif => Some(ImageFormat::Gif),
            image::ImageFormat::Png => Some(ImageFormat::Png),
            image::ImageFormat::WebP => Some(ImageFormat::Webp),
            _ => None,
        }
    }

    /// Map to the codec library's format enum.
    pub fn to_codec(self) -> image::ImageFormat {
        match self {
            ImageFormat::Bmp => image::ImageFormat::Bmp,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Gif => image::ImageFormat::Gif,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Webp => image::ImageFormat::WebP,
        }
    }
}

impl FromStr for ImageFormat {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImageFormat::from_extension(s)
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
