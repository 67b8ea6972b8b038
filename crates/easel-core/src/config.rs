//! Handle defaults and loading limits.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::Color;

/// Filter type for resampling operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Catmull-Rom bicubic interpolation.
    CatmullRom,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::CatmullRom => image::imageops::FilterType::CatmullRom,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Settings shared by every handle created through this configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Encoder quality for new handles (0 to 100).
    pub default_quality: u8,
    /// Fill color for new handles loaded from files or URLs.
    pub default_color: Color,
    /// Resampling filter used by resizes.
    pub resize_filter: FilterType,
    /// Fallback directory for `save` when the handle has none.
    pub output_dir: Option<PathBuf>,
    /// Largest file or download accepted, in bytes.
    pub max_file_size: u64,
    /// Total timeout for remote fetches, in seconds.
    pub download_timeout_secs: u64,
    /// Connection timeout for remote fetches, in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            default_quality: 75,
            default_color: Color::WHITE,
            resize_filter: FilterType::Bilinear,
            output_dir: None,
            max_file_size: 50 * 1024 * 1024,
            download_timeout_secs: 30,
            connect_timeout_secs: 8,
        }
    }
}

impl ImageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same configuration with a fallback output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Same configuration with a different resampling filter.
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.resize_filter = filter;
        self
    }
}
