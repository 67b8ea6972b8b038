//! The fluent image handle.
//!
//! An [`ImageHandle`] owns one [`Raster`] plus the state the transforms
//! consult: the tracked size, the fill color, the output format and
//! quality, and the name and directory used when saving. Handles are built
//! from a solid color, a file, a URL or in-memory bytes, either directly or
//! through an [`ImageConfig`] that supplies the defaults.
//!
//! ```ignore
//! let mut image = ImageHandle::open("photos/beach.jpg")?;
//! image.resize(800).ratio(16.9, 0).convert("webp")?.save(None)?;
//! ```

mod transform;

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose, Engine as _};

use crate::color::{normalize_color, to_hex, Color, ColorSpec};
use crate::geometry::{normalize_size, Size, SizeSpec};
use crate::orientation::{orientation_from_bytes, Correction, Orientation};
use crate::raster::{Raster, OPAQUE};
use crate::{io, ImageConfig, ImageError, ImageFormat};

/// A mutable image with format, color and output state.
///
/// Cloning deep-copies the raster; [`ImageHandle::copy`] is the named entry
/// point for that.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    raster: Raster,
    size: Size,
    color: Color,
    format: ImageFormat,
    quality: u8,
    name: String,
    output_dir: Option<PathBuf>,
    config: ImageConfig,
}

impl ImageHandle {
    /// A canvas of `size` filled with `color`, using the default
    /// configuration.
    pub fn solid(
        color: impl Into<ColorSpec>,
        size: impl Into<SizeSpec>,
    ) -> Result<Self, ImageError> {
        ImageConfig::default().solid(color, size)
    }

    /// Load an image file, using the default configuration.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        ImageConfig::default().open(path)
    }

    /// Download an image, using the default configuration.
    #[cfg(feature = "remote")]
    pub fn fetch(url: &str) -> Result<Self, ImageError> {
        ImageConfig::default().fetch(url)
    }

    /// Decode in-memory bytes, using the default configuration.
    pub fn decode(bytes: &[u8], name: &str) -> Result<Self, ImageError> {
        ImageConfig::default().decode(bytes, name)
    }

    fn from_decoded(
        raster: Raster,
        format: ImageFormat,
        config: &ImageConfig,
        name: &str,
    ) -> Self {
        let mut handle = Self {
            size: raster.size(),
            raster,
            color: config.default_color,
            format,
            quality: config.default_quality.min(100),
            name: String::new(),
            output_dir: None,
            config: config.clone(),
        };
        handle.rename(name);
        handle
    }

    /// A deep copy whose raster is independent of this one.
    pub fn copy(&self) -> ImageHandle {
        self.clone()
    }

    /// Apply the corrections for an EXIF orientation tag.
    pub fn apply_orientation(&mut self, orientation: Orientation) -> &mut Self {
        if orientation != Orientation::Normal {
            log::debug!(
                "Correcting EXIF orientation {:?} (swaps dimensions: {})",
                orientation,
                orientation.swaps_dimensions()
            );
        }
        for correction in orientation.corrections() {
            match *correction {
                Correction::FlipHorizontal => {
                    self.flip_h();
                }
                Correction::Rotate(degrees) => {
                    self.rotate(degrees, true);
                }
            }
        }
        self
    }

    /// Install a new raster, dropping the previous one, and track its size.
    fn replace_raster(&mut self, raster: Raster) {
        self.size = raster.size();
        self.raster = raster;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Base name, optionally followed by the current extension.
    pub fn name(&self, with_extension: bool) -> String {
        if with_extension {
            format!("{}.{}", self.name, self.extension())
        } else {
            self.name.clone()
        }
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    /// Borrow the pixels.
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// The image encoded in its current format and quality.
    pub fn binary(&self) -> Result<Vec<u8>, ImageError> {
        io::encode(&self.raster, self.format, self.quality)
    }

    /// Encoded size in megabytes, rounded to three decimals.
    pub fn file_size_mb(&self) -> Result<f64, ImageError> {
        let bytes = self.binary()?.len() as f64;
        Ok((bytes / (1024.0 * 1024.0) * 1000.0).round() / 1000.0)
    }

    /// Hex digest of the encoded bytes.
    pub fn content_hash(&self) -> Result<String, ImageError> {
        Ok(blake3::hash(&self.binary()?).to_hex().to_string())
    }

    /// The encoded image as a `data:` URI.
    pub fn base64_data_uri(&self) -> Result<String, ImageError> {
        let encoded = general_purpose::STANDARD.encode(self.binary()?);
        Ok(format!("data:{};base64,{}", self.format.mime_type(), encoded))
    }

    // ========================================================================
    // Setters
    // ========================================================================

    /// Set the encoder quality, clamped to 0..=100.
    pub fn set_quality(&mut self, quality: i32) -> &mut Self {
        self.quality = quality.clamp(0, 100) as u8;
        self
    }

    /// Set the base name, dropping one trailing extension.
    ///
    /// Names starting with a dot are kept whole.
    pub fn rename(&mut self, name: &str) -> &mut Self {
        self.name = match name.rsplit_once('.') {
            Some((stem, _)) if !name.starts_with('.') => stem.to_string(),
            _ => name.to_string(),
        };
        self
    }

    /// Set the output directory from path segments.
    pub fn set_path<I, P>(&mut self, segments: I) -> &mut Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let dir: PathBuf = segments.into_iter().collect();
        self.output_dir = Some(dir);
        self
    }

    /// Set the fill color used by crops, frames, rotations and conversions.
    pub fn set_color(&mut self, color: impl Into<ColorSpec>) -> Result<&mut Self, ImageError> {
        self.color = normalize_color(color)?;
        Ok(self)
    }

    // ========================================================================
    // Output
    // ========================================================================

    /// Write `<dir>/<name>.<ext>` and remember `dir`.
    ///
    /// The directory is `dir` if given, else the handle's own, else the
    /// configured fallback. It is created when missing.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Configuration`] when no directory resolves.
    pub fn save(&mut self, dir: Option<&Path>) -> Result<&mut Self, ImageError> {
        let dir = dir
            .map(Path::to_path_buf)
            .or_else(|| self.output_dir.clone())
            .or_else(|| self.config.output_dir.clone())
            .ok_or_else(|| ImageError::Configuration("Set a path to save the file".to_string()))?;

        std::fs::create_dir_all(&dir)?;

        let file = dir.join(self.name(true));
        let bytes = self.binary()?;
        std::fs::write(&file, &bytes)?;
        log::info!("Saved {} ({} bytes)", file.display(), bytes.len());

        self.output_dir = Some(dir);
        Ok(self)
    }
}

impl ImageConfig {
    /// A canvas of `size` filled with `color`.
    ///
    /// The handle is JPEG, named `color-<hex>-<w>-<h>` and has no output
    /// directory.
    pub fn solid(
        &self,
        color: impl Into<ColorSpec>,
        size: impl Into<SizeSpec>,
    ) -> Result<ImageHandle, ImageError> {
        let color = normalize_color(color)?;
        let size = normalize_size(size);
        let raster = Raster::filled(size, color.with_alpha(OPAQUE));

        Ok(ImageHandle {
            size: raster.size(),
            raster,
            color,
            format: ImageFormat::Jpeg,
            quality: self.default_quality.min(100),
            name: format!("color-{}-{}-{}", to_hex(color), size.width, size.height),
            output_dir: None,
            config: self.clone(),
        })
    }

    /// Load an image file.
    ///
    /// The name is the file stem and the output directory the parent
    /// directory. EXIF orientation is corrected.
    ///
    /// # Errors
    ///
    /// [`ImageError::ResourceNotFound`] when the file is missing and
    /// [`ImageError::UnsupportedFormat`] when its bytes are not a supported
    /// image.
    pub fn open(&self, path: impl AsRef<Path>) -> Result<ImageHandle, ImageError> {
        let path = path.as_ref();
        let bytes = io::read_file(path, self)?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut handle = self.decode(&bytes, &file_name)?;
        handle.output_dir = Some(
            path.parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        );

        log::info!("Opened {} as {}", path.display(), handle.format);
        Ok(handle)
    }

    /// Download an image.
    ///
    /// The name is the last URL path segment without its extension. No
    /// orientation correction is applied.
    #[cfg(feature = "remote")]
    pub fn fetch(&self, url: &str) -> Result<ImageHandle, ImageError> {
        let bytes = io::fetch_url(url, self)?;
        let (raster, format) = io::decode(&bytes)?;

        let handle = ImageHandle::from_decoded(raster, format, self, url_file_name(url));
        log::info!("Fetched {} as {}", url, handle.format);
        Ok(handle)
    }

    /// Decode in-memory bytes, correcting EXIF orientation.
    pub fn decode(&self, bytes: &[u8], name: &str) -> Result<ImageHandle, ImageError> {
        let (raster, format) = io::decode(bytes)?;

        let mut handle = ImageHandle::from_decoded(raster, format, self, name);
        handle.apply_orientation(orientation_from_bytes(bytes));
        Ok(handle)
    }
}

/// Last non-empty path segment of a URL, ignoring query and fragment.
#[cfg_attr(not(feature = "remote"), allow(dead_code))]
fn url_file_name(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let path = path.split_once("://").map_or(path, |(_, rest)| rest);

    match path.split_once('/') {
        Some((_, rest)) => rest.rsplit('/').find(|s| !s.is_empty()).unwrap_or("image"),
        None => "image",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_solid_defaults() {
        let handle = ImageHandle::solid("f00", (100, 50)).unwrap();
        assert_eq!(handle.size(), Size::new(100, 50));
        assert_eq!(handle.color(), Color::new(255, 0, 0));
        assert_eq!(handle.format(), ImageFormat::Jpeg);
        assert_eq!(handle.quality(), 75);
        assert_eq!(handle.name(false), "color-ff0000-100-50");
        assert_eq!(handle.name(true), "color-ff0000-100-50.jpg");
        assert!(handle.output_dir().is_none());
        assert_eq!(handle.raster().pixel(99, 49), Some(Rgba([255, 0, 0, 255])));
    }

    #[test]
    fn test_solid_takes_quality_from_config() {
        let mut config = ImageConfig::default();
        config.default_quality = 140;
        config.default_color = Color::new(0, 0, 0);

        let handle = config.solid("0f0", 4).unwrap();
        assert_eq!(handle.quality(), 100);
        assert_eq!(handle.color(), Color::new(0, 255, 0));
        assert_eq!(handle.config(), &config);
    }

    #[test]
    fn test_solid_normalizes_size() {
        let handle = ImageHandle::solid([1u8, 2, 3], 0).unwrap();
        assert_eq!(handle.size(), Size::new(1, 1));

        let handle = ImageHandle::solid("#abc", (12, 0)).unwrap();
        assert_eq!(handle.size(), Size::new(12, 12));
        assert_eq!(handle.name(false), "color-aabbcc-12-12");
    }

    #[test]
    fn test_solid_rejects_malformed_color() {
        let err = ImageHandle::solid("ffff", 10).unwrap_err();
        assert!(matches!(err, ImageError::InvalidColor(_)));
    }

    #[test]
    fn test_config_defaults_flow_into_handles() {
        let config = ImageConfig {
            default_quality: 90,
            ..ImageConfig::default()
        };
        let handle = config.solid("000", 4).unwrap();
        assert_eq!(handle.quality(), 90);
    }

    #[test]
    fn test_rename_strips_one_extension() {
        let mut handle = ImageHandle::solid("fff", 1).unwrap();
        assert_eq!(handle.rename("photo.jpg").name(false), "photo");
        assert_eq!(handle.rename("archive.tar.gz").name(false), "archive.tar");
        assert_eq!(handle.rename(".hidden.png").name(false), ".hidden.png");
        assert_eq!(handle.rename("plain").name(false), "plain");
    }

    #[test]
    fn test_set_quality_clamps() {
        let mut handle = ImageHandle::solid("fff", 1).unwrap();
        assert_eq!(handle.set_quality(150).quality(), 100);
        assert_eq!(handle.set_quality(-4).quality(), 0);
    }

    #[test]
    fn test_set_path_joins_segments() {
        let mut handle = ImageHandle::solid("fff", 1).unwrap();
        handle.set_path(["out", "thumbs", "small"]);
        assert_eq!(
            handle.output_dir(),
            Some(Path::new("out").join("thumbs").join("small").as_path())
        );
    }

    #[test]
    fn test_set_color() {
        let mut handle = ImageHandle::solid("fff", 1).unwrap();
        handle.set_color("10,20,30").unwrap();
        assert_eq!(handle.color(), Color::new(10, 20, 30));
        assert!(handle.set_color("xyz").is_err());
        assert_eq!(handle.color(), Color::new(10, 20, 30));
    }

    #[test]
    fn test_save_without_directory_fails() {
        let mut handle = ImageHandle::solid("fff", 2).unwrap();
        let err = handle.save(None).unwrap_err();
        assert!(matches!(err, ImageError::Configuration(_)));
    }

    #[test]
    fn test_copy_is_independent() {
        let original = ImageHandle::solid("f00", (10, 10)).unwrap();
        let mut copy = original.copy();
        copy.resize_free((4, 2)).flip_h();
        assert_eq!(original.size(), Size::new(10, 10));
        assert_eq!(copy.size(), Size::new(4, 2));
    }

    #[test]
    fn test_binary_outputs() {
        let handle = ImageHandle::solid("0f0", (16, 8)).unwrap();
        let bytes = handle.binary().unwrap();
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);

        let uri = handle.base64_data_uri().unwrap();
        assert!(uri.starts_with("data:image/jpeg;base64,/9j/"));

        let hash = handle.content_hash().unwrap();
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, handle.copy().content_hash().unwrap());

        let mb = handle.file_size_mb().unwrap();
        assert!((0.0..0.01).contains(&mb));
    }

    #[test]
    fn test_decode_in_memory() {
        let source = ImageHandle::solid("00f", (6, 3)).unwrap();
        let mut png = source.copy();
        png.convert("png").unwrap();

        let handle = ImageHandle::decode(&png.binary().unwrap(), "upload.png").unwrap();
        assert_eq!(handle.format(), ImageFormat::Png);
        assert_eq!(handle.size(), Size::new(6, 3));
        assert_eq!(handle.name(false), "upload");
        assert!(handle.output_dir().is_none());
    }

    #[test]
    fn test_decode_garbage_is_unsupported() {
        let err = ImageHandle::decode(b"hello", "x").unwrap_err();
        assert!(matches!(err, ImageError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_open_missing_file() {
        let err = ImageHandle::open("/definitely/not/here.jpg").unwrap_err();
        assert!(matches!(err, ImageError::ResourceNotFound(_)));
    }

    #[test]
    fn test_apply_orientation_rotates_to_webp() {
        let mut handle = ImageHandle::solid("fff", (30, 10)).unwrap();
        handle.apply_orientation(Orientation::Rotate90CW);
        assert_eq!(handle.size(), Size::new(10, 30));
        assert_eq!(handle.format(), ImageFormat::Webp);

        let mut handle = ImageHandle::solid("fff", (30, 10)).unwrap();
        handle.apply_orientation(Orientation::FlipHorizontal);
        assert_eq!(handle.size(), Size::new(30, 10));
        assert_eq!(handle.format(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_url_file_name() {
        assert_eq!(url_file_name("https://host/a/b/photo.png"), "photo.png");
        assert_eq!(url_file_name("https://host/a/photo.png?w=10#top"), "photo.png");
        assert_eq!(url_file_name("https://host/a/dir/"), "dir");
        assert_eq!(url_file_name("https://host"), "image");
        assert_eq!(url_file_name("https://host/"), "image");
    }
}
