//! The pixel buffer owned by a handle.
//!
//! A [`Raster`] is an RGBA8 buffer plus the alpha policy that decides how
//! content is drawn onto it and whether its alpha channel survives encoding.
//! Ownership gives the single-owner lifetime the handle needs: replacing a
//! handle's raster drops the previous buffer on the spot and cloning one
//! deep-copies the pixels.
//!
//! # Alpha policy
//!
//! - `blending`: drawing composites source pixels over the destination
//!   (source-over). When off, drawn pixels replace the destination,
//!   alpha included.
//! - `save_alpha`: the encoder keeps the alpha channel for formats that can
//!   store it. When off, the alpha channel is dropped on encode.
//!
//! Fresh canvases are opaque black with blending on and save-alpha off.

mod filter;
mod rotate;

use image::{imageops, DynamicImage, Rgba, RgbaImage};

use crate::config::FilterType;
use crate::geometry::Size;

pub use filter::Filter;
pub use rotate::compute_rotated_bounds;

/// Alpha used for backdrops that should read as see-through (127 of 255).
pub const BACKDROP_ALPHA: u8 = 127;

/// Fully opaque alpha.
pub const OPAQUE: u8 = 255;

/// How drawing and encoding treat the alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlphaPolicy {
    pub blending: bool,
    pub save_alpha: bool,
}

impl AlphaPolicy {
    /// Composite on draw, keep alpha on save.
    pub const PRESERVE: AlphaPolicy = AlphaPolicy {
        blending: true,
        save_alpha: true,
    };

    /// Replace on draw, keep alpha on save.
    pub const COPY: AlphaPolicy = AlphaPolicy {
        blending: false,
        save_alpha: true,
    };
}

impl Default for AlphaPolicy {
    fn default() -> Self {
        Self {
            blending: true,
            save_alpha: false,
        }
    }
}

/// Axis for [`Raster::flip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipAxis {
    Horizontal,
    Vertical,
}

/// An owned RGBA pixel buffer with its alpha policy.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pixels: RgbaImage,
    alpha: AlphaPolicy,
}

impl Raster {
    /// Opaque black canvas with the default policy.
    pub fn new(size: Size) -> Self {
        Self::filled(size, Rgba([0, 0, 0, OPAQUE]))
    }

    /// Canvas where every pixel is `fill`.
    pub fn filled(size: Size, fill: Rgba<u8>) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(size.width.max(1), size.height.max(1), fill),
            alpha: AlphaPolicy::default(),
        }
    }

    /// Wrap an existing buffer with the default policy.
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self {
            pixels,
            alpha: AlphaPolicy::default(),
        }
    }

    /// Wrap a decoded image, keeping its alpha on save when it has one.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        let save_alpha = image.color().has_alpha();
        Self {
            pixels: image.into_rgba8(),
            alpha: AlphaPolicy {
                blending: true,
                save_alpha,
            },
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Actual buffer dimensions.
    pub fn size(&self) -> Size {
        Size::new(self.pixels.width(), self.pixels.height())
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.pixels.get_pixel_checked(x, y).copied()
    }

    pub fn alpha_policy(&self) -> AlphaPolicy {
        self.alpha
    }

    pub fn set_alpha_policy(&mut self, blending: bool, save_alpha: bool) {
        self.alpha = AlphaPolicy {
            blending,
            save_alpha,
        };
    }

    /// Overwrite every pixel with `fill`.
    pub fn fill(&mut self, fill: Rgba<u8>) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = fill;
        }
    }

    /// Draw `source` with its top-left corner at `(x, y)`.
    ///
    /// Parts falling outside this raster are clipped. With blending on the
    /// source is composited over the destination; otherwise it replaces it.
    pub fn draw(&mut self, source: &RgbaImage, x: i64, y: i64) {
        if self.alpha.blending {
            imageops::overlay(&mut self.pixels, source, x, y);
        } else {
            imageops::replace(&mut self.pixels, source, x, y);
        }
    }

    /// Resample `source` to exactly fill this raster.
    pub fn resample_from(&mut self, source: &Raster, filter: FilterType) {
        let resized = if source.size() == self.size() {
            source.pixels.clone()
        } else {
            imageops::resize(
                &source.pixels,
                self.width(),
                self.height(),
                filter.to_image_filter(),
            )
        };
        self.draw(&resized, 0, 0);
    }

    pub fn flip(&mut self, axis: FlipAxis) {
        match axis {
            FlipAxis::Horizontal => imageops::flip_horizontal_in_place(&mut self.pixels),
            FlipAxis::Vertical => imageops::flip_vertical_in_place(&mut self.pixels),
        }
    }

    /// The buffer as a codec image, with or without its alpha channel.
    pub fn to_dynamic(&self, keep_alpha: bool) -> DynamicImage {
        let image = DynamicImage::ImageRgba8(self.pixels.clone());
        if keep_alpha {
            image
        } else {
            DynamicImage::ImageRgb8(image.into_rgb8())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, OPAQUE]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, OPAQUE]);

    #[test]
    fn test_new_canvas_is_opaque_black() {
        let raster = Raster::new(Size::new(3, 2));
        assert_eq!(raster.size(), Size::new(3, 2));
        assert_eq!(raster.pixel(2, 1), Some(Rgba([0, 0, 0, 255])));
        assert_eq!(raster.alpha_policy(), AlphaPolicy::default());
    }

    #[test]
    fn test_zero_size_canvas_is_clamped() {
        let raster = Raster::new(Size::new(0, 0));
        assert_eq!(raster.size(), Size::new(1, 1));
    }

    #[test]
    fn test_draw_clips_negative_offsets() {
        let mut raster = Raster::filled(Size::new(4, 4), RED);
        let patch = RgbaImage::from_pixel(3, 3, BLUE);
        raster.draw(&patch, -2, -2);

        assert_eq!(raster.pixel(0, 0), Some(BLUE));
        assert_eq!(raster.pixel(1, 0), Some(RED));
        assert_eq!(raster.pixel(0, 1), Some(RED));
    }

    #[test]
    fn test_draw_blends_or_replaces() {
        let clear = Rgba([0, 255, 0, 0]);
        let patch = RgbaImage::from_pixel(1, 1, clear);

        let mut blended = Raster::filled(Size::new(1, 1), RED);
        blended.draw(&patch, 0, 0);
        assert_eq!(blended.pixel(0, 0), Some(RED));

        let mut replaced = Raster::filled(Size::new(1, 1), RED);
        replaced.set_alpha_policy(false, true);
        replaced.draw(&patch, 0, 0);
        assert_eq!(replaced.pixel(0, 0), Some(clear));
    }

    #[test]
    fn test_resample_from_exact_size() {
        let source = Raster::filled(Size::new(10, 4), BLUE);
        let mut target = Raster::new(Size::new(5, 7));
        target.resample_from(&source, FilterType::Bilinear);
        assert_eq!(target.size(), Size::new(5, 7));
        assert_eq!(target.pixel(4, 6), Some(BLUE));
    }

    #[test]
    fn test_flip_horizontal() {
        let mut pixels = RgbaImage::from_pixel(2, 1, RED);
        pixels.put_pixel(1, 0, BLUE);
        let mut raster = Raster::from_rgba(pixels);

        raster.flip(FlipAxis::Horizontal);
        assert_eq!(raster.pixel(0, 0), Some(BLUE));
        assert_eq!(raster.pixel(1, 0), Some(RED));
    }

    #[test]
    fn test_flip_vertical() {
        let mut pixels = RgbaImage::from_pixel(1, 2, RED);
        pixels.put_pixel(0, 1, BLUE);
        let mut raster = Raster::from_rgba(pixels);

        raster.flip(FlipAxis::Vertical);
        assert_eq!(raster.pixel(0, 0), Some(BLUE));
    }

    #[test]
    fn test_clone_does_not_alias() {
        let original = Raster::filled(Size::new(2, 2), RED);
        let mut copy = original.clone();
        copy.fill(BLUE);
        assert_eq!(original.pixel(0, 0), Some(RED));
        assert_eq!(copy.pixel(0, 0), Some(BLUE));
    }

    #[test]
    fn test_to_dynamic_drops_alpha_on_request() {
        let raster = Raster::filled(Size::new(1, 1), Rgba([1, 2, 3, 4]));
        assert!(raster.to_dynamic(true).color().has_alpha());
        assert!(!raster.to_dynamic(false).color().has_alpha());
    }

    #[test]
    fn test_from_dynamic_keeps_alpha_flag() {
        let rgb = DynamicImage::ImageRgb8(image::RgbImage::new(2, 2));
        assert!(!Raster::from_dynamic(rgb).alpha_policy().save_alpha);

        let rgba = DynamicImage::ImageRgba8(RgbaImage::new(2, 2));
        assert!(Raster::from_dynamic(rgba).alpha_policy().save_alpha);
    }
}
