//! Geometry transforms, format conversion and filters.
//!
//! Every transform that allocates a new canvas installs it through
//! `replace_raster`, which drops the previous buffer and re-reads the size.

use crate::geometry::{
    ensure_resize_array, normalize_size, plan_max_fit, plan_min_fit, resolve_position, Anchor,
    AspectRatio, Size, SizeSpec,
};
use crate::raster::{FlipAxis, Raster, BACKDROP_ALPHA, OPAQUE};
use crate::{Filter, ImageError, ImageFormat};

use super::ImageHandle;

/// A planned dimension as a resize bound, where anything below 1 is
/// unbounded.
fn to_bound(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

impl ImageHandle {
    /// Aspect-preserving shrink.
    ///
    /// A negative scalar `-n` shrinks the shorter side to `n`. A positive
    /// scalar bounds the longer side; a pair bounds each nonzero axis.
    /// Images are never enlarged.
    pub fn resize(&mut self, spec: impl Into<SizeSpec>) -> &mut Self {
        let spec = spec.into();

        let target = match spec {
            SizeSpec::Scalar(n) if n < 0 => {
                plan_min_fit(to_bound(n.saturating_neg()), self.size)
            }
            _ => {
                let (width, height) = ensure_resize_array(spec, self.size);
                plan_max_fit((to_bound(width), to_bound(height)), self.size)
            }
        };

        self.resize_free(target)
    }

    /// Resample to exactly the requested size, distorting if needed.
    ///
    /// A zero (or negative) axis keeps its current value.
    pub fn resize_free(&mut self, spec: impl Into<SizeSpec>) -> &mut Self {
        let (width, height) = ensure_resize_array(spec, self.size);
        let target = Size::new(
            if width > 0 { to_bound(width) } else { self.size.width },
            if height > 0 { to_bound(height) } else { self.size.height },
        );

        log::debug!("Resizing {:?} to {:?}", self.size, target);

        let mut canvas = Raster::new(target);
        if self.format.supports_alpha() {
            canvas.set_alpha_policy(false, true);
        }
        canvas.resample_from(&self.raster, self.config.resize_filter);

        self.replace_raster(canvas);
        self
    }

    /// Cut a region of the requested size, positioned by `anchor`.
    ///
    /// The size is clamped to the current canvas while keeping the crop's
    /// own aspect ratio. Uncovered area shows the fill color at half
    /// opacity.
    pub fn crop(&mut self, spec: impl Into<SizeSpec>, anchor: impl Into<Anchor>) -> &mut Self {
        let requested = normalize_size(spec);

        let (width, height) = (self.size.width as f64, self.size.height as f64);
        let (mut crop_w, mut crop_h) = (requested.width as f64, requested.height as f64);

        if crop_w > width {
            crop_h = crop_h * width / crop_w;
            crop_w = width;
        }
        if crop_h > height {
            crop_w = crop_w * height / crop_h;
            crop_h = height;
        }

        let crop = Size::new((crop_w as u32).max(1), (crop_h as u32).max(1));
        let (x, y) = resolve_position(anchor, self.size, crop).rounded();

        log::debug!("Cropping {:?} to {:?} at ({}, {})", self.size, crop, x, y);

        let mut canvas = Raster::filled(crop, self.color.with_alpha(BACKDROP_ALPHA));
        canvas.draw(self.raster.pixels(), x, y);
        canvas.set_alpha_policy(true, true);

        self.replace_raster(canvas);
        self
    }

    /// Crop to the largest region with the given `width.height` ratio.
    ///
    /// `16.9` means 16:9 and `1.6` means 1:6. `None`, zero and negative
    /// ratios leave the image untouched.
    pub fn ratio(&mut self, target: impl Into<Option<f64>>, anchor: impl Into<Anchor>) -> &mut Self {
        let Some(ratio) = target.into().and_then(AspectRatio::from_decimal) else {
            return self;
        };

        let region = ratio.region_within(self.size);
        self.crop(region, anchor)
    }

    /// Letterbox into a frame of exactly the requested size.
    ///
    /// The image shrinks to fit the frame and is centered on an opaque
    /// canvas of the fill color.
    pub fn framing(&mut self, spec: impl Into<SizeSpec>) -> &mut Self {
        let frame = normalize_size(spec);
        self.resize(frame);

        let (x, y) = resolve_position(Anchor::CENTER, self.size, frame).truncated();
        log::debug!("Framing {:?} in {:?} at ({}, {})", self.size, frame, x, y);

        let mut canvas = Raster::filled(frame, self.color.with_alpha(OPAQUE));
        canvas.draw(self.raster.pixels(), x, y);

        self.replace_raster(canvas);
        self
    }

    /// Change the output format from an extension token.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::UnsupportedFormat`] for unknown tokens, leaving
    /// the handle unchanged.
    pub fn convert(&mut self, token: &str) -> Result<&mut Self, ImageError> {
        let target = ImageFormat::from_extension(token)?;
        Ok(self.convert_to(target))
    }

    /// Change the output format.
    ///
    /// Moving to a different alpha-capable format redraws the image over the
    /// fill color at half opacity and keeps alpha on save. Other changes
    /// only switch the format.
    pub fn convert_to(&mut self, target: ImageFormat) -> &mut Self {
        if target == self.format {
            return self;
        }

        log::debug!("Converting {} to {}", self.format, target);

        if target.supports_alpha() {
            let mut canvas = Raster::filled(self.size, self.color.with_alpha(BACKDROP_ALPHA));
            canvas.draw(self.raster.pixels(), 0, 0);
            canvas.set_alpha_policy(true, true);
            self.replace_raster(canvas);
        }

        self.format = target;
        self
    }

    /// Rotate counter-clockwise by `degrees`, growing the canvas to fit.
    ///
    /// With `transparent` the handle first converts to WEBP so the exposed
    /// corners can be see-through. Corners take the fill color, opaque for
    /// BMP and JPEG and at half opacity otherwise.
    pub fn rotate(&mut self, degrees: impl Into<f64>, transparent: bool) -> &mut Self {
        let degrees = degrees.into().rem_euclid(360.0);

        if transparent {
            self.convert_to(ImageFormat::Webp);
        }

        let alpha_format = self.format.supports_alpha();
        let fill = if alpha_format {
            self.color.with_alpha(BACKDROP_ALPHA)
        } else {
            self.color.with_alpha(OPAQUE)
        };

        log::debug!("Rotating {:?} by {} degrees", self.size, degrees);

        let mut rotated = self.raster.rotated(degrees, fill);
        if alpha_format {
            rotated.set_alpha_policy(true, true);
        }

        self.replace_raster(rotated);
        self
    }

    pub fn flip_h(&mut self) -> &mut Self {
        self.raster.flip(FlipAxis::Horizontal);
        self
    }

    pub fn flip_v(&mut self) -> &mut Self {
        self.raster.flip(FlipAxis::Vertical);
        self
    }

    /// Draw `other` on top of this image as a watermark.
    ///
    /// A copy of `other` is shrunk so it fits the shorter side of this
    /// image, then placed by `anchor` without further resampling. `other`
    /// itself is not modified.
    pub fn stamp(&mut self, other: &ImageHandle, anchor: impl Into<Anchor>) -> &mut Self {
        let mut stamp = other.copy();
        stamp.resize(self.size.min_side() as i64);
        stamp.raster.set_alpha_policy(true, true);

        let (x, y) = resolve_position(anchor, stamp.size, self.size).truncated();
        log::debug!("Stamping {:?} onto {:?} at ({}, {})", stamp.size, self.size, x, y);

        self.raster.draw(stamp.raster.pixels(), x, y);
        self
    }

    /// Run a pixel filter. The geometry is unchanged.
    pub fn filter(&mut self, filter: Filter) -> &mut Self {
        log::debug!("Applying {:?}", filter);
        self.raster.apply_filter(filter);
        self
    }
}
