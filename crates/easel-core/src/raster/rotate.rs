//! Rotation about the image center with canvas expansion.
//!
//! Positive angles turn the picture counter-clockwise as seen on screen.
//! Quarter turns are exact pixel permutations; any other angle uses inverse
//! mapping with bilinear sampling. For each output pixel:
//!
//! ```text
//! src_x = (dst_x - dst_cx) * cos(θ) - (dst_y - dst_cy) * sin(θ) + src_cx
//! src_y = (dst_x - dst_cx) * sin(θ) + (dst_y - dst_cy) * cos(θ) + src_cy
//! ```
//!
//! Output pixels that map outside the source take the fill color.

use image::{imageops, Rgba};

use super::Raster;

const EPSILON: f64 = 0.001;

/// Dimensions of the bounding box of a `width x height` rectangle rotated
/// by `angle_degrees`.
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    let angle = angle_degrees.rem_euclid(360.0);

    match quarter_turns(angle) {
        Some(0) | Some(2) => return (width, height),
        Some(_) => return (height, width),
        None => {}
    }

    let angle_rad = angle.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    let w = width as f64;
    let h = height as f64;

    let new_w = (w * cos + h * sin).round() as u32;
    let new_h = (w * sin + h * cos).round() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Number of counter-clockwise quarter turns when `angle` (already in
/// `[0, 360)`) is one, within tolerance.
fn quarter_turns(angle: f64) -> Option<u8> {
    if angle < EPSILON || (360.0 - angle) < EPSILON {
        return Some(0);
    }
    [90.0, 180.0, 270.0]
        .iter()
        .position(|quarter| (angle - quarter).abs() < EPSILON)
        .map(|index| index as u8 + 1)
}

impl Raster {
    /// A new raster holding this one rotated counter-clockwise by `degrees`.
    ///
    /// The canvas grows to contain the whole rotated picture and uncovered
    /// corners are painted with `fill`. The alpha policy carries over.
    pub fn rotated(&self, degrees: f64, fill: Rgba<u8>) -> Raster {
        let angle = degrees.rem_euclid(360.0);

        let pixels = match quarter_turns(angle) {
            Some(0) => self.pixels.clone(),
            // Counter-clockwise quarter turns are clockwise turns the other way
            Some(1) => imageops::rotate270(&self.pixels),
            Some(2) => imageops::rotate180(&self.pixels),
            Some(_) => imageops::rotate90(&self.pixels),
            None => return self.rotate_resampled(angle, fill),
        };

        Raster {
            pixels,
            alpha: self.alpha,
        }
    }

    fn rotate_resampled(&self, angle: f64, fill: Rgba<u8>) -> Raster {
        let (src_w, src_h) = (self.width() as f64, self.height() as f64);
        let (dst_w, dst_h) = compute_rotated_bounds(self.width(), self.height(), angle);

        let angle_rad = angle.to_radians();
        let cos = angle_rad.cos();
        let sin = angle_rad.sin();

        let src_cx = src_w / 2.0;
        let src_cy = src_h / 2.0;
        let dst_cx = dst_w as f64 / 2.0;
        let dst_cy = dst_h as f64 / 2.0;

        let mut output = Raster::filled(crate::geometry::Size::new(dst_w, dst_h), fill);
        output.alpha = self.alpha;

        for (dst_x, dst_y, pixel) in output.pixels.enumerate_pixels_mut() {
            // Sample at pixel centers
            let dx = dst_x as f64 + 0.5 - dst_cx;
            let dy = dst_y as f64 + 0.5 - dst_cy;

            let src_x = dx * cos - dy * sin + src_cx - 0.5;
            let src_y = dx * sin + dy * cos + src_cy - 0.5;

            *pixel = self.sample_bilinear(src_x, src_y, fill);
        }

        output
    }

    /// Bilinear sample where neighbors outside the buffer read as `fill`.
    fn sample_bilinear(&self, x: f64, y: f64, fill: Rgba<u8>) -> Rgba<u8> {
        let (w, h) = (self.width() as i64, self.height() as i64);

        if x <= -1.0 || y <= -1.0 || x >= w as f64 || y >= h as f64 {
            return fill;
        }

        let x0 = x.floor() as i64;
        let y0 = y.floor() as i64;
        let fx = x - x0 as f64;
        let fy = y - y0 as f64;

        let fetch = |px: i64, py: i64| -> [f64; 4] {
            let pixel = if px >= 0 && py >= 0 && px < w && py < h {
                *self.pixels.get_pixel(px as u32, py as u32)
            } else {
                fill
            };
            pixel.0.map(f64::from)
        };

        let p00 = fetch(x0, y0);
        let p10 = fetch(x0 + 1, y0);
        let p01 = fetch(x0, y0 + 1);
        let p11 = fetch(x0 + 1, y0 + 1);

        let mut result = [0u8; 4];
        for i in 0..4 {
            let v = p00[i] * (1.0 - fx) * (1.0 - fy)
                + p10[i] * fx * (1.0 - fy)
                + p01[i] * (1.0 - fx) * fy
                + p11[i] * fx * fy;
            result[i] = v.clamp(0.0, 255.0).round() as u8;
        }

        Rgba(result)
    }
}
