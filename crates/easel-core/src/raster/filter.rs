//! Pixel filters.
//!
//! Color filters leave the alpha channel alone. The 3x3 filters convolve the
//! color channels with edge pixels extended past the border, then divide and
//! add an offset before clamping.

use image::{imageops, Pixel, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use super::Raster;

/// A filter to run over a raster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    /// Invert the color channels.
    Negate,
    /// Replace color with its luminance.
    Grayscale,
    /// Add a constant to every color channel.
    Brightness(i32),
    /// Adjust contrast; positive values increase it.
    Contrast(f32),
    /// Add per-channel offsets.
    Colorize(i16, i16, i16),
    EdgeDetect,
    Emboss,
    GaussianBlur,
    MeanRemoval,
    /// Weighted smoothing; higher weights keep more of the center pixel.
    Smooth(f32),
    /// Average square blocks of the given edge length.
    Pixelate(u32),
}

struct Kernel {
    weights: [[f32; 3]; 3],
    divisor: f32,
    offset: f32,
}

impl Kernel {
    const fn new(weights: [[f32; 3]; 3], divisor: f32, offset: f32) -> Self {
        Self {
            weights,
            divisor,
            offset,
        }
    }
}

const EDGE_DETECT: Kernel = Kernel::new(
    [[-1.0, 0.0, -1.0], [0.0, 4.0, 0.0], [-1.0, 0.0, -1.0]],
    1.0,
    127.0,
);

const EMBOSS: Kernel = Kernel::new(
    [[1.5, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, -1.5]],
    1.0,
    127.0,
);

const GAUSSIAN: Kernel = Kernel::new(
    [[1.0, 2.0, 1.0], [2.0, 4.0, 2.0], [1.0, 2.0, 1.0]],
    16.0,
    0.0,
);

const MEAN_REMOVAL: Kernel = Kernel::new(
    [[-1.0, -1.0, -1.0], [-1.0, 9.0, -1.0], [-1.0, -1.0, -1.0]],
    1.0,
    0.0,
);

impl Raster {
    /// Run `filter` over every pixel in place.
    pub fn apply_filter(&mut self, filter: Filter) {
        match filter {
            Filter::Negate => imageops::invert(&mut self.pixels),
            Filter::Grayscale => {
                for pixel in self.pixels.pixels_mut() {
                    let luma = pixel.to_luma()[0];
                    pixel.0 = [luma, luma, luma, pixel[3]];
                }
            }
            Filter::Brightness(amount) => {
                self.pixels = imageops::brighten(&self.pixels, amount);
            }
            Filter::Contrast(amount) => {
                self.pixels = imageops::contrast(&self.pixels, amount);
            }
            Filter::Colorize(r, g, b) => {
                let shift = [r, g, b];
                for pixel in self.pixels.pixels_mut() {
                    for (channel, delta) in pixel.0.iter_mut().zip(shift) {
                        *channel = (*channel as i32 + delta as i32).clamp(0, 255) as u8;
                    }
                }
            }
            Filter::EdgeDetect => self.convolve(&EDGE_DETECT),
            Filter::Emboss => self.convolve(&EMBOSS),
            Filter::GaussianBlur => self.convolve(&GAUSSIAN),
            Filter::MeanRemoval => self.convolve(&MEAN_REMOVAL),
            Filter::Smooth(weight) => {
                let divisor = if (weight + 8.0).abs() < f32::EPSILON {
                    1.0
                } else {
                    weight + 8.0
                };
                let kernel = Kernel::new(
                    [[1.0, 1.0, 1.0], [1.0, weight, 1.0], [1.0, 1.0, 1.0]],
                    divisor,
                    0.0,
                );
                self.convolve(&kernel);
            }
            Filter::Pixelate(block) => self.pixelate(block),
        }
    }

    fn convolve(&mut self, kernel: &Kernel) {
        let source = &self.pixels;
        let (w, h) = (source.width() as i64, source.height() as i64);

        let output = RgbaImage::from_fn(source.width(), source.height(), |x, y| {
            let mut sum = [0.0f32; 3];
            for (ky, row) in kernel.weights.iter().enumerate() {
                for (kx, weight) in row.iter().enumerate() {
                    let sx = (x as i64 + kx as i64 - 1).clamp(0, w - 1) as u32;
                    let sy = (y as i64 + ky as i64 - 1).clamp(0, h - 1) as u32;
                    let pixel = source.get_pixel(sx, sy);
                    for i in 0..3 {
                        sum[i] += pixel[i] as f32 * weight;
                    }
                }
            }

            let alpha = source.get_pixel(x, y)[3];
            let channel =
                |v: f32| (v / kernel.divisor + kernel.offset).round().clamp(0.0, 255.0) as u8;
            Rgba([channel(sum[0]), channel(sum[1]), channel(sum[2]), alpha])
        });

        self.pixels = output;
    }

    fn pixelate(&mut self, block: u32) {
        if block < 2 {
            return;
        }

        let (w, h) = (self.width(), self.height());
        for by in (0..h).step_by(block as usize) {
            for bx in (0..w).step_by(block as usize) {
                let x_end = (bx + block).min(w);
                let y_end = (by + block).min(h);

                let mut sum = [0u64; 4];
                let mut count = 0u64;
                for y in by..y_end {
                    for x in bx..x_end {
                        let pixel = self.pixels.get_pixel(x, y);
                        for i in 0..4 {
                            sum[i] += pixel[i] as u64;
                        }
                        count += 1;
                    }
                }

                let average = Rgba(sum.map(|s| (s / count) as u8));
                for y in by..y_end {
                    for x in bx..x_end {
                        self.pixels.put_pixel(x, y, average);
                    }
                }
            }
        }
    }
}
