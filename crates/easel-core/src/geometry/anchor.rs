//! Anchor resolution: symbolic grid positions or explicit offsets.
//!
//! The nine grid indices group as follows, where `W, H` are the canvas
//! dimensions and `dx, dy` the content dimensions:
//!
//! ```text
//! x: 0, 3, 7 -> (W - dx) / 2     y: 0, 1, 5 -> (H - dy) / 2
//!    1, 2, 8 -> 0                    2, 3, 4 -> 0
//!    4, 5, 6 -> W - dx               6, 7, 8 -> H - dy
//! ```
//!
//! The grouping is not a compass layout (index 7 is horizontally centered but
//! bottom-aligned, for instance). Callers rely on these exact numbers.

use serde::{Deserialize, Serialize};

use super::Size;

/// Where content is placed on a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    /// Grid index in 0..=8.
    Grid(u8),
    /// Explicit top-left offset in pixels.
    At(i64, i64),
}

impl Anchor {
    /// Both axes centered.
    pub const CENTER: Anchor = Anchor::Grid(0);

    /// Grid anchor with the index clamped into 0..=8.
    pub fn grid(index: i64) -> Self {
        Anchor::Grid(index.clamp(0, 8) as u8)
    }
}

impl Default for Anchor {
    fn default() -> Self {
        Anchor::CENTER
    }
}

impl From<i32> for Anchor {
    fn from(value: i32) -> Self {
        Anchor::grid(value as i64)
    }
}

impl From<u8> for Anchor {
    fn from(value: u8) -> Self {
        Anchor::grid(value as i64)
    }
}

impl From<(i64, i64)> for Anchor {
    fn from((x, y): (i64, i64)) -> Self {
        Anchor::At(x, y)
    }
}

impl From<(i32, i32)> for Anchor {
    fn from((x, y): (i32, i32)) -> Self {
        Anchor::At(x as i64, y as i64)
    }
}

/// A resolved, possibly fractional or negative, top-left offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset rounded to the nearest pixel.
    pub fn rounded(self) -> (i64, i64) {
        (self.x.round() as i64, self.y.round() as i64)
    }

    /// Offset truncated toward zero.
    pub fn truncated(self) -> (i64, i64) {
        (self.x.trunc() as i64, self.y.trunc() as i64)
    }
}

/// Resolve an anchor to the top-left offset of `content` on `canvas`.
pub fn resolve_position(anchor: impl Into<Anchor>, content: Size, canvas: Size) -> Offset {
    let index = match anchor.into() {
        Anchor::At(x, y) => return Offset::new(x as f64, y as f64),
        Anchor::Grid(index) => index.min(8),
    };

    let (w, h) = (canvas.width as f64, canvas.height as f64);
    let (dx, dy) = (content.width as f64, content.height as f64);

    let x = match index {
        0 | 3 | 7 => (w / 2.0) - (dx / 2.0),
        1 | 2 | 8 => 0.0,
        _ => w - dx,
    };

    let y = match index {
        0 | 1 | 5 => (h / 2.0) - (dy / 2.0),
        2 | 3 | 4 => 0.0,
        _ => h - dy,
    };

    Offset::new(x, y)
}
