//! Size input normalization.

use serde::{Deserialize, Serialize};

/// Exact pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Length of the shorter side.
    pub fn min_side(self) -> u32 {
        self.width.min(self.height)
    }

    /// Width divided by height.
    pub fn aspect_ratio(self) -> f64 {
        self.width as f64 / self.height.max(1) as f64
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Size::new(width, height)
    }
}

/// Loose size input: a single dimension or a (width, height) pair where `0`
/// means "infer".
///
/// Negative scalars are meaningful to [`crate::ImageHandle::resize`], where
/// they select the min-fit policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeSpec {
    Scalar(i64),
    Pair(i64, i64),
}

impl From<i64> for SizeSpec {
    fn from(value: i64) -> Self {
        SizeSpec::Scalar(value)
    }
}

impl From<i32> for SizeSpec {
    fn from(value: i32) -> Self {
        SizeSpec::Scalar(value as i64)
    }
}

impl From<u32> for SizeSpec {
    fn from(value: u32) -> Self {
        SizeSpec::Scalar(value as i64)
    }
}

impl From<(i64, i64)> for SizeSpec {
    fn from((width, height): (i64, i64)) -> Self {
        SizeSpec::Pair(width, height)
    }
}

impl From<(i32, i32)> for SizeSpec {
    fn from((width, height): (i32, i32)) -> Self {
        SizeSpec::Pair(width as i64, height as i64)
    }
}

impl From<(u32, u32)> for SizeSpec {
    fn from((width, height): (u32, u32)) -> Self {
        SizeSpec::Pair(width as i64, height as i64)
    }
}

impl From<[i32; 2]> for SizeSpec {
    fn from([width, height]: [i32; 2]) -> Self {
        SizeSpec::Pair(width as i64, height as i64)
    }
}

impl From<Size> for SizeSpec {
    fn from(value: Size) -> Self {
        SizeSpec::Pair(value.width as i64, value.height as i64)
    }
}

/// Normalize a size input to exact dimensions.
///
/// A scalar is replicated to both axes. In a pair, a zero height copies the
/// width and then a zero width copies the height. Negative values clamp to
/// zero and any remaining zero becomes the 1-pixel minimum.
pub fn normalize_size(spec: impl Into<SizeSpec>) -> Size {
    let (mut width, mut height) = match spec.into() {
        SizeSpec::Scalar(n) => (n, n),
        SizeSpec::Pair(w, h) => (w, h),
    };

    if height == 0 {
        height = width;
    }
    if width == 0 {
        width = height;
    }

    Size::new(to_dimension(width), to_dimension(height))
}

/// Turn a scalar resize request into a bounding pair for the current size.
///
/// The bound applies to the longer side of the current image: landscape
/// images get `(n, 0)`, portrait images `(0, n)` and squares `(n, n)`. Pairs
/// pass through unchanged. Zeros are resolved later by the resize planner.
pub fn ensure_resize_array(requested: impl Into<SizeSpec>, current: Size) -> (i64, i64) {
    match requested.into() {
        SizeSpec::Pair(w, h) => (w, h),
        SizeSpec::Scalar(n) => match current.width.cmp(&current.height) {
            std::cmp::Ordering::Greater => (n, 0),
            std::cmp::Ordering::Equal => (n, n),
            std::cmp::Ordering::Less => (0, n),
        },
    }
}

fn to_dimension(value: i64) -> u32 {
    value.clamp(1, u32::MAX as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_replicates() {
        assert_eq!(normalize_size(40), Size::new(40, 40));
    }

    #[test]
    fn test_pair_passes_through() {
        assert_eq!(normalize_size((30, 20)), Size::new(30, 20));
    }

    #[test]
    fn test_missing_height_copies_width() {
        assert_eq!(normalize_size((25, 0)), Size::new(25, 25));
    }

    #[test]
    fn test_missing_width_copies_height() {
        assert_eq!(normalize_size((0, 12)), Size::new(12, 12));
    }

    #[test]
    fn test_zero_becomes_minimum_canvas() {
        assert_eq!(normalize_size(0), Size::new(1, 1));
        assert_eq!(normalize_size((0, 0)), Size::new(1, 1));
    }

    #[test]
    fn test_negative_values_clamp_to_minimum() {
        assert_eq!(normalize_size(-5), Size::new(1, 1));
        assert_eq!(normalize_size((-5, 8)), Size::new(1, 8));
    }

    #[test]
    fn test_ensure_resize_array_landscape_bounds_width() {
        assert_eq!(ensure_resize_array(50, Size::new(100, 50)), (50, 0));
    }

    #[test]
    fn test_ensure_resize_array_portrait_bounds_height() {
        assert_eq!(ensure_resize_array(50, Size::new(50, 100)), (0, 50));
    }

    #[test]
    fn test_ensure_resize_array_square() {
        assert_eq!(ensure_resize_array(10, Size::new(64, 64)), (10, 10));
    }

    #[test]
    fn test_ensure_resize_array_pair_untouched() {
        assert_eq!(ensure_resize_array((7, 0), Size::new(64, 32)), (7, 0));
    }

    #[test]
    fn test_size_helpers() {
        let size = Size::new(300, 200);
        assert_eq!(size.min_side(), 200);
        assert!((size.aspect_ratio() - 1.5).abs() < f64::EPSILON);
    }
}
