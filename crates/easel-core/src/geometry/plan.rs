//! Target-size planning for constrained resizes.
//!
//! Planners compute dimensions only; the handle performs the resample.

use serde::{Deserialize, Serialize};

use super::Size;

/// Aspect-preserving shrink so the image fits inside `bound`.
///
/// A zero in either slot leaves that axis unbounded. The width pass runs
/// first and scales both axes; the height pass then runs independently on
/// the result. Images are never enlarged.
pub fn plan_max_fit(bound: (u32, u32), current: Size) -> Size {
    let (max_width, max_height) = (bound.0 as f64, bound.1 as f64);
    let mut width = current.width as f64;
    let mut height = current.height as f64;

    if max_width > 0.0 && width > max_width {
        height /= width / max_width;
        width = max_width;
    }

    if max_height > 0.0 && height > max_height {
        width /= height / max_height;
        height = max_height;
    }

    to_size(width, height)
}

/// Aspect-preserving shrink so the shorter side becomes `min_side`.
///
/// The width counts as the shorter side when the image is square. Sizes
/// whose shorter side is already at most `min_side` are returned unchanged.
pub fn plan_min_fit(min_side: u32, current: Size) -> Size {
    let min_side = min_side.max(1) as f64;
    let mut width = current.width as f64;
    let mut height = current.height as f64;

    if width <= height {
        if width > min_side {
            height /= width / min_side;
            width = min_side;
        }
    } else if height > min_side {
        width /= height / min_side;
        height = min_side;
    }

    to_size(width, height)
}

fn to_size(width: f64, height: f64) -> Size {
    Size::new((width as u32).max(1), (height as u32).max(1))
}

/// A target aspect ratio written as `width.height` in a decimal number.
///
/// `1.6` reads as 1:6 and `16.9` as 16:9: the digits before and after the
/// decimal point are the two sides. A number without a fractional part
/// reads as `n:1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self { width, height })
    }

    /// Decode the `width.height` convention.
    ///
    /// Returns `None` for zero, negative, non-finite or unparseable input.
    pub fn from_decimal(value: f64) -> Option<Self> {
        if !value.is_finite() || value <= 0.0 {
            return None;
        }

        let text = value.to_string();
        let (whole, fraction) = match text.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (text.as_str(), "1"),
        };

        Self::new(whole.parse().ok()?, fraction.parse().ok()?)
    }

    /// Width divided by height.
    pub fn value(self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Largest region of `current` with this ratio, before anchoring.
    ///
    /// Images wider than the target keep their height; others keep their
    /// width. The derived side is truncated toward zero and may be `0` for
    /// extreme ratios, which the crop normalization then resolves.
    pub fn region_within(self, current: Size) -> (i64, i64) {
        let target = self.value();
        let width = current.width as f64;
        let height = current.height as f64;

        if current.aspect_ratio() > target {
            ((height * target) as i64, current.height as i64)
        } else {
            (current.width as i64, (width / target) as i64)
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn size_strategy() -> impl Strategy<Value = Size> {
        (1u32..=5000, 1u32..=5000).prop_map(|(w, h)| Size::new(w, h))
    }

    proptest! {
        /// Property: the planned size respects every nonzero bound.
        #[test]
        fn prop_max_fit_respects_bounds(
            current in size_strategy(),
            bw in 0u32..=3000,
            bh in 0u32..=3000,
        ) {
            let planned = plan_max_fit((bw, bh), current);
            if bw > 0 {
                prop_assert!(planned.width <= bw.max(1));
            }
            if bh > 0 {
                prop_assert!(planned.height <= bh.max(1));
            }
        }

        /// Property: max-fit never enlarges either axis.
        #[test]
        fn prop_max_fit_never_upscales(
            current in size_strategy(),
            bw in 0u32..=6000,
            bh in 0u32..=6000,
        ) {
            let planned = plan_max_fit((bw, bh), current);
            prop_assert!(planned.width <= current.width);
            prop_assert!(planned.height <= current.height);
        }

        /// Property: the aspect ratio survives up to truncation error.
        #[test]
        fn prop_max_fit_preserves_aspect(
            current in (50u32..=4000, 50u32..=4000).prop_map(|(w, h)| Size::new(w, h)),
            bound in 40u32..=2000,
        ) {
            let planned = plan_max_fit((bound, bound), current);
            prop_assume!(planned.width >= 10 && planned.height >= 10);

            // Truncation moves the ratio by less than one pixel per side
            let drift = (planned.aspect_ratio() / current.aspect_ratio() - 1.0).abs();
            let tolerance = 2.0 / planned.min_side() as f64;
            prop_assert!(drift <= tolerance, "planned {:?} from {:?}", planned, current);
        }

        /// Property: min-fit output never exceeds the input.
        #[test]
        fn prop_min_fit_never_upscales(current in size_strategy(), side in 1u32..=6000) {
            let planned = plan_min_fit(side, current);
            prop_assert!(planned.width <= current.width);
            prop_assert!(planned.height <= current.height);
            prop_assert!(planned.min_side() <= side.max(current.min_side()));
        }
    }
}
