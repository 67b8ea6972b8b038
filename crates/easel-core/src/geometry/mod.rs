//! Pure geometry helpers: size normalization, anchoring and resize planning.
//!
//! Nothing in this module touches pixels. Every function turns loose user
//! input into exact dimensions or offsets that the handle then feeds to the
//! raster.
//!
//! # Conventions
//!
//! - A `0` in a size pair means "unspecified, infer it".
//! - Planned sizes are truncated toward zero and never drop below 1 pixel.

mod anchor;
mod plan;
mod size;

pub use anchor::{resolve_position, Anchor, Offset};
pub use plan::{plan_max_fit, plan_min_fit, AspectRatio};
pub use size::{ensure_resize_array, normalize_size, Size, SizeSpec};
