//! Easel Core - fluent image editing
//!
//! This crate turns loose geometry and color input (a single integer, a
//! partial size pair, a hex or `r,g,b` string, an anchor index) into exact
//! dimensions, colors and offsets, and composes them into resize, crop,
//! frame, rotate and stamp operations on an owned RGBA raster.
//!
//! The entry point is [`ImageHandle`], built from a solid color, a file, a
//! URL (feature `remote`) or in-memory bytes.

pub mod color;
pub mod config;
pub mod error;
pub mod format;
pub mod geometry;
pub mod handle;
pub mod io;
pub mod orientation;
pub mod raster;

pub use color::{normalize_color, to_hex, Color, ColorSpec};
pub use config::{FilterType, ImageConfig};
pub use error::ImageError;
pub use format::ImageFormat;
pub use geometry::{Anchor, AspectRatio, Offset, Size, SizeSpec};
pub use handle::ImageHandle;
pub use orientation::Orientation;
pub use raster::{AlphaPolicy, Filter, Raster};
