//! WASM wrapper around the fluent image handle.
//!
//! JavaScript cannot hold `&mut` chains, so every transform mutates the
//! wrapped handle in place and returns nothing (or an error).
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const image = JsImage.from_bytes(bytes, "upload.jpg");
//! image.resize(800);
//! image.ratio(16.9, 0);
//! image.convert("webp");
//! const out = image.to_bytes();
//! ```

use easel_core::{Anchor, ImageConfig, ImageError, ImageHandle, SizeSpec};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Convert a core error into a JavaScript `Error`.
pub(crate) fn to_js_error(error: ImageError) -> JsValue {
    js_sys::Error::new(&error.to_string()).into()
}

/// Size from a width and an optional height.
///
/// A missing height makes a scalar request, whose meaning depends on the
/// operation (square for crops and frames, longer side for resizes).
pub(crate) fn size_spec(width: i32, height: Option<i32>) -> SizeSpec {
    match height {
        Some(height) => SizeSpec::Pair(width as i64, height as i64),
        None => SizeSpec::Scalar(width as i64),
    }
}

/// Anchor from a grid index, an `[x, y]` offset, or `undefined` for center.
fn anchor_from_js(value: &JsValue) -> Result<Anchor, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(Anchor::CENTER);
    }
    if let Some(index) = value.as_f64() {
        return Ok(Anchor::grid(index as i64));
    }

    let (x, y): (i64, i64) = serde_wasm_bindgen::from_value(value.clone())
        .map_err(|e| JsValue::from_str(&format!("Invalid anchor: {}", e)))?;
    Ok(Anchor::At(x, y))
}

/// Snapshot of an image's metadata, serialized as a plain JS object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub mime_type: String,
    pub name: String,
    pub quality: u8,
    pub color: String,
}

impl From<&ImageHandle> for ImageInfo {
    fn from(handle: &ImageHandle) -> Self {
        Self {
            width: handle.width(),
            height: handle.height(),
            format: handle.extension().to_string(),
            mime_type: handle.format().mime_type().to_string(),
            name: handle.name(true),
            quality: handle.quality(),
            color: easel_core::to_hex(handle.color()),
        }
    }
}

/// An editable image.
#[wasm_bindgen]
pub struct JsImage {
    inner: ImageHandle,
}

#[wasm_bindgen]
impl JsImage {
    /// Create a solid canvas.
    ///
    /// # Arguments
    /// * `color` - Hex (`"f00"`, `"#ff0000"`) or `"r,g,b"` string
    /// * `width` - Canvas width in pixels
    /// * `height` - Canvas height; defaults to `width`
    #[wasm_bindgen(constructor)]
    pub fn new(color: &str, width: i32, height: Option<i32>) -> Result<JsImage, JsValue> {
        let inner = ImageHandle::solid(color, size_spec(width, height)).map_err(to_js_error)?;
        Ok(JsImage { inner })
    }

    /// Decode encoded image bytes (BMP, JPEG, GIF, PNG or WEBP).
    ///
    /// EXIF orientation is corrected; `name` loses its extension.
    pub fn from_bytes(bytes: &[u8], name: &str) -> Result<JsImage, JsValue> {
        let inner = ImageHandle::decode(bytes, name).map_err(to_js_error)?;
        Ok(JsImage { inner })
    }

    /// Decode with a configuration object (see `ImageConfig` fields).
    pub fn from_bytes_with_config(
        bytes: &[u8],
        name: &str,
        config: JsValue,
    ) -> Result<JsImage, JsValue> {
        let config: ImageConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?;
        let inner = config.decode(bytes, name).map_err(to_js_error)?;
        Ok(JsImage { inner })
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Size as `{ width, height }`.
    pub fn size(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.size())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// All metadata at once: `{ width, height, format, mime_type, name, quality, color }`.
    pub fn info(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&ImageInfo::from(&self.inner))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Canonical extension of the current format.
    #[wasm_bindgen(getter)]
    pub fn format(&self) -> String {
        self.inner.extension().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.inner.format().mime_type().to_string()
    }

    /// Base name; with `with_extension` the current extension is appended.
    pub fn name(&self, with_extension: bool) -> String {
        self.inner.name(with_extension)
    }

    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> u8 {
        self.inner.quality()
    }

    /// Fill color as six hex digits.
    #[wasm_bindgen(getter)]
    pub fn color(&self) -> String {
        easel_core::to_hex(self.inner.color())
    }

    pub fn set_quality(&mut self, quality: i32) {
        self.inner.set_quality(quality);
    }

    pub fn rename(&mut self, name: &str) {
        self.inner.rename(name);
    }

    pub fn set_color(&mut self, color: &str) -> Result<(), JsValue> {
        self.inner.set_color(color).map_err(to_js_error)?;
        Ok(())
    }

    /// Aspect-preserving shrink; a negative width selects min-fit.
    pub fn resize(&mut self, width: i32, height: Option<i32>) {
        self.inner.resize(size_spec(width, height));
    }

    /// Resample to exactly the given size; `0` keeps an axis.
    pub fn resize_free(&mut self, width: i32, height: i32) {
        self.inner.resize_free((width, height));
    }

    /// Anchored crop. `anchor` is a grid index 0-8 or an `[x, y]` offset.
    pub fn crop(&mut self, width: i32, height: Option<i32>, anchor: JsValue) -> Result<(), JsValue> {
        let anchor = anchor_from_js(&anchor)?;
        self.inner.crop(size_spec(width, height), anchor);
        Ok(())
    }

    /// Crop to a `width.height` ratio such as `16.9`.
    pub fn ratio(&mut self, target: Option<f64>, anchor: JsValue) -> Result<(), JsValue> {
        let anchor = anchor_from_js(&anchor)?;
        self.inner.ratio(target, anchor);
        Ok(())
    }

    /// Letterbox into an exact frame.
    pub fn framing(&mut self, width: i32, height: Option<i32>) {
        self.inner.framing(size_spec(width, height));
    }

    /// Change the output format from an extension token.
    pub fn convert(&mut self, format: &str) -> Result<(), JsValue> {
        self.inner.convert(format).map_err(to_js_error)?;
        Ok(())
    }

    /// Rotate counter-clockwise by `degrees`.
    pub fn rotate(&mut self, degrees: f64, transparent: bool) {
        self.inner.rotate(degrees, transparent);
    }

    pub fn flip_h(&mut self) {
        self.inner.flip_h();
    }

    pub fn flip_v(&mut self) {
        self.inner.flip_v();
    }

    /// Draw `other` on this image; `other` is left unchanged.
    pub fn stamp(&mut self, other: &JsImage, anchor: JsValue) -> Result<(), JsValue> {
        let anchor = anchor_from_js(&anchor)?;
        self.inner.stamp(&other.inner, anchor);
        Ok(())
    }

    /// Apply a filter given as `"Negate"` or `{ Brightness: 20 }`.
    pub fn filter(&mut self, filter: JsValue) -> Result<(), JsValue> {
        let filter: easel_core::Filter = serde_wasm_bindgen::from_value(filter)
            .map_err(|e| JsValue::from_str(&format!("Invalid filter: {}", e)))?;
        self.inner.filter(filter);
        Ok(())
    }

    /// An independent copy.
    pub fn copy(&self) -> JsImage {
        JsImage {
            inner: self.inner.copy(),
        }
    }

    /// Raw RGBA pixels, row-major, for drawing into a canvas.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.raster().pixels().as_raw().clone()
    }

    /// The image encoded in its current format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, JsValue> {
        self.inner.binary().map_err(to_js_error)
    }

    /// The image as a `data:` URI.
    pub fn to_data_uri(&self) -> Result<String, JsValue> {
        self.inner.base64_data_uri().map_err(to_js_error)
    }

    pub fn content_hash(&self) -> Result<String, JsValue> {
        self.inner.content_hash().map_err(to_js_error)
    }

    pub fn file_size_mb(&self) -> Result<f64, JsValue> {
        self.inner.file_size_mb().map_err(to_js_error)
    }
}

impl JsImage {
    /// Borrow the wrapped handle.
    pub fn handle(&self) -> &ImageHandle {
        &self.inner
    }
}
