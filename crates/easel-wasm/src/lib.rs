//! Easel WASM - WebAssembly bindings for Easel
//!
//! This crate exposes the easel-core image handle to JavaScript/TypeScript
//! applications.
//!
//! # Module Structure
//!
//! - `image` - The `JsImage` wrapper (load, transform, export)
//! - `console_log` - `log` backend writing to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsImage } from '@easel/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = JsImage.from_bytes(bytes, file.name);
//! image.framing(1200, 630);
//! image.convert("webp");
//! console.log(`Framed ${image.width}x${image.height}`);
//! ```

use wasm_bindgen::prelude::*;

mod console_log;
mod image;

pub use image::{ImageInfo, JsImage};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_log::install(log::LevelFilter::Info);
}

/// Change how much of the core's logging reaches the console.
///
/// Accepts `off`, `error`, `warn`, `info`, `debug` or `trace`.
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter: log::LevelFilter = level
        .parse()
        .map_err(|_| JsValue::from_str(&format!("Unknown log level: {}", level)))?;
    console_log::install(filter);
    Ok(())
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Extensions accepted by `JsImage.convert`.
#[wasm_bindgen]
pub fn supported_formats() -> Vec<String> {
    easel_core::ImageFormat::ALL
        .iter()
        .map(|format| format.extension().to_string())
        .collect()
}
