//! Background/fill color normalization.
//!
//! Colors arrive as hex strings (`"f00"`, `"#ff0000"`, `"a"`), decimal
//! `"r,g,b"` strings or explicit RGB triples. All of them normalize to a
//! [`Color`], whose `u8` channels keep every value inside 0..=255.

use serde::{Deserialize, Serialize};

use crate::ImageError;

/// An exact 3-channel RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// White, the default fill color.
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels as an array.
    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// The color as an RGBA pixel with the given alpha.
    pub fn with_alpha(self, alpha: u8) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, alpha])
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// Loose color input accepted by [`normalize_color`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorSpec {
    /// Hex digits (optionally `#`-prefixed) or a decimal `r,g,b` string.
    Hex(String),
    /// An explicit triple.
    Rgb([u8; 3]),
}

impl From<&str> for ColorSpec {
    fn from(value: &str) -> Self {
        ColorSpec::Hex(value.to_string())
    }
}

impl From<String> for ColorSpec {
    fn from(value: String) -> Self {
        ColorSpec::Hex(value)
    }
}

impl From<[u8; 3]> for ColorSpec {
    fn from(value: [u8; 3]) -> Self {
        ColorSpec::Rgb(value)
    }
}

impl From<(u8, u8, u8)> for ColorSpec {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        ColorSpec::Rgb([r, g, b])
    }
}

impl From<Color> for ColorSpec {
    fn from(value: Color) -> Self {
        ColorSpec::Rgb(value.channels())
    }
}

/// Normalize any color input to an exact [`Color`].
///
/// # Errors
///
/// Returns [`ImageError::InvalidColor`] for hex strings whose length is not
/// 1, 3 or 6, for non-hex digits, and for malformed `r,g,b` strings.
pub fn normalize_color(spec: impl Into<ColorSpec>) -> Result<Color, ImageError> {
    match spec.into() {
        ColorSpec::Rgb([r, g, b]) => Ok(Color::new(r, g, b)),
        ColorSpec::Hex(text) => {
            if text.contains(',') {
                parse_decimal(&text)
            } else {
                parse_hex(&text)
            }
        }
    }
}

/// Format a color as six lowercase hex digits, zero-padded per channel.
pub fn to_hex(color: Color) -> String {
    format!("{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

fn parse_hex(text: &str) -> Result<Color, ImageError> {
    let digits = text.trim().trim_start_matches('#');
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ImageError::InvalidColor(text.to_string()));
    }

    let pairs: [String; 3] = match digits.len() {
        6 => [
            digits[0..2].to_string(),
            digits[2..4].to_string(),
            digits[4..6].to_string(),
        ],
        3 => {
            let doubled: Vec<String> = digits.chars().map(|c| c.to_string().repeat(2)).collect();
            [doubled[0].clone(), doubled[1].clone(), doubled[2].clone()]
        }
        1 => {
            let doubled = digits.repeat(2);
            [doubled.clone(), doubled.clone(), doubled]
        }
        _ => return Err(ImageError::InvalidColor(text.to_string())),
    };

    let channel = |pair: &str| {
        u8::from_str_radix(pair, 16).map_err(|_| ImageError::InvalidColor(text.to_string()))
    };

    Ok(Color::new(
        channel(&pairs[0])?,
        channel(&pairs[1])?,
        channel(&pairs[2])?,
    ))
}

fn parse_decimal(text: &str) -> Result<Color, ImageError> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(ImageError::InvalidColor(text.to_string()));
    }

    let mut channels = [0u8; 3];
    for (slot, part) in channels.iter_mut().zip(parts) {
        let value: i64 = part
            .parse()
            .map_err(|_| ImageError::InvalidColor(text.to_string()))?;
        *slot = value.clamp(0, 255) as u8;
    }

    Ok(Color::new(channels[0], channels[1], channels[2]))
}
