//! Hex color parsing and frame recoloring

use image::{Rgba, RgbaImage};
use rayon::prelude::*;
use thiserror::Error;

/// Color parsing errors
#[derive(Debug, Error)]
pub enum ColorError {
    #[error("Invalid color format: {0:?} (expected 6 hex digits, optionally prefixed with '#')")]
    InvalidFormat(String),
}

/// An opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    pub fn to_rgba(self, alpha: u8) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, alpha])
    }
}

/// Parse `rrggbb` or `#rrggbb`. Anything else is rejected.
pub fn hex_to_rgb(hex: &str) -> Result<Rgb, ColorError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);

    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidFormat(hex.to_string()));
    }

    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map_err(|_| ColorError::InvalidFormat(hex.to_string()))
    };

    Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}

/// Normalize `#rgb` or `#rrggbb` to lowercase `#rrggbb`.
///
/// Unlike [`hex_to_rgb`] this never fails: inputs without the leading `#`,
/// with another length or with non-hex characters yield `fallback` as given.
pub fn normalize_hex6(input: &str, fallback: &str) -> String {
    let Some(digits) = input.trim().strip_prefix('#') else {
        return fallback.to_string();
    };

    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return fallback.to_string();
    }

    match digits.len() {
        3 => {
            let expanded: String = digits.chars().flat_map(|c| [c, c]).collect();
            format!("#{}", expanded.to_ascii_lowercase())
        }
        6 => format!("#{}", digits.to_ascii_lowercase()),
        _ => fallback.to_string(),
    }
}

/// Return a copy of `image` where every pixel with alpha > 0 takes `color`.
///
/// Alpha is kept as-is so anti-aliased edges of the template stay smooth.
pub fn recolor_non_transparent(image: &RgbaImage, color: Rgb) -> RgbaImage {
    let mut output = image.clone();
    let row_len = output.width() as usize * 4;

    if row_len == 0 || output.height() == 0 {
        return output;
    }

    let raw: &mut [u8] = &mut output;
    raw.par_chunks_mut(row_len).for_each(|row| {
        for pixel in row.chunks_exact_mut(4) {
            if pixel[3] > 0 {
                pixel[0] = color.r;
                pixel[1] = color.g;
                pixel[2] = color.b;
            }
        }
    });

    output
}
