//! CSS color parsing and luminance.
//!
//! Computed styles come back as `rgb(...)`/`rgba(...)` strings in practice,
//! but authored values (`#hex`, `transparent`, space-separated syntax) are
//! accepted too so the same helpers work on inline styles.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

use crate::consts::{LUMA_WEIGHTS, NEUTRAL_LUMINANCE};

/// An sRGB color with alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self { r: 0, g: 0, b: 0, a: 0.0 };

    #[must_use]
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Fully transparent colors paint nothing and carry no theme signal.
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    /// Perceptual luminance in `0.0..=255.0`.
    #[must_use]
    pub fn luminance(&self) -> f64 {
        let (wr, wg, wb) = LUMA_WEIGHTS;
        wr * f64::from(self.r) + wg * f64::from(self.g) + wb * f64::from(self.b)
    }
}

/// Luminance of a CSS color string, or [`NEUTRAL_LUMINANCE`] if it cannot be parsed.
#[must_use]
pub fn luminance(raw: &str) -> f64 {
    parse_css_color(raw).map_or(NEUTRAL_LUMINANCE, |c| c.luminance())
}

/// Parse a CSS color.
///
/// Supports `transparent`, `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, and the
/// `rgb()`/`rgba()` functions in both comma and space syntax, with numeric
/// or percentage channels and alpha.
#[must_use]
pub fn parse_css_color(raw: &str) -> Option<Rgba> {
    let value = raw.trim().to_ascii_lowercase();
    if value == "transparent" {
        return Some(Rgba::TRANSPARENT);
    }
    if value.starts_with('#') {
        return parse_hex(&value);
    }

    let inner = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))?
        .strip_suffix(')')?;

    let (channels, slash_alpha) = match inner.split_once('/') {
        Some((channels, alpha)) => (channels, Some(alpha.trim())),
        None => (inner, None),
    };
    let parts: Vec<&str> = channels
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();

    let (r, g, b, alpha) = match (parts.as_slice(), slash_alpha) {
        ([r, g, b], alpha) => (*r, *g, *b, alpha),
        ([r, g, b, a], None) => (*r, *g, *b, Some(*a)),
        _ => return None,
    };

    Some(Rgba {
        r: parse_channel(r)?,
        g: parse_channel(g)?,
        b: parse_channel(b)?,
        a: alpha.map_or(Some(1.0), parse_alpha)?,
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_channel(raw: &str) -> Option<u8> {
    let value = parse_number(raw, 2.55)?;
    Some(value.round().clamp(0.0, 255.0) as u8)
}

fn parse_alpha(raw: &str) -> Option<f64> {
    let value = parse_number(raw, 0.01)?;
    Some(value.clamp(0.0, 1.0))
}

/// Parse a finite number; a trailing `%` scales the value by `percent_scale`.
fn parse_number(raw: &str, percent_scale: f64) -> Option<f64> {
    let (digits, scale) = match raw.strip_suffix('%') {
        Some(pct) => (pct, percent_scale),
        None => (raw, 1.0),
    };
    let Ok(value) = digits.parse::<f64>() else {
        return None;
    };
    value.is_finite().then_some(value * scale)
}

#[allow(clippy::cast_possible_truncation)]
fn parse_hex(value: &str) -> Option<Rgba> {
    let hex = value.strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let digit = |i: usize| hex[i..=i].chars().next().and_then(|c| c.to_digit(16)).map(|d| d as u8);
    let nibble = |i: usize| digit(i).map(|d| d * 17);
    let byte = |i: usize| Some(digit(i)? * 16 + digit(i + 1)?);

    let (r, g, b, a) = match hex.len() {
        3 => (nibble(0)?, nibble(1)?, nibble(2)?, 255),
        4 => (nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?),
        6 => (byte(0)?, byte(2)?, byte(4)?, 255),
        8 => (byte(0)?, byte(2)?, byte(4)?, byte(6)?),
        _ => return None,
    };
    Some(Rgba { r, g, b, a: f64::from(a) / 255.0 })
}
