// SPDX-License-Identifier: MIT
//
// spectra-term color system — RGB values built from HSV coordinates.
//
// Single-character variable names (r, g, b, h, s, v, c, x, m) are the
// standard mathematical convention for these conversions.
#![allow(clippy::many_single_char_names)]
//
// The spectrum widget walks the hue circle at a fixed saturation and
// brightness, so the color model here is deliberately plain: an 8-bit
// sRGB triple, constructed from HSV with the six-sector formula, plus
// the compact `CellColor` that the frame buffer stores and the ANSI
// writer encodes.
//
// Conversion pipeline:
//
//   HSV (degrees, 0–1, 0–1) → sRGB (0–1) → Color (u8 × 3) → CellColor → SGR

use std::fmt;

// ─── Color ───────────────────────────────────────────────────────────────────

/// An immutable 8-bit sRGB color.
///
/// # Examples
///
/// ```
/// use spectra_term::color::Color;
///
/// let red = Color::from_hsv(0.0, 1.0, 1.0);
/// assert_eq!(red, Color::rgb(255, 0, 0));
/// assert_eq!(red.to_hex(), "#ff0000");
/// assert_eq!(Color::from_hsv(180.0, 1.0, 0.5).to_hex(), "#008080");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Pure black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Create a color from 8-bit channels.
    #[inline]
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from HSV coordinates.
    ///
    /// - `h`: hue in degrees, wrapped into [0, 360)
    /// - `s`: saturation, clamped to [0, 1]
    /// - `v`: value (brightness), clamped to [0, 1]
    #[must_use]
    pub fn from_hsv(h: f64, s: f64, v: f64) -> Self {
        let (r, g, b) = hsv_to_srgb(normalize_hue(h), s.clamp(0.0, 1.0), v.clamp(0.0, 1.0));
        Self::rgb(to_u8(r), to_u8(g), to_u8(b))
    }

    /// `#rrggbb`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Convert to a [`CellColor`] for terminal rendering.
    #[inline]
    #[must_use]
    pub const fn to_cell_color(self) -> CellColor {
        CellColor::Rgb(self.r, self.g, self.b)
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color({})", self.to_hex())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ─── CellColor ───────────────────────────────────────────────────────────────

/// Compact color for terminal cell storage.
///
/// This is what the [`FrameBuffer`](crate::buffer::FrameBuffer) holds and
/// what the ANSI writer encodes. Small and cheap to compare, which matters
/// in the diff renderer's inner loop.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    /// 24-bit `TrueColor`.
    Rgb(u8, u8, u8),

    /// Terminal default color (inherits from terminal settings).
    #[default]
    Default,
}

impl fmt::Debug for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl From<Color> for CellColor {
    fn from(color: Color) -> Self {
        color.to_cell_color()
    }
}

// ─── Conversion Functions ────────────────────────────────────────────────────

/// Normalize a hue angle to the range [0, 360).
#[inline]
#[must_use]
pub fn normalize_hue(h: f64) -> f64 {
    let h = h.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if h >= 360.0 { 0.0 } else { h }
}

/// HSV → sRGB (0.0–1.0). `h` must already be in [0, 360).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn hsv_to_srgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    let c = v * s;
    let h6 = h / 60.0;
    let sector = h6.floor() as u32;
    let frac = h6 - f64::from(sector);

    // x = c * (1 - |h6 mod 2 - 1|)
    let x = if sector % 2 == 0 { c * frac } else { c * (1.0 - frac) };
    let m = v - c;

    let (r1, g1, b1) = match sector {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (r1 + m, g1 + m, b1 + m)
}

/// Convert a float (0.0–1.0) to a u8 (0–255) with correct rounding.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u8(v: f64) -> u8 {
    // Safe: clamp guarantees 0.0 <= value <= 255.0 before truncation.
    v.mul_add(255.0, 0.5).clamp(0.0, 255.0) as u8
}

// ─── Tests ───────────────────────────────────────────────────────────────────
