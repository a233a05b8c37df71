//! Color codes and the built-in palette

use std::fmt;

use serde::{Deserialize, Serialize};

/// Color code token exactly as it appears in a primitive line.
///
/// Codes are opaque: they are compared as text and never validated against
/// the palette, so `"4"` and `"04"` are different codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorCode(String);

impl ColorCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ColorCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl fmt::Display for ColorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// RGB color with floating point components (0.0 to 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    pub const GRAY: Rgb = Rgb::new(0.5, 0.5, 0.5);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a color from 8-bit channels.
    pub fn from_bytes([r, g, b]: [u8; 3]) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Convert to an array [r, g, b]
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::GRAY
    }
}

/// Palette entries as 8-bit channels, keyed by color code.
const PALETTE: [(&str, [u8; 3]); 6] = [
    ("16", [0, 0, 0]),
    ("15", [255, 255, 255]),
    ("4", [255, 0, 0]),
    ("11", [0, 255, 0]),
    ("1", [0, 0, 255]),
    ("12", [255, 255, 0]),
];

/// Resolve a color code to its palette color.
///
/// Unknown codes fall back to [`Rgb::GRAY`]; this never fails.
pub fn resolve(code: &ColorCode) -> Rgb {
    PALETTE
        .iter()
        .find(|(key, _)| *key == code.as_str())
        .map(|&(_, bytes)| Rgb::from_bytes(bytes))
        .unwrap_or(Rgb::GRAY)
}
