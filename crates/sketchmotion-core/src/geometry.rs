//! Geometry and color helpers shared by strokes, shapes and the animation engine.

use kurbo::{Point, Vec2};
use peniko::Color;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error returned when a string is not a usable hex color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid hex color: {0:?}")]
pub struct ColorParseError(pub String);

/// An opaque RGB color, always normalized to lowercase `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    r: u8,
    g: u8,
    b: u8,
}

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (alpha is dropped).
    pub fn parse(input: &str) -> Option<Self> {
        let hex = input.trim().strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        match hex.len() {
            3 => {
                let r = channel(0..1)? * 17;
                let g = channel(1..2)? * 17;
                let b = channel(2..3)? * 17;
                Some(Self::rgb(r, g, b))
            }
            6 | 8 => Some(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            _ => None,
        }
    }

    pub fn components(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self::black()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl std::str::FromStr for HexColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ColorParseError(s.to_string()))
    }
}

impl TryFrom<String> for HexColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

/// Renderer-facing conversion: a presentation layer drawing with `peniko`
/// brushes takes stroke and shape colors through this.
impl From<HexColor> for Color {
    fn from(color: HexColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, 255)
    }
}

/// Colors picked in a `peniko`-based UI; alpha is dropped.
impl From<Color> for HexColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::rgb(rgba.r, rgba.g, rgba.b)
    }
}

/// Generate a uniformly random opaque color.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> HexColor {
    HexColor::rgb(rng.r#gen(), rng.r#gen(), rng.r#gen())
}

/// Arithmetic mean of a point set.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
    Some((sum / points.len() as f64).to_point())
}

/// Uniformly scale a point set about its centroid.
pub fn scale_about_centroid(points: &[Point], factor: f64) -> Vec<Point> {
    let Some(center) = centroid(points) else {
        return Vec::new();
    };
    points
        .iter()
        .map(|p| center + (*p - center) * factor)
        .collect()
}
