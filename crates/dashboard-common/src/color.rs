//! Display colors for polygons and rule bands.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DashboardError;

/// Neutral gray shown when no rule applies or no data is available.
pub const FALLBACK_COLOR_HEX: &str = "#9ca3af";

/// Color representation supporting multiple formats.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    /// Hex string: "#RRGGBB" or "#RRGGBBAA"
    Hex(String),

    /// RGB array: [r, g, b] or [r, g, b, a]
    Array(Vec<u8>),

    /// Explicit RGBA
    Rgba { r: u8, g: u8, b: u8, a: u8 },
}

impl Color {
    /// The neutral gray used for "no data" and "no matching rule".
    pub fn fallback() -> Self {
        Color::Hex(FALLBACK_COLOR_HEX.to_string())
    }

    pub fn hex(s: impl Into<String>) -> Self {
        Color::Hex(s.into())
    }

    /// Convert to RGBA tuple. Malformed hex strings yield opaque black.
    pub fn to_rgba(&self) -> (u8, u8, u8, u8) {
        match self {
            Color::Hex(s) => parse_hex_color(s).unwrap_or((0, 0, 0, 255)),
            Color::Array(arr) => {
                let r = arr.first().copied().unwrap_or(0);
                let g = arr.get(1).copied().unwrap_or(0);
                let b = arr.get(2).copied().unwrap_or(0);
                let a = arr.get(3).copied().unwrap_or(255);
                (r, g, b, a)
            }
            Color::Rgba { r, g, b, a } => (*r, *g, *b, *a),
        }
    }

    /// Lowercase `#rrggbb` form, with an alpha byte only when not opaque.
    pub fn to_hex(&self) -> String {
        let (r, g, b, a) = self.to_rgba();
        if a == 255 {
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
        }
    }

    /// Whether the color can be rendered as-is.
    pub fn validate(&self) -> Result<(), DashboardError> {
        match self {
            Color::Hex(s) => parse_hex_color(s)
                .map(|_| ())
                .ok_or_else(|| DashboardError::InvalidColor(s.clone())),
            Color::Array(arr) if arr.len() == 3 || arr.len() == 4 => Ok(()),
            Color::Array(arr) => Err(DashboardError::InvalidColor(format!("{:?}", arr))),
            Color::Rgba { .. } => Ok(()),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::fallback()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Hex(s) => write!(f, "{}", s),
            _ => write!(f, "{}", self.to_hex()),
        }
    }
}

impl FromStr for Color {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let color = Color::Hex(s.trim().to_string());
        color.validate()?;
        Ok(color)
    }
}

fn parse_hex_color(s: &str) -> Option<(u8, u8, u8, u8)> {
    let s = s.strip_prefix('#')?;
    if !s.is_ascii() {
        return None;
    }

    let byte = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
    match s.len() {
        6 => Some((byte(0)?, byte(2)?, byte(4)?, 255)),
        8 => Some((byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}
