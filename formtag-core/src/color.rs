//! Colors for widget borders and backgrounds

use crate::objects::Object;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Represents a color in PDF documents.
///
/// Supports RGB, Grayscale, and CMYK color spaces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Color {
    /// RGB color (red, green, blue) with values from 0.0 to 1.0
    Rgb(f64, f64, f64),
    /// Grayscale color with value from 0.0 (black) to 1.0 (white)
    Gray(f64),
    /// CMYK color (cyan, magenta, yellow, key/black) with values from 0.0 to 1.0
    Cmyk(f64, f64, f64, f64),
}

impl Color {
    /// Creates an RGB color with values clamped to 0.0-1.0.
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Color::Rgb(r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0))
    }

    /// Creates a grayscale color with value clamped to 0.0-1.0.
    pub fn gray(value: f64) -> Self {
        Color::Gray(value.clamp(0.0, 1.0))
    }

    pub fn black() -> Self {
        Color::Gray(0.0)
    }

    pub fn white() -> Self {
        Color::Gray(1.0)
    }

    pub fn red() -> Self {
        Color::Rgb(1.0, 0.0, 0.0)
    }

    /// Components as a PDF color array (used in `/MK` entries)
    pub fn to_pdf_array(&self) -> Object {
        let components = match *self {
            Color::Rgb(r, g, b) => vec![r, g, b],
            Color::Gray(g) => vec![g],
            Color::Cmyk(c, m, y, k) => vec![c, m, y, k],
        };
        Object::Array(components.into_iter().map(Object::Real).collect())
    }
}

/// Error for color strings that are not 1, 3 or 4 numeric components
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid color {0:?}: expected 1, 3 or 4 comma-separated numbers")]
pub struct ParseColorError(String);

impl FromStr for Color {
    type Err = ParseColorError;

    /// Parses `"1,0,0"` or `"255,0,0"`; components above 1 are read as 0..255.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut values = Vec::new();
        for part in s.split(',') {
            let value: f64 = part
                .trim()
                .parse()
                .map_err(|_| ParseColorError(s.to_string()))?;
            if !value.is_finite() || value < 0.0 {
                return Err(ParseColorError(s.to_string()));
            }
            values.push(value);
        }
        if values.iter().any(|v| *v > 1.0) {
            for v in values.iter_mut() {
                *v /= 255.0;
            }
        }
        match values.as_slice() {
            [g] => Ok(Color::gray(*g)),
            [r, g, b] => Ok(Color::rgb(*r, *g, *b)),
            [c, m, y, k] => Ok(Color::Cmyk(
                c.clamp(0.0, 1.0),
                m.clamp(0.0, 1.0),
                y.clamp(0.0, 1.0),
                k.clamp(0.0, 1.0),
            )),
            _ => Err(ParseColorError(s.to_string())),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Color::Rgb(r, g, b) => write!(f, "{r},{g},{b}"),
            Color::Gray(g) => write!(f, "{g}"),
            Color::Cmyk(c, m, y, k) => write!(f, "{c},{m},{y},{k}"),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}
