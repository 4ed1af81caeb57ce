//! RGBA colors and their textual forms

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color '{0}'")]
pub struct ColorParseError(pub String);

/// An 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const NONE: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Gray level in `[0, 1]`, 0 being black
    pub fn gray(level: f64) -> Self {
        let v = (level.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgb(v, v, v)
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Alpha channel as a fraction
    pub fn opacity(&self) -> f64 {
        f64::from(self.a) / 255.0
    }

    /// Same color with its alpha scaled by `alpha`
    pub fn with_alpha(self, alpha: f64) -> Self {
        let a = (f64::from(self.a) * alpha.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// `#rrggbb`, ignoring alpha
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse a hex color with leading '#': `#rgb`, `#rrggbb` or `#rrggbbaa`
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError(s.to_string());
        let digits = s.strip_prefix('#').ok_or_else(err)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| err());
        match digits.len() {
            3 => {
                let short = |i: usize| {
                    u8::from_str_radix(&digits[i..i + 1], 16)
                        .map(|v| v * 17)
                        .map_err(|_| err())
                };
                Ok(Self::rgb(short(0)?, short(1)?, short(2)?))
            }
            6 => Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(err()),
        }
    }

    fn named(name: &str) -> Option<Self> {
        let color = match name {
            "white" | "w" => Self::WHITE,
            "black" | "k" => Self::BLACK,
            "red" | "r" => Self::rgb(255, 0, 0),
            "green" | "g" => Self::rgb(0, 128, 0),
            "blue" | "b" => Self::rgb(0, 0, 255),
            "gray" | "grey" => Self::rgb(128, 128, 128),
            "lightgray" | "lightgrey" => Self::rgb(211, 211, 211),
            "darkgray" | "darkgrey" => Self::rgb(169, 169, 169),
            "orange" => Self::rgb(255, 165, 0),
            "steelblue" => Self::rgb(70, 130, 180),
            "none" | "transparent" => Self::NONE,
            _ => return None,
        };
        Some(color)
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    /// Accepts hex forms, a few names, `none`, or a gray level such as `0.60`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('#') {
            return Self::from_hex(s);
        }
        if let Some(color) = Self::named(&s.to_ascii_lowercase()) {
            return Ok(color);
        }
        match s.parse::<f64>() {
            Ok(level) if (0.0..=1.0).contains(&level) => Ok(Self::gray(level)),
            _ => Err(ColorParseError(s.to_string())),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "{}", self.to_hex())
        } else {
            write!(f, "{}{:02x}", self.to_hex(), self.a)
        }
    }
}
