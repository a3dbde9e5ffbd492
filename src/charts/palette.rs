//! Color Palette Module
//! Color values used by figures, the default series cycle and color parsing.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("Unknown color: {0}")]
    Unknown(String),
    #[error("Invalid hex color: {0}")]
    InvalidHex(String),
}

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Color at position `index` of the default series cycle.
    pub fn cycle(index: usize) -> Color {
        PALETTE[index % PALETTE.len()]
    }

    fn from_hex(hex: &str) -> Result<Color, ColorError> {
        let digits = hex.trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidHex(hex.to_string()));
        }
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(ColorError::InvalidHex(hex.to_string())),
        };
        let channel = |i: usize| {
            u8::from_str_radix(&expanded[i..i + 2], 16)
                .map_err(|_| ColorError::InvalidHex(hex.to_string()))
        };
        Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        PALETTE[0]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Default series cycle (tab10).
pub const PALETTE: [Color; 10] = [
    Color::rgb(31, 119, 180),  // Blue
    Color::rgb(255, 127, 14),  // Orange
    Color::rgb(44, 160, 44),   // Green
    Color::rgb(214, 39, 40),   // Red
    Color::rgb(148, 103, 189), // Purple
    Color::rgb(140, 86, 75),   // Brown
    Color::rgb(227, 119, 194), // Pink
    Color::rgb(127, 127, 127), // Gray
    Color::rgb(188, 189, 34),  // Olive
    Color::rgb(23, 190, 207),  // Cyan
];

const TAB_NAMES: [&str; 10] = [
    "blue", "orange", "green", "red", "purple", "brown", "pink", "gray", "olive", "cyan",
];

const NAMED: [(&str, Color); 20] = [
    ("black", Color::rgb(0, 0, 0)),
    ("k", Color::rgb(0, 0, 0)),
    ("white", Color::rgb(255, 255, 255)),
    ("w", Color::rgb(255, 255, 255)),
    ("red", Color::rgb(255, 0, 0)),
    ("r", Color::rgb(255, 0, 0)),
    ("green", Color::rgb(0, 128, 0)),
    ("g", Color::rgb(0, 128, 0)),
    ("blue", Color::rgb(0, 0, 255)),
    ("b", Color::rgb(0, 0, 255)),
    ("orange", Color::rgb(255, 165, 0)),
    ("purple", Color::rgb(128, 0, 128)),
    ("gray", Color::rgb(128, 128, 128)),
    ("grey", Color::rgb(128, 128, 128)),
    ("steelblue", Color::rgb(70, 130, 180)),
    ("skyblue", Color::rgb(135, 206, 235)),
    ("navy", Color::rgb(0, 0, 128)),
    ("teal", Color::rgb(0, 128, 128)),
    ("salmon", Color::rgb(250, 128, 114)),
    ("gold", Color::rgb(255, 215, 0)),
];

impl FromStr for Color {
    type Err = ColorError;

    /// Accepts `#rrggbb`, `#rgb`, cycle references (`C0`..`C9`),
    /// `tab:` names and a small set of common named colors.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = s.trim().to_ascii_lowercase();

        if spec.starts_with('#') {
            return Color::from_hex(&spec);
        }

        if let Some(index) = spec.strip_prefix('c').and_then(|n| n.parse::<usize>().ok()) {
            return Ok(Color::cycle(index));
        }

        if let Some(name) = spec.strip_prefix("tab:") {
            let name = if name == "grey" { "gray" } else { name };
            return TAB_NAMES
                .iter()
                .position(|n| *n == name)
                .map(|i| PALETTE[i])
                .ok_or_else(|| ColorError::Unknown(s.to_string()));
        }

        NAMED
            .iter()
            .find(|(name, _)| *name == spec)
            .map(|(_, color)| *color)
            .ok_or_else(|| ColorError::Unknown(s.to_string()))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let spec = String::deserialize(deserializer)?;
        spec.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_short_hex() {
        assert_eq!("#1f77b4".parse::<Color>().unwrap(), Color::rgb(31, 119, 180));
        assert_eq!("#fff".parse::<Color>().unwrap(), Color::WHITE);
        assert!("#12345".parse::<Color>().is_err());
        assert!("#zzzzzz".parse::<Color>().is_err());
    }

    #[test]
    fn parses_cycle_and_tab_names() {
        assert_eq!("C1".parse::<Color>().unwrap(), PALETTE[1]);
        assert_eq!("C12".parse::<Color>().unwrap(), PALETTE[2]);
        assert_eq!("tab:green".parse::<Color>().unwrap(), PALETTE[2]);
        assert_eq!("tab:grey".parse::<Color>().unwrap(), PALETTE[7]);
    }

    #[test]
    fn parses_named_colors_case_insensitively() {
        assert_eq!("SteelBlue".parse::<Color>().unwrap(), Color::rgb(70, 130, 180));
        assert_eq!("k".parse::<Color>().unwrap(), Color::BLACK);
        assert_eq!(
            "chartreuse".parse::<Color>(),
            Err(ColorError::Unknown("chartreuse".to_string()))
        );
    }

    #[test]
    fn serde_uses_hex_strings() {
        let color: Color = serde_json::from_str("\"tab:orange\"").unwrap();
        assert_eq!(color, PALETTE[1]);
        assert_eq!(serde_json::to_string(&color).unwrap(), "\"#ff7f0e\"");
    }
}
