//! Colors and palettes.

use crate::error::ConfigError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// An RGB color, written as `#rrggbb` in config files and JSON output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional)
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidColor {
            value: value.to_string(),
        };
        let hex = value.strip_prefix('#').unwrap_or(value);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Colors links and circles are drawn with when no palette is configured
pub const DEFAULT_COLORS: [Color; 8] = [
    Color::rgb(0xff, 0x3b, 0x30),
    Color::rgb(0xff, 0x95, 0x00),
    Color::rgb(0xff, 0xcc, 0x00),
    Color::rgb(0x34, 0xc7, 0x59),
    Color::rgb(0x00, 0xc7, 0xbe),
    Color::rgb(0x00, 0x7a, 0xff),
    Color::rgb(0xaf, 0x52, 0xde),
    Color::rgb(0xff, 0x2d, 0x55),
];

/// A non-empty set of colors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Color>", into = "Vec<Color>")]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> Result<Self, ConfigError> {
        if colors.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        Ok(Self { colors })
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Pick one color uniformly at random
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        self.colors[rng.gen_range(0..self.colors.len())]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.to_vec(),
        }
    }
}

impl TryFrom<Vec<Color>> for Palette {
    type Error = ConfigError;

    fn try_from(colors: Vec<Color>) -> Result<Self, Self::Error> {
        Self::new(colors)
    }
}

impl From<Palette> for Vec<Color> {
    fn from(palette: Palette) -> Self {
        palette.colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!(Color::parse("#ff8000").unwrap(), Color::rgb(255, 128, 0));
        assert_eq!(Color::parse("00FF00").unwrap(), Color::rgb(0, 255, 0));
    }

    #[test]
    fn rejects_malformed_colors() {
        assert!(Color::parse("#fff").is_err());
        assert!(Color::parse("#gg0000").is_err());
        assert!(Color::parse("#ff00ééé").is_err());
    }

    #[test]
    fn rejects_signed_channels() {
        assert!(Color::parse("#+f+f+f").is_err());
        assert!(Color::parse("-f0000").is_err());
    }

    #[test]
    fn color_round_trips_through_json() {
        let json = serde_json::to_string(&Color::rgb(1, 2, 255)).unwrap();
        assert_eq!(json, "\"#0102ff\"");
        let color: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(color, Color::rgb(1, 2, 255));
    }

    #[test]
    fn empty_palette_is_rejected() {
        assert!(matches!(Palette::new(Vec::new()), Err(ConfigError::EmptyPalette)));
        assert!(serde_json::from_str::<Palette>("[]").is_err());
    }

    #[test]
    fn choose_draws_from_palette() {
        let palette = Palette::new(vec![Color::rgb(1, 1, 1), Color::rgb(2, 2, 2)]).unwrap();
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..20 {
            assert!(palette.colors().contains(&palette.choose(&mut rng)));
        }
    }
}
