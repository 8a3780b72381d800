use std::fmt;
use std::str::FromStr;

use palette::Srgb;

use crate::error::PosterError;

/// An 8-bit sRGB triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`, lowercase.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, 255)
    }
}

impl From<Srgb<u8>> for Rgb {
    fn from(c: Srgb<u8>) -> Self {
        Self::new(c.red, c.green, c.blue)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = PosterError;

    /// Accepts `rrggbb` with or without a leading `#`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(PosterError::InvalidHex(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| PosterError::InvalidHex(s.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

pub const DEFAULT_BACKGROUND: Rgb = Rgb::new(0xED, 0xD2, 0x86);
pub const DARK_TEXT: Rgb = Rgb::new(0x2C, 0x3E, 0x50);
pub const LIGHT_TEXT: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);

/// Swatch outline colour: light on dark images, dark on light ones.
pub fn border_color(is_dark: bool) -> Rgb {
    if is_dark { LIGHT_TEXT } else { DARK_TEXT }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_color_follows_verdict() {
        assert_eq!(border_color(true), LIGHT_TEXT);
        assert_eq!(border_color(false), DARK_TEXT);
    }

    #[test]
    fn test_hex_formatting_pads_channels() {
        assert_eq!(Rgb::new(255, 0, 10).to_hex(), "#ff000a");
        assert_eq!(DEFAULT_BACKGROUND.to_string(), "#edd286");
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!("#2C3E50".parse::<Rgb>().unwrap(), DARK_TEXT);
        assert_eq!("ffffff".parse::<Rgb>().unwrap(), LIGHT_TEXT);
        assert_eq!(" 00ff00 ".parse::<Rgb>().unwrap(), Rgb::new(0, 255, 0));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(matches!("#fff".parse::<Rgb>(), Err(PosterError::InvalidHex(_))));
        assert!(matches!("zz0000".parse::<Rgb>(), Err(PosterError::InvalidHex(_))));
        assert!(matches!("ééé".parse::<Rgb>(), Err(PosterError::InvalidHex(_))));
    }
}
