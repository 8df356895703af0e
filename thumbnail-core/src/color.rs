//! sRGB colors with hex string interchange.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{StudioError, StudioResult};

/// An 8-bit sRGB color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Create an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Create a color with explicit alpha.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build an opaque color from hue (degrees), saturation and lightness (0..1).
    #[must_use]
    #[allow(clippy::many_single_char_names)]
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        let h = h.rem_euclid(360.0) / 360.0;
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);

        if s <= f32::EPSILON {
            let v = unit_to_u8(l);
            return Self::rgb(v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Self::rgb(
            unit_to_u8(hue_to_channel(p, q, h + 1.0 / 3.0)),
            unit_to_u8(hue_to_channel(p, q, h)),
            unit_to_u8(hue_to_channel(p, q, h - 1.0 / 3.0)),
        )
    }

    /// The `#rrggbb` part of the color, ignoring alpha.
    #[must_use]
    pub fn hex_rgb(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a 0..1 fraction.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        f32::from(self.a) / 255.0
    }

    /// Whether the color is fully opaque.
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        self.a == 0xff
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn unit_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn hue_to_channel(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex_rgb())?;
        if !self.is_opaque() {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for Color {
    type Err = StudioError;

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (the leading `#` is optional).
    fn from_str(s: &str) -> StudioResult<Self> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !digits.is_ascii() {
            return Err(StudioError::InvalidColor(s.to_string()));
        }

        let byte = |pair: &str| hex_pair(pair, s);

        match digits.len() {
            3 => {
                let nibble = |i: usize| hex_pair(&digits[i..=i].repeat(2), s);
                Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Ok(Self::rgb(
                byte(&digits[0..2])?,
                byte(&digits[2..4])?,
                byte(&digits[4..6])?,
            )),
            8 => Ok(Self::rgba(
                byte(&digits[0..2])?,
                byte(&digits[2..4])?,
                byte(&digits[4..6])?,
                byte(&digits[6..8])?,
            )),
            _ => Err(StudioError::InvalidColor(s.to_string())),
        }
    }
}

fn hex_pair(pair: &str, raw: &str) -> StudioResult<u8> {
    // from_str_radix alone would accept a sign.
    if !pair.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(StudioError::InvalidColor(raw.to_string()));
    }
    u8::from_str_radix(pair, 16).map_err(|_| StudioError::InvalidColor(raw.to_string()))
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_long_and_alpha_forms() {
        assert_eq!("#fff".parse::<Color>().expect("short"), Color::WHITE);
        assert_eq!(
            "#ff9a9e".parse::<Color>().expect("long"),
            Color::rgb(0xff, 0x9a, 0x9e)
        );
        assert_eq!(
            "0000ff80".parse::<Color>().expect("alpha"),
            Color::rgba(0, 0, 0xff, 0x80)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!("#12".parse::<Color>().is_err());
        assert!("#gggggg".parse::<Color>().is_err());
        assert!("#ééé".parse::<Color>().is_err());
    }

    #[test]
    fn rejects_signed_digits() {
        assert!("#+f+f+f".parse::<Color>().is_err());
        assert!("#+0ff00".parse::<Color>().is_err());
        assert!("#-1-1-1-1".parse::<Color>().is_err());
        assert!("+f+f+f".parse::<Color>().is_err());
    }

    #[test]
    fn display_round_trips_through_serde() {
        let c = Color::rgba(0x33, 0x33, 0x33, 0x7f);
        let json = serde_json::to_string(&c).expect("serialize");
        assert_eq!(json, "\"#3333337f\"");
        let back: Color = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, c);
        assert_eq!(Color::BLACK.to_string(), "#000000");
    }

    #[test]
    fn hsl_primaries() {
        assert_eq!(Color::from_hsl(0.0, 1.0, 0.5), Color::rgb(255, 0, 0));
        assert_eq!(Color::from_hsl(120.0, 1.0, 0.5), Color::rgb(0, 255, 0));
        assert_eq!(Color::from_hsl(240.0, 1.0, 0.5), Color::rgb(0, 0, 255));
        assert_eq!(Color::from_hsl(42.0, 0.0, 1.0), Color::WHITE);
    }
}
