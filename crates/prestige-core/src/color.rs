//! Hex colour values as stored on a [`Theme`](crate::model::Theme).

use std::{fmt, str::FromStr};

use crate::Error;

/// An opaque sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}

impl Rgb {
  pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
  pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };

  /// Parse `#RRGGBB` or the `#RGB` shorthand. The leading `#` is required.
  pub fn parse_hex(input: &str) -> Option<Self> {
    let digits = input.trim().strip_prefix('#')?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
      return None;
    }
    match digits.len() {
      6 => Some(Self {
        r: u8::from_str_radix(&digits[0..2], 16).ok()?,
        g: u8::from_str_radix(&digits[2..4], 16).ok()?,
        b: u8::from_str_radix(&digits[4..6], 16).ok()?,
      }),
      3 => {
        let nibble = |i: usize| u8::from_str_radix(&digits[i..=i], 16).ok();
        let (r, g, b) = (nibble(0)?, nibble(1)?, nibble(2)?);
        Some(Self { r: r * 17, g: g * 17, b: b * 17 })
      }
      _ => None,
    }
  }

  /// Lowercase `#rrggbb`.
  pub fn to_hex(self) -> String { format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b) }

  /// Relative luminance in `0.0..=1.0`, good enough to pick a contrasting ink.
  pub fn luminance(self) -> f32 {
    (0.2126 * f32::from(self.r) + 0.7152 * f32::from(self.g) + 0.0722 * f32::from(self.b))
      / 255.0
  }
}

impl FromStr for Rgb {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse_hex(s).ok_or_else(|| Error::InvalidColor(s.to_owned()))
  }
}

impl fmt::Display for Rgb {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.to_hex()) }
}

/// `true` if `value` is a colour [`Rgb::parse_hex`] accepts.
pub fn is_hex_color(value: &str) -> bool { Rgb::parse_hex(value).is_some() }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_long_form() {
    assert_eq!(Rgb::parse_hex("#C7A038"), Some(Rgb { r: 0xc7, g: 0xa0, b: 0x38 }));
  }

  #[test]
  fn parses_shorthand() {
    assert_eq!(Rgb::parse_hex("#fff"), Some(Rgb::WHITE));
  }

  #[test]
  fn rejects_missing_hash_and_bad_digits() {
    assert!(Rgb::parse_hex("C7A038").is_none());
    assert!(Rgb::parse_hex("#C7A0").is_none());
    assert!(Rgb::parse_hex("#GGGGGG").is_none());
    assert!(Rgb::parse_hex("red").is_none());
  }

  #[test]
  fn hex_output_is_lowercase() {
    assert_eq!(Rgb::parse_hex("#3B82F6").unwrap().to_hex(), "#3b82f6");
  }
}
