//! Translucent RGBA color used for particles and links.
//!
//! Serializes as a CSS color string so scene files stay readable and the
//! browser binding can hand the same text straight to the canvas.

use crate::error::BackdropError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 8-bit RGB with a floating-point alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 1.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha replaced, clamped to `[0, 1]`.
    ///
    /// NaN alpha becomes 0.
    pub fn with_alpha(self, a: f64) -> Self {
        let a = if a.is_nan() { 0.0 } else { a.clamp(0.0, 1.0) };
        Self { a, ..self }
    }

    /// Formats as `rgba(r, g, b, a)`.
    pub fn to_css(self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }

    /// Parses `#rrggbb`, `rgb(r, g, b)` or `rgba(r, g, b, a)`.
    pub fn from_css(s: &str) -> Result<Self, BackdropError> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        let (body, has_alpha) = if let Some(rest) = s.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = s.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(BackdropError::InvalidColor(format!("unrecognized color '{s}'")));
        };
        let body = body
            .strip_suffix(')')
            .ok_or_else(|| BackdropError::InvalidColor(format!("missing ')' in '{s}'")))?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let expected = if has_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return Err(BackdropError::InvalidColor(format!(
                "expected {expected} components, got {}",
                parts.len()
            )));
        }
        let channel = |p: &str| {
            p.parse::<u8>()
                .map_err(|e| BackdropError::InvalidColor(format!("bad channel '{p}': {e}")))
        };
        let a = if has_alpha {
            let a: f64 = parts[3]
                .parse()
                .map_err(|e| BackdropError::InvalidColor(format!("bad alpha '{}': {e}", parts[3])))?;
            if !(0.0..=1.0).contains(&a) {
                return Err(BackdropError::InvalidColor(format!("alpha {a} outside [0, 1]")));
            }
            a
        } else {
            1.0
        };
        Ok(Self::new(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?, a))
    }
}

fn parse_hex(hex: &str) -> Result<Rgba, BackdropError> {
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(BackdropError::InvalidColor(format!(
            "expected 6 hex digits, got '{hex}'"
        )));
    }
    let byte = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .map_err(|e| BackdropError::InvalidColor(format!("invalid hex component: {e}")))
    };
    Ok(Rgba::new(byte(0..2)?, byte(2..4)?, byte(4..6)?, 1.0))
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgba::from_css(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_css_matches_canvas_fill_style() {
        assert_eq!(
            Rgba::new(255, 255, 255, 0.15).to_css(),
            "rgba(255, 255, 255, 0.15)"
        );
    }

    #[test]
    fn with_alpha_clamps() {
        assert_eq!(Rgba::WHITE.with_alpha(-0.01).a, 0.0);
        assert_eq!(Rgba::WHITE.with_alpha(1.5).a, 1.0);
        assert_eq!(Rgba::WHITE.with_alpha(f64::NAN).a, 0.0);
        assert_eq!(Rgba::WHITE.with_alpha(0.05).a, 0.05);
    }

    #[test]
    fn from_css_parses_rgba() {
        let c = Rgba::from_css("rgba(255, 255, 255, 0.15)").unwrap();
        assert_eq!(c, Rgba::new(255, 255, 255, 0.15));
    }

    #[test]
    fn from_css_parses_rgb_and_hex() {
        assert_eq!(
            Rgba::from_css("rgb(16,185,129)").unwrap(),
            Rgba::new(16, 185, 129, 1.0)
        );
        assert_eq!(
            Rgba::from_css("#10b981").unwrap(),
            Rgba::new(16, 185, 129, 1.0)
        );
    }

    #[test]
    fn from_css_rejects_garbage() {
        for bad in [
            "white",
            "rgba(1, 2, 3)",
            "rgb(1, 2, 3, 0.5)",
            "rgba(1, 2, 3, 1.5)",
            "rgb(256, 0, 0)",
            "rgb(1, 2, 3",
            "#12345",
            "#gg0000",
        ] {
            assert!(
                matches!(Rgba::from_css(bad), Err(BackdropError::InvalidColor(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn serializes_as_css_string() {
        let json = serde_json::to_string(&Rgba::new(255, 255, 255, 0.15)).unwrap();
        assert_eq!(json, "\"rgba(255, 255, 255, 0.15)\"");
        let back: Rgba = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgba::new(255, 255, 255, 0.15));
    }
}
