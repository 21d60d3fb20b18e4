//! Color primitives shared by the palette extractor and the dot styling path.
use core::fmt;

use crate::{IndicatorError, IndicatorResult};

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const GRAY: Rgb = Rgb::new(128, 128, 128);
    pub const DARK_GRAY: Rgb = Rgb::new(169, 169, 169);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lighten (`factor > 0`) or darken (`factor < 0`) every channel.
    ///
    /// Positive factors move each channel towards 255 by that fraction of the
    /// remaining distance, negative factors scale it towards 0.
    pub fn luminance(self, factor: f64) -> Rgb {
        let shift = |c: u8| -> u8 {
            let c = f64::from(c);
            let shifted = if factor > 0.0 {
                c + (255.0 - c) * factor
            } else if factor < 0.0 {
                c * (1.0 + factor)
            } else {
                c
            };
            shifted.round().clamp(0.0, 255.0) as u8
        };

        Rgb::new(shift(self.r), shift(self.g), shift(self.b))
    }

    pub fn to_hsv(self) -> Hsv {
        rgb_to_hsv(f64::from(self.r), f64::from(self.g), f64::from(self.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Hue, saturation and value, each in `0.0..=1.0` (hue wraps at 1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

/// Convert channel values in the `0..=255` range to HSV.
///
/// Inputs are floating point because the dominant color is an average and
/// is converted before being rounded.
pub fn rgb_to_hsv(r: f64, g: f64, b: f64) -> Hsv {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;
    let s = if max == 0.0 { 0.0 } else { d / max };
    let v = max / 255.0;

    let h = if d == 0.0 {
        0.0
    } else if max == r {
        ((g - b) + d * if g < b { 6.0 } else { 0.0 }) / (6.0 * d)
    } else if max == g {
        ((b - r) + d * 2.0) / (6.0 * d)
    } else {
        ((r - g) + d * 4.0) / (6.0 * d)
    };

    Hsv { h, s, v }
}

/// Convert HSV back to RGB, rounding each channel to the nearest integer.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let i = (h * 6.0).floor();
    let f = h * 6.0 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let (r, g, b) = match (i as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    let channel = |c: f64| (c * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb::new(channel(r), channel(g), channel(b))
}

/// A color with alpha as read from settings or the host theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub rgb: Rgb,
    /// Opacity in `0.0..=1.0`.
    pub alpha: f64,
}

impl Color {
    pub const fn opaque(rgb: Rgb) -> Self {
        Self { rgb, alpha: 1.0 }
    }

    /// Parse a CSS-like color string.
    ///
    /// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`,
    /// `rgba(r, g, b, a)` and a few named colors.
    pub fn parse(input: &str) -> IndicatorResult<Color> {
        let invalid = || IndicatorError::InvalidColor(input.to_string());
        let text = input.trim().to_ascii_lowercase();

        if let Some(hex) = text.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }

        if let Some(args) = text
            .strip_prefix("rgba(")
            .or_else(|| text.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_functional(args).ok_or_else(invalid);
        }

        let named = match text.as_str() {
            "white" => Color::opaque(Rgb::WHITE),
            "black" => Color::opaque(Rgb::new(0, 0, 0)),
            "gray" | "grey" => Color::opaque(Rgb::GRAY),
            "darkgray" | "darkgrey" => Color::opaque(Rgb::DARK_GRAY),
            "transparent" => Color {
                rgb: Rgb::new(0, 0, 0),
                alpha: 0.0,
            },
            _ => return Err(invalid()),
        };
        Ok(named)
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::opaque(rgb)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let byte = |s: &str| u8::from_str_radix(s, 16).ok();
    let nibble = |s: &str| byte(s).map(|n| n * 17);

    if !hex.is_ascii() {
        return None;
    }

    match hex.len() {
        3 => Some(Color::opaque(Rgb::new(
            nibble(&hex[0..1])?,
            nibble(&hex[1..2])?,
            nibble(&hex[2..3])?,
        ))),
        6 | 8 => {
            let rgb = Rgb::new(byte(&hex[0..2])?, byte(&hex[2..4])?, byte(&hex[4..6])?);
            let alpha = if hex.len() == 8 {
                f64::from(byte(&hex[6..8])?) / 255.0
            } else {
                1.0
            };
            Some(Color { rgb, alpha })
        }
        _ => None,
    }
}

fn parse_functional(args: &str) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let channel = |s: &str| s.parse::<u8>().ok();
    let rgb = Rgb::new(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?);
    let alpha = match parts.get(3) {
        Some(a) => a.parse::<f64>().ok().filter(|a| (0.0..=1.0).contains(a))?,
        None => 1.0,
    };

    Some(Color { rgb, alpha })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_display_is_lowercase() {
        assert_eq!(Rgb::new(230, 130, 80).to_string(), "#e68250");
        assert_eq!(Rgb::new(0, 10, 255).to_string(), "#000aff");
    }

    #[test]
    fn test_luminance_zero_is_identity() {
        let c = Rgb::new(12, 200, 99);
        assert_eq!(c.luminance(0.0), c);
    }

    #[test]
    fn test_luminance_lighter_and_darker() {
        let c = Rgb::new(230, 130, 80);
        assert_eq!(c.luminance(0.2), Rgb::new(235, 155, 115));
        assert_eq!(c.luminance(-0.5), Rgb::new(115, 65, 40));
    }

    #[test]
    fn test_rgb_to_hsv_primaries() {
        let red = rgb_to_hsv(255.0, 0.0, 0.0);
        assert_eq!((red.h, red.s, red.v), (0.0, 1.0, 1.0));

        let green = rgb_to_hsv(0.0, 255.0, 0.0);
        assert!((green.h - 1.0 / 3.0).abs() < 1e-12);

        let blue = rgb_to_hsv(0.0, 0.0, 255.0);
        assert!((blue.h - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_gray_has_no_hue_or_saturation() {
        let hsv = rgb_to_hsv(128.0, 128.0, 128.0);
        assert_eq!(hsv.h, 0.0);
        assert_eq!(hsv.s, 0.0);
    }

    #[test]
    fn test_black_has_zero_saturation() {
        let hsv = rgb_to_hsv(0.0, 0.0, 0.0);
        assert_eq!(hsv.s, 0.0);
        assert_eq!(hsv.v, 0.0);
    }

    #[test]
    fn test_hsv_round_trip_on_saturated_colors() {
        for rgb in [
            Rgb::new(255, 0, 0),
            Rgb::new(0, 255, 0),
            Rgb::new(0, 0, 255),
            Rgb::new(255, 255, 0),
            Rgb::new(0, 255, 255),
            Rgb::new(255, 0, 255),
            Rgb::new(200, 100, 50),
        ] {
            let hsv = rgb.to_hsv();
            assert_eq!(hsv_to_rgb(hsv.h, hsv.s, hsv.v), rgb);
        }
    }

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(Color::parse("#fff").unwrap().rgb, Rgb::WHITE);
        assert_eq!(Color::parse("#E0E0E0").unwrap().rgb, Rgb::new(224, 224, 224));
        let half = Color::parse("#00000080").unwrap();
        assert!((half.alpha - 128.0 / 255.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_functional_forms() {
        assert_eq!(
            Color::parse("rgb(1, 2, 3)").unwrap(),
            Color::opaque(Rgb::new(1, 2, 3))
        );
        assert_eq!(Color::parse("rgba(1,2,3,0.5)").unwrap().alpha, 0.5);
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(Color::parse("white").unwrap().rgb, Rgb::WHITE);
        assert_eq!(Color::parse(" Gray ").unwrap().rgb, Rgb::GRAY);
        assert_eq!(Color::parse("transparent").unwrap().alpha, 0.0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "#12", "#ggg", "rgb(1,2)", "rgb(300,0,0)", "rgba(1,2,3,4)", "teal"] {
            assert!(
                matches!(Color::parse(bad), Err(IndicatorError::InvalidColor(_))),
                "{bad:?} should not parse"
            );
        }
    }
}
