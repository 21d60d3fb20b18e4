//! Dominant-color extraction.
//!
//! The representative color of an icon is a saturation and alpha weighted
//! average of its pixels, pushed to a fixed saturation and brightness so
//! that every application glows with comparable intensity.
use tracing::debug;

use crate::{
    IndicatorError, IndicatorResult,
    color::{Rgb, hsv_to_rgb, rgb_to_hsv},
    pixels::{PixelBuffer, resample, resample_factors},
};

/// Saturation above which the average is considered colorful.
const SATURATION_THRESHOLD: f64 = 0.15;
/// Saturation applied to colorful averages.
const TARGET_SATURATION: f64 = 0.65;
/// Brightness applied to every average.
const TARGET_VALUE: f64 = 0.90;

pub const LIGHTER_FACTOR: f64 = 0.2;
pub const DARKER_FACTOR: f64 = -0.5;

/// Three luminance variants of one application's dominant color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub lighter: Rgb,
    pub original: Rgb,
    pub darker: Rgb,
}

impl Palette {
    pub fn from_base(base: Rgb) -> Self {
        Self {
            lighter: base.luminance(LIGHTER_FACTOR),
            original: base.luminance(0.0),
            darker: base.luminance(DARKER_FACTOR),
        }
    }

    /// Extract the palette of an icon bitmap.
    ///
    /// Bitmaps with an axis at least twice `reference_size` are subsampled
    /// first. Fails with [`IndicatorError::DegenerateBuffer`] when no pixel
    /// carries any weight (for instance an empty bitmap).
    pub fn from_bitmap(bitmap: &PixelBuffer, reference_size: u32) -> IndicatorResult<Self> {
        let (factor_x, factor_y) =
            resample_factors(bitmap.width(), bitmap.height(), reference_size);

        let color = if factor_x != 1 || factor_y != 1 {
            dominant_color(&resample(bitmap, factor_x, factor_y))
        } else {
            dominant_color(bitmap)
        };

        color
            .map(Palette::from_base)
            .ok_or(IndicatorError::DegenerateBuffer)
    }
}

/// Compute the remapped dominant color of `pixels`.
///
/// Returns `None` when the accumulated weight is zero or when no pixel is
/// visible at all (every alpha is zero).
pub fn dominant_color(pixels: &PixelBuffer) -> Option<Rgb> {
    let mut visible = false;
    let mut total = 0.0_f64;
    let mut r_total = 0.0_f64;
    let mut g_total = 0.0_f64;
    let mut b_total = 0.0_f64;

    for [r, g, b, a] in pixels.pixels() {
        visible |= a > 0;
        let (r, g, b, a) = (f64::from(r), f64::from(g), f64::from(b), f64::from(a));
        let saturation = r.max(g).max(b) - r.min(g).min(b);
        let relevance = 0.1 * 255.0 * 255.0 + 0.9 * a * saturation;

        r_total += r * relevance;
        g_total += g * relevance;
        b_total += b * relevance;

        total += relevance;
    }

    total *= 255.0;

    if !visible || total == 0.0 || !total.is_finite() {
        debug!(pixels = pixels.pixel_count(), "No weighted pixels to average");
        return None;
    }

    let r = r_total / total;
    let g = g_total / total;
    let b = b_total / total;

    let mut hsv = rgb_to_hsv(r * 255.0, g * 255.0, b * 255.0);
    if hsv.s > SATURATION_THRESHOLD {
        hsv.s = TARGET_SATURATION;
    }
    hsv.v = TARGET_VALUE;

    Some(hsv_to_rgb(hsv.h, hsv.s, hsv.v))
}
