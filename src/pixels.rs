//! Decoded RGBA bitmaps and the downsampling applied before color extraction.
use tracing::debug;

use crate::{IndicatorError, IndicatorResult};

/// Bytes per pixel in a [`PixelBuffer`] (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Row-major RGBA pixels with explicit dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes, checking that they cover `width * height` pixels.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> IndicatorResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or_else(|| IndicatorError::InvalidPixelBuffer("dimensions overflow".into()))?;

        if data.len() != expected {
            return Err(IndicatorError::InvalidPixelBuffer(format!(
                "expected {expected} bytes for {width}x{height}, got {}",
                data.len()
            )));
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer where every pixel has the same value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        Self {
            width,
            height,
            data: rgba.repeat(count),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.data.len() / CHANNELS
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Iterate pixels as `[r, g, b, a]`.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.data
            .chunks_exact(CHANNELS)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }
}

impl From<image::RgbaImage> for PixelBuffer {
    fn from(image: image::RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: image.into_raw(),
        }
    }
}

/// Per-axis downsample factors for a bitmap about to be scanned for its
/// dominant color.
///
/// An axis is only reduced when it is at least twice `reference_size`; the
/// factor is then `dimension / reference_size` (floored), otherwise 1.
pub fn resample_factors(width: u32, height: u32, reference_size: u32) -> (u32, u32) {
    let factor = |dimension: u32| {
        if reference_size > 0 && dimension >= reference_size.saturating_mul(2) {
            dimension / reference_size
        } else {
            1
        }
    };
    (factor(width), factor(height))
}

/// Nearest-index subsampling.
///
/// Output pixel `i` is a copy of input pixel `i * factor_x * factor_y`; the
/// output holds `pixel_count / (factor_x * factor_y)` pixels. Skipped pixels
/// are not averaged in. Row structure is not preserved, so the result is a
/// single-row strip.
///
/// Factors below 1 are treated as 1.
pub fn resample(pixels: &PixelBuffer, factor_x: u32, factor_y: u32) -> PixelBuffer {
    let step = factor_x.max(1) as usize * factor_y.max(1) as usize;
    let count = pixels.pixel_count() / step;

    let mut data = Vec::with_capacity(count * CHANNELS);
    for i in 0..count {
        let offset = i * step * CHANNELS;
        data.extend_from_slice(&pixels.data[offset..offset + CHANNELS]);
    }

    debug!(
        input_pixels = pixels.pixel_count(),
        output_pixels = count,
        factor_x,
        factor_y,
        "Resampled icon pixels"
    );

    PixelBuffer {
        width: count as u32,
        height: if count == 0 { 0 } else { 1 },
        data,
    }
}
