//! Color mapping for log-probabilities.
//!
//! Maps a log-probability onto a blue swatch: high-probability tokens stay
//! near white, low-probability tokens turn a darker blue. Values below the
//! configured range get a fixed blue-gray and non-numeric values get white.

use crate::distribution::LogProbValue;

/// Light blue-gray used for anything below `ColorBounds::min`.
pub const BELOW_RANGE_COLOR: Color = Color {
    r: 0xcf as f64 / 255.0,
    g: 0xd8 as f64 / 255.0,
    b: 0xdc as f64 / 255.0,
};

/// Neutral background for entries without a numeric log-probability.
pub const FALLBACK_COLOR: Color = Color::new(1.0, 1.0, 1.0);

/// Linear normalization range for log-probabilities.
///
/// `min < max` is required for a well-defined mapping. The mapper does not
/// check it; see [`crate::RenderConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorBounds {
    pub min: f64,
    pub max: f64,
}

impl ColorBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Rescale `value` into [0, 1] against the bounds (unclamped).
    #[inline]
    pub fn normalize(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }
}

/// RGB color with channels in 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Build a color from 8-bit channels
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Channels as 8-bit values, rounded to nearest.
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        (channel_to_u8(self.r), channel_to_u8(self.g), channel_to_u8(self.b))
    }

    /// CSS hex form, e.g. `#3333ff`
    pub fn to_hex(&self) -> String {
        let (r, g, b) = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[inline]
fn channel_to_u8(c: f64) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Intensity of the red/green channels for an in-range log-probability.
///
/// `(normalized - 1) * lightness + 1`, clamped to `[1 - lightness, 1]` so
/// values above `bounds.max` saturate at white.
pub fn intensity(logprob: f64, bounds: ColorBounds, lightness: f64) -> f64 {
    let normalized = bounds.normalize(logprob);
    let floor = 1.0 - lightness;
    ((normalized - 1.0) * lightness + 1.0).clamp(floor.min(1.0), 1.0)
}

/// Map a log-probability to its display color.
///
/// # Arguments
/// * `logprob` - Value to color; `Invalid` gets [`FALLBACK_COLOR`]
/// * `bounds` - Normalization range
/// * `lightness` - Contrast factor in (0, 1]
///
/// # Returns
/// [`BELOW_RANGE_COLOR`] below `bounds.min`, otherwise a blue whose red and
/// green channels darken as the log-probability drops.
pub fn color_for(logprob: LogProbValue, bounds: ColorBounds, lightness: f64) -> Color {
    match logprob {
        LogProbValue::Invalid => FALLBACK_COLOR,
        LogProbValue::Numeric(value) if value < bounds.min => BELOW_RANGE_COLOR,
        LogProbValue::Numeric(value) => {
            let i = intensity(value, bounds, lightness);
            Color::new(i, i, 1.0)
        }
    }
}
