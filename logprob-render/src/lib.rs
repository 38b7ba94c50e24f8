//! Logprob Render - colored inline HTML for per-token log-probabilities
//!
//! This crate provides:
//! - A color mapper turning a log-probability into a blue swatch
//! - Order-preserving token distributions decoded from JSON
//! - An HTML renderer with hover tooltips listing every alternative
//! - Display sinks (in-memory, any writer, evcxr notebooks)

pub mod color;
pub mod display;
pub mod distribution;
pub mod render;

pub use color::{color_for, Color, ColorBounds};
pub use display::{CaptureSink, DisplayError, DisplaySink, EvcxrSink, WriterSink};
pub use distribution::{DistributionError, LogProbValue, Sample, TokenDistribution};
pub use render::{render_logprobs, Markup, RenderError, RenderStats, Renderer};

use thiserror::Error;

/// Errors from loading or validating a [`RenderConfig`]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid bounds: min_logprob ({min}) must be below max_logprob ({max})")]
    InvalidBounds { min: f64, max: f64 },

    #[error("Invalid lightness_scale {0}: expected a value in (0, 1]")]
    InvalidLightness(f64),
}

/// Configuration for rendering
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct RenderConfig {
    /// Log-probability mapped to the darkest blue; anything lower is "below range"
    #[serde(default = "default_min_logprob")]
    pub min_logprob: f64,

    /// Log-probability mapped to white
    #[serde(default = "default_max_logprob")]
    pub max_logprob: f64,

    /// How far the darkest color departs from white (0-1). Lower keeps text readable.
    #[serde(default = "default_lightness_scale")]
    pub lightness_scale: f64,

    /// Escape tokens and header text before embedding them in HTML
    #[serde(default = "default_escape_html")]
    pub escape_html: bool,
}

fn default_min_logprob() -> f64 { -0.5 }
fn default_max_logprob() -> f64 { 0.0 }
fn default_lightness_scale() -> f64 { 0.8 }
fn default_escape_html() -> bool { true }

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            min_logprob: default_min_logprob(),
            max_logprob: default_max_logprob(),
            lightness_scale: default_lightness_scale(),
            escape_html: default_escape_html(),
        }
    }
}

impl RenderConfig {
    /// Parse a config from TOML text and validate it.
    ///
    /// Missing keys fall back to their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: RenderConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the bounds and lightness describe a well-defined mapping
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Written so NaN fails both checks
        if !(self.min_logprob < self.max_logprob) {
            return Err(ConfigError::InvalidBounds {
                min: self.min_logprob,
                max: self.max_logprob,
            });
        }
        if !(self.lightness_scale > 0.0 && self.lightness_scale <= 1.0) {
            return Err(ConfigError::InvalidLightness(self.lightness_scale));
        }
        Ok(())
    }

    /// Color bounds described by this config
    pub fn bounds(&self) -> ColorBounds {
        ColorBounds::new(self.min_logprob, self.max_logprob)
    }

    pub fn with_bounds(mut self, min_logprob: f64, max_logprob: f64) -> Self {
        self.min_logprob = min_logprob;
        self.max_logprob = max_logprob;
        self
    }

    pub fn with_lightness(mut self, lightness_scale: f64) -> Self {
        self.lightness_scale = lightness_scale;
        self
    }

    pub fn with_escape_html(mut self, escape_html: bool) -> Self {
        self.escape_html = escape_html;
        self
    }
}
