//! HTML rendering of log-probability samples
//!
//! Each position becomes an inline box labelled with its most likely
//! token and colored by that token's log-probability. Hovering shows every
//! alternative with its log-probability and probability.

mod template;

pub use template::html_escape;

use crate::color::color_for;
use crate::display::{DisplayError, DisplaySink, EvcxrSink};
use crate::distribution::{LogProbValue, Sample, TokenDistribution};
use crate::RenderConfig;
use std::fmt::Write;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from rendering
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Distribution at position {position} is empty")]
    EmptyDistribution { position: usize },

    #[error("Display error: {0}")]
    Display(#[from] DisplayError),
}

/// Counters collected while rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Token elements emitted
    pub positions: usize,
    /// Positions whose top log-probability fell below the lower bound
    pub below_range: usize,
    /// Positions whose top entry had no numeric log-probability
    pub invalid: usize,
}

/// Rendered HTML plus the stats gathered while producing it
#[derive(Debug, Clone, PartialEq)]
pub struct Markup {
    html: String,
    stats: RenderStats,
}

impl Markup {
    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_string(self) -> String {
        self.html
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Print the markup as rich HTML inside an evcxr Jupyter notebook
    pub fn evcxr_display(&self) -> Result<(), DisplayError> {
        EvcxrSink::stdout().display(self)
    }
}

impl std::fmt::Display for Markup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.html)
    }
}

impl AsRef<str> for Markup {
    fn as_ref(&self) -> &str {
        &self.html
    }
}

/// Format the hover text for one distribution.
///
/// One line per entry in insertion order: `token: -2.0000 (0.14)`, i.e. the
/// log-probability to 4 decimals and `exp(logprob)` rounded to 2 decimals
/// (see [`format_probability`]). Entries without a numeric value print
/// `token: n/a`.
pub fn tooltip_text(dist: &TokenDistribution, escape: bool) -> String {
    let mut out = String::new();
    for (idx, (token, logprob)) in dist.iter().enumerate() {
        if idx > 0 {
            out.push_str(template::LINE_BREAK);
        }
        let token = if escape { html_escape(token) } else { token.to_string() };
        let _ = match (logprob.as_f64(), logprob.probability()) {
            (Some(lp), Some(p)) => write!(out, "{}: {:.4} ({})", token, lp, format_probability(p)),
            _ => write!(out, "{}: n/a", token),
        };
    }
    out
}

/// Round to 2 decimals and print the shortest form: `0.9`, `0.14`.
///
/// Whole numbers keep one decimal (`1.0`, `0.0`).
pub fn format_probability(p: f64) -> String {
    let rounded = (p * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.1}")
    } else {
        format!("{rounded}")
    }
}

/// Renders samples with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    /// Create a renderer.
    ///
    /// The config is not validated; degenerate bounds give ill-scaled colors.
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render a sample to HTML, with `input_text` as an optional header
    pub fn render(&self, sample: &Sample, input_text: &str) -> Result<Markup, RenderError> {
        let mut html = String::from(template::LINE_BREAK);
        html.push_str(template::STYLE_BLOCK);

        if !input_text.is_empty() {
            template::push_header(&mut html, &self.escape(input_text));
        }

        let mut stats = RenderStats::default();
        template::open_content(&mut html);
        for (position, dist) in sample.iter().enumerate() {
            self.render_position(&mut html, &mut stats, position, dist)?;
        }
        template::close_content(&mut html);

        debug!(
            positions = stats.positions,
            below_range = stats.below_range,
            invalid = stats.invalid,
            markup_len = html.len(),
            "Rendered logprob markup"
        );

        Ok(Markup { html, stats })
    }

    /// Render and hand the markup to a display sink
    pub fn render_to(
        &self,
        sample: &Sample,
        input_text: &str,
        sink: &mut dyn DisplaySink,
    ) -> Result<RenderStats, RenderError> {
        let markup = self.render(sample, input_text)?;
        debug!(sink = sink.name(), "Displaying markup");
        sink.display(&markup)?;
        Ok(markup.stats())
    }

    fn render_position(
        &self,
        html: &mut String,
        stats: &mut RenderStats,
        position: usize,
        dist: &TokenDistribution,
    ) -> Result<(), RenderError> {
        let (top_token, top_logprob) = dist
            .top()
            .ok_or(RenderError::EmptyDistribution { position })?;

        match top_logprob {
            LogProbValue::Invalid => {
                warn!(position, token = top_token, "Top entry has no numeric log-probability");
                stats.invalid += 1;
            }
            LogProbValue::Numeric(lp) if lp < self.config.min_logprob => stats.below_range += 1,
            LogProbValue::Numeric(_) => {}
        }

        let color = color_for(top_logprob, self.config.bounds(), self.config.lightness_scale);
        let tooltip = tooltip_text(dist, self.config.escape_html);
        template::push_token(html, &self.escape(top_token), color, &tooltip);
        stats.positions += 1;
        Ok(())
    }

    fn escape(&self, text: &str) -> String {
        if self.config.escape_html {
            html_escape(text)
        } else {
            text.to_string()
        }
    }
}

/// Render a sample with the given config.
///
/// Equivalent to `Renderer::new(config.clone()).render(sample, input_text)`.
pub fn render_logprobs(
    sample: &Sample,
    input_text: &str,
    config: &RenderConfig,
) -> Result<Markup, RenderError> {
    Renderer::new(config.clone()).render(sample, input_text)
}
