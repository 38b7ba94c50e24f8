//! Logprob demo - render a built-in sample to stdout
//!
//! Usage:
//!   logprob-demo > tokens.html
//!
//! The HTML goes to stdout; a colored summary goes to stderr. Inside an
//! evcxr notebook, call `Markup::evcxr_display` instead.

use anyhow::{Context, Result};
use colored::Colorize;
use logprob::{RenderConfig, Renderer, Sample, WriterSink};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const DEMO_PROMPT: &str = "Complete the sentence: The capital of France is";

const DEMO_SAMPLE: &str = r#"[
    {" Paris": -0.0021, " the": -6.41, " a": -7.02},
    {".": -0.18, ",": -1.83, " and": -3.95},
    {" It": -0.92, " The": -1.11, " Paris": -1.73},
    {" is": -0.05, " has": -3.2, " was": -4.4},
    {" known": -0.61, " famous": -0.95, " also": -2.6},
    {" for": -0.01, " as": -4.8}
]"#;

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let sample = Sample::from_json_str(DEMO_SAMPLE).context("Failed to parse demo sample")?;
    let config = RenderConfig::default();
    info!(
        positions = sample.len(),
        min_logprob = config.min_logprob,
        max_logprob = config.max_logprob,
        lightness_scale = config.lightness_scale,
        "Rendering demo sample"
    );

    let renderer = Renderer::new(config);
    let mut sink = WriterSink::stdout();
    let stats = renderer
        .render_to(&sample, DEMO_PROMPT, &mut sink)
        .context("Failed to render demo sample")?;

    eprintln!(
        "{} {} tokens ({} below range, {} invalid)",
        "Rendered".green().bold(),
        stats.positions,
        stats.below_range.to_string().yellow(),
        stats.invalid.to_string().red(),
    );

    Ok(())
}
