//! Display sinks for rendered markup
//!
//! Rendering is pure; handing the markup to something that shows it is the
//! one side effect. Sinks implement [`DisplaySink`].

use crate::render::Markup;
use std::io::Write;
use thiserror::Error;
use tracing::debug;

/// Errors from display sinks
#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for anything that can show rendered markup
pub trait DisplaySink {
    /// Sink name for logging
    fn name(&self) -> &str;

    /// Show one rendered markup
    fn display(&mut self, markup: &Markup) -> Result<(), DisplayError>;
}

/// Wrap HTML in the MIME envelope the evcxr Jupyter kernel renders as rich output
pub(crate) fn evcxr_envelope(html: &str) -> String {
    format!("EVCXR_BEGIN_CONTENT text/html\n{html}\nEVCXR_END_CONTENT")
}

/// Keeps every displayed markup in memory
#[derive(Debug, Default)]
pub struct CaptureSink {
    captured: Vec<Markup>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn captured(&self) -> &[Markup] {
        &self.captured
    }

    /// Most recently displayed markup
    pub fn last(&self) -> Option<&Markup> {
        self.captured.last()
    }

    pub fn clear(&mut self) {
        self.captured.clear();
    }
}

impl DisplaySink for CaptureSink {
    fn name(&self) -> &str {
        "capture"
    }

    fn display(&mut self, markup: &Markup) -> Result<(), DisplayError> {
        self.captured.push(markup.clone());
        Ok(())
    }
}

/// Writes raw HTML to any writer
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> DisplaySink for WriterSink<W> {
    fn name(&self) -> &str {
        "writer"
    }

    fn display(&mut self, markup: &Markup) -> Result<(), DisplayError> {
        writeln!(self.writer, "{}", markup.as_str())?;
        self.writer.flush()?;
        debug!(bytes = markup.as_str().len(), "Wrote markup");
        Ok(())
    }
}

/// Writes HTML wrapped for the evcxr Jupyter kernel
pub struct EvcxrSink<W: Write> {
    writer: W,
}

impl<W: Write> EvcxrSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl EvcxrSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> DisplaySink for EvcxrSink<W> {
    fn name(&self) -> &str {
        "evcxr"
    }

    fn display(&mut self, markup: &Markup) -> Result<(), DisplayError> {
        writeln!(self.writer, "{}", evcxr_envelope(markup.as_str()))?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Renderer, Sample};

    fn sample_markup() -> Markup {
        let sample = Sample::from_json_str(r#"[{"hi": -0.2}]"#).unwrap();
        Renderer::default().render(&sample, "").unwrap()
    }

    #[test]
    fn test_capture_sink() {
        let mut sink = CaptureSink::new();
        let markup = sample_markup();

        sink.display(&markup).unwrap();
        sink.display(&markup).unwrap();
        assert_eq!(sink.captured().len(), 2);
        assert_eq!(sink.last(), Some(&markup));

        sink.clear();
        assert!(sink.last().is_none());
    }

    #[test]
    fn test_writer_sink() {
        let markup = sample_markup();
        let mut sink = WriterSink::new(Vec::new());

        sink.display(&markup).unwrap();
        let written = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(written, format!("{}\n", markup.as_str()));
    }

    #[test]
    fn test_evcxr_sink_envelope() {
        let markup = sample_markup();
        let mut sink = EvcxrSink::new(Vec::new());

        sink.display(&markup).unwrap();
        let written = String::from_utf8(sink.into_inner()).unwrap();
        assert!(written.starts_with("EVCXR_BEGIN_CONTENT text/html\n"));
        assert!(written.ends_with("\nEVCXR_END_CONTENT\n"));
        assert!(written.contains(markup.as_str()));
    }

    #[test]
    fn test_sink_names() {
        assert_eq!(CaptureSink::new().name(), "capture");
        assert_eq!(WriterSink::new(Vec::new()).name(), "writer");
        assert_eq!(EvcxrSink::new(Vec::new()).name(), "evcxr");
    }
}
