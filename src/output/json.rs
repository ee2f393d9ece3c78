//! Batch JSON document writer.

use crate::error::{Error, Result};
use crate::output::OutputWriter;
use crate::output::writer::Sink;
use crate::pipeline::{ImageOutcome, ImageReport};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Top-level JSON document for a batch run.
#[derive(Debug, Serialize)]
pub struct BatchDocument<'a, T = ImageReport> {
    /// Whether the batch itself ran; per-image state is in `results`.
    pub success: bool,
    /// Analysis timestamp.
    pub analysis_date: DateTime<Utc>,
    /// One entry per input image, in input order.
    pub results: &'a [ImageOutcome<T>],
}

/// Serialize a batch document for `results` as pretty JSON.
pub fn write_batch_json<T: Serialize>(
    writer: impl Write,
    label: &Path,
    results: &[ImageOutcome<T>],
) -> Result<()> {
    let document = BatchDocument {
        success: true,
        analysis_date: Utc::now(),
        results,
    };
    serde_json::to_writer_pretty(writer, &document).map_err(|e| Error::JsonWrite {
        path: label.to_path_buf(),
        source: e,
    })
}

/// Collects outcomes and writes them as one document on finalize.
pub struct JsonWriter {
    outcomes: Vec<ImageOutcome>,
    sink: Sink,
}

impl JsonWriter {
    /// Write to a file.
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self::with_sink(Sink::file(path)?))
    }

    /// Write to standard output.
    pub fn stdout() -> Self {
        Self::with_sink(Sink::stdout())
    }

    pub(crate) fn with_sink(sink: Sink) -> Self {
        Self {
            outcomes: Vec::new(),
            sink,
        }
    }
}

impl OutputWriter for JsonWriter {
    fn write_header(&mut self) -> Result<()> {
        // Whole document is written at finalize
        Ok(())
    }

    fn write_outcome(&mut self, outcome: &ImageOutcome) -> Result<()> {
        self.outcomes.push(outcome.clone());
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        write_batch_json(&mut self.sink.writer, &self.sink.label, &self.outcomes)?;
        writeln!(self.sink.writer)?;
        self.sink.writer.flush()?;
        Ok(())
    }
}
