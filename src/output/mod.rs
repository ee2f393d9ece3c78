//! Output format writers.

mod csv;
mod json;
pub mod progress;
mod writer;

pub use csv::CsvWriter;
pub use json::{BatchDocument, JsonWriter, write_batch_json};
pub use writer::OutputWriter;

use crate::config::OutputFormat;
use crate::constants::output_files;
use crate::error::Result;
use std::path::Path;

/// Open a writer for `format`, inside `output_dir` or on standard output.
pub fn writer_for(
    format: OutputFormat,
    output_dir: Option<&Path>,
) -> Result<Box<dyn OutputWriter>> {
    let writer: Box<dyn OutputWriter> = match (format, output_dir) {
        (OutputFormat::Json, Some(dir)) => {
            Box::new(JsonWriter::create(&dir.join(output_files::JSON))?)
        }
        (OutputFormat::Json, None) => Box::new(JsonWriter::stdout()),
        (OutputFormat::Csv, Some(dir)) => {
            Box::new(CsvWriter::create(&dir.join(output_files::CSV))?)
        }
        (OutputFormat::Csv, None) => Box::new(CsvWriter::stdout()),
    };
    Ok(writer)
}
