//! CSV summary writer: one row per summary species, one row per failed image.

use crate::catalog::LimitValue;
use crate::constants::confidence::DECIMAL_PLACES;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use crate::output::writer::Sink;
use crate::pipeline::ImageOutcome;
use std::io::Write;
use std::path::{Path, PathBuf};

const HEADER: [&str; 7] = [
    "File",
    "Rank",
    "Common name",
    "Scientific name",
    "Confidence",
    "Bag limit",
    "Min size",
];

/// CSV format output writer.
pub struct CsvWriter {
    writer: ::csv::Writer<Box<dyn Write>>,
    label: PathBuf,
}

impl CsvWriter {
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
            writer: ::csv::Writer::from_writer(sink.writer),
            label: sink.label,
        }
    }

    fn row(&mut self, fields: &[&str]) -> Result<()> {
        self.writer
            .write_record(fields)
            .map_err(|e| Error::CsvWrite {
                path: self.label.clone(),
                source: e,
            })
    }
}

fn limit(value: Option<&LimitValue>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

impl OutputWriter for CsvWriter {
    fn write_header(&mut self) -> Result<()> {
        self.row(&HEADER)
    }

    fn write_outcome(&mut self, outcome: &ImageOutcome) -> Result<()> {
        match &outcome.result {
            Ok(report) => {
                for (index, entry) in report.detections.iter().enumerate() {
                    let regulation = entry.regulation.as_ref();
                    let rank = (index + 1).to_string();
                    let confidence =
                        format!("{:.decimal$}", entry.confidence, decimal = DECIMAL_PLACES);
                    let bag_limit = limit(regulation.and_then(|r| r.bag_limit.as_ref()));
                    let min_size = limit(regulation.and_then(|r| r.min_size.as_ref()));
                    self.row(&[
                        outcome.filename.as_str(),
                        rank.as_str(),
                        entry.common_name.as_str(),
                        entry.scientific_name.as_str(),
                        confidence.as_str(),
                        bag_limit.as_str(),
                        min_size.as_str(),
                    ])?;
                }
                Ok(())
            }
            Err(message) => self.row(&[
                outcome.filename.as_str(),
                "error",
                message.as_str(),
                "",
                "",
                "",
                "",
            ]),
        }
    }

    fn finalize(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::Regulation;
    use crate::classification::CandidateSource;
    use crate::pipeline::{ImageReport, SummaryEntry};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn entry(name: &str, confidence: f32, regulation: Option<Regulation>) -> SummaryEntry {
        SummaryEntry {
            common_name: name.to_string(),
            scientific_name: format!("{name} sp."),
            confidence,
            source: CandidateSource::Embedding,
            image_url: None,
            regulation,
        }
    }

    #[test]
    fn test_csv_rows() {
        let buffer = Rc::new(RefCell::new(Vec::new()));
        let mut writer = CsvWriter::with_sink(Sink::memory(Rc::clone(&buffer)));

        let regulation = Regulation {
            species: "Bass, Largemouth".to_string(),
            latin_name: String::new(),
            bag_limit: Some(LimitValue::Number(5.0)),
            min_size: Some(LimitValue::Text("12 inches".to_string())),
            season: None,
            water_type: None,
            extra: serde_json::Map::new(),
        };
        let report = ImageReport {
            total_fish_detected: 2,
            detections: vec![
                entry("Bass, Largemouth", 0.85423, Some(regulation)),
                entry("Pike", 0.5, None),
            ],
            instances: Vec::new(),
        };

        writer.write_header().unwrap();
        writer
            .write_outcome(&ImageOutcome::new("lake.jpg", Ok(report)))
            .unwrap();
        writer
            .write_outcome(&ImageOutcome::new("bad.jpg", Err(Error::NoValidImages)))
            .unwrap();
        writer.finalize().unwrap();

        let contents = String::from_utf8(buffer.borrow().clone()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines[0],
            "File,Rank,Common name,Scientific name,Confidence,Bag limit,Min size"
        );
        assert_eq!(
            lines[1],
            "lake.jpg,1,\"Bass, Largemouth\",\"Bass, Largemouth sp.\",0.8542,5,12 inches"
        );
        assert_eq!(lines[2], "lake.jpg,2,Pike,Pike sp.,0.5000,,");
        assert!(lines[3].starts_with("bad.jpg,error,"));
        assert_eq!(lines.len(), 4);
    }
}
