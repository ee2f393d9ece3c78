//! Per-image result records.

use crate::classification::RankedResult;
use crate::error::Error;
use crate::geometry::Polygon;
use crate::pipeline::summary::SummaryEntry;
use crate::segmentation::Instance;
use serde::{Serialize, Serializer};

/// One identified fish.
#[derive(Debug, Clone, Serialize)]
pub struct FishReport {
    /// 1-based position among the fish reported for the image.
    pub fish_id: usize,
    /// Outline in source image coordinates.
    pub polygon: Polygon,
    /// Detector confidence, 1.0 for whole-image classification.
    pub score: f32,
    /// Ranked species for this fish.
    pub classifications: RankedResult,
}

/// Everything found in one image.
#[derive(Debug, Clone, Serialize)]
pub struct ImageReport {
    /// Number of fish that were classified.
    pub total_fish_detected: usize,
    /// Distinct species summary across all fish.
    pub detections: Vec<SummaryEntry>,
    /// Per-fish results.
    pub instances: Vec<FishReport>,
}

/// Segmentation-only result for one image.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentationReport {
    /// Number of instances after deduplication.
    pub total_fish_detected: usize,
    /// Instances in area-descending order.
    pub instances: Vec<Instance>,
}

impl From<Vec<Instance>> for SegmentationReport {
    fn from(instances: Vec<Instance>) -> Self {
        Self {
            total_fish_detected: instances.len(),
            instances,
        }
    }
}

/// Result for one input image: either a report or the reason it failed.
///
/// Serialises as `{"filename", "success": true, ...report}` or
/// `{"filename", "success": false, "error"}`.
#[derive(Debug, Clone)]
pub struct ImageOutcome<T = ImageReport> {
    /// Input file name.
    pub filename: String,
    /// Report, or the error message.
    pub result: Result<T, String>,
}

impl<T> ImageOutcome<T> {
    /// Wrap a fallible result, flattening the error chain into one message.
    pub fn new(filename: impl Into<String>, result: crate::error::Result<T>) -> Self {
        Self {
            filename: filename.into(),
            result: result.map_err(|e| error_chain(&e)),
        }
    }

    /// Whether the image was processed.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Serialize)]
struct SuccessRecord<'a, T> {
    filename: &'a str,
    success: bool,
    #[serde(flatten)]
    report: &'a T,
}

#[derive(Serialize)]
struct FailureRecord<'a> {
    filename: &'a str,
    success: bool,
    error: &'a str,
}

impl<T: Serialize> Serialize for ImageOutcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.result {
            Ok(report) => SuccessRecord {
                filename: &self.filename,
                success: true,
                report,
            }
            .serialize(serializer),
            Err(error) => FailureRecord {
                filename: &self.filename,
                success: false,
                error,
            }
            .serialize(serializer),
        }
    }
}

/// Error message followed by each of its sources, joined with `": "`.
pub fn error_chain(error: &Error) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
