//! Identification pipeline: per-image processing, summaries and batching.

mod batch;
mod context;
mod report;
mod summary;

pub use batch::{collect_input_files, identify_batch};
pub use context::{
    IdentificationContext, IdentificationSettings, load_segmenter, segment_file,
};
pub use report::{
    FishReport, ImageOutcome, ImageReport, SegmentationReport, error_chain,
};
pub use summary::{SummaryEntry, global_summary};
