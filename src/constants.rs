//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "fishid";

/// Default number of distinct species reported per fish instance.
pub const DEFAULT_TOP_K: usize = 10;

/// Number of distinct species in the per-image summary.
pub const DEFAULT_SUMMARY_SIZE: usize = 3;

/// Maximum number of images decoded and processed per batch.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 10;

/// Images smaller than this on either side are rejected.
pub const DEFAULT_MIN_IMAGE_SIZE: u32 = 100;

/// Segmentation decoding and suppression defaults.
pub mod segmentation {
    /// Detections scoring at or below this are dropped.
    pub const SCORE_THRESHOLD: f32 = 0.3;

    /// Mask probabilities above this become foreground.
    pub const MASK_THRESHOLD: f32 = 0.3;

    /// Candidates overlapping a kept instance above this IoU are suppressed.
    pub const NMS_THRESHOLD: f64 = 0.9;

    /// Target length of the shorter image side fed to the network.
    pub const MIN_SIZE: u32 = 800;

    /// Upper bound on the longer image side fed to the network.
    pub const MAX_SIZE: u32 = 1333;
}

/// Classification defaults.
pub mod classification {
    /// Side length of the square classifier input.
    pub const INPUT_SIZE: u32 = 224;

    /// Embedding distance at or below which confidence is 1.0.
    pub const MIN_DISTANCE: f32 = 3.5;

    /// Embedding distance at or beyond which confidence hits the floor.
    pub const MAX_DISTANCE: f32 = 5.0;

    /// Lowest confidence an embedding match can report.
    pub const CONFIDENCE_FLOOR: f32 = 0.01;

    /// Fish regions narrower or shorter than this are skipped.
    pub const MIN_REGION_SIZE: u32 = 50;

    /// Margin added around a fish mask before cropping.
    pub const CROP_PADDING: u32 = 10;

    /// `ImageNet` channel means used for input normalisation.
    pub const MEAN: [f32; 3] = [0.485, 0.456, 0.406];

    /// `ImageNet` channel standard deviations used for input normalisation.
    pub const STD: [f32; 3] = [0.229, 0.224, 0.225];
}

/// Sentinel identity strings for unresolved species.
pub mod unknown {
    /// Common name reported for unknown species.
    pub const COMMON_NAME: &str = "Unknown";

    /// Scientific name reported for unknown species.
    pub const SCIENTIFIC_NAME: &str = "unknown";
}

/// Confidence value bounds.
pub mod confidence {
    /// Minimum valid confidence value.
    pub const MIN: f32 = 0.0;
    /// Maximum valid confidence value.
    pub const MAX: f32 = 1.0;
    /// Decimal places for confidence formatting.
    pub const DECIMAL_PLACES: usize = 4;
}

/// Default file names inside the models directory.
pub mod model_files {
    /// Instance segmentation network.
    pub const SEGMENTATION: &str = "segmentation.onnx";
    /// Classification network.
    pub const CLASSIFICATION: &str = "classification.onnx";
    /// Reference embedding database.
    pub const EMBEDDINGS: &str = "embeddings.json";
    /// Species categories.
    pub const CATEGORIES: &str = "categories.json";
}

/// Output file names.
pub mod output_files {
    /// Batch JSON result file.
    pub const JSON: &str = "fishid_results.json";
    /// Batch CSV summary file.
    pub const CSV: &str = "fishid_results.csv";
}

/// Supported image file extensions.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "gif", "tif", "tiff"];
