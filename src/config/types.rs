//! Configuration type definitions.

use crate::constants::{
    DEFAULT_MAX_BATCH_SIZE, DEFAULT_MIN_IMAGE_SIZE, DEFAULT_SUMMARY_SIZE, DEFAULT_TOP_K,
    classification, model_files, segmentation,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model and catalog file locations.
    #[serde(default)]
    pub models: ModelsConfig,

    /// Segmentation decoding settings.
    #[serde(default)]
    pub segmentation: SegmentationConfig,

    /// Classification and calibration settings.
    #[serde(default)]
    pub classification: ClassificationConfig,

    /// Default run settings.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Inference settings.
    #[serde(default)]
    pub inference: InferenceConfig,
}

/// Locations of the models and reference data loaded at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Instance segmentation ONNX model.
    pub segmentation: Option<PathBuf>,

    /// Classification ONNX model (embedding + class head outputs).
    pub classification: Option<PathBuf>,

    /// Embedding database JSON file.
    pub embeddings: Option<PathBuf>,

    /// Species categories JSON file.
    pub categories: Option<PathBuf>,

    /// Optional fishing regulations JSON file.
    pub regulations: Option<PathBuf>,
}

impl ModelsConfig {
    /// Conventional file names inside `dir`. Regulations stay unset.
    pub fn in_directory(dir: &Path) -> Self {
        Self {
            segmentation: Some(dir.join(model_files::SEGMENTATION)),
            classification: Some(dir.join(model_files::CLASSIFICATION)),
            embeddings: Some(dir.join(model_files::EMBEDDINGS)),
            categories: Some(dir.join(model_files::CATEGORIES)),
            regulations: None,
        }
    }
}

/// Segmentation decoding settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Detections scoring at or below this are dropped.
    pub score_threshold: f32,

    /// Mask probability threshold for foreground pixels.
    pub mask_threshold: f32,

    /// Polygon IoU above which overlapping instances are suppressed.
    pub nms_threshold: f64,

    /// Target shorter side of the network input.
    pub min_size: u32,

    /// Maximum longer side of the network input.
    pub max_size: u32,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            score_threshold: segmentation::SCORE_THRESHOLD,
            mask_threshold: segmentation::MASK_THRESHOLD,
            nms_threshold: segmentation::NMS_THRESHOLD,
            min_size: segmentation::MIN_SIZE,
            max_size: segmentation::MAX_SIZE,
        }
    }
}

/// Classification settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Number of distinct species reported per fish.
    pub top_k: usize,

    /// Distance with full confidence.
    pub min_distance: f32,

    /// Rejection distance; matches beyond it report the floor confidence.
    pub max_distance: f32,

    /// Lowest confidence reported for an embedding match.
    pub confidence_floor: f32,

    /// Classifier input side length.
    pub input_size: u32,

    /// Minimum crop side length for a fish to be classified.
    pub min_region_size: u32,

    /// Padding around the fish mask when cropping.
    pub crop_padding: u32,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            min_distance: classification::MIN_DISTANCE,
            max_distance: classification::MAX_DISTANCE,
            confidence_floor: classification::CONFIDENCE_FLOOR,
            input_size: classification::INPUT_SIZE,
            min_region_size: classification::MIN_REGION_SIZE,
            crop_padding: classification::CROP_PADDING,
        }
    }
}

/// Default run settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Output formats.
    pub formats: Vec<OutputFormat>,

    /// Distinct species in the per-image summary.
    pub summary_size: usize,

    /// Images smaller than this on either side are rejected.
    pub min_image_size: u32,

    /// Images processed per batch.
    pub max_batch_size: usize,

    /// Classify the whole image when segmentation finds no fish.
    pub fallback_full_image: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            formats: vec![OutputFormat::Json],
            summary_size: DEFAULT_SUMMARY_SIZE,
            min_image_size: DEFAULT_MIN_IMAGE_SIZE,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            fallback_full_image: false,
        }
    }
}

/// Inference device configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InferenceDevice {
    /// Automatically select (GPU if available, else CPU).
    #[default]
    Auto,
    /// Prefer GPU, warn on CPU fallback.
    Gpu,
    /// Force CPU inference.
    Cpu,
}

impl std::fmt::Display for InferenceDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Gpu => write!(f, "gpu"),
            Self::Cpu => write!(f, "cpu"),
        }
    }
}

/// Inference settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Device to use for inference.
    pub device: InferenceDevice,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Batch JSON document.
    Json,
    /// Per-image summary rows.
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
