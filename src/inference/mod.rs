//! Model interfaces for segmentation and classification networks.
//!
//! The pipeline only sees the two traits below. [`onnx`] provides the ONNX
//! Runtime implementations used by the CLI; tests substitute in-memory fakes.

pub mod onnx;
mod provider;

pub use onnx::{OnnxClassificationModel, OnnxSegmentationModel};
pub use provider::{compiled_gpu_providers, is_cuda_available, select_execution_providers};

use crate::error::Result;
use crate::segmentation::RawSegmentation;
use ndarray::{Array3, Array4};

/// An instance-segmentation network.
pub trait SegmentationModel: Send + Sync {
    /// Run on a `[3, H, W]` float image with channel values in `0..=255`.
    fn infer(&self, image: &Array3<f32>) -> Result<RawSegmentation>;
}

/// Both heads of the classification network for one crop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifierOutput {
    /// Embedding vector compared against the reference database.
    pub embedding: Vec<f32>,
    /// Raw class-head scores, one per category index.
    pub logits: Vec<f32>,
}

/// A species classification network.
pub trait ClassificationModel: Send + Sync {
    /// Run on a `[1, 3, S, S]` normalised crop.
    fn infer(&self, input: &Array4<f32>) -> Result<ClassifierOutput>;
}
