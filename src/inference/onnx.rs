//! ONNX Runtime implementations of the model traits.

use crate::config::InferenceDevice;
use crate::error::{Error, Result};
use crate::inference::{
    ClassificationModel, ClassifierOutput, SegmentationModel, select_execution_providers,
};
use crate::segmentation::RawSegmentation;
use ndarray::{Array1, Array2, Array3, Array4};
use ort::session::Session;
use ort::value::Tensor;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// Open an ONNX model on the requested device.
fn build_session(path: &Path, device: InferenceDevice) -> Result<Session> {
    if !path.exists() {
        return Err(Error::ModelFileNotFound {
            path: path.to_path_buf(),
        });
    }

    let (providers, device_label) = select_execution_providers(device);

    let mut builder = Session::builder().map_err(|e| Error::RuntimeInitialization {
        reason: e.to_string(),
    })?;
    if !providers.is_empty() {
        builder = builder
            .with_execution_providers(providers)
            .map_err(|e| Error::RuntimeInitialization {
                reason: e.to_string(),
            })?;
    }

    let session = builder
        .commit_from_file(path)
        .map_err(|e| Error::ModelLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    info!("Loaded model: {}, device: {}", path.display(), device_label);
    Ok(session)
}

fn lock(session: &Mutex<Session>) -> Result<MutexGuard<'_, Session>> {
    session.lock().map_err(|_| Error::Inference {
        reason: "model session lock poisoned".to_string(),
    })
}

fn inference_error(e: impl std::fmt::Display) -> Error {
    Error::Inference {
        reason: e.to_string(),
    }
}

fn malformed(e: impl std::fmt::Display) -> Error {
    Error::MalformedModelOutput {
        reason: e.to_string(),
    }
}

fn dims(shape: &[i64]) -> Result<Vec<usize>> {
    shape
        .iter()
        .map(|&d| usize::try_from(d).map_err(|_| malformed(format!("negative dimension {d}"))))
        .collect()
}

/// Mask R-CNN style segmentation network.
///
/// Takes an unbatched `[3, H, W]` image and returns, in order: boxes
/// `[N, 4]`, class ids `[N]`, masks `[N, 1, Mh, Mw]` and scores `[N]`.
pub struct OnnxSegmentationModel {
    session: Mutex<Session>,
    path: PathBuf,
}

impl OnnxSegmentationModel {
    /// Load the model file.
    pub fn load(path: &Path, device: InferenceDevice) -> Result<Self> {
        Ok(Self {
            session: Mutex::new(build_session(path, device)?),
            path: path.to_path_buf(),
        })
    }

    /// Path the model was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SegmentationModel for OnnxSegmentationModel {
    fn infer(&self, image: &Array3<f32>) -> Result<RawSegmentation> {
        let (c, h, w) = image.dim();
        let data: Vec<f32> = image.iter().copied().collect();
        let input = Tensor::from_array(([c, h, w], data.into_boxed_slice()))
            .map_err(inference_error)?;

        let mut session = lock(&self.session)?;
        let outputs = session
            .run(ort::inputs![input])
            .map_err(inference_error)?;
        if outputs.len() < 4 {
            return Err(malformed(format!(
                "expected 4 segmentation outputs, got {}",
                outputs.len()
            )));
        }

        let (_, boxes) = outputs[0].try_extract_tensor::<f32>().map_err(malformed)?;
        let n = boxes.len() / 4;
        let boxes = Array2::from_shape_vec((n, 4), boxes.to_vec()).map_err(malformed)?;

        let classes = match outputs[1].try_extract_tensor::<i64>() {
            Ok((_, ids)) => ids.to_vec(),
            Err(_) => {
                let (_, ids) = outputs[1].try_extract_tensor::<f32>().map_err(malformed)?;
                ids.iter().map(|&v| v as i64).collect()
            }
        };

        let (mask_shape, masks) = outputs[2].try_extract_tensor::<f32>().map_err(malformed)?;
        let mask_dims = dims(mask_shape)?;
        let mask_shape = match mask_dims.as_slice() {
            &[n, c, mh, mw] => (n, c, mh, mw),
            &[n, mh, mw] => (n, 1, mh, mw),
            other => return Err(malformed(format!("unexpected mask shape {other:?}"))),
        };
        let masks = Array4::from_shape_vec(mask_shape, masks.to_vec()).map_err(malformed)?;

        let (_, scores) = outputs[3].try_extract_tensor::<f32>().map_err(malformed)?;
        let scores = Array1::from(scores.to_vec());

        debug!(
            "Segmentation output: {} detections, masks {:?}",
            scores.len(),
            masks.shape()
        );
        let raw = RawSegmentation {
            boxes,
            classes,
            masks,
            scores,
        };
        raw.validate()?;
        Ok(raw)
    }
}

/// Two-headed classification network.
///
/// Takes a `[1, 3, S, S]` crop and returns the embedding first and the
/// class logits second.
pub struct OnnxClassificationModel {
    session: Mutex<Session>,
    path: PathBuf,
}

impl OnnxClassificationModel {
    /// Load the model file.
    pub fn load(path: &Path, device: InferenceDevice) -> Result<Self> {
        Ok(Self {
            session: Mutex::new(build_session(path, device)?),
            path: path.to_path_buf(),
        })
    }

    /// Path the model was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ClassificationModel for OnnxClassificationModel {
    fn infer(&self, input: &Array4<f32>) -> Result<ClassifierOutput> {
        let (b, c, h, w) = input.dim();
        let data: Vec<f32> = input.iter().copied().collect();
        let input = Tensor::from_array(([b, c, h, w], data.into_boxed_slice()))
            .map_err(inference_error)?;

        let mut session = lock(&self.session)?;
        let outputs = session
            .run(ort::inputs![input])
            .map_err(inference_error)?;
        if outputs.len() < 2 {
            return Err(malformed(format!(
                "expected embedding and logits outputs, got {}",
                outputs.len()
            )));
        }

        let (_, embedding) = outputs[0].try_extract_tensor::<f32>().map_err(malformed)?;
        let (_, logits) = outputs[1].try_extract_tensor::<f32>().map_err(malformed)?;

        Ok(ClassifierOutput {
            embedding: embedding.to_vec(),
            logits: logits.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dims_rejects_negative() {
        assert_eq!(dims(&[2, 1, 28, 28]).ok(), Some(vec![2, 1, 28, 28]));
        assert!(dims(&[-1, 4]).is_err());
    }

    #[test]
    fn test_load_missing_model() {
        let result = OnnxSegmentationModel::load(
            Path::new("/nonexistent/segmentation.onnx"),
            InferenceDevice::Cpu,
        );
        assert!(matches!(result, Err(Error::ModelFileNotFound { .. })));
    }
}
