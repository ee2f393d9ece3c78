//! Fish instance segmentation: raw network output to deduplicated instances.

mod decoder;
mod dedup;

pub use decoder::{DecodeParams, InstanceCandidate, decode_instances};
pub use dedup::{Instance, deduplicate};

use crate::config::SegmentationConfig;
use crate::error::{Error, Result};
use crate::geometry::ScaleFactors;
use crate::imaging::resize_for_segmentation;
use crate::inference::SegmentationModel;
use image::RgbImage;
use ndarray::{Array1, Array2, Array4};
use tracing::{debug, info};

/// Raw tensors produced by an instance-segmentation network.
///
/// All arrays are indexed by detection along their first axis.
#[derive(Debug, Clone)]
pub struct RawSegmentation {
    /// Boxes as `[x1, y1, x2, y2]` in frame coordinates, shape `[N, 4]`.
    pub boxes: Array2<f32>,
    /// Class ids, length `N`.
    pub classes: Vec<i64>,
    /// Soft masks, shape `[N, 1, Mh, Mw]`. Either frame-sized or RoI-sized.
    pub masks: Array4<f32>,
    /// Detection scores, length `N`.
    pub scores: Array1<f32>,
}

impl RawSegmentation {
    /// An output with no detections.
    pub fn empty() -> Self {
        Self {
            boxes: Array2::zeros((0, 4)),
            classes: Vec::new(),
            masks: Array4::zeros((0, 1, 1, 1)),
            scores: Array1::zeros(0),
        }
    }

    /// Number of detections.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Whether there are no detections.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Check that every array describes the same number of detections.
    pub fn validate(&self) -> Result<()> {
        let n = self.scores.len();
        let malformed = |reason: String| Err(Error::MalformedModelOutput { reason });

        if self.boxes.ncols() != 4 {
            return malformed(format!("boxes must have 4 columns, got {}", self.boxes.ncols()));
        }
        if self.boxes.nrows() != n {
            return malformed(format!("{} boxes for {n} scores", self.boxes.nrows()));
        }
        if self.classes.len() != n {
            return malformed(format!("{} class ids for {n} scores", self.classes.len()));
        }
        let shape = self.masks.shape();
        if shape[0] != n {
            return malformed(format!("{} masks for {n} scores", shape[0]));
        }
        if n > 0 && (shape[1] == 0 || shape[2] == 0 || shape[3] == 0) {
            return malformed(format!("empty mask shape {shape:?}"));
        }
        Ok(())
    }
}

/// Frame size the segmentation network sees and the factors back to source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizePlan {
    /// Frame width.
    pub width: u32,
    /// Frame height.
    pub height: u32,
    /// Factors mapping frame coordinates to source coordinates.
    pub scale: ScaleFactors,
}

/// Scale the shorter side to `min_size`, then shrink so the longer side is
/// at most `max_size`. Dimensions truncate and never drop below one pixel.
pub fn compute_resize(width: u32, height: u32, min_size: u32, max_size: u32) -> ResizePlan {
    let (w, h) = (width.max(1) as f32, height.max(1) as f32);

    let scale = min_size as f32 / w.min(h);
    let (mut new_w, mut new_h) = ((w * scale) as u32, (h * scale) as u32);

    if new_w.max(new_h) > max_size {
        let shrink = max_size as f32 / new_w.max(new_h) as f32;
        new_w = (new_w as f32 * shrink) as u32;
        new_h = (new_h as f32 * shrink) as u32;
    }

    let (new_w, new_h) = (new_w.max(1), new_h.max(1));
    ResizePlan {
        width: new_w,
        height: new_h,
        scale: ScaleFactors {
            x: w / new_w as f32,
            y: h / new_h as f32,
        },
    }
}

/// Runs a segmentation model and turns its output into fish instances.
pub struct Segmenter {
    model: Box<dyn SegmentationModel>,
    config: SegmentationConfig,
}

impl Segmenter {
    /// Wrap a model with decoding and deduplication settings.
    pub fn new(model: Box<dyn SegmentationModel>, config: SegmentationConfig) -> Self {
        Self { model, config }
    }

    /// Active settings.
    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Locate fish in an image. Every returned mask matches the image size.
    pub fn segment(&self, image: &RgbImage) -> Result<Vec<Instance>> {
        let (src_w, src_h) = image.dimensions();
        let plan = compute_resize(src_w, src_h, self.config.min_size, self.config.max_size);
        debug!(
            "Segmentation frame {}x{} for source {}x{}",
            plan.width, plan.height, src_w, src_h
        );

        let input = resize_for_segmentation(image, plan.width, plan.height);
        let raw = self.model.infer(&input)?;
        raw.validate()?;

        let params = DecodeParams {
            score_threshold: self.config.score_threshold,
            mask_threshold: self.config.mask_threshold,
            frame: (plan.width, plan.height),
            source: (src_w, src_h),
            scale: plan.scale,
        };
        let candidates = decode_instances(&raw, &params)?;
        let instances = deduplicate(candidates, self.config.nms_threshold);

        info!(
            "Detected {} fish ({} raw detections)",
            instances.len(),
            raw.len()
        );
        Ok(instances)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_landscape() {
        let plan = compute_resize(1600, 1200, 800, 1333);
        assert_eq!((plan.width, plan.height), (1066, 800));
        assert!((plan.scale.x - 1600.0 / 1066.0).abs() < 1e-6);
        assert!((plan.scale.y - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_resize_caps_long_side() {
        let plan = compute_resize(4000, 1000, 800, 1333);
        assert!((1332..=1333).contains(&plan.width));
        assert!(plan.height < 800);
    }

    #[test]
    fn test_resize_scales_are_per_axis() {
        let plan = compute_resize(300, 600, 800, 1333);
        assert!(plan.height <= 1333);
        assert!((665..=667).contains(&plan.width));
        assert!((plan.scale.x - 300.0 / plan.width as f32).abs() < 1e-6);
        assert!((plan.scale.y - 600.0 / plan.height as f32).abs() < 1e-6);
    }

    #[test]
    fn test_validate_misaligned() {
        let mut raw = RawSegmentation::empty();
        raw.scores = Array1::from_vec(vec![0.9]);
        assert!(matches!(
            raw.validate(),
            Err(Error::MalformedModelOutput { .. })
        ));
    }

    #[test]
    fn test_validate_empty_ok() {
        assert!(RawSegmentation::empty().validate().is_ok());
        assert!(RawSegmentation::empty().is_empty());
    }
}
