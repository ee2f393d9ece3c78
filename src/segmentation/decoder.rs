//! Decoding of raw segmentation tensors into candidate instances.

use crate::error::Result;
use crate::geometry::{
    Polygon, ScaleFactors, binarize, mask_to_polygon, paste_mask, rescale_polygon,
    resize_bilinear,
};
use crate::segmentation::RawSegmentation;
use image::GrayImage;
use ndarray::s;
use tracing::{debug, warn};

/// Settings for one decode pass.
#[derive(Debug, Clone, Copy)]
pub struct DecodeParams {
    /// Detections scoring at or below this are dropped.
    pub score_threshold: f32,
    /// Soft mask values above this are foreground.
    pub mask_threshold: f32,
    /// Size of the frame the network saw, `(width, height)`.
    pub frame: (u32, u32),
    /// Size of the source image, `(width, height)`.
    pub source: (u32, u32),
    /// Frame to source coordinate factors.
    pub scale: ScaleFactors,
}

/// A decoded detection before deduplication.
#[derive(Debug, Clone)]
pub struct InstanceCandidate {
    /// Binary mask sized like the source image.
    pub mask: GrayImage,
    /// External contour in source coordinates.
    pub polygon: Polygon,
    /// Detector confidence.
    pub score: f32,
}

/// Turn raw detections into candidates.
///
/// Low-scoring detections, empty boxes and masks without foreground are
/// skipped. The result is in detection order.
pub fn decode_instances(
    raw: &RawSegmentation,
    params: &DecodeParams,
) -> Result<Vec<InstanceCandidate>> {
    raw.validate()?;

    let (frame_w, frame_h) = params.frame;
    let mut candidates = Vec::new();

    for i in 0..raw.len() {
        let score = raw.scores[i];
        if score <= params.score_threshold {
            continue;
        }

        let clamp_x = |v: f32| (v.round().max(0.0) as u32).min(frame_w);
        let clamp_y = |v: f32| (v.round().max(0.0) as u32).min(frame_h);
        let (x1, y1) = (clamp_x(raw.boxes[[i, 0]]), clamp_y(raw.boxes[[i, 1]]));
        let (x2, y2) = (clamp_x(raw.boxes[[i, 2]]), clamp_y(raw.boxes[[i, 3]]));
        if x2 <= x1 || y2 <= y1 {
            debug!("Detection {i}: empty box, skipping");
            continue;
        }
        let (box_w, box_h) = ((x2 - x1) as usize, (y2 - y1) as usize);

        let channel = raw.masks.slice(s![i, 0, .., ..]);
        let soft = if channel.dim() == (frame_h as usize, frame_w as usize) {
            channel
                .slice(s![y1 as usize..y2 as usize, x1 as usize..x2 as usize])
                .to_owned()
        } else {
            resize_bilinear(channel, box_h, box_w)
        };
        let local = binarize(&soft, params.mask_threshold);

        let Some(contour) = mask_to_polygon(&local) else {
            warn!("Detection {i}: no contour found in mask, skipping");
            continue;
        };
        debug!("Detection {i}: contour with {} points", contour.len());

        let origin = (x1 as i32, y1 as i32);
        candidates.push(InstanceCandidate {
            mask: paste_mask(&local, (x1, y1), params.frame, params.source),
            polygon: rescale_polygon(&contour, origin, params.scale),
            score,
        });
    }

    Ok(candidates)
}
