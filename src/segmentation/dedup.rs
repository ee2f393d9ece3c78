//! Greedy polygon non-max suppression.

use crate::geometry::{Polygon, polygon_iou};
use crate::segmentation::InstanceCandidate;
use image::GrayImage;
use serde::Serialize;
use tracing::{debug, warn};

/// A detected fish that survived deduplication.
#[derive(Debug, Clone, Serialize)]
pub struct Instance {
    /// Binary mask sized like the source image.
    #[serde(skip)]
    pub mask: GrayImage,
    /// External contour in source coordinates.
    pub polygon: Polygon,
    /// Detector confidence.
    pub score: f32,
    /// Polygon area in square pixels.
    pub area: f64,
}

/// Drop degenerate candidates, then suppress overlaps.
///
/// Candidates are visited largest polygon first (stable on ties). A
/// candidate is kept only when its IoU with every already kept instance is
/// at most `nms_threshold`. Output is in area-descending order.
pub fn deduplicate(candidates: Vec<InstanceCandidate>, nms_threshold: f64) -> Vec<Instance> {
    let mut valid: Vec<Instance> = candidates
        .into_iter()
        .enumerate()
        .filter_map(|(i, c)| {
            if c.polygon.is_degenerate() {
                warn!(
                    "Candidate {i}: degenerate polygon with {} points, skipping",
                    c.polygon.len()
                );
                return None;
            }
            Some(Instance {
                area: c.polygon.area(),
                mask: c.mask,
                polygon: c.polygon,
                score: c.score,
            })
        })
        .collect();

    valid.sort_by(|a, b| b.area.total_cmp(&a.area));

    let mut kept: Vec<Instance> = Vec::with_capacity(valid.len());
    for candidate in valid {
        let overlaps = kept
            .iter()
            .any(|k| polygon_iou(&candidate.polygon, &k.polygon) > nms_threshold);
        if overlaps {
            debug!(
                "Suppressed instance with area {:.0} (score {:.3})",
                candidate.area, candidate.score
            );
        } else {
            kept.push(candidate);
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PixelPoint;

    fn rect(x1: i32, y1: i32, x2: i32, y2: i32) -> Polygon {
        Polygon::new(vec![
            PixelPoint::new(x1, y1),
            PixelPoint::new(x2, y1),
            PixelPoint::new(x2, y2),
            PixelPoint::new(x1, y2),
        ])
    }

    fn candidate(polygon: Polygon, score: f32) -> InstanceCandidate {
        InstanceCandidate {
            mask: GrayImage::new(4, 4),
            polygon,
            score,
        }
    }

    #[test]
    fn test_high_overlap_keeps_larger() {
        // 100x100 vs 100x95 inside it: IoU 0.95.
        let small = candidate(rect(0, 0, 100, 95), 0.99);
        let large = candidate(rect(0, 0, 100, 100), 0.5);
        let out = deduplicate(vec![small, large], 0.9);

        assert_eq!(out.len(), 1);
        assert!((out[0].area - 10_000.0).abs() < 1e-9);
        assert!((out[0].score - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_low_overlap_keeps_both_sorted_by_area() {
        let a = candidate(rect(0, 0, 10, 10), 0.9);
        let b = candidate(rect(5, 0, 25, 10), 0.9);
        let out = deduplicate(vec![a, b], 0.9);

        assert_eq!(out.len(), 2);
        assert!(out[0].area > out[1].area);
    }

    #[test]
    fn test_degenerate_polygons_dropped() {
        let line = Polygon::new(vec![
            PixelPoint::new(0, 0),
            PixelPoint::new(3, 0),
            PixelPoint::new(6, 0),
        ]);
        let out = deduplicate(
            vec![candidate(line, 0.9), candidate(rect(0, 0, 2, 2), 0.9)],
            0.9,
        );
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_kept_pairs_respect_threshold() {
        let candidates: Vec<_> = (0..6)
            .map(|i| candidate(rect(i * 3, 0, i * 3 + 10, 10), 0.9))
            .collect();
        let out = deduplicate(candidates, 0.5);
        for (i, a) in out.iter().enumerate() {
            for b in &out[i + 1..] {
                assert!(polygon_iou(&a.polygon, &b.polygon) <= 0.5);
            }
        }
    }

    #[test]
    fn test_equal_areas_keep_input_order() {
        let a = candidate(rect(0, 0, 10, 10), 0.1);
        let b = candidate(rect(50, 50, 60, 60), 0.2);
        let out = deduplicate(vec![a, b], 0.9);
        assert!((out[0].score - 0.1).abs() < 1e-6);
        assert!((out[1].score - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_empty_input() {
        assert!(deduplicate(Vec::new(), 0.9).is_empty());
    }
}
