//! Integer polygons in image coordinates and their overlap measures.

use geo::{Area, BooleanOps, LineString};
use serde::Serialize;
use std::collections::HashSet;

/// A pixel position in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "[i32; 2]")]
pub struct PixelPoint {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl PixelPoint {
    /// Create a point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<PixelPoint> for [i32; 2] {
    fn from(p: PixelPoint) -> Self {
        [p.x, p.y]
    }
}

/// Axis-wise factors mapping a resized frame back to the source image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactors {
    /// Horizontal factor (source width / frame width).
    pub x: f32,
    /// Vertical factor (source height / frame height).
    pub y: f32,
}

impl ScaleFactors {
    /// Factors that leave coordinates unchanged.
    pub const IDENTITY: Self = Self { x: 1.0, y: 1.0 };
}

/// An ordered ring of integer points. The closing edge is implicit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Polygon {
    points: Vec<PixelPoint>,
}

impl Polygon {
    /// Build a polygon from its vertices.
    pub fn new(points: Vec<PixelPoint>) -> Self {
        Self { points }
    }

    /// Vertices in ring order.
    pub fn points(&self) -> &[PixelPoint] {
        &self.points
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the polygon has no vertices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of distinct vertices.
    pub fn distinct_vertices(&self) -> usize {
        self.points.iter().collect::<HashSet<_>>().len()
    }

    /// Convert to a `geo` polygon for area and boolean operations.
    pub fn to_geo(&self) -> geo::Polygon<f64> {
        let ring: Vec<(f64, f64)> = self
            .points
            .iter()
            .map(|p| (f64::from(p.x), f64::from(p.y)))
            .collect();
        geo::Polygon::new(LineString::from(ring), vec![])
    }

    /// Enclosed area in square pixels.
    pub fn area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        self.to_geo().unsigned_area()
    }

    /// Fewer than three distinct vertices, or no enclosed area.
    pub fn is_degenerate(&self) -> bool {
        self.distinct_vertices() < 3 || self.area() <= 0.0
    }
}

/// Map a polygon from a box-local, resized frame back to source coordinates.
///
/// Each point becomes `(origin + p) * scale`, truncated toward zero.
pub fn rescale_polygon(polygon: &Polygon, origin: (i32, i32), scale: ScaleFactors) -> Polygon {
    let points = polygon
        .points()
        .iter()
        .map(|p| {
            let x = (origin.0 + p.x) as f32 * scale.x;
            let y = (origin.1 + p.y) as f32 * scale.y;
            PixelPoint::new(x as i32, y as i32)
        })
        .collect();
    Polygon::new(points)
}

/// Intersection over union of two simple polygons, in `[0, 1]`.
///
/// Returns 0 when the union has no area.
pub fn polygon_iou(a: &Polygon, b: &Polygon) -> f64 {
    if a.len() < 3 || b.len() < 3 {
        return 0.0;
    }

    let (ga, gb) = (a.to_geo(), b.to_geo());
    let union = ga.union(&gb).unsigned_area();
    if union <= 0.0 {
        return 0.0;
    }

    let intersection = ga.intersection(&gb).unsigned_area();
    (intersection / union).clamp(0.0, 1.0)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn rect(x1: i32, y1: i32, x2: i32, y2: i32) -> Polygon {
        Polygon::new(vec![
            PixelPoint::new(x1, y1),
            PixelPoint::new(x2, y1),
            PixelPoint::new(x2, y2),
            PixelPoint::new(x1, y2),
        ])
    }

    #[test]
    fn test_area_of_rectangle() {
        assert!((rect(0, 0, 10, 5).area() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_polygons() {
        let line = Polygon::new(vec![
            PixelPoint::new(0, 0),
            PixelPoint::new(5, 0),
            PixelPoint::new(10, 0),
        ]);
        assert!(line.is_degenerate());

        let repeated = Polygon::new(vec![
            PixelPoint::new(0, 0),
            PixelPoint::new(5, 5),
            PixelPoint::new(0, 0),
        ]);
        assert_eq!(repeated.distinct_vertices(), 2);
        assert!(repeated.is_degenerate());

        assert!(!rect(0, 0, 3, 3).is_degenerate());
    }

    #[test]
    fn test_iou_identical_is_one() {
        let a = rect(0, 0, 10, 10);
        assert!((polygon_iou(&a, &a) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_iou_half_overlap() {
        // Overlap 5x10 = 50, union 150.
        let iou = polygon_iou(&rect(0, 0, 10, 10), &rect(5, 0, 15, 10));
        assert!((iou - 50.0 / 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_iou_disjoint_is_zero() {
        assert_eq!(polygon_iou(&rect(0, 0, 5, 5), &rect(10, 10, 20, 20)), 0.0);
    }

    #[test]
    fn test_iou_zero_union_is_zero() {
        let empty = Polygon::default();
        let point = Polygon::new(vec![PixelPoint::new(1, 1)]);
        assert_eq!(polygon_iou(&empty, &empty), 0.0);
        assert_eq!(polygon_iou(&point, &point), 0.0);

        let flat = Polygon::new(vec![
            PixelPoint::new(0, 0),
            PixelPoint::new(4, 0),
            PixelPoint::new(8, 0),
        ]);
        assert_eq!(polygon_iou(&flat, &flat), 0.0);
    }

    #[test]
    fn test_rescale_adds_origin_then_scales() {
        let poly = Polygon::new(vec![PixelPoint::new(1, 2), PixelPoint::new(3, 5)]);
        let scaled = rescale_polygon(&poly, (10, 20), ScaleFactors { x: 2.0, y: 0.5 });
        assert_eq!(
            scaled.points(),
            &[PixelPoint::new(22, 11), PixelPoint::new(26, 12)]
        );
    }

    #[test]
    fn test_rescale_truncates() {
        let poly = Polygon::new(vec![PixelPoint::new(1, 1)]);
        let scaled = rescale_polygon(&poly, (0, 0), ScaleFactors { x: 1.9, y: 2.7 });
        assert_eq!(scaled.points(), &[PixelPoint::new(1, 2)]);
    }

    #[test]
    fn test_polygon_serializes_as_pairs() {
        let json = serde_json::to_string(&rect(0, 0, 2, 1)).ok();
        assert_eq!(json.as_deref(), Some("[[0,0],[2,0],[2,1],[0,1]]"));
    }
}
