//! Contour extraction from binary masks.

use crate::geometry::{PixelPoint, Polygon};
use image::{GrayImage, imageops};
use imageproc::contours::{BorderType, Contour, find_contours};

/// Top-level outer borders of `mask`, in discovery order.
///
/// The border tracer never follows foreground lying on the image edge, so
/// the mask is traced inside a one-pixel background frame and the points
/// are shifted back.
fn outer_borders(mask: &GrayImage) -> Vec<Contour<i32>> {
    let (w, h) = mask.dimensions();
    let mut framed = GrayImage::new(w + 2, h + 2);
    imageops::replace(&mut framed, mask, 1, 1);

    find_contours::<i32>(&framed)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .collect()
}

fn to_polygon(contour: &Contour<i32>) -> Polygon {
    let points: Vec<PixelPoint> = contour
        .points
        .iter()
        .map(|p| PixelPoint::new(p.x - 1, p.y - 1))
        .collect();
    Polygon::new(compress_collinear(&points))
}

/// Outer borders of every top-level foreground region, in discovery order.
///
/// Any non-zero pixel counts as foreground, including pixels on the mask
/// edge. Holes and regions nested inside holes are ignored.
pub fn external_contours(mask: &GrayImage) -> Vec<Polygon> {
    outer_borders(mask).iter().map(to_polygon).collect()
}

/// External contour of a binary mask, or `None` when it has no foreground.
///
/// When the mask holds several regions, the one with the longest traced
/// border is used.
pub fn mask_to_polygon(mask: &GrayImage) -> Option<Polygon> {
    let mut best: Option<&Contour<i32>> = None;
    let borders = outer_borders(mask);
    for contour in &borders {
        if best.is_none_or(|b| contour.points.len() > b.points.len()) {
            best = Some(contour);
        }
    }
    best.map(to_polygon)
}

/// Drop vertices lying inside straight horizontal, vertical or diagonal runs.
fn compress_collinear(points: &[PixelPoint]) -> Vec<PixelPoint> {
    let mut ring: Vec<PixelPoint> = Vec::with_capacity(points.len());
    for &p in points {
        if ring.last() != Some(&p) {
            ring.push(p);
        }
    }
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    if ring.len() < 3 {
        return ring;
    }

    let n = ring.len();
    let step = |a: PixelPoint, b: PixelPoint| ((b.x - a.x).signum(), (b.y - a.y).signum());

    ring.iter()
        .enumerate()
        .filter(|&(i, &p)| {
            let prev = ring[(i + n - 1) % n];
            let next = ring[(i + 1) % n];
            step(prev, p) != step(p, next)
        })
        .map(|(_, &p)| p)
        .collect()
}
