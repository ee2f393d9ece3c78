//! Region cropping around a fish mask.

use crate::geometry::PixelPoint;
use crate::geometry::contour::external_contours;
use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage};

/// Axis-aligned pixel rectangle, inclusive of `x`/`y`, exclusive of the far edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Crop `image` to the padded bounding box of the mask's largest region.
///
/// The mask is nearest-resized to the image size when they differ. If the
/// mask has no foreground the whole image is returned.
pub fn crop_region(image: &RgbImage, mask: &GrayImage, padding: u32) -> RgbImage {
    match region_bounds(image, mask, padding) {
        Some(b) => imageops::crop_imm(image, b.x, b.y, b.width, b.height).to_image(),
        None => image.clone(),
    }
}

/// Padded, clamped box that [`crop_region`] would cut out, if any.
pub fn region_bounds(image: &RgbImage, mask: &GrayImage, padding: u32) -> Option<BoundingBox> {
    let (img_w, img_h) = image.dimensions();
    if img_w == 0 || img_h == 0 {
        return None;
    }

    let resized;
    let mask = if mask.dimensions() == (img_w, img_h) {
        mask
    } else {
        resized = imageops::resize(mask, img_w, img_h, FilterType::Nearest);
        &resized
    };

    let mut largest: Option<(f64, &[PixelPoint])> = None;
    let contours = external_contours(mask);
    for contour in &contours {
        let area = contour.area();
        if largest.is_none_or(|(best, _)| area > best) {
            largest = Some((area, contour.points()));
        }
    }
    let (_, points) = largest?;

    let min_x = points.iter().map(|p| p.x).min()?;
    let max_x = points.iter().map(|p| p.x).max()?;
    let min_y = points.iter().map(|p| p.y).min()?;
    let max_y = points.iter().map(|p| p.y).max()?;

    let pad = padding as i32;
    let x1 = (min_x - pad).max(0) as u32;
    let y1 = (min_y - pad).max(0) as u32;
    let x2 = ((max_x + 1 + pad) as u32).min(img_w);
    let y2 = ((max_y + 1 + pad) as u32).min(img_h);

    Some(BoundingBox {
        x: x1,
        y: y1,
        width: x2.saturating_sub(x1),
        height: y2.saturating_sub(y1),
    })
}
