//! Pixel geometry: contours, masks, polygons and crops.

mod contour;
mod crop;
mod mask;
mod polygon;

pub use contour::{external_contours, mask_to_polygon};
pub use crop::{BoundingBox, crop_region, region_bounds};
pub use mask::{FOREGROUND, binarize, foreground_pixels, paste_mask, resize_bilinear};
pub use polygon::{PixelPoint, Polygon, ScaleFactors, polygon_iou, rescale_polygon};
