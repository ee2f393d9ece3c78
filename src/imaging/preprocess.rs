//! Tensor preparation for the segmentation and classification networks.

use crate::constants::classification::{MEAN, STD};
use image::RgbImage;
use image::imageops::{self, FilterType};
use ndarray::{Array3, Array4};

/// Bilinear resize to `width` x `height`, laid out `[3, H, W]` with raw
/// channel values in `0..=255`.
pub fn resize_for_segmentation(image: &RgbImage, width: u32, height: u32) -> Array3<f32> {
    let resized;
    let frame = if image.dimensions() == (width, height) {
        image
    } else {
        resized = imageops::resize(image, width, height, FilterType::Triangle);
        &resized
    };

    Array3::from_shape_fn((3, height as usize, width as usize), |(c, y, x)| {
        f32::from(frame.get_pixel(x as u32, y as u32).0[c])
    })
}

/// Resize to `size` x `size` and normalise with ImageNet statistics into a
/// `[1, 3, size, size]` tensor.
pub fn to_classifier_tensor(image: &RgbImage, size: u32) -> Array4<f32> {
    let resized = imageops::resize(image, size, size, FilterType::Triangle);
    let side = size as usize;

    Array4::from_shape_fn((1, 3, side, side), |(_, c, y, x)| {
        let value = f32::from(resized.get_pixel(x as u32, y as u32).0[c]) / 255.0;
        (value - MEAN[c]) / STD[c]
    })
}
