//! Mask resampling, thresholding and placement.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use ndarray::{Array2, ArrayView2};

/// Foreground value written into binary masks.
pub const FOREGROUND: u8 = 255;

/// Bilinear resize of a soft mask to `height` x `width`.
///
/// Uses half-pixel centers (`align_corners = false`): output pixel `i`
/// samples source coordinate `(i + 0.5) * in / out - 0.5`, clamped at zero.
pub fn resize_bilinear(mask: ArrayView2<'_, f32>, height: usize, width: usize) -> Array2<f32> {
    let (in_h, in_w) = mask.dim();
    if in_h == 0 || in_w == 0 || height == 0 || width == 0 {
        return Array2::zeros((height, width));
    }

    let scale_y = in_h as f32 / height as f32;
    let scale_x = in_w as f32 / width as f32;

    let axis = |i: usize, scale: f32, len: usize| -> (usize, usize, f32) {
        let src = ((i as f32 + 0.5) * scale - 0.5).max(0.0);
        let lo = (src.floor() as usize).min(len - 1);
        let hi = (lo + 1).min(len - 1);
        (lo, hi, src - lo as f32)
    };

    let rows: Vec<_> = (0..height).map(|y| axis(y, scale_y, in_h)).collect();
    let cols: Vec<_> = (0..width).map(|x| axis(x, scale_x, in_w)).collect();

    Array2::from_shape_fn((height, width), |(y, x)| {
        let (y0, y1, ly) = rows[y];
        let (x0, x1, lx) = cols[x];
        let top = mask[[y0, x0]] * (1.0 - lx) + mask[[y0, x1]] * lx;
        let bottom = mask[[y1, x0]] * (1.0 - lx) + mask[[y1, x1]] * lx;
        top * (1.0 - ly) + bottom * ly
    })
}

/// Binary mask with [`FOREGROUND`] where `value > threshold`.
pub fn binarize(mask: &Array2<f32>, threshold: f32) -> GrayImage {
    let (h, w) = mask.dim();
    GrayImage::from_fn(w as u32, h as u32, |x, y| {
        if mask[[y as usize, x as usize]] > threshold {
            Luma([FOREGROUND])
        } else {
            Luma([0])
        }
    })
}

/// Place a box-local mask into a `frame`-sized canvas at `origin`, then
/// nearest-resize the canvas to `target`.
///
/// Parts of `local` falling outside the frame are clipped.
pub fn paste_mask(
    local: &GrayImage,
    origin: (u32, u32),
    frame: (u32, u32),
    target: (u32, u32),
) -> GrayImage {
    let mut canvas = GrayImage::new(frame.0, frame.1);
    imageops::replace(&mut canvas, local, i64::from(origin.0), i64::from(origin.1));

    if frame == target {
        return canvas;
    }
    imageops::resize(&canvas, target.0, target.1, FilterType::Nearest)
}

/// Number of foreground pixels.
pub fn foreground_pixels(mask: &GrayImage) -> usize {
    mask.pixels().filter(|p| p.0[0] > 0).count()
}
