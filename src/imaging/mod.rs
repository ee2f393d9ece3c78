//! Image decoding and network preprocessing.

mod decode;
mod preprocess;

pub use decode::{decode_image, load_image, validate_dimensions};
pub use preprocess::{resize_for_segmentation, to_classifier_tensor};
