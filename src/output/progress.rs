//! Batch progress display.
//!
//! The bar counts images and shows the file currently being identified.
//! Every helper accepts `None` so callers never branch on whether progress
//! is enabled.

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} images {wide_msg}";

/// Progress bar over `total_images`, or `None` when disabled or empty.
pub fn create_image_progress(total_images: usize, enabled: bool) -> Option<ProgressBar> {
    if !enabled || total_images == 0 {
        return None;
    }

    let pb = ProgressBar::new(total_images as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░ "),
    );
    Some(pb)
}

/// Show which image is being identified.
pub fn set_current_image(pb: Option<&ProgressBar>, name: &str) {
    if let Some(pb) = pb {
        pb.set_message(name.to_string());
    }
}

/// Count one image as done.
pub fn image_done(pb: Option<&ProgressBar>) {
    if let Some(pb) = pb {
        pb.inc(1);
    }
}

/// Final line: fish found and images that failed.
pub fn finish_progress(pb: Option<ProgressBar>, fish: usize, errors: usize) {
    if let Some(pb) = pb {
        pb.finish_with_message(completion_message(fish, errors));
    }
}

fn completion_message(fish: usize, errors: usize) -> String {
    match errors {
        0 => format!("done, {fish} fish"),
        1 => format!("done, {fish} fish, 1 image failed"),
        n => format!("done, {fish} fish, {n} images failed"),
    }
}
