//! Input discovery and batched processing.

use crate::constants::IMAGE_EXTENSIONS;
use crate::error::Result;
use crate::output::progress::{image_done, set_current_image};
use crate::pipeline::context::{IdentificationContext, display_name};
use crate::pipeline::report::ImageOutcome;
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Collect image files from paths (files and directories).
///
/// Directories are walked recursively in name order. Non-existent paths are
/// skipped with a warning.
pub fn collect_input_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_image_file(path) {
                files.push(path.clone());
            } else {
                debug!("Skipping unsupported file: {}", path.display());
            }
        } else if path.is_dir() {
            collect_image_files_recursive(path, &mut files)?;
        } else {
            warn!("Skipping non-existent path: {}", path.display());
        }
    }

    Ok(files)
}

fn collect_image_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            collect_image_files_recursive(&path, files)?;
        } else if is_image_file(&path) {
            files.push(path);
        }
    }

    Ok(())
}

/// Check if a file has a supported image extension.
fn is_image_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known))
    })
}

/// Identify every file, `max_batch_size` at a time.
///
/// Images are independent: a failure becomes an error outcome and the rest
/// are still processed. Outcomes are returned in input order.
pub fn identify_batch(
    context: &IdentificationContext,
    files: &[PathBuf],
    max_batch_size: usize,
    progress: Option<&ProgressBar>,
) -> Vec<ImageOutcome> {
    let batch_size = max_batch_size.max(1);
    let batches = files.len().div_ceil(batch_size);
    let mut outcomes = Vec::with_capacity(files.len());

    for (index, batch) in files.chunks(batch_size).enumerate() {
        debug!(
            "Batch {}/{}: {} image(s)",
            index + 1,
            batches,
            batch.len()
        );
        for file in batch {
            set_current_image(progress, &display_name(file));
            outcomes.push(context.identify_file(file));
            image_done(progress);
        }
    }

    outcomes
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("bass.jpg")));
        assert!(is_image_file(Path::new("bass.JPEG")));
        assert!(is_image_file(Path::new("ahven_järvi.png")));
        assert!(is_image_file(Path::new("scan.TIFF")));
        assert!(!is_image_file(Path::new("notes.txt")));
        assert!(!is_image_file(Path::new("jpg")));
    }

    #[test]
    fn test_collect_recursive_sorted() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(dir.path().join("b.png"), b"").unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"").unwrap();
        std::fs::write(dir.path().join("readme.md"), b"").unwrap();
        std::fs::write(nested.join("c.webp"), b"").unwrap();

        let files = collect_input_files(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.jpg", "b.png", "c.webp"]);
    }

    #[test]
    fn test_collect_skips_missing_paths() {
        let files = collect_input_files(&[PathBuf::from("/definitely/not/here.jpg")]).unwrap();
        assert!(files.is_empty());
    }
}
