//! Shared models and reference data for one run.

use crate::catalog::{CategoryTable, EmbeddingDatabase, RegulationTable};
use crate::classification::{RankedResult, SpeciesClassifier};
use crate::config::{Config, require_path};
use crate::error::Result;
use crate::geometry::{PixelPoint, Polygon, crop_region};
use crate::imaging::{decode_image, load_image, validate_dimensions};
use crate::inference::{OnnxClassificationModel, OnnxSegmentationModel};
use crate::pipeline::report::{FishReport, ImageOutcome, ImageReport, SegmentationReport};
use crate::pipeline::summary::global_summary;
use crate::segmentation::{Instance, Segmenter};
use image::RgbImage;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Per-run identification settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentificationSettings {
    /// Distinct species ranked per fish.
    pub top_k: usize,
    /// Distinct species in the per-image summary.
    pub summary_size: usize,
    /// Images with a side shorter than this are rejected.
    pub min_image_size: u32,
    /// Fish crops with a side shorter than this are skipped.
    pub min_region_size: u32,
    /// Margin around the fish mask when cropping.
    pub crop_padding: u32,
    /// Classify the whole image when segmentation finds nothing.
    pub fallback_full_image: bool,
    /// Run segmentation; when false the whole image is one fish.
    pub segment: bool,
}

impl IdentificationSettings {
    /// Settings taken from the configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            top_k: config.classification.top_k,
            summary_size: config.defaults.summary_size,
            min_image_size: config.defaults.min_image_size,
            min_region_size: config.classification.min_region_size,
            crop_padding: config.classification.crop_padding,
            fallback_full_image: config.defaults.fallback_full_image,
            segment: true,
        }
    }
}

impl Default for IdentificationSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Load the segmentation network configured in `config.models.segmentation`.
pub fn load_segmenter(config: &Config) -> Result<Segmenter> {
    let path = require_path(config.models.segmentation.as_ref(), "segmentation")?;
    info!("Loading segmentation model: {}", path.display());
    let model = OnnxSegmentationModel::load(&path, config.inference.device)?;
    Ok(Segmenter::new(Box::new(model), config.segmentation))
}

/// Models, catalogs and settings needed to identify fish.
///
/// Immutable once built; model sessions synchronise internally, so a context
/// can be shared across threads.
pub struct IdentificationContext {
    segmenter: Segmenter,
    classifier: SpeciesClassifier,
    categories: Arc<CategoryTable>,
    regulations: Arc<RegulationTable>,
    settings: IdentificationSettings,
}

impl IdentificationContext {
    /// Load every model and catalog named in the configuration.
    ///
    /// Fails before any image is processed when a required file is missing
    /// or cannot be loaded.
    pub fn from_config(config: &Config) -> Result<Self> {
        let categories_path = require_path(config.models.categories.as_ref(), "categories")?;
        let embeddings_path = require_path(config.models.embeddings.as_ref(), "embeddings")?;
        let classification_path =
            require_path(config.models.classification.as_ref(), "classification")?;

        let categories = Arc::new(CategoryTable::load(&categories_path)?);
        let database = Arc::new(EmbeddingDatabase::load(&embeddings_path, &categories)?);
        let regulations = match config.models.regulations.as_ref() {
            Some(configured) => {
                let path = require_path(Some(configured), "regulations")?;
                RegulationTable::load(&path)?
            }
            None => {
                debug!("No regulations file configured");
                RegulationTable::default()
            }
        };

        let segmenter = load_segmenter(config)?;
        info!(
            "Loading classification model: {}",
            classification_path.display()
        );
        let model = OnnxClassificationModel::load(&classification_path, config.inference.device)?;
        let classifier = SpeciesClassifier::new(
            Box::new(model),
            Arc::clone(&categories),
            database,
            &config.classification,
        );

        Ok(Self::from_parts(
            segmenter,
            classifier,
            categories,
            Arc::new(regulations),
            IdentificationSettings::from_config(config),
        ))
    }

    /// Assemble a context from already built parts.
    pub fn from_parts(
        segmenter: Segmenter,
        classifier: SpeciesClassifier,
        categories: Arc<CategoryTable>,
        regulations: Arc<RegulationTable>,
        settings: IdentificationSettings,
    ) -> Self {
        Self {
            segmenter,
            classifier,
            categories,
            regulations,
            settings,
        }
    }

    /// Replace the run settings.
    #[must_use]
    pub fn with_settings(mut self, settings: IdentificationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Active run settings.
    pub fn settings(&self) -> &IdentificationSettings {
        &self.settings
    }

    /// Loaded categories.
    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    /// Loaded regulations.
    pub fn regulations(&self) -> &RegulationTable {
        &self.regulations
    }

    /// Fish instances in an image.
    pub fn segment(&self, image: &RgbImage) -> Result<Vec<Instance>> {
        self.segmenter.segment(image)
    }

    /// Rank up to `top_k` distinct species for a fish crop.
    pub fn classify(&self, region: &RgbImage, top_k: usize) -> Result<RankedResult> {
        self.classifier.classify(region, top_k)
    }

    /// Segment and classify every fish in an image.
    ///
    /// A fish whose crop is too small or fails to classify is dropped with a
    /// warning. Without segmentation, or when segmentation finds nothing and
    /// the full-image fallback is enabled, the whole image is classified as
    /// a single fish.
    pub fn identify_image(&self, image: &RgbImage) -> Result<ImageReport> {
        let settings = &self.settings;
        validate_dimensions(image, settings.min_image_size)?;

        let instances = if settings.segment {
            self.segment(image)?
        } else {
            Vec::new()
        };

        let mut fish: Vec<FishReport> = Vec::with_capacity(instances.len());
        for (index, instance) in instances.iter().enumerate() {
            let crop = crop_region(image, &instance.mask, settings.crop_padding);
            if crop.width() < settings.min_region_size || crop.height() < settings.min_region_size
            {
                warn!(
                    "Instance {index}: region {}x{} is smaller than {} px, skipping",
                    crop.width(),
                    crop.height(),
                    settings.min_region_size
                );
                continue;
            }

            match self.classify(&crop, settings.top_k) {
                Ok(classifications) => fish.push(FishReport {
                    fish_id: fish.len() + 1,
                    polygon: instance.polygon.clone(),
                    score: instance.score,
                    classifications,
                }),
                Err(e) => warn!("Instance {index}: classification failed, skipping: {e}"),
            }
        }

        if instances.is_empty() && (!settings.segment || settings.fallback_full_image) {
            debug!("Classifying the whole image");
            fish.push(FishReport {
                fish_id: 1,
                polygon: image_outline(image),
                score: 1.0,
                classifications: self.classify(image, settings.top_k)?,
            });
        }

        let detections = global_summary(
            fish.iter().map(|f| f.classifications.candidates()),
            settings.summary_size,
            &self.categories,
            &self.regulations,
        );

        Ok(ImageReport {
            total_fish_detected: fish.len(),
            detections,
            instances: fish,
        })
    }

    /// Identify fish in an image file. Failures are captured in the outcome.
    pub fn identify_file(&self, path: &Path) -> ImageOutcome {
        let result = load_image(path).and_then(|image| self.identify_image(&image));
        if let Err(e) = &result {
            error!("Failed to process {}: {e}", path.display());
        }
        ImageOutcome::new(display_name(path), result)
    }

    /// Identify fish in encoded image bytes. Failures are captured in the outcome.
    pub fn identify_bytes(&self, bytes: &[u8], name: &str) -> ImageOutcome {
        let result = decode_image(bytes, name).and_then(|image| self.identify_image(&image));
        if let Err(e) = &result {
            error!("Failed to process {name}: {e}");
        }
        ImageOutcome::new(name, result)
    }
}

/// Segment one image file without classifying.
pub fn segment_file(
    segmenter: &Segmenter,
    path: &Path,
    min_image_size: u32,
) -> ImageOutcome<SegmentationReport> {
    let result = load_image(path).and_then(|image| {
        validate_dimensions(&image, min_image_size)?;
        segmenter.segment(&image).map(SegmentationReport::from)
    });
    if let Err(e) = &result {
        error!("Failed to segment {}: {e}", path.display());
    }
    ImageOutcome::new(display_name(path), result)
}

/// File name of `path`, falling back to the full path.
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Rectangle covering the whole image.
fn image_outline(image: &RgbImage) -> Polygon {
    let (right, bottom) = (
        image.width().saturating_sub(1) as i32,
        image.height().saturating_sub(1) as i32,
    );
    Polygon::new(vec![
        PixelPoint::new(0, 0),
        PixelPoint::new(right, 0),
        PixelPoint::new(right, bottom),
        PixelPoint::new(0, bottom),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_settings_follow_config() {
        let mut config = Config::default();
        config.classification.top_k = 4;
        config.defaults.fallback_full_image = true;

        let settings = IdentificationSettings::from_config(&config);
        assert_eq!(settings.top_k, 4);
        assert!(settings.fallback_full_image);
        assert!(settings.segment);
        assert_eq!(settings.min_region_size, 50);
    }

    #[test]
    fn test_image_outline() {
        let outline = image_outline(&RgbImage::new(200, 100));
        assert_eq!(outline.len(), 4);
        assert!((outline.area() - 199.0 * 99.0).abs() < 1e-9);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(&PathBuf::from("/data/lake/bass.jpg")), "bass.jpg");
    }

    #[test]
    fn test_from_config_requires_models() {
        let result = IdentificationContext::from_config(&Config::default());
        assert!(matches!(
            result,
            Err(crate::error::Error::ModelNotConfigured { .. })
        ));
    }
}
