//! Configuration validation.

use crate::config::{ClassificationConfig, Config, ModelsConfig, SegmentationConfig};
use crate::constants::confidence;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_segmentation(&config.segmentation)?;
    validate_classification(&config.classification)?;
    validate_defaults(config)?;
    Ok(())
}

fn check_unit_range(name: &str, value: f64) -> Result<()> {
    let (min, max) = (f64::from(confidence::MIN), f64::from(confidence::MAX));
    if !(min..=max).contains(&value) {
        return Err(Error::ConfigValidation {
            message: format!("{name} must be between {min} and {max}, got {value}"),
        });
    }
    Ok(())
}

/// Validate segmentation settings.
fn validate_segmentation(seg: &SegmentationConfig) -> Result<()> {
    check_unit_range("score_threshold", f64::from(seg.score_threshold))?;
    check_unit_range("mask_threshold", f64::from(seg.mask_threshold))?;
    check_unit_range("nms_threshold", seg.nms_threshold)?;

    if seg.min_size == 0 || seg.min_size > seg.max_size {
        return Err(Error::ConfigValidation {
            message: format!(
                "segmentation min_size must be in 1..=max_size, got min_size={} max_size={}",
                seg.min_size, seg.max_size
            ),
        });
    }

    Ok(())
}

/// Validate classification and calibration settings.
fn validate_classification(cls: &ClassificationConfig) -> Result<()> {
    if cls.top_k == 0 {
        return Err(Error::ConfigValidation {
            message: "top_k must be at least 1".to_string(),
        });
    }

    if cls.input_size == 0 {
        return Err(Error::ConfigValidation {
            message: "input_size must be at least 1".to_string(),
        });
    }

    if !(cls.min_distance >= 0.0 && cls.min_distance < cls.max_distance) {
        return Err(Error::ConfigValidation {
            message: format!(
                "min_distance must be non-negative and below max_distance, got {} and {}",
                cls.min_distance, cls.max_distance
            ),
        });
    }

    if !(cls.confidence_floor > 0.0 && cls.confidence_floor <= confidence::MAX) {
        return Err(Error::ConfigValidation {
            message: format!(
                "confidence_floor must be in (0, 1], got {}",
                cls.confidence_floor
            ),
        });
    }

    Ok(())
}

/// Validate default settings.
fn validate_defaults(config: &Config) -> Result<()> {
    let defaults = &config.defaults;

    if defaults.summary_size == 0 {
        return Err(Error::ConfigValidation {
            message: "summary_size must be at least 1".to_string(),
        });
    }

    if defaults.max_batch_size == 0 {
        return Err(Error::ConfigValidation {
            message: "max_batch_size must be at least 1".to_string(),
        });
    }

    Ok(())
}

/// Resolve a required model or catalog path, checking that it exists.
pub fn require_path(configured: Option<&PathBuf>, kind: &'static str) -> Result<PathBuf> {
    let path = configured.ok_or(Error::ModelNotConfigured { kind })?;
    if !path.exists() {
        return Err(missing_file_error(kind, path));
    }
    Ok(path.clone())
}

fn missing_file_error(kind: &str, path: &Path) -> Error {
    match kind {
        "segmentation" | "classification" => Error::ModelFileNotFound {
            path: path.to_path_buf(),
        },
        _ => Error::CatalogFileNotFound {
            path: path.to_path_buf(),
        },
    }
}

/// Check that every configured model and catalog file exists.
///
/// Returns the checked entries as `(kind, path)` pairs for reporting.
pub fn validate_models_config(models: &ModelsConfig) -> Result<Vec<(&'static str, PathBuf)>> {
    let mut checked = vec![
        (
            "segmentation",
            require_path(models.segmentation.as_ref(), "segmentation")?,
        ),
        (
            "classification",
            require_path(models.classification.as_ref(), "classification")?,
        ),
        (
            "embeddings",
            require_path(models.embeddings.as_ref(), "embeddings")?,
        ),
        (
            "categories",
            require_path(models.categories.as_ref(), "categories")?,
        ),
    ];

    if models.regulations.is_some() {
        checked.push((
            "regulations",
            require_path(models.regulations.as_ref(), "regulations")?,
        ));
    }

    Ok(checked)
}
