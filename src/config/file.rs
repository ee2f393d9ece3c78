//! Configuration file loading.

use crate::config::Config;
use crate::error::{Error, Result};
use std::path::Path;

/// Load configuration from a TOML file.
///
/// Returns default config if the file does not exist.
pub fn load_config_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load configuration from the default platform-specific path.
///
/// Returns default config if no config file exists.
pub fn load_default_config() -> Result<Config> {
    super::config_file_path().map_or_else(|_| Ok(Config::default()), |path| load_config_file(&path))
}

/// Load configuration from an explicit path, or from the default location.
///
/// Unlike the default location, an explicit path must exist.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) if !path.exists() => Err(Error::ConfigRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        }),
        Some(path) => load_config_file(path),
        None => load_default_config(),
    }
}

/// Save configuration to a TOML file.
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::ConfigWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    let contents = toml::to_string_pretty(config).map_err(|e| Error::ConfigSerialize { source: e })?;

    std::fs::write(path, contents).map_err(|e| Error::ConfigWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Save configuration to the default platform-specific path.
pub fn save_default_config(config: &Config) -> Result<std::path::PathBuf> {
    let path = super::config_file_path()?;
    save_config(config, &path)?;
    Ok(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_nonexistent_file_returns_default() {
        let path = Path::new("/nonexistent/path/config.toml");
        let config = load_config_file(path).unwrap();
        assert!(config.models.segmentation.is_none());
        assert_eq!(config.classification.top_k, 10);
    }

    #[test]
    fn test_load_valid_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[models]
segmentation = "/models/segmentation.onnx"
categories = "/models/categories.json"

[segmentation]
nms_threshold = 0.8

[classification]
top_k = 5
max_distance = 4.5
"#
        )
        .unwrap();

        let config = load_config_file(file.path()).unwrap();
        assert_eq!(
            config.models.segmentation.as_deref(),
            Some(Path::new("/models/segmentation.onnx"))
        );
        assert!(config.models.classification.is_none());
        assert_eq!(config.segmentation.nms_threshold, 0.8);
        assert_eq!(config.segmentation.score_threshold, 0.3);
        assert_eq!(config.classification.top_k, 5);
        assert_eq!(config.classification.max_distance, 4.5);
    }

    #[test]
    fn test_save_then_load_preserves_thresholds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.classification.min_region_size = 64;
        config.defaults.fallback_full_image = true;
        save_config(&config, &path).unwrap();

        let loaded = load_config_file(&path).unwrap();
        assert_eq!(loaded.classification.min_region_size, 64);
        assert!(loaded.defaults.fallback_full_image);
    }

    #[test]
    fn test_load_explicit_missing_path_is_error() {
        let result = load_config(Some(Path::new("/nonexistent/fishid.toml")));
        assert!(matches!(result.unwrap_err(), Error::ConfigRead { .. }));
    }

    #[test]
    fn test_load_invalid_toml_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "this is not valid toml {{{{").unwrap();

        let config = load_config_file(file.path());
        assert!(config.is_err());
    }
}
