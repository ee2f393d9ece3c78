//! Platform-specific configuration paths.

use crate::constants::APP_NAME;
use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME).ok_or(Error::ConfigDirNotFound)
}

/// Get the configuration directory for the current platform.
///
/// - Linux: `~/.config/fishid/`
/// - macOS: `~/Library/Application Support/fishid/`
/// - Windows: `%APPDATA%\fishid\`
pub fn config_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().to_path_buf())
}

/// Get the full path to the config file.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Directory where `config init` points model and catalog files by default.
pub fn models_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().join("models"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_contains_app_name() {
        let path = config_dir().unwrap();
        assert!(path.to_string_lossy().contains("fishid"));
    }

    #[test]
    fn test_config_file_path_ends_with_toml() {
        let path = config_file_path().unwrap();
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn test_models_dir_is_named_models() {
        let path = models_dir().unwrap();
        assert_eq!(path.file_name().unwrap(), "models");
    }
}
